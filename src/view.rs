use crate::Note;

/// Derives the list to display: notes matching `search` in title or content
/// (case-insensitive, empty matches all), pinned ones first.
///
/// Relative collection order is kept inside the pinned and unpinned groups.
pub fn project<'a>(notes: &'a [Note], search: &str) -> Vec<&'a Note> {
    let needle = search.to_lowercase();
    let (pinned, unpinned): (Vec<&Note>, Vec<&Note>) = notes
        .iter()
        .filter(|note| note.matches(&needle))
        .partition(|note| note.is_pinned);

    pinned.into_iter().chain(unpinned).collect()
}
