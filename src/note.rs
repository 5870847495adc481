//! Core data structures for the stickies application.
//!
//! This module contains the note record, its color palette and the id
//! source used when notes are created.
use std::{fmt, str::FromStr};

use chrono::{DateTime, Utc};
use log::warn;
use serde::{Deserialize, Deserializer, Serialize};

use crate::{DataUri, StickiesError};

/// Identifier of a committed note
pub type NoteId = u64;

/// Background colors a note can take
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", from = "String")]
pub enum Color {
    #[default]
    White,
    Yellow,
    Amber,
    Coral,
    Green,
    Cyan,
    Purple,
    Pink,
    Black,
}

impl Color {
    /// Every color, in palette order
    pub const ALL: [Color; 9] = [
        Color::White,
        Color::Yellow,
        Color::Amber,
        Color::Coral,
        Color::Green,
        Color::Cyan,
        Color::Purple,
        Color::Pink,
        Color::Black,
    ];

    /// Colors offered while composing a new note (no black)
    pub const COMPOSER: [Color; 8] = [
        Color::White,
        Color::Yellow,
        Color::Amber,
        Color::Coral,
        Color::Green,
        Color::Cyan,
        Color::Purple,
        Color::Pink,
    ];

    /// Stored form of the color, as used in the note background
    pub fn hex(&self) -> &'static str {
        match self {
            Color::White => "#fff",
            Color::Yellow => "#ffeb3b",
            Color::Amber => "#ffc107",
            Color::Coral => "#ff8a65",
            Color::Green => "#aed581",
            Color::Cyan => "#80deea",
            Color::Purple => "#b39ddb",
            Color::Pink => "#f8bbd0",
            Color::Black => "#000",
        }
    }

    /// Lowercase name accepted on the command line
    pub fn name(&self) -> &'static str {
        match self {
            Color::White => "white",
            Color::Yellow => "yellow",
            Color::Amber => "amber",
            Color::Coral => "coral",
            Color::Green => "green",
            Color::Cyan => "cyan",
            Color::Purple => "purple",
            Color::Pink => "pink",
            Color::Black => "black",
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name(), self.hex())
    }
}

impl FromStr for Color {
    type Err = StickiesError;

    /// Accepts a palette name or hex value, case-insensitively.
    /// `#ffffff` and `#000000` are accepted as long forms of white and black.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        let wanted = match wanted.as_str() {
            "#ffffff" => "#fff",
            "#000000" => "#000",
            other => other,
        };

        Color::ALL
            .into_iter()
            .find(|c| c.hex() == wanted || c.name() == wanted)
            .ok_or_else(|| StickiesError::InvalidColor {
                value: s.to_string(),
            })
    }
}

impl From<Color> for String {
    fn from(color: Color) -> Self {
        color.hex().to_string()
    }
}

impl From<String> for Color {
    fn from(value: String) -> Self {
        value.parse().unwrap_or_else(|_| {
            warn!("Unknown note color '{}', using default", value);
            Color::default()
        })
    }
}

/// Represents a single committed note
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Note {
    /// Unique identifier, never reused
    pub id: NoteId,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub content: String,
    #[serde(default, deserialize_with = "lenient_color")]
    pub color: Color,
    /// Attached image as a data URI
    #[serde(default, deserialize_with = "lenient_image")]
    pub image: Option<DataUri>,
    /// When the note was created
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub is_pinned: bool,
}

impl Note {
    /// Creates an unpinned note from composed fields
    pub fn new(id: NoteId, input: NoteInput, created_at: DateTime<Utc>) -> Self {
        Note {
            id,
            title: input.title,
            content: input.content,
            color: input.color,
            image: input.image,
            created_at,
            is_pinned: false,
        }
    }

    /// Whether the title or content contains `needle`, ignoring case.
    /// `needle` must already be lowercased.
    pub fn matches(&self, needle: &str) -> bool {
        needle.is_empty()
            || self.title.to_lowercase().contains(needle)
            || self.content.to_lowercase().contains(needle)
    }
}

/// Reads a color, taking the default for null or non-string values
fn lenient_color<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Color, D::Error> {
    match Option::<serde_json::Value>::deserialize(deserializer)? {
        Some(serde_json::Value::String(value)) => Ok(Color::from(value)),
        Some(serde_json::Value::Null) | None => Ok(Color::default()),
        Some(other) => {
            warn!("Unusable note color {}, using default", other);
            Ok(Color::default())
        }
    }
}

/// Reads an optional image, dropping empty or unusable values instead of
/// rejecting the whole note
fn lenient_image<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<DataUri>, D::Error> {
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw.filter(|s| !s.is_empty()).and_then(|s| {
        s.parse()
            .map_err(|e| warn!("Dropping unreadable note image: {}", e))
            .ok()
    }))
}

/// The editable fields a new note is built from
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NoteInput {
    pub title: String,
    pub content: String,
    pub color: Color,
    pub image: Option<DataUri>,
}

impl NoteInput {
    /// True when there is no text and no image worth keeping
    pub fn is_blank(&self) -> bool {
        self.title.trim().is_empty() && self.content.trim().is_empty() && self.image.is_none()
    }
}

/// Hands out strictly increasing, clock-derived note ids.
///
/// Ids are epoch milliseconds, bumped past the last id handed out so two
/// notes created within the same millisecond never collide.
#[derive(Debug, Clone, Default)]
pub struct IdGenerator {
    last: NoteId,
}

impl IdGenerator {
    /// Starts after the largest of the ids already in use
    pub fn seeded(existing: impl IntoIterator<Item = NoteId>) -> Self {
        IdGenerator {
            last: existing.into_iter().max().unwrap_or(0),
        }
    }

    pub fn next_id(&mut self) -> crate::Result<NoteId> {
        self.next_at(Utc::now())
    }

    /// Fails once `NoteId::MAX` has been handed out
    pub(crate) fn next_at(&mut self, now: DateTime<Utc>) -> crate::Result<NoteId> {
        let millis = u64::try_from(now.timestamp_millis()).unwrap_or(0);
        let after_last = self
            .last
            .checked_add(1)
            .ok_or(StickiesError::IdsExhausted { last: self.last })?;
        let id = millis.max(after_last);
        self.last = id;
        Ok(id)
    }
}
