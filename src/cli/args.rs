use std::path::PathBuf;

use clap::Parser;

use crate::Commands;

/// Main CLI application arguments and command structure
#[derive(Parser)]
#[clap(
    name = "stickies",
    version,
    about = "Sticky notes: colored, pinnable notes with image attachments"
)]
pub struct Cli {
    /// Path to the configuration file
    #[clap(short = 'c', long, value_parser)]
    pub config: Option<PathBuf>,

    /// Directory holding the notes and draft
    #[clap(long, value_parser)]
    pub data_dir: Option<PathBuf>,

    /// Verbose output mode
    #[clap(short, long)]
    pub verbose: bool,

    #[clap(subcommand)]
    pub command: Commands,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Color, DraftCommands};
    use clap::CommandFactory;

    #[test]
    fn definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_colors_by_name() {
        let cli = Cli::try_parse_from(["stickies", "color", "12", "yellow"]).unwrap();
        match cli.command {
            Commands::Color { id, color } => {
                assert_eq!(id, 12);
                assert_eq!(color, Color::Yellow);
            }
            _ => panic!("wrong command"),
        }
        assert!(Cli::try_parse_from(["stickies", "color", "12", "mauve"]).is_err());
    }

    #[test]
    fn parses_draft_subcommands() {
        let cli = Cli::try_parse_from(["stickies", "draft", "set", "-T", "Hi", "--color", "#b39ddb"])
            .unwrap();
        match cli.command {
            Commands::Draft(DraftCommands::Set { title, content, color }) => {
                assert_eq!(title.as_deref(), Some("Hi"));
                assert_eq!(content, None);
                assert_eq!(color, Some(Color::Purple));
            }
            _ => panic!("wrong command"),
        }
    }

    #[test]
    fn image_flags_conflict() {
        assert!(Cli::try_parse_from([
            "stickies", "edit", "1", "--image", "a.png", "--remove-image"
        ])
        .is_err());
    }
}
