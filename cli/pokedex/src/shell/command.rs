use std::num::NonZeroUsize;
use std::str::FromStr;

use indoc::indoc;
use pokedex_catalog::{EntryKey, KeyParseError};
use thiserror::Error;

pub const HELP: &str = indoc! {"
    Commands:
      more, m               load the next page of the catalog
      filter [text]         show loaded entries matching a name or number, no text clears
      open <n|name>         open the n-th listed entry, or an entry by name
      search <name|number>  look up an entry directly
      fav                   add or remove the open entry from favorites
      favorites, favs       show your favorites
      back, b               return to the previous screen
      retry, r              try the failed request again
      help, h, ?            show this help
      quit, q, exit         leave the pokedex
"};

/// What `open` refers to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OpenTarget {
    /// 1-based position in the list on screen
    Position(NonZeroUsize),
    Key(EntryKey),
}

/// A line typed into the browser session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShellCommand {
    More,
    /// An empty filter clears it
    Filter(String),
    Open(OpenTarget),
    Search(String),
    ToggleFavorite,
    Favorites,
    Back,
    Retry,
    Help,
    Quit,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandParseError {
    #[error("no command given")]
    Empty,
    #[error("unknown command '{0}', type 'help' for a list of commands")]
    Unknown(String),
    #[error("'{command}' needs {argument}")]
    MissingArgument {
        command: &'static str,
        argument: &'static str,
    },
    #[error("'{command}' does not take arguments")]
    UnexpectedArgument { command: &'static str },
    #[error("list positions start at 1")]
    ZeroPosition,
    #[error(transparent)]
    InvalidKey(#[from] KeyParseError),
}

impl FromStr for ShellCommand {
    type Err = CommandParseError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let line = line.trim();
        let (command, argument) = match line.split_once(char::is_whitespace) {
            Some((command, argument)) => (command, argument.trim()),
            None => (line, ""),
        };

        let no_argument = |command: &'static str, parsed: ShellCommand| {
            if argument.is_empty() {
                Ok(parsed)
            } else {
                Err(CommandParseError::UnexpectedArgument { command })
            }
        };

        match command.to_lowercase().as_str() {
            "" => Err(CommandParseError::Empty),
            "more" | "m" => no_argument("more", ShellCommand::More),
            "filter" => Ok(ShellCommand::Filter(argument.to_string())),
            "open" => parse_open_target(argument).map(ShellCommand::Open),
            "search" => {
                if argument.is_empty() {
                    return Err(CommandParseError::MissingArgument {
                        command: "search",
                        argument: "a name or number",
                    });
                }
                Ok(ShellCommand::Search(argument.to_string()))
            },
            "fav" => no_argument("fav", ShellCommand::ToggleFavorite),
            "favorites" | "favs" => no_argument("favorites", ShellCommand::Favorites),
            "back" | "b" => no_argument("back", ShellCommand::Back),
            "retry" | "r" => no_argument("retry", ShellCommand::Retry),
            "help" | "h" | "?" => Ok(ShellCommand::Help),
            "quit" | "q" | "exit" => Ok(ShellCommand::Quit),
            _ => Err(CommandParseError::Unknown(command.to_string())),
        }
    }
}

/// Numbers are list positions, anything else is an entry name.
fn parse_open_target(argument: &str) -> Result<OpenTarget, CommandParseError> {
    if argument.is_empty() {
        return Err(CommandParseError::MissingArgument {
            command: "open",
            argument: "a list position or a name",
        });
    }

    if argument.chars().all(|c| c.is_ascii_digit()) {
        let position = argument
            .parse::<usize>()
            .map_err(|_| KeyParseError::IdOutOfRange(argument.to_string()))?;
        return NonZeroUsize::new(position)
            .map(OpenTarget::Position)
            .ok_or(CommandParseError::ZeroPosition);
    }

    Ok(OpenTarget::Key(EntryKey::name(argument)))
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn position(n: usize) -> OpenTarget {
        OpenTarget::Position(NonZeroUsize::new(n).unwrap())
    }

    #[test]
    fn parses_commands_and_aliases() {
        let cases = [
            ("more", ShellCommand::More),
            ("m", ShellCommand::More),
            ("fav", ShellCommand::ToggleFavorite),
            ("favorites", ShellCommand::Favorites),
            ("favs", ShellCommand::Favorites),
            ("back", ShellCommand::Back),
            ("b", ShellCommand::Back),
            ("retry", ShellCommand::Retry),
            ("r", ShellCommand::Retry),
            ("help", ShellCommand::Help),
            ("?", ShellCommand::Help),
            ("quit", ShellCommand::Quit),
            ("exit", ShellCommand::Quit),
            ("  Q  ", ShellCommand::Quit),
        ];
        for (line, expected) in cases {
            assert_eq!(line.parse::<ShellCommand>(), Ok(expected), "line: {line:?}");
        }
    }

    #[test]
    fn filter_keeps_its_text() {
        assert_eq!(
            "filter  chu ".parse(),
            Ok(ShellCommand::Filter("chu".to_string()))
        );
        assert_eq!("filter".parse(), Ok(ShellCommand::Filter(String::new())));
    }

    #[test]
    fn open_by_position_or_name() {
        assert_eq!("open 3".parse(), Ok(ShellCommand::Open(position(3))));
        assert_eq!(
            "open Mr-Mime".parse(),
            Ok(ShellCommand::Open(OpenTarget::Key(EntryKey::name("mr-mime"))))
        );
        assert_eq!(
            "open 0".parse::<ShellCommand>(),
            Err(CommandParseError::ZeroPosition)
        );
        assert!(matches!(
            "open".parse::<ShellCommand>(),
            Err(CommandParseError::MissingArgument { command: "open", .. })
        ));
    }

    #[test]
    fn search_needs_a_term() {
        assert_eq!(
            "search pikachu".parse(),
            Ok(ShellCommand::Search("pikachu".to_string()))
        );
        assert!(matches!(
            "search   ".parse::<ShellCommand>(),
            Err(CommandParseError::MissingArgument {
                command: "search",
                ..
            })
        ));
    }

    #[test]
    fn rejects_unknown_and_extra_arguments() {
        assert_eq!("".parse::<ShellCommand>(), Err(CommandParseError::Empty));
        assert_eq!(
            "catch pikachu".parse::<ShellCommand>(),
            Err(CommandParseError::Unknown("catch".to_string()))
        );
        assert_eq!(
            "more please".parse::<ShellCommand>(),
            Err(CommandParseError::UnexpectedArgument { command: "more" })
        );
    }
}
