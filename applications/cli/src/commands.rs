//! Interactive player commands

use deck_core::TrackId;
use std::str::FromStr;

/// One line of user input
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Next,
    Previous,
    Select(TrackId),
    /// Pretend the current track finished playing
    Ended,
    /// Pretend the player failed on a track (the current one by default)
    PlaybackError(Option<TrackId>),
    Refresh,
    Show,
    Playlist,
    ClearError,
    Help,
    Quit,
}

pub const HELP: &str = "\
commands:
  n, next            skip to the next track
  p, prev            go to the previous track
  s, select <id>     jump to a track
  e, ended           current track finished playing
  x, error [<id>]    report a playback error (current track by default)
  r, refresh         revalidate the upcoming list
  show               print the queue
  list               print the session playlist
  clear              dismiss the error banner
  h, help            this text
  q, quit            exit";

impl FromStr for Command {
    type Err = String;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let mut parts = line.split_whitespace();
        let Some(verb) = parts.next() else {
            return Err("empty command".to_string());
        };
        let arg = parts.next().map(TrackId::new);
        if parts.next().is_some() {
            return Err(format!("too many arguments for '{verb}'"));
        }

        let command = match (verb.to_ascii_lowercase().as_str(), arg) {
            ("n" | "next", None) => Self::Next,
            ("p" | "prev" | "previous", None) => Self::Previous,
            ("s" | "select", Some(id)) => Self::Select(id),
            ("s" | "select", None) => return Err("select needs a track id".to_string()),
            ("e" | "ended", None) => Self::Ended,
            ("x" | "error", id) => Self::PlaybackError(id),
            ("r" | "refresh", None) => Self::Refresh,
            ("show" | "status", None) => Self::Show,
            ("list" | "playlist", None) => Self::Playlist,
            ("clear", None) => Self::ClearError,
            ("h" | "help" | "?", None) => Self::Help,
            ("q" | "quit" | "exit", None) => Self::Quit,
            (_, Some(_)) => return Err(format!("'{verb}' takes no arguments")),
            (_, None) => return Err(format!("unknown command '{verb}'")),
        };
        Ok(command)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_aliases() {
        assert_eq!("n".parse::<Command>(), Ok(Command::Next));
        assert_eq!(" PREV ".parse::<Command>(), Ok(Command::Previous));
        assert_eq!("q".parse::<Command>(), Ok(Command::Quit));
    }

    #[test]
    fn parses_track_arguments() {
        assert_eq!(
            "select abc123".parse::<Command>(),
            Ok(Command::Select(TrackId::new("abc123")))
        );
        assert_eq!("x".parse::<Command>(), Ok(Command::PlaybackError(None)));
        assert_eq!(
            "error abc".parse::<Command>(),
            Ok(Command::PlaybackError(Some(TrackId::new("abc"))))
        );
    }

    #[test]
    fn rejects_bad_input() {
        assert!("".parse::<Command>().is_err());
        assert!("select".parse::<Command>().is_err());
        assert!("next now".parse::<Command>().is_err());
        assert!("select a b".parse::<Command>().is_err());
        assert!("dance".parse::<Command>().is_err());
    }
}
