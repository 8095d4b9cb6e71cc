use crate::error::Slot;

/// One line of console input
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConsoleCommand {
    /// Two raw identifiers; validated by the session, not here
    Submit(String, String),
    Focus(Slot),
    Show,
    Help,
    Quit,
    Unknown(String),
}

impl ConsoleCommand {
    /// Parse a console line
    ///
    /// # Examples
    /// ```
    /// use orbview::command::ConsoleCommand;
    /// let cmd = ConsoleCommand::parse("25544 48274");
    /// assert_eq!(cmd, ConsoleCommand::Submit("25544".into(), "48274".into()));
    /// ```
    pub fn parse(line: &str) -> Self {
        let words: Vec<&str> = line.split_whitespace().collect();

        match words.as_slice() {
            [] => ConsoleCommand::Show,
            [word] => match word.to_lowercase().as_str() {
                "show" => ConsoleCommand::Show,
                "help" | "?" => ConsoleCommand::Help,
                "quit" | "exit" | "q" => ConsoleCommand::Quit,
                _ => ConsoleCommand::Unknown(line.trim().to_string()),
            },
            [verb, target] if verb.eq_ignore_ascii_case("focus") => {
                match target.to_lowercase().as_str() {
                    "a" | "1" => ConsoleCommand::Focus(Slot::A),
                    "b" | "2" => ConsoleCommand::Focus(Slot::B),
                    _ => ConsoleCommand::Unknown(line.trim().to_string()),
                }
            }
            [a, b] => ConsoleCommand::Submit(a.to_string(), b.to_string()),
            _ => ConsoleCommand::Unknown(line.trim().to_string()),
        }
    }

    pub fn help_text() -> &'static str {
        "Commands:\n  <idA> <idB>   track two satellites by catalog number\n  focus a|b     fly the camera to a satellite\n  show          print the current session\n  quit          exit"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_submit_keeps_raw_input() {
        assert_eq!(
            ConsoleCommand::parse("  25544   48274 "),
            ConsoleCommand::Submit("25544".to_string(), "48274".to_string())
        );
        assert_eq!(
            ConsoleCommand::parse("ISS 48274"),
            ConsoleCommand::Submit("ISS".to_string(), "48274".to_string())
        );
    }

    #[test]
    fn test_parse_focus() {
        assert_eq!(ConsoleCommand::parse("focus a"), ConsoleCommand::Focus(Slot::A));
        assert_eq!(ConsoleCommand::parse("FOCUS B"), ConsoleCommand::Focus(Slot::B));
        assert!(matches!(ConsoleCommand::parse("focus c"), ConsoleCommand::Unknown(_)));
    }

    #[test]
    fn test_parse_keywords() {
        assert_eq!(ConsoleCommand::parse(""), ConsoleCommand::Show);
        assert_eq!(ConsoleCommand::parse("show"), ConsoleCommand::Show);
        assert_eq!(ConsoleCommand::parse("help"), ConsoleCommand::Help);
        assert_eq!(ConsoleCommand::parse("quit"), ConsoleCommand::Quit);
        assert!(matches!(ConsoleCommand::parse("25544"), ConsoleCommand::Unknown(_)));
        assert!(matches!(ConsoleCommand::parse("1 2 3"), ConsoleCommand::Unknown(_)));
    }
}
