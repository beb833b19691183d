//! Interactive command grammar

/// One parsed input line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Analyze,
    Security,
    Performance,
    /// `/review <path>`; `None` when the path is missing
    Review(Option<String>),
    Features,
    Help,
    Quit,
    /// Anything else that is not blank
    Chat(String),
    Empty,
}

impl Command {
    pub fn parse(line: &str) -> Self {
        let input = line.trim();
        if input.is_empty() {
            return Command::Empty;
        }

        let lowered = input.to_lowercase();
        if matches!(lowered.as_str(), "/quit" | "quit" | "exit") {
            return Command::Quit;
        }

        match input {
            "/analyze" => Command::Analyze,
            "/security" => Command::Security,
            "/performance" => Command::Performance,
            "/features" => Command::Features,
            "/help" => Command::Help,
            "/review" => Command::Review(None),
            _ => match input.strip_prefix("/review ") {
                Some(path) => {
                    let path = path.trim();
                    Command::Review((!path.is_empty()).then(|| path.to_string()))
                }
                None => Command::Chat(input.to_string()),
            },
        }
    }
}

pub const COMMAND_HELP: &str = "\
Commands:
  /analyze        Full codebase analysis
  /security       Security audit
  /performance    Performance optimization
  /review <file>  Code review of one file
  /features       Feature suggestions
  /help           Show this list
  /quit           Exit
Anything else is sent as a question.";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_commands() {
        assert_eq!(Command::parse("/analyze"), Command::Analyze);
        assert_eq!(Command::parse("  /security  "), Command::Security);
        assert_eq!(Command::parse("/performance"), Command::Performance);
        assert_eq!(Command::parse("/features"), Command::Features);
        assert_eq!(Command::parse("/help"), Command::Help);
        assert_eq!(Command::parse(""), Command::Empty);
        assert_eq!(Command::parse("   "), Command::Empty);
    }

    #[test]
    fn test_parse_quit_synonyms() {
        for input in ["/quit", "quit", "exit", "EXIT", "Quit"] {
            assert_eq!(Command::parse(input), Command::Quit, "{}", input);
        }
    }

    #[test]
    fn test_parse_review() {
        assert_eq!(
            Command::parse("/review src/main.js"),
            Command::Review(Some("src/main.js".to_string()))
        );
        assert_eq!(
            Command::parse("/review   path with spaces.js  "),
            Command::Review(Some("path with spaces.js".to_string()))
        );
        assert_eq!(Command::parse("/review"), Command::Review(None));
        assert_eq!(Command::parse("/review   "), Command::Review(None));
    }

    #[test]
    fn test_other_lines_are_chat() {
        assert_eq!(
            Command::parse("how do I add a CSP header?"),
            Command::Chat("how do I add a CSP header?".to_string())
        );
        assert_eq!(Command::parse("/unknown"), Command::Chat("/unknown".to_string()));
        assert_eq!(Command::parse("/reviewer"), Command::Chat("/reviewer".to_string()));
    }
}
