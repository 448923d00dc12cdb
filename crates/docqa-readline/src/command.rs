//! REPL input parsing.

use std::path::PathBuf;

/// Slash commands offered for completion.
pub const COMMANDS: [&str; 4] = ["/upload", "/status", "/help", "/quit"];

/// One line of REPL input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplCommand {
    /// Upload the file at the path.
    Upload(PathBuf),
    /// `/upload` without a path.
    UploadMissingPath,
    Status,
    Help,
    Quit,
    /// Any line that is not a command is a question.
    Ask(String),
    Unknown(String),
    Empty,
}

impl ReplCommand {
    pub fn parse(line: &str) -> Self {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            return Self::Empty;
        }
        if trimmed == "quit" || trimmed == "exit" {
            return Self::Quit;
        }
        if !trimmed.starts_with('/') {
            return Self::Ask(line.to_string());
        }

        let (name, rest) = match trimmed.split_once(char::is_whitespace) {
            Some((name, rest)) => (name, rest.trim()),
            None => (trimmed, ""),
        };

        match name {
            "/upload" if rest.is_empty() => Self::UploadMissingPath,
            "/upload" => Self::Upload(PathBuf::from(unquote(rest))),
            "/status" => Self::Status,
            "/help" => Self::Help,
            "/quit" | "/exit" => Self::Quit,
            other => Self::Unknown(other.to_string()),
        }
    }
}

/// Strips one pair of matching surrounding quotes, as left by drag-and-drop.
fn unquote(text: &str) -> &str {
    for quote in ['"', '\''] {
        if let Some(inner) = text
            .strip_prefix(quote)
            .and_then(|rest| rest.strip_suffix(quote))
        {
            return inner;
        }
    }
    text
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_upload() {
        assert_eq!(
            ReplCommand::parse("/upload ./docs/report.txt"),
            ReplCommand::Upload(PathBuf::from("./docs/report.txt"))
        );
        assert_eq!(
            ReplCommand::parse("/upload \"My Files/report.pdf\" "),
            ReplCommand::Upload(PathBuf::from("My Files/report.pdf"))
        );
        assert_eq!(ReplCommand::parse("/upload   "), ReplCommand::UploadMissingPath);
    }

    #[test]
    fn test_parse_commands() {
        assert_eq!(ReplCommand::parse("/status"), ReplCommand::Status);
        assert_eq!(ReplCommand::parse("/help"), ReplCommand::Help);
        assert_eq!(ReplCommand::parse("/quit"), ReplCommand::Quit);
        assert_eq!(ReplCommand::parse("exit"), ReplCommand::Quit);
        assert_eq!(
            ReplCommand::parse("/plan"),
            ReplCommand::Unknown("/plan".to_string())
        );
    }

    #[test]
    fn test_questions_are_kept_as_typed() {
        assert_eq!(
            ReplCommand::parse("  What is the summary? "),
            ReplCommand::Ask("  What is the summary? ".to_string())
        );
        assert_eq!(ReplCommand::parse(" \t"), ReplCommand::Empty);
    }
}
