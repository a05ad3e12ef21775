//! Console commands
//!
//! Lines starting with `:` are commands, everything else is a query.

/// Console command types
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Help,
    SetK { k: usize },
    ShowK,
    Stats,
    Quit,
    Unknown { input: String },
}

/// Check if input is a command rather than a query
pub fn is_command(input: &str) -> bool {
    input.trim_start().starts_with(':')
}

/// Parse a `:`-prefixed line into a command
pub fn parse(input: &str) -> Command {
    let trimmed = input.trim();
    let body = match trimmed.strip_prefix(':') {
        Some(body) => body,
        None => return Command::Unknown { input: input.to_string() },
    };

    let parts: Vec<&str> = body.split_whitespace().collect();
    let Some(name) = parts.first() else {
        return Command::Unknown { input: input.to_string() };
    };

    match name.to_lowercase().as_str() {
        "help" | "h" | "?" => Command::Help,
        "quit" | "exit" | "q" => Command::Quit,
        "stats" => Command::Stats,
        "k" => match parts.get(1).map(|s| s.parse::<usize>()) {
            None => Command::ShowK,
            Some(Ok(k)) if k > 0 => Command::SetK { k },
            Some(_) => Command::Unknown { input: input.to_string() },
        },
        _ => Command::Unknown { input: input.to_string() },
    }
}

pub fn help_text() -> &'static str {
    "Type a question to search the knowledge base.\n\
     \n\
     :k [N]     show or set the number of passages returned\n\
     :stats     show session statistics\n\
     :help      show this help\n\
     :quit      leave the console"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_command() {
        assert!(is_command(":quit"));
        assert!(is_command("  :k 2"));
        assert!(!is_command("what is rag?"));
    }

    #[test]
    fn test_parse_basic_commands() {
        assert_eq!(parse(":help"), Command::Help);
        assert_eq!(parse(":quit"), Command::Quit);
        assert_eq!(parse(":EXIT"), Command::Quit);
        assert_eq!(parse(":stats"), Command::Stats);
    }

    #[test]
    fn test_parse_k() {
        assert_eq!(parse(":k 5"), Command::SetK { k: 5 });
        assert_eq!(parse(":k"), Command::ShowK);
        assert!(matches!(parse(":k 0"), Command::Unknown { .. }));
        assert!(matches!(parse(":k many"), Command::Unknown { .. }));
    }

    #[test]
    fn test_parse_unknown() {
        assert!(matches!(parse(":"), Command::Unknown { .. }));
        assert!(matches!(parse(":reset"), Command::Unknown { .. }));
    }
}
