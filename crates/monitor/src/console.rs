//! Commands accepted on stdin while watching the feed.

use alert_store::SimulatedKind;

/// A parsed console line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConsoleCommand {
    /// `simulate <facility-id> <kind>`
    Simulate {
        facility_id: String,
        kind: SimulatedKind,
    },
    /// `clear`
    Clear,
    /// `resolve <alert-id>`
    Resolve { alert_id: String },
    /// `refresh`
    Refresh,
    /// `help`
    Help,
}

pub const HELP: &str = "commands: simulate <facility-id> <outbreak|resource|underserved>, \
clear, resolve <alert-id>, refresh, help";

impl ConsoleCommand {
    /// Parse one line. Blank lines yield `Ok(None)`.
    ///
    /// The facility id is everything between the command and the final
    /// word, so names with spaces work.
    pub fn parse(line: &str) -> Result<Option<Self>, String> {
        let words: Vec<&str> = line.split_whitespace().collect();
        let Some((&command, rest)) = words.split_first() else {
            return Ok(None);
        };

        let parsed = match (command.to_ascii_lowercase().as_str(), rest) {
            ("simulate", [facility @ .., kind]) if !facility.is_empty() => Self::Simulate {
                facility_id: facility.join(" "),
                kind: kind.parse()?,
            },
            ("clear", []) => Self::Clear,
            ("resolve", [id]) => Self::Resolve {
                alert_id: id.to_string(),
            },
            ("refresh", []) => Self::Refresh,
            ("help", _) => Self::Help,
            _ => return Err(format!("unrecognized command '{}'; {}", line.trim(), HELP)),
        };

        Ok(Some(parsed))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_simulate() {
        assert_eq!(
            ConsoleCommand::parse("simulate phc_001 outbreak").unwrap(),
            Some(ConsoleCommand::Simulate {
                facility_id: "phc_001".to_string(),
                kind: SimulatedKind::Outbreak,
            })
        );
        assert_eq!(
            ConsoleCommand::parse("  simulate Kuje PHC Resource ").unwrap(),
            Some(ConsoleCommand::Simulate {
                facility_id: "Kuje PHC".to_string(),
                kind: SimulatedKind::Resource,
            })
        );
    }

    #[test]
    fn test_parse_other_commands() {
        assert_eq!(ConsoleCommand::parse("clear").unwrap(), Some(ConsoleCommand::Clear));
        assert_eq!(
            ConsoleCommand::parse("resolve feed_001").unwrap(),
            Some(ConsoleCommand::Resolve {
                alert_id: "feed_001".to_string()
            })
        );
        assert_eq!(ConsoleCommand::parse("REFRESH").unwrap(), Some(ConsoleCommand::Refresh));
        assert_eq!(ConsoleCommand::parse("   ").unwrap(), None);
    }

    #[test]
    fn test_parse_errors() {
        assert!(ConsoleCommand::parse("simulate outbreak").is_err());
        assert!(ConsoleCommand::parse("simulate phc_001 flood")
            .unwrap_err()
            .contains("unknown alert kind"));
        assert!(ConsoleCommand::parse("resolve").is_err());
        assert!(ConsoleCommand::parse("launch").unwrap_err().starts_with("unrecognized"));
    }
}
