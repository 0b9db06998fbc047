//! Tokenization of command lines.
//!
//! Commands come in two shapes:
//! - bare verbs: `help`, `reboot`, `save_config`, `get_config`, `get_build_info`
//! - field forms: `get <field>` and `set <field> <value>`
//!
//! Only `get`/`set` get a second level of splitting. Verbs and field names
//! are matched case-insensitively; a `set` value keeps its original case so
//! credentials survive the trip.

use crate::error::{CliError, CliResult};

/// Commands that take no field name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BareCommand {
    /// List every supported command.
    Help,
    /// Report firmware version and build time.
    GetBuildInfo,
    /// Dump every configuration field.
    GetConfig,
    /// Persist the configuration.
    SaveConfig,
    /// Restart the device.
    Reboot,
}

impl BareCommand {
    /// Every bare command, in help listing order.
    pub const ALL: [BareCommand; 5] = [
        BareCommand::Help,
        BareCommand::SaveConfig,
        BareCommand::Reboot,
        BareCommand::GetConfig,
        BareCommand::GetBuildInfo,
    ];

    /// Get the command string used on the wire.
    pub fn as_str(&self) -> &'static str {
        match self {
            BareCommand::Help => "help",
            BareCommand::GetBuildInfo => "get_build_info",
            BareCommand::GetConfig => "get_config",
            BareCommand::SaveConfig => "save_config",
            BareCommand::Reboot => "reboot",
        }
    }

    /// Parse a bare command from its (lowercase) string representation.
    pub fn from_str(s: &str) -> Option<BareCommand> {
        match s {
            "help" => Some(BareCommand::Help),
            "get_build_info" => Some(BareCommand::GetBuildInfo),
            "get_config" => Some(BareCommand::GetConfig),
            "save_config" => Some(BareCommand::SaveConfig),
            "reboot" => Some(BareCommand::Reboot),
            _ => None,
        }
    }
}

/// The first token of a command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verb {
    /// `get <field>`
    Get,
    /// `set <field> <value>`
    Set,
    /// Anything else; looked up as a flat string.
    Bare,
}

/// One tokenized input line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandLine<'a> {
    /// The line exactly as received, used when echoing errors.
    pub original: &'a str,
    /// Which shape the line has.
    pub verb: Verb,
    /// Lowercase dispatch key: `help`, `get wifi_ssid`, `set bl_intensity`, ...
    pub canonical: String,
    /// The value of a `set`, trimmed but otherwise untouched.
    pub value: Option<&'a str>,
}

impl<'a> CommandLine<'a> {
    /// Split a trimmed line into verb, canonical key and value.
    ///
    /// A `set` with no value token fails here, before any field lookup.
    pub fn parse(line: &'a str) -> CliResult<CommandLine<'a>> {
        let (head, rest) = match line.split_once(' ') {
            Some((head, rest)) => (head, rest.trim()),
            None => (line, ""),
        };
        let verb = head.to_ascii_lowercase();

        match verb.as_str() {
            "get" => {
                // `get a b` keeps the bare key `get`, which routes nowhere.
                let canonical = if rest.contains(' ') {
                    verb
                } else {
                    format!("get {}", rest.to_ascii_lowercase())
                };
                Ok(CommandLine {
                    original: line,
                    verb: Verb::Get,
                    canonical,
                    value: None,
                })
            }
            "set" => {
                let (field, value) = rest.split_once(' ').ok_or_else(|| CliError::MissingValue {
                    input: line.to_string(),
                })?;
                Ok(CommandLine {
                    original: line,
                    verb: Verb::Set,
                    canonical: format!("set {}", field.to_ascii_lowercase()),
                    value: Some(value.trim()),
                })
            }
            _ => Ok(CommandLine {
                original: line,
                verb: Verb::Bare,
                canonical: verb,
                value: None,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_bare_command() {
        let cmd = CommandLine::parse("HELP").unwrap();
        assert_eq!(cmd.verb, Verb::Bare);
        assert_eq!(cmd.canonical, "help");
        assert_eq!(cmd.value, None);
    }

    #[test]
    fn test_bare_command_ignores_arguments() {
        let cmd = CommandLine::parse("reboot now").unwrap();
        assert_eq!(cmd.canonical, "reboot");
    }

    #[test]
    fn test_parse_get() {
        let cmd = CommandLine::parse("Get WIFI_SSID").unwrap();
        assert_eq!(cmd.verb, Verb::Get);
        assert_eq!(cmd.canonical, "get wifi_ssid");
        assert_eq!(cmd.value, None);
    }

    #[test]
    fn test_get_with_extra_token_has_no_field() {
        let cmd = CommandLine::parse("get wifi_ssid extra").unwrap();
        assert_eq!(cmd.canonical, "get");
    }

    #[test]
    fn test_parse_set_keeps_value_case() {
        let cmd = CommandLine::parse("SET wifi_ssid My Home Net").unwrap();
        assert_eq!(cmd.verb, Verb::Set);
        assert_eq!(cmd.canonical, "set wifi_ssid");
        assert_eq!(cmd.value, Some("My Home Net"));
    }

    #[test]
    fn test_set_without_value_fails() {
        let err = CommandLine::parse("Set Wifi_Password").unwrap_err();
        assert_eq!(
            err,
            CliError::MissingValue {
                input: "Set Wifi_Password".to_string()
            }
        );
    }

    #[test]
    fn test_bare_set_fails() {
        assert!(matches!(
            CommandLine::parse("set"),
            Err(CliError::MissingValue { .. })
        ));
    }

    #[test]
    fn test_bare_command_round_trip() {
        for cmd in BareCommand::ALL {
            assert_eq!(BareCommand::from_str(cmd.as_str()), Some(cmd));
        }
        assert_eq!(BareCommand::from_str("get"), None);
    }
}
