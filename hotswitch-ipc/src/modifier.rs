use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Modifier key that gates the switcher hotkey.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModifierKey {
    #[default]
    Option,
    Command,
}

impl ModifierKey {
    pub const ALL: [ModifierKey; 2] = [ModifierKey::Option, ModifierKey::Command];

    pub fn as_str(self) -> &'static str {
        match self {
            ModifierKey::Option => "option",
            ModifierKey::Command => "command",
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            ModifierKey::Option => "Option",
            ModifierKey::Command => "Command",
        }
    }

    pub fn symbol(self) -> &'static str {
        match self {
            ModifierKey::Option => "⌥",
            ModifierKey::Command => "⌘",
        }
    }

    /// Human readable shortcut, e.g. `⌥Tab`
    pub fn shortcut_description(self) -> String {
        format!("{}Tab", self.symbol())
    }
}

impl fmt::Display for ModifierKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ModifierKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "option" | "opt" | "alt" => Ok(ModifierKey::Option),
            "command" | "cmd" | "super" => Ok(ModifierKey::Command),
            _ => Err(format!(
                "Unknown modifier: {} (use option or command)",
                s
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_option() {
        assert_eq!(ModifierKey::default(), ModifierKey::Option);
    }

    #[test]
    fn test_parse_aliases() {
        assert_eq!("option".parse::<ModifierKey>(), Ok(ModifierKey::Option));
        assert_eq!("Alt".parse::<ModifierKey>(), Ok(ModifierKey::Option));
        assert_eq!("opt".parse::<ModifierKey>(), Ok(ModifierKey::Option));
        assert_eq!("command".parse::<ModifierKey>(), Ok(ModifierKey::Command));
        assert_eq!("CMD".parse::<ModifierKey>(), Ok(ModifierKey::Command));
        assert!("ctrl".parse::<ModifierKey>().is_err());
    }

    #[test]
    fn test_display_matches_serde_name() {
        for key in ModifierKey::ALL {
            let json = serde_json::to_string(&key).unwrap();
            assert_eq!(json, format!("\"{}\"", key));
        }
    }

    #[test]
    fn test_shortcut_description() {
        assert_eq!(ModifierKey::Option.shortcut_description(), "⌥Tab");
        assert_eq!(ModifierKey::Command.shortcut_description(), "⌘Tab");
        assert_eq!(ModifierKey::Command.display_name(), "Command");
    }
}
