//! The page-wide interaction mode.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ProtocolError;

/// Interaction mode the shell can put the page into.
///
/// Serialized with the exact names the shell sends (`"View"`, `"Layout"`,
/// `"Edit"`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Mode {
    #[default]
    View,
    Layout,
    Edit,
}

impl Mode {
    pub const ALL: [Mode; 3] = [Mode::View, Mode::Layout, Mode::Edit];

    pub fn as_str(self) -> &'static str {
        match self {
            Mode::View => "View",
            Mode::Layout => "Layout",
            Mode::Edit => "Edit",
        }
    }

    /// Read the mode back from the document attribute.
    ///
    /// An absent attribute counts as `View`. Anything unrecognised (written by
    /// some other script) also reads as `View`, so it never arms a subsystem.
    pub fn from_attribute(value: Option<&str>) -> Mode {
        value.and_then(|v| v.parse().ok()).unwrap_or_default()
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Mode {
    type Err = ProtocolError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "View" => Ok(Mode::View),
            "Layout" => Ok(Mode::Layout),
            "Edit" => Ok(Mode::Edit),
            "" => Err(ProtocolError::MissingMode),
            other => Err(ProtocolError::UnknownMode(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_known_modes() {
        for mode in Mode::ALL {
            assert_eq!(mode.as_str().parse::<Mode>(), Ok(mode));
        }
    }

    #[test]
    fn test_parse_is_case_sensitive() {
        assert_eq!(
            "layout".parse::<Mode>(),
            Err(ProtocolError::UnknownMode("layout".into()))
        );
        assert_eq!("".parse::<Mode>(), Err(ProtocolError::MissingMode));
    }

    #[test]
    fn test_absent_attribute_reads_as_view() {
        assert_eq!(Mode::from_attribute(None), Mode::View);
        assert_eq!(Mode::from_attribute(Some("Preview")), Mode::View);
        assert_eq!(Mode::from_attribute(Some("Edit")), Mode::Edit);
    }
}
