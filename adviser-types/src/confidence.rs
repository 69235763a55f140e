use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Trust rating for an advice.
///
/// Ordered: `Unset < Red < Yellow < Green`. A filter threshold admits every
/// advice whose confidence is at least the threshold.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum Confidence {
    #[default]
    Unset,
    Red,
    Yellow,
    Green,
}

impl Confidence {
    pub const ALL: [Confidence; 4] = [
        Confidence::Unset,
        Confidence::Red,
        Confidence::Yellow,
        Confidence::Green,
    ];

    /// Upper-case label used in listings.
    pub fn label(self) -> &'static str {
        match self {
            Confidence::Unset => "UNSET",
            Confidence::Red => "RED",
            Confidence::Yellow => "YELLOW",
            Confidence::Green => "GREEN",
        }
    }
}

impl fmt::Display for Confidence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown confidence '{0}' (expected one of: unset, red, yellow, green)")]
pub struct ParseConfidenceError(pub String);

impl FromStr for Confidence {
    type Err = ParseConfidenceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "unset" => Ok(Confidence::Unset),
            "red" => Ok(Confidence::Red),
            "yellow" => Ok(Confidence::Yellow),
            "green" => Ok(Confidence::Green),
            _ => Err(ParseConfidenceError(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ordering_is_unset_red_yellow_green() {
        assert!(Confidence::Unset < Confidence::Red);
        assert!(Confidence::Red < Confidence::Yellow);
        assert!(Confidence::Yellow < Confidence::Green);
    }

    #[test]
    fn parse_is_case_insensitive() {
        assert_eq!("GREEN".parse::<Confidence>(), Ok(Confidence::Green));
        assert_eq!(" yellow ".parse::<Confidence>(), Ok(Confidence::Yellow));
        assert!("purple".parse::<Confidence>().is_err());
    }

    #[test]
    fn display_uses_upper_case_label() {
        assert_eq!(Confidence::Red.to_string(), "RED");
    }
}
