use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Binary prediction-market outcome. Also used as the side of a hedge bet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    Yes,
    No,
    Unresolved,
}

impl Outcome {
    /// Map an outcome label ("Yes", "NO", ...) to a binary outcome.
    pub fn from_label(label: &str) -> Self {
        label.parse().unwrap_or(Outcome::Unresolved)
    }

    pub fn label(&self) -> &'static str {
        match self {
            Outcome::Yes => "Yes",
            Outcome::No => "No",
            Outcome::Unresolved => "Unresolved",
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Yes => write!(f, "yes"),
            Outcome::No => write!(f, "no"),
            Outcome::Unresolved => write!(f, "unresolved"),
        }
    }
}

impl FromStr for Outcome {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "yes" | "y" => Ok(Outcome::Yes),
            "no" | "n" => Ok(Outcome::No),
            "unresolved" => Ok(Outcome::Unresolved),
            _ => Err(format!("Unknown outcome: {s}")),
        }
    }
}
