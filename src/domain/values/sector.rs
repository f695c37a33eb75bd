use crate::domain::values::topic::Topic;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Sector {
    Technology,
    Semiconductors,
    Communication,
    ConsumerDiscretionary,
    ConsumerStaples,
    Financials,
    Crypto,
    Energy,
    Healthcare,
    Industrials,
    Defense,
    Automotive,
    Airlines,
    Unknown,
}

impl Sector {
    /// Topics whose events plausibly move stocks in this sector.
    pub fn sensitive_topics(&self) -> &'static [Topic] {
        match self {
            Sector::Technology => &[Topic::Technology, Topic::Regulatory, Topic::Trade, Topic::Macro],
            Sector::Semiconductors => &[Topic::Trade, Topic::Technology, Topic::Geopolitics],
            Sector::Communication => &[Topic::Regulatory, Topic::Technology, Topic::Politics],
            Sector::ConsumerDiscretionary => &[Topic::Macro, Topic::Trade],
            Sector::ConsumerStaples => &[Topic::Macro, Topic::Trade],
            Sector::Financials => &[Topic::Macro, Topic::Regulatory, Topic::Crypto],
            Sector::Crypto => &[Topic::Crypto, Topic::Regulatory, Topic::Macro],
            Sector::Energy => &[Topic::Energy, Topic::Geopolitics, Topic::Politics],
            Sector::Healthcare => &[Topic::Healthcare, Topic::Regulatory, Topic::Politics],
            Sector::Industrials => &[Topic::Trade, Topic::Macro],
            Sector::Defense => &[Topic::Geopolitics, Topic::Politics],
            Sector::Automotive => &[Topic::Trade, Topic::Macro, Topic::Technology],
            Sector::Airlines => &[Topic::Energy, Topic::Macro, Topic::Geopolitics],
            Sector::Unknown => &[Topic::Macro],
        }
    }
}

impl fmt::Display for Sector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Sector::Technology => "technology",
            Sector::Semiconductors => "semiconductors",
            Sector::Communication => "communication",
            Sector::ConsumerDiscretionary => "consumer_discretionary",
            Sector::ConsumerStaples => "consumer_staples",
            Sector::Financials => "financials",
            Sector::Crypto => "crypto",
            Sector::Energy => "energy",
            Sector::Healthcare => "healthcare",
            Sector::Industrials => "industrials",
            Sector::Defense => "defense",
            Sector::Automotive => "automotive",
            Sector::Airlines => "airlines",
            Sector::Unknown => "unknown",
        };
        write!(f, "{s}")
    }
}

impl FromStr for Sector {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "technology" | "tech" => Ok(Sector::Technology),
            "semiconductors" | "chips" => Ok(Sector::Semiconductors),
            "communication" => Ok(Sector::Communication),
            "consumer_discretionary" => Ok(Sector::ConsumerDiscretionary),
            "consumer_staples" => Ok(Sector::ConsumerStaples),
            "financials" => Ok(Sector::Financials),
            "crypto" => Ok(Sector::Crypto),
            "energy" => Ok(Sector::Energy),
            "healthcare" => Ok(Sector::Healthcare),
            "industrials" => Ok(Sector::Industrials),
            "defense" => Ok(Sector::Defense),
            "automotive" | "autos" => Ok(Sector::Automotive),
            "airlines" => Ok(Sector::Airlines),
            "unknown" => Ok(Sector::Unknown),
            _ => Err(format!("Unknown sector: {s}")),
        }
    }
}
