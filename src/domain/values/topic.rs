use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Coarse category assigned to a prediction-market event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Topic {
    Regulatory,
    Crypto,
    Earnings,
    Macro,
    Politics,
    Geopolitics,
    Trade,
    Technology,
    Energy,
    Healthcare,
    MergersAcquisitions,
    Other,
}

impl Topic {
    /// Every classifiable topic, in tie-break priority order.
    pub fn all() -> &'static [Topic] {
        &[
            Topic::Regulatory,
            Topic::Crypto,
            Topic::Earnings,
            Topic::Macro,
            Topic::Politics,
            Topic::Geopolitics,
            Topic::Trade,
            Topic::Technology,
            Topic::Energy,
            Topic::Healthcare,
            Topic::MergersAcquisitions,
        ]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Topic::Regulatory => "regulatory",
            Topic::Crypto => "crypto",
            Topic::Earnings => "earnings",
            Topic::Macro => "macro",
            Topic::Politics => "politics",
            Topic::Geopolitics => "geopolitics",
            Topic::Trade => "trade",
            Topic::Technology => "technology",
            Topic::Energy => "energy",
            Topic::Healthcare => "healthcare",
            Topic::MergersAcquisitions => "mergers_acquisitions",
            Topic::Other => "other",
        }
    }
}

impl fmt::Display for Topic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Topic {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "regulatory" | "regulation" => Ok(Topic::Regulatory),
            "crypto" => Ok(Topic::Crypto),
            "earnings" => Ok(Topic::Earnings),
            "macro" => Ok(Topic::Macro),
            "politics" => Ok(Topic::Politics),
            "geopolitics" => Ok(Topic::Geopolitics),
            "trade" => Ok(Topic::Trade),
            "technology" | "tech" => Ok(Topic::Technology),
            "energy" => Ok(Topic::Energy),
            "healthcare" | "health" => Ok(Topic::Healthcare),
            "mergers_acquisitions" | "m&a" | "mna" => Ok(Topic::MergersAcquisitions),
            "other" => Ok(Topic::Other),
            _ => Err(format!("Unknown topic: {s}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_parse_agree() {
        for topic in Topic::all() {
            let parsed: Topic = topic.to_string().parse().unwrap();
            assert_eq!(parsed, *topic);
        }
    }

    #[test]
    fn test_aliases() {
        assert_eq!("M&A".parse::<Topic>().unwrap(), Topic::MergersAcquisitions);
        assert_eq!("tech".parse::<Topic>().unwrap(), Topic::Technology);
        assert!("weather".parse::<Topic>().is_err());
    }

    #[test]
    fn test_serde_snake_case() {
        let json = serde_json::to_string(&Topic::MergersAcquisitions).unwrap();
        assert_eq!(json, "\"mergers_acquisitions\"");
    }
}
