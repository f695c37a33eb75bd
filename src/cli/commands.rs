use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "polyhedge",
    version,
    about = "Hedge stock holdings with prediction markets"
)]
pub struct Cli {
    /// Default log level when RUST_LOG / POLYHEDGE_LOG are unset
    #[arg(long, global = true, default_value = "info")]
    pub log_level: String,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Fetch resolved prediction markets, match them to stocks and record price moves
    Backfill {
        /// Stop after scanning this many closed events
        #[arg(long)]
        max_events: Option<usize>,
        #[arg(long, default_value = "100")]
        page_size: usize,
        /// Trading days after resolution used for the price move
        #[arg(long, default_value = "3")]
        window_days: u32,
        /// Skip Yahoo price lookups
        #[arg(long)]
        no_prices: bool,
        /// Reprocess events already in the cache
        #[arg(long)]
        full: bool,
    },
    /// Classify text into topics
    Classify {
        text: String,
    },
    /// Find stocks mentioned in text
    Match {
        text: String,
        #[arg(long, default_value = "0.5")]
        min_confidence: f64,
    },
    /// Historical correlation between a stock and a topic
    Correlate {
        ticker: String,
        /// Topic: regulatory, crypto, earnings, macro, politics, geopolitics,
        /// trade, technology, energy, healthcare or mergers_acquisitions.
        /// Defaults to the sector's most sensitive topics
        #[arg(long)]
        topic: Option<String>,
    },
    /// Recommend prediction-market hedges for a portfolio
    Hedge {
        /// Path to a portfolio JSON file
        portfolio: String,
        #[arg(long, default_value = "10")]
        max: usize,
        /// Open events to consider
        #[arg(long, default_value = "200")]
        event_limit: usize,
        /// Let the LLM prune candidate markets first
        #[arg(long)]
        refine: bool,
    },
    /// Latest stock prices
    Quote {
        #[arg(required = true)]
        tickers: Vec<String>,
    },
    /// Statistics over the resolution cache
    Stats,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::values::topic::Topic;
    use clap::CommandFactory;

    #[test]
    fn test_topic_help_lists_parseable_topics() {
        let cmd = Cli::command();
        let help = cmd
            .find_subcommand("correlate")
            .and_then(|c| c.get_arguments().find(|a| a.get_id() == "topic"))
            .and_then(|a| a.get_help())
            .map(|h| h.to_string())
            .unwrap();
        let listed = help.split_once(':').unwrap().1.split_once('.').unwrap().0;
        let names: Vec<&str> = listed
            .split(',')
            .flat_map(|part| part.split(" or "))
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .collect();

        assert_eq!(names.len(), Topic::all().len());
        for name in names {
            assert!(name.parse::<Topic>().is_ok(), "{name}");
        }
    }
}
