//! Keyword topic classification for prediction-market events.

use serde::Serialize;

use crate::application::matching::text::count_whole_word;
use crate::domain::entities::prediction_event::PredictionEvent;
use crate::domain::values::topic::Topic;

const TITLE_WEIGHT: u32 = 2;
const BODY_WEIGHT: u32 = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TopicScore {
    pub topic: Topic,
    pub score: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TopicClassification {
    pub primary: Topic,
    /// Topics with a positive score, strongest first.
    pub scores: Vec<TopicScore>,
}

impl TopicClassification {
    pub fn topics(&self) -> Vec<Topic> {
        if self.scores.is_empty() {
            return vec![Topic::Other];
        }
        self.scores.iter().map(|s| s.topic).collect()
    }
}

fn keywords(topic: Topic) -> &'static [&'static str] {
    match topic {
        Topic::Regulatory => &[
            "sec", "regulation", "regulations", "regulator", "regulators", "regulatory",
            "antitrust", "ftc", "doj", "lawsuit", "sued", "sue", "ban", "banned", "fine", "fined",
            "ruling", "court", "supreme court", "investigation", "probe", "settlement",
            "compliance", "license", "breakup", "break up",
        ],
        Topic::Crypto => &[
            "bitcoin", "btc", "ethereum", "eth", "crypto", "cryptocurrency", "solana", "sol",
            "stablecoin", "blockchain", "defi", "nft", "dogecoin", "doge", "halving", "binance",
            "xrp", "memecoin", "altcoin",
        ],
        Topic::Earnings => &[
            "earnings", "revenue", "eps", "quarterly", "quarter", "q1", "q2", "q3", "q4",
            "guidance", "profit", "beat estimates", "sales", "deliveries", "market cap", "stock",
            "shares", "ipo", "all-time high", "close above", "close below",
        ],
        Topic::Macro => &[
            "fed", "federal reserve", "interest rate", "interest rates", "rate cut", "rate cuts",
            "rate hike", "inflation", "cpi", "gdp", "recession", "unemployment", "jobs report",
            "treasury", "yields", "bps", "fomc", "powell", "s&p 500", "nasdaq", "dow",
        ],
        Topic::Politics => &[
            "election", "president", "presidential", "senate", "congress", "house", "democrat",
            "democrats", "republican", "republicans", "trump", "biden", "harris", "governor",
            "vote", "nominee", "primary", "poll", "impeach", "impeachment", "bill", "cabinet",
            "white house", "executive order",
        ],
        Topic::Geopolitics => &[
            "war", "russia", "ukraine", "china", "taiwan", "israel", "iran", "gaza", "nato",
            "invasion", "invade", "ceasefire", "military", "sanctions", "missile", "troops",
            "north korea", "conflict", "hamas", "putin", "zelensky",
        ],
        Topic::Trade => &[
            "tariff", "tariffs", "trade war", "trade deal", "import", "imports", "export",
            "exports", "export controls", "embargo", "wto", "customs", "duties", "trade",
        ],
        Topic::Technology => &[
            "ai", "artificial intelligence", "chip", "chips", "semiconductor", "semiconductors",
            "gpu", "openai", "chatgpt", "gpt", "gpt-5", "llm", "iphone", "software",
            "smartphone", "self-driving", "robotaxi", "quantum", "tech", "launch", "release",
            "app store",
        ],
        Topic::Energy => &[
            "oil", "crude", "opec", "natural gas", "gas prices", "gasoline", "energy", "brent",
            "wti", "pipeline", "barrel", "solar", "nuclear", "drilling", "refinery",
        ],
        Topic::Healthcare => &[
            "fda", "drug", "drugs", "vaccine", "vaccines", "pandemic", "covid", "bird flu", "h5n1",
            "medicare", "medicaid", "obamacare", "clinical trial", "health", "healthcare",
            "pharma", "measles", "outbreak", "glp-1",
        ],
        Topic::MergersAcquisitions => &[
            "acquire", "acquires", "acquired", "acquisition", "merger", "merge", "merges",
            "buyout", "takeover", "tender offer", "spin off", "spinoff", "spin-off", "divest",
        ],
        Topic::Other => &[],
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct TopicClassifier;

impl TopicClassifier {
    pub fn new() -> Self {
        Self
    }

    pub fn classify_event(&self, event: &PredictionEvent) -> TopicClassification {
        self.classify(&event.title, &event.body_text())
    }

    pub fn classify(&self, title: &str, body: &str) -> TopicClassification {
        let title = title.to_lowercase();
        let body = body.to_lowercase();

        let mut scores: Vec<TopicScore> = Topic::all()
            .iter()
            .filter_map(|&topic| {
                let score: u32 = keywords(topic)
                    .iter()
                    .map(|kw| {
                        count_whole_word(&title, kw) as u32 * TITLE_WEIGHT
                            + count_whole_word(&body, kw) as u32 * BODY_WEIGHT
                    })
                    .sum();
                (score > 0).then_some(TopicScore { topic, score })
            })
            .collect();

        // Topic's Ord follows priority order.
        scores.sort_by(|a, b| b.score.cmp(&a.score).then_with(|| a.topic.cmp(&b.topic)));

        TopicClassification {
            primary: scores.first().map(|s| s.topic).unwrap_or(Topic::Other),
            scores,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_title_weighs_double() {
        let c = TopicClassifier::new().classify("Will the Fed cut rates?", "Bitcoin traders watch.");
        assert_eq!(c.primary, Topic::Macro);
        assert_eq!(
            c.scores,
            vec![
                TopicScore { topic: Topic::Macro, score: 2 },
                TopicScore { topic: Topic::Crypto, score: 1 },
            ]
        );
    }

    #[test]
    fn test_ties_follow_priority() {
        let c = TopicClassifier::new().classify("", "bitcoin lawsuit");
        assert_eq!(c.topics(), vec![Topic::Regulatory, Topic::Crypto]);
    }

    #[test]
    fn test_no_keywords_is_other() {
        let c = TopicClassifier::new().classify("Who wins the Super Bowl?", "");
        assert_eq!(c.primary, Topic::Other);
        assert!(c.scores.is_empty());
        assert_eq!(c.topics(), vec![Topic::Other]);
    }

    #[test]
    fn test_whole_word_only() {
        // "ai" inside "said" and "sec" inside "second" must not count.
        let c = TopicClassifier::new().classify("", "He said it a second time");
        assert!(c.scores.is_empty());
    }
}
