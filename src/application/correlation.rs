//! Historical correlation between event topics and stock moves.
//!
//! Given the backfilled resolutions, the model answers "when events of this
//! topic resolved, how did this stock move?" and turns the answer into a
//! small confidence boost for hedge recommendations.
//!
//! Evidence comes from three record sets:
//! - direct: resolutions that mention the ticker
//! - topic: direct records classified under the topic
//! - sector: records under the topic that mention a same-sector peer (but
//!   not the ticker); their moves count at half weight
//!
//! ```text
//! consistency   = 2 · (dominant_share − 0.5)
//! magnitude     = min(avg_abs_move / 5%, 1)
//! sample_weight = n / (n + 5)
//! boost         = 0.15 · sample_weight · (0.5·consistency + 0.5·magnitude)
//! ```
//!
//! Without topic or sector evidence, all direct records are used and the
//! boost is halved.

use crate::domain::catalog;
use crate::domain::entities::correlation::CorrelationInsight;
use crate::domain::entities::resolution::ResolutionRecord;
use crate::domain::values::outcome::Outcome;
use crate::domain::values::topic::Topic;

const MAX_BOOST: f64 = 0.15;
const SECTOR_WEIGHT: f64 = 0.5;
const FALLBACK_FACTOR: f64 = 0.5;
const FULL_MAGNITUDE_PCT: f64 = 5.0;
const SAMPLE_HALF_POINT: f64 = 5.0;
const MAX_EXAMPLES: usize = 3;

/// A weighted price change used as evidence.
struct Sample {
    change_pct: f64,
    weight: f64,
}

pub struct CorrelationModel {
    records: Vec<ResolutionRecord>,
}

impl CorrelationModel {
    pub fn new(records: Vec<ResolutionRecord>) -> Self {
        Self { records }
    }

    /// One insight per topic the ticker's sector is sensitive to.
    pub fn sector_insights(&self, ticker: &str) -> Vec<CorrelationInsight> {
        catalog::sector_of(&ticker.trim().to_uppercase())
            .sensitive_topics()
            .iter()
            .map(|t| self.insight(ticker, *t))
            .collect()
    }

    pub fn insight(&self, ticker: &str, topic: Topic) -> CorrelationInsight {
        let ticker = ticker.trim().to_uppercase();

        let direct: Vec<&ResolutionRecord> =
            self.records.iter().filter(|r| r.has_ticker(&ticker)).collect();
        let on_topic: Vec<&ResolutionRecord> =
            direct.iter().copied().filter(|r| r.has_topic(topic)).collect();

        let peers = catalog::sector_peers(&ticker);
        let sector: Vec<(&ResolutionRecord, &str)> = self
            .records
            .iter()
            .filter(|r| !r.has_ticker(&ticker) && r.has_topic(topic))
            .filter_map(|r| {
                peers
                    .iter()
                    .copied()
                    .find(|p| r.has_ticker(p))
                    .map(|p| (r, p))
            })
            .collect();

        let fallback = on_topic.is_empty() && sector.is_empty();
        if fallback && direct.is_empty() {
            return CorrelationInsight::empty(&ticker, topic);
        }

        let mut samples = Vec::new();
        let mut used: Vec<&ResolutionRecord> = Vec::new();
        if fallback {
            for r in &direct {
                if let Some(mv) = r.move_for(&ticker) {
                    samples.push(Sample { change_pct: mv.change_pct, weight: 1.0 });
                }
                used.push(*r);
            }
        } else {
            for r in &on_topic {
                if let Some(mv) = r.move_for(&ticker) {
                    samples.push(Sample { change_pct: mv.change_pct, weight: 1.0 });
                }
                used.push(*r);
            }
            for (r, peer) in &sector {
                if let Some(mv) = r.move_for(peer) {
                    samples.push(Sample { change_pct: mv.change_pct, weight: SECTOR_WEIGHT });
                }
                used.push(*r);
            }
        }

        let yes_count = used.iter().filter(|r| r.outcome == Outcome::Yes).count();
        let no_count = used.iter().filter(|r| r.outcome == Outcome::No).count();

        let stats = MoveStats::from_samples(&samples);
        let mut boost = MAX_BOOST
            * stats.sample_weight()
            * (0.5 * stats.consistency + 0.5 * stats.magnitude());
        if fallback {
            boost *= FALLBACK_FACTOR;
        }

        used.sort_by(|a, b| b.closed_at.cmp(&a.closed_at));
        let examples = used
            .iter()
            .take(MAX_EXAMPLES)
            .map(|r| r.title.clone())
            .collect();

        let summary = summarize(
            &ticker,
            topic,
            fallback,
            used.len(),
            on_topic.len(),
            sector.len(),
            &stats,
            boost,
        );

        CorrelationInsight {
            ticker,
            topic,
            direct_matches: direct.len(),
            topic_matches: on_topic.len(),
            sector_matches: sector.len(),
            yes_count,
            no_count,
            avg_move_pct: stats.avg_move_pct,
            avg_abs_move_pct: stats.avg_abs_move_pct,
            consistency: stats.consistency,
            confidence_boost: boost,
            summary,
            examples,
        }
    }
}

struct MoveStats {
    /// Weighted sample count.
    n: f64,
    avg_move_pct: f64,
    avg_abs_move_pct: f64,
    consistency: f64,
}

impl MoveStats {
    fn from_samples(samples: &[Sample]) -> Self {
        let n: f64 = samples.iter().map(|s| s.weight).sum();
        if n <= 0.0 {
            return Self {
                n: 0.0,
                avg_move_pct: 0.0,
                avg_abs_move_pct: 0.0,
                consistency: 0.0,
            };
        }
        let up: f64 = samples.iter().filter(|s| s.change_pct > 0.0).map(|s| s.weight).sum();
        let down: f64 = samples.iter().filter(|s| s.change_pct < 0.0).map(|s| s.weight).sum();
        let share = up.max(down) / n;

        Self {
            n,
            avg_move_pct: samples.iter().map(|s| s.change_pct * s.weight).sum::<f64>() / n,
            avg_abs_move_pct: samples.iter().map(|s| s.change_pct.abs() * s.weight).sum::<f64>()
                / n,
            consistency: (2.0 * (share - 0.5)).clamp(0.0, 1.0),
        }
    }

    fn magnitude(&self) -> f64 {
        (self.avg_abs_move_pct / FULL_MAGNITUDE_PCT).min(1.0)
    }

    fn sample_weight(&self) -> f64 {
        self.n / (self.n + SAMPLE_HALF_POINT)
    }
}

#[allow(clippy::too_many_arguments)]
fn summarize(
    ticker: &str,
    topic: Topic,
    fallback: bool,
    records: usize,
    topic_matches: usize,
    sector_matches: usize,
    stats: &MoveStats,
    boost: f64,
) -> String {
    let moves = if stats.n > 0.0 {
        format!(
            "average move {:+.1}% ({:.0}% directional consistency)",
            stats.avg_move_pct,
            stats.consistency * 100.0
        )
    } else {
        "no price data".to_string()
    };

    if fallback {
        format!(
            "No {topic} history for {ticker}; {records} other resolved event(s) mention it, {moves}. Reduced boost {boost:+.3}"
        )
    } else {
        format!(
            "{ticker}: {topic_matches} resolved {topic} event(s) mention it and {sector_matches} mention sector peers, {moves}. Boost {boost:+.3}"
        )
    }
}
