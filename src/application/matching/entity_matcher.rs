//! Event-to-stock matching over the static company catalog.
//!
//! Four mention kinds are collected from an event's title and body:
//! `$TICKER` cash tags, bare uppercase tickers, canonical company names and
//! aliases. Name and alias mentions are dropped when an exclusion phrase for
//! that company sits nearby ("amazon rainforest") or when the mention is part
//! of a longer form belonging to a different company ("Apple Hospitality").
//! Mentions of one ticker whose byte spans overlap ("$AMD" and the alias
//! "amd") count once, as the strongest kind. Surviving mentions are folded
//! into one [`StockMatch`] per ticker.

use std::collections::HashMap;

use crate::application::matching::text::{find_whole_word, ticker_tokens};
use crate::domain::catalog::{self, CompanyEntry};
use crate::domain::entities::prediction_event::PredictionEvent;
use crate::domain::entities::stock_match::{MatchKind, StockMatch};

/// Matches below this are discarded.
pub const DEFAULT_MIN_CONFIDENCE: f64 = 0.5;

/// Exclusion phrases within this many bytes (inclusive) of a mention
/// suppress it.
const EXCLUDE_WINDOW: usize = 40;

const AMBIGUOUS_FACTOR: f64 = 0.6;
const EXTRA_MENTION_BONUS: f64 = 0.05;
const MAX_EXTRA_BONUS: f64 = 0.10;
const TITLE_BONUS: f64 = 0.05;
const MAX_CONFIDENCE: f64 = 0.99;

/// Uppercase words that collide with tickers but are almost always acronyms.
pub const ACRONYM_STOPLIST: &[&str] = &[
    "CEO", "CFO", "CTO", "GDP", "USA", "ETF", "IPO", "FED", "SEC", "CPI", "PPI", "FBI", "CIA",
    "NBA", "NFL", "NHL", "MLB", "UFC", "FDA", "EPA", "FTC", "DOJ", "IRS", "NATO", "OPEC", "UAE",
    "USD", "EUR", "GOP", "ALL", "ARE", "FOR", "NOW", "ONE", "NEW", "BIG", "RUN", "WIN", "AND",
    "THE", "YES", "NOT", "ATH", "EOY", "EOD", "API", "LLC", "INC",
];

const EXCHANGE_PREFIXES: &[&str] = &["(NYSE: ", "(NYSE:", "(NASDAQ: ", "(NASDAQ:", "(AMEX: "];

/// One searchable surface form of a catalog company.
struct Form {
    entry: &'static CompanyEntry,
    text: String,
    kind: MatchKind,
}

/// A single occurrence; `start..end` are byte offsets into its segment.
#[derive(Debug, Clone)]
struct Mention {
    ticker: &'static str,
    kind: MatchKind,
    confidence: f64,
    text: String,
    in_title: bool,
    start: usize,
    end: usize,
}

pub struct StockMatcher {
    forms: Vec<Form>,
    min_confidence: f64,
}

impl Default for StockMatcher {
    fn default() -> Self {
        Self::new()
    }
}

impl StockMatcher {
    pub fn new() -> Self {
        Self::with_min_confidence(DEFAULT_MIN_CONFIDENCE)
    }

    pub fn with_min_confidence(min_confidence: f64) -> Self {
        let mut forms = Vec::new();
        for entry in catalog::entries() {
            forms.push(Form {
                entry,
                text: entry.name.to_lowercase(),
                kind: MatchKind::CompanyName,
            });
            for alias in entry.aliases {
                if alias.eq_ignore_ascii_case(entry.name) {
                    continue;
                }
                forms.push(Form {
                    entry,
                    text: alias.to_string(),
                    kind: MatchKind::Alias,
                });
            }
            // Ambiguous forms not already listed as the name or an alias.
            for amb in entry.ambiguous {
                if forms.iter().any(|f| std::ptr::eq(f.entry, entry) && f.text == *amb) {
                    continue;
                }
                forms.push(Form {
                    entry,
                    text: amb.to_string(),
                    kind: MatchKind::Alias,
                });
            }
        }
        Self {
            forms,
            min_confidence,
        }
    }

    /// Match over an event's title and its description plus market questions.
    pub fn match_event(&self, event: &PredictionEvent) -> Vec<StockMatch> {
        self.match_text(&event.title, &event.body_text())
    }

    /// Stocks mentioned in `title` and `body`, strongest first.
    pub fn match_text(&self, title: &str, body: &str) -> Vec<StockMatch> {
        let mut mentions = Vec::new();
        for (segment, in_title) in [(title, true), (body, false)] {
            if segment.trim().is_empty() {
                continue;
            }
            mentions.extend(cash_tags(segment, in_title));
            mentions.extend(bare_tickers(segment, in_title));
            mentions.extend(self.name_mentions(segment, in_title));
        }
        self.score(merge_overlapping(mentions))
    }

    fn name_mentions(&self, text: &str, in_title: bool) -> Vec<Mention> {
        // ASCII-only folding keeps byte offsets aligned with `text`.
        let lower = text.to_ascii_lowercase();

        // (form index, start, end) of every whole-word occurrence.
        let mut hits: Vec<(usize, usize, usize)> = Vec::new();
        for (i, form) in self.forms.iter().enumerate() {
            for (start, end) in find_whole_word(&lower, &form.text) {
                hits.push((i, start, end));
            }
        }

        let mut out = Vec::new();
        for &(i, start, end) in &hits {
            let form = &self.forms[i];
            let entry = form.entry;

            // A longer hit covering this one wins: same company keeps the
            // longer form, another company means this one is a false positive.
            let covered = hits.iter().any(|&(j, s, e)| {
                j != i && s <= start && e >= end && (e - s) > (end - start)
            });
            if covered {
                continue;
            }

            if near_exclusion(&lower, entry, start, end) {
                tracing::debug!(
                    ticker = entry.ticker,
                    form = %form.text,
                    "Mention suppressed by exclusion context"
                );
                continue;
            }

            let mut confidence = form.kind.base_confidence();
            if entry.is_ambiguous(&form.text) {
                confidence *= AMBIGUOUS_FACTOR;
            }
            out.push(Mention {
                ticker: entry.ticker,
                kind: form.kind,
                confidence,
                text: text[start..end].to_string(),
                in_title,
                start,
                end,
            });
        }
        out
    }

    fn score(&self, mentions: Vec<Mention>) -> Vec<StockMatch> {
        let mut by_ticker: HashMap<&'static str, Vec<Mention>> = HashMap::new();
        for m in mentions {
            by_ticker.entry(m.ticker).or_default().push(m);
        }

        let mut matches: Vec<StockMatch> = by_ticker
            .into_iter()
            .filter_map(|(ticker, ms)| {
                let entry = catalog::by_ticker(ticker)?;
                let best = ms.iter().max_by(|a, b| {
                    a.confidence
                        .partial_cmp(&b.confidence)
                        .unwrap_or(std::cmp::Ordering::Equal)
                })?;
                let extra = ((ms.len() - 1) as f64 * EXTRA_MENTION_BONUS).min(MAX_EXTRA_BONUS);
                let title = if ms.iter().any(|m| m.in_title) {
                    TITLE_BONUS
                } else {
                    0.0
                };
                let confidence = (best.confidence + extra + title).min(MAX_CONFIDENCE);
                Some(StockMatch {
                    ticker: entry.ticker.to_string(),
                    company: entry.name.to_string(),
                    sector: entry.sector,
                    confidence,
                    kind: best.kind,
                    matched_text: best.text.clone(),
                    mentions: ms.len(),
                })
            })
            .filter(|m| m.confidence >= self.min_confidence)
            .collect();

        matches.sort_by(|a, b| {
            b.confidence
                .partial_cmp(&a.confidence)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.ticker.cmp(&b.ticker))
        });
        matches
    }
}

fn cash_tags(text: &str, in_title: bool) -> Vec<Mention> {
    let mut out = Vec::new();
    for (pos, _) in text.match_indices('$') {
        let rest = &text[pos + 1..];
        let len = rest
            .char_indices()
            .find(|(_, c)| !(c.is_ascii_alphanumeric() || *c == '.'))
            .map(|(i, _)| i)
            .unwrap_or(rest.len());
        let token = rest[..len].trim_end_matches('.');
        if token.is_empty() || token.starts_with(|c: char| c.is_ascii_digit()) {
            continue;
        }
        if let Some(entry) = catalog::by_ticker(token) {
            out.push(Mention {
                ticker: entry.ticker,
                kind: MatchKind::CashTag,
                confidence: MatchKind::CashTag.base_confidence(),
                text: format!("${token}"),
                in_title,
                start: pos,
                end: pos + 1 + token.len(),
            });
        }
    }
    out
}

fn bare_tickers(text: &str, in_title: bool) -> Vec<Mention> {
    let mut out = Vec::new();
    for (start, token) in ticker_tokens(text) {
        let end = start + token.len();
        let before = &text[..start];
        if before.ends_with('$') {
            continue;
        }
        let Some(entry) = catalog::by_ticker(token) else {
            continue;
        };
        if entry.ticker != token {
            continue;
        }

        let closes = text[end..].starts_with(')');
        let opens = before.ends_with('(') || EXCHANGE_PREFIXES.iter().any(|p| before.ends_with(p));
        let parenthesised = opens && closes;

        if !parenthesised && (token.len() < 3 || ACRONYM_STOPLIST.contains(&token)) {
            continue;
        }

        out.push(Mention {
            ticker: entry.ticker,
            kind: MatchKind::Ticker,
            confidence: MatchKind::Ticker.base_confidence(),
            text: token.to_string(),
            in_title,
            start,
            end,
        });
    }
    out
}

/// Collapse mentions of one ticker whose spans overlap within a segment into
/// the strongest of them.
fn merge_overlapping(mut mentions: Vec<Mention>) -> Vec<Mention> {
    mentions.sort_by(|a, b| {
        a.ticker
            .cmp(b.ticker)
            .then_with(|| b.in_title.cmp(&a.in_title))
            .then_with(|| a.start.cmp(&b.start))
    });

    let mut out: Vec<Mention> = Vec::with_capacity(mentions.len());
    for m in mentions {
        if let Some(last) = out.last_mut() {
            if last.ticker == m.ticker && last.in_title == m.in_title && m.start < last.end {
                let (start, end) = (last.start, last.end.max(m.end));
                if m.confidence > last.confidence {
                    *last = m;
                }
                last.start = start;
                last.end = end;
                continue;
            }
        }
        out.push(m);
    }
    out
}

fn near_exclusion(lower: &str, entry: &CompanyEntry, start: usize, end: usize) -> bool {
    entry.exclude_contexts.iter().any(|phrase| {
        lower.match_indices(phrase).any(|(s, m)| {
            let e = s + m.len();
            s <= end + EXCLUDE_WINDOW && e + EXCLUDE_WINDOW >= start
        })
    })
}
