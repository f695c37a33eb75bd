//! Hedge bet sizing.
//!
//! A hedge is sized as a fraction of the exposure it protects, scaled by
//! how confident we are that the event moves the stock:
//!
//! `size = position_value × hedge_ratio × confidence`
//!
//! The raw size is then capped by an absolute bet limit and by a fraction of
//! total portfolio value. Whichever cap binds is reported so the caller can
//! explain the number.

use serde::Serialize;

/// Configuration for hedge sizing.
#[derive(Debug, Clone, Serialize)]
pub struct HedgeSizingConfig {
    /// Fraction of the position value to hedge at full confidence.
    pub hedge_ratio: f64,
    /// Hard cap on a single bet, in cents.
    pub max_bet_cents: u64,
    /// Maximum fraction of total portfolio value for any single bet.
    pub max_portfolio_fraction: f64,
    /// Below this confidence no bet is suggested.
    pub min_confidence: f64,
}

impl Default for HedgeSizingConfig {
    fn default() -> Self {
        Self {
            hedge_ratio: 0.10,
            max_bet_cents: 50_000, // $500
            max_portfolio_fraction: 0.05,
            min_confidence: 0.30,
        }
    }
}

/// Result of a sizing calculation.
#[derive(Debug, Clone, Serialize, serde::Deserialize, PartialEq)]
pub struct HedgeSizing {
    /// Size before caps, in cents.
    pub raw_size_cents: u64,
    /// Suggested bet size in cents.
    pub suggested_size_cents: u64,
    /// Number of outcome shares the bet buys at `market_price`.
    pub shares: f64,
    /// Payout in cents if the hedged outcome happens.
    pub potential_payout_cents: u64,
    /// Which constraint was binding (if any).
    pub binding_constraint: Option<String>,
}

/// Size a hedge bet.
///
/// * `position_value_cents`: value of the holding being hedged
/// * `market_price`: price of the chosen outcome (0.0–1.0 exclusive)
/// * `confidence`: final recommendation confidence (0.0–1.0)
/// * `portfolio_value_cents`: total portfolio value, for the fraction cap
///
/// Returns `None` for invalid inputs.
pub fn compute_hedge_size(
    position_value_cents: u64,
    market_price: f64,
    confidence: f64,
    portfolio_value_cents: u64,
    config: &HedgeSizingConfig,
) -> Option<HedgeSizing> {
    if position_value_cents == 0
        || !(market_price > 0.0 && market_price < 1.0)
        || !(0.0..=1.0).contains(&confidence)
    {
        return None;
    }

    if confidence < config.min_confidence {
        return Some(HedgeSizing {
            raw_size_cents: 0,
            suggested_size_cents: 0,
            shares: 0.0,
            potential_payout_cents: 0,
            binding_constraint: Some("below_min_confidence".to_string()),
        });
    }

    let raw = (position_value_cents as f64 * config.hedge_ratio * confidence).round() as u64;

    let portfolio_cap =
        (portfolio_value_cents.max(position_value_cents) as f64 * config.max_portfolio_fraction)
            .round() as u64;

    let mut size = raw;
    let mut binding = None;

    if size > config.max_bet_cents {
        size = config.max_bet_cents;
        binding = Some("max_bet_cents".to_string());
    }
    if size > portfolio_cap {
        size = portfolio_cap;
        binding = Some("max_portfolio_fraction".to_string());
    }

    let shares = size as f64 / 100.0 / market_price;

    Some(HedgeSizing {
        raw_size_cents: raw,
        suggested_size_cents: size,
        shares: (shares * 100.0).round() / 100.0,
        potential_payout_cents: (size as f64 / market_price).round() as u64,
        binding_constraint: binding,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> HedgeSizingConfig {
        HedgeSizingConfig::default()
    }

    #[test]
    fn test_basic_sizing() {
        // $10,000 position, 50% confidence → 10% × 0.5 = $500 raw, under caps
        let result = compute_hedge_size(1_000_000, 0.5, 0.5, 10_000_000, &config()).unwrap();
        assert_eq!(result.raw_size_cents, 50_000);
        assert_eq!(result.suggested_size_cents, 50_000);
        assert_eq!(result.binding_constraint, None);
        assert_eq!(result.potential_payout_cents, 100_000);
        assert!((result.shares - 1000.0).abs() < 0.01);
    }

    #[test]
    fn test_max_bet_cap() {
        let result = compute_hedge_size(10_000_000, 0.5, 0.9, 100_000_000, &config()).unwrap();
        assert_eq!(result.suggested_size_cents, 50_000);
        assert_eq!(result.binding_constraint, Some("max_bet_cents".to_string()));
    }

    #[test]
    fn test_portfolio_fraction_cap() {
        // Concentrated portfolio: $10k position, $10k total → 5% cap = $500
        // raw = 10k × 0.1 × 0.8 = $800
        let result = compute_hedge_size(1_000_000, 0.5, 0.8, 1_000_000, &config()).unwrap();
        assert_eq!(result.raw_size_cents, 80_000);
        assert_eq!(result.suggested_size_cents, 50_000);
        assert_eq!(
            result.binding_constraint,
            Some("max_portfolio_fraction".to_string())
        );
    }

    #[test]
    fn test_below_min_confidence() {
        let result = compute_hedge_size(1_000_000, 0.5, 0.1, 1_000_000, &config()).unwrap();
        assert_eq!(result.suggested_size_cents, 0);
        assert_eq!(
            result.binding_constraint,
            Some("below_min_confidence".to_string())
        );
    }

    #[test]
    fn test_invalid_inputs_return_none() {
        assert!(compute_hedge_size(0, 0.5, 0.5, 100, &config()).is_none());
        assert!(compute_hedge_size(100, 0.0, 0.5, 100, &config()).is_none());
        assert!(compute_hedge_size(100, 1.0, 0.5, 100, &config()).is_none());
        assert!(compute_hedge_size(100, 0.5, 1.5, 100, &config()).is_none());
    }

    #[test]
    fn test_size_scales_with_confidence() {
        let low = compute_hedge_size(500_000, 0.3, 0.4, 50_000_000, &config()).unwrap();
        let high = compute_hedge_size(500_000, 0.3, 0.8, 50_000_000, &config()).unwrap();
        assert!(high.suggested_size_cents > low.suggested_size_cents);
    }
}
