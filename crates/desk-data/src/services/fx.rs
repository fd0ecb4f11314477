//! FX Service
//!
//! Mock FX (foreign exchange) data and realistic tick generation for the
//! live market-data feed.
//!
//! # Tick Model
//!
//! Each tick nudges bid and ask independently by a uniform amount scaled
//! to the pair's typical volatility (JPY crosses move in whole pips, the
//! pegged HKD barely moves), then recomputes mid, spread, percent change
//! against the session-open baseline, and jittered volume.
//!
//! The spread is floored at half the pair volatility, so `ask >= bid`
//! holds after every tick. Rounding is monotone, which preserves the
//! invariant through the final scale adjustment.

use std::collections::HashMap;

use rand::Rng;
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;

use crate::model::Row;

// =============================================================================
// Constants
// =============================================================================

/// Volume never jitters below this floor.
const MIN_VOLUME: i64 = 10_000;

/// Volatility for JPY-quoted pairs (~1.5 pips on 150-yen crosses).
const JPY_VOLATILITY: Decimal = Decimal::from_parts(15, 0, 0, false, 3);

/// Volatility for the pegged HKD.
const HKD_VOLATILITY: Decimal = Decimal::from_parts(1, 0, 0, false, 4);

/// Volatility for standard pairs (~0.3 pips).
const DEFAULT_VOLATILITY: Decimal = Decimal::from_parts(3, 0, 0, false, 4);

/// Volatility multiplier based on the quote currency of a pair.
fn volatility_for(pair: &str) -> Decimal {
    match pair.split('/').nth(1) {
        Some("JPY") => JPY_VOLATILITY,
        Some("HKD") => HKD_VOLATILITY,
        _ => DEFAULT_VOLATILITY,
    }
}

/// Decimal places for prices, mid, and spread of a pair.
const fn scales_for(jpy: bool) -> (u32, u32, u32) {
    if jpy { (2, 3, 2) } else { (5, 5, 5) }
}

// =============================================================================
// FX Service
// =============================================================================

/// Summary statistics over the FX snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FxSummary {
    /// Total number of pairs.
    pub total: usize,
    /// Pairs with positive percent change.
    pub gainers: usize,
    /// Pairs with negative percent change.
    pub losers: usize,
}

/// Mock FX data service.
///
/// Seeds twelve major pairs at construction and captures their mids as
/// the session-open baseline for percent-change calculation. All query
/// methods are pure: [`FxService::generate_tick`] never mutates its
/// input rows.
#[derive(Debug)]
pub struct FxService {
    rows: Vec<Row>,
    baseline_mids: HashMap<String, Decimal>,
}

impl Default for FxService {
    fn default() -> Self {
        Self::new()
    }
}

impl FxService {
    /// Create the service with the seeded pair snapshot.
    #[must_use]
    pub fn new() -> Self {
        let rows = seed_rows();
        let baseline_mids = rows
            .iter()
            .filter_map(|row| {
                let pair = row.text("pair")?.to_string();
                let mid = row.number("mid")?;
                Some((pair, mid))
            })
            .collect();

        Self {
            rows,
            baseline_mids,
        }
    }

    /// Get the current FX snapshot.
    #[must_use]
    pub fn fx_rows(&self) -> Vec<Row> {
        self.rows.clone()
    }

    /// Apply one random perturbation to the given rows.
    ///
    /// Rows missing the price fields pass through unchanged. The input
    /// slice is never mutated; a fresh row list is returned.
    #[must_use]
    pub fn generate_tick(&self, rows: &[Row]) -> Vec<Row> {
        let mut rng = rand::rng();
        rows.iter().map(|row| self.tick_row(row, &mut rng)).collect()
    }

    /// Summary statistics over the seeded snapshot.
    #[must_use]
    pub fn summary(&self) -> FxSummary {
        let changes: Vec<Decimal> = self
            .rows
            .iter()
            .filter_map(|row| row.number("change_pct"))
            .collect();

        FxSummary {
            total: self.rows.len(),
            gainers: changes.iter().filter(|c| c.is_sign_positive() && !c.is_zero()).count(),
            losers: changes.iter().filter(|c| c.is_sign_negative()).count(),
        }
    }

    fn tick_row(&self, row: &Row, rng: &mut impl Rng) -> Row {
        let (Some(pair), Some(bid), Some(ask)) =
            (row.text("pair"), row.number("bid"), row.number("ask"))
        else {
            return row.clone();
        };

        let vol = volatility_for(pair);
        let (price_dp, mid_dp, spread_dp) = scales_for(pair.contains("JPY"));

        // Random walk: bid and ask each move independently within ±vol
        let mut bid = bid + vol * uniform_factor(rng);
        let mut ask = ask + vol * uniform_factor(rng);

        // Spread floor keeps ask >= bid; monotone rounding preserves it
        if ask <= bid {
            ask = bid + vol / Decimal::TWO;
        }
        bid = bid.round_dp(price_dp);
        ask = ask.round_dp(price_dp);

        let mid = ((bid + ask) / Decimal::TWO).round_dp(mid_dp);
        let spread = (ask - bid).round_dp(spread_dp);
        let change_pct = self
            .baseline_mids
            .get(pair)
            .filter(|baseline| !baseline.is_zero())
            .map_or(Decimal::ZERO, |baseline| {
                ((mid - baseline) / baseline * Decimal::ONE_HUNDRED).round_dp(2)
            });

        let mut ticked = row.clone();
        ticked.set("bid", bid);
        ticked.set("ask", ask);
        ticked.set("mid", mid);
        ticked.set("spread", spread);
        ticked.set("change_pct", change_pct);
        if let Some(volume) = row.number("volume").and_then(|v| v.to_i64()) {
            ticked.set("volume", jitter_volume(volume, rng));
        }

        ticked
    }
}

/// Uniform factor in `[-1, 1]` as a decimal.
fn uniform_factor(rng: &mut impl Rng) -> Decimal {
    Decimal::from_f64_retain(rng.random_range(-1.0..=1.0)).unwrap_or_default()
}

/// Jitter volume by up to ±5%, floored at [`MIN_VOLUME`].
fn jitter_volume(base: i64, rng: &mut impl Rng) -> i64 {
    let band = base / 20;
    let jitter = if band > 0 {
        rng.random_range(-band..=band)
    } else {
        0
    };
    (base + jitter).max(MIN_VOLUME)
}

// =============================================================================
// Seed Data
// =============================================================================

#[allow(clippy::too_many_arguments)]
fn pair_row(
    pair: &str,
    bid: Decimal,
    ask: Decimal,
    mid: Decimal,
    change_pct: Decimal,
    spread: Decimal,
    volume: i64,
    session: &str,
) -> Row {
    Row::new()
        .with("pair", pair)
        .with("bid", bid)
        .with("ask", ask)
        .with("mid", mid)
        .with("change_pct", change_pct)
        .with("spread", spread)
        .with("volume", volume)
        .with("session", session)
        .with("status", "Active")
}

#[allow(clippy::unreadable_literal)]
fn seed_rows() -> Vec<Row> {
    let d = Decimal::new;
    vec![
        pair_row("EUR/USD", d(10842, 4), d(10845, 4), d(108435, 5), d(12, 2), d(3, 4), 1_250_000, "London"),
        pair_row("GBP/USD", d(12634, 4), d(12637, 4), d(126355, 5), d(-8, 2), d(3, 4), 890_000, "London"),
        pair_row("USD/JPY", d(14982, 2), d(14985, 2), d(149835, 3), d(35, 2), d(3, 2), 1_100_000, "Tokyo"),
        pair_row("USD/CHF", d(8821, 4), d(8824, 4), d(88225, 5), d(-15, 2), d(3, 4), 420_000, "Zurich"),
        pair_row("AUD/USD", d(6543, 4), d(6546, 4), d(65445, 5), d(22, 2), d(3, 4), 560_000, "Sydney"),
        pair_row("USD/CAD", d(13567, 4), d(13570, 4), d(135685, 5), d(-5, 2), d(3, 4), 380_000, "New York"),
        pair_row("NZD/USD", d(6123, 4), d(6127, 4), d(6125, 4), d(18, 2), d(4, 4), 210_000, "Wellington"),
        pair_row("EUR/GBP", d(8582, 4), d(8585, 4), d(85835, 5), d(5, 2), d(3, 4), 340_000, "London"),
        pair_row("EUR/JPY", d(16245, 2), d(16249, 2), d(16247, 2), d(42, 2), d(4, 2), 290_000, "Tokyo"),
        pair_row("GBP/JPY", d(18935, 2), d(18940, 2), d(189375, 3), d(-28, 2), d(5, 2), 250_000, "London"),
        pair_row("USD/SGD", d(13412, 4), d(13416, 4), d(13414, 4), d(8, 2), d(4, 4), 180_000, "Singapore"),
        pair_row("USD/HKD", d(78102, 4), d(78108, 4), d(78105, 4), d(1, 2), d(6, 4), 320_000, "Hong Kong"),
    ]
}

// =============================================================================
// Tests
// =============================================================================
