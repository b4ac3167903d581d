//! Kelly Criterion stake suggestion for tracked tips.
//!
//! The model's edge scales the market-implied win probability:
//!   p = (1 / odds) * (1 + edge% / 100),  q = 1 - p,  b = odds - 1
//! and the full Kelly fraction is f* = (b * p - q) / b.
//! We suggest half-Kelly by default.
//!
//! Exposes both `KellyCriterion` (Decimal API) and `KellySizer` (f64 API).

use rust_decimal::Decimal;
use rust_decimal::prelude::*;
use rust_decimal_macros::dec;

/// Kelly Criterion calculator for tip staking (Decimal API).
#[derive(Debug, Clone)]
pub struct KellyCriterion {
    /// Kelly fraction multiplier (0.5 = half-Kelly)
    fraction: Decimal,
}

impl KellyCriterion {
    /// Creates a calculator staking `fraction` of the full Kelly amount.
    pub const fn new(fraction: Decimal) -> Self {
        Self { fraction }
    }

    /// Full Kelly fraction of bankroll for a tip, or `None` when the bet
    /// is not favourable or the odds are degenerate (`odds <= 1`).
    pub fn full_fraction(edge_pct: Decimal, decimal_odds: Decimal) -> Option<Decimal> {
        let b = decimal_odds - Decimal::ONE;
        if b <= Decimal::ZERO {
            return None;
        }

        let edge_factor = Decimal::ONE.checked_add(edge_pct / Decimal::ONE_HUNDRED)?;
        let p = Decimal::ONE.checked_div(decimal_odds)?.checked_mul(edge_factor)?;
        let q = Decimal::ONE.checked_sub(p)?;
        let kelly = b.checked_mul(p)?.checked_sub(q)?.checked_div(b)?;

        (kelly > Decimal::ZERO).then_some(kelly)
    }

    /// Suggested stake in units, rounded to 2 dp.
    ///
    /// `None` without an edge, for unfavourable bets, and when the stake
    /// rounds to zero.
    pub fn suggested_stake(
        &self,
        edge_pct: Option<Decimal>,
        decimal_odds: Decimal,
        bankroll: Decimal,
    ) -> Option<Decimal> {
        let kelly = Self::full_fraction(edge_pct?, decimal_odds)?;
        let stake = kelly
            .checked_mul(self.fraction)?
            .checked_mul(bankroll)?
            .round_dp(2);

        (stake > Decimal::ZERO).then_some(stake)
    }

    pub const fn fraction(&self) -> Decimal {
        self.fraction
    }
}

impl Default for KellyCriterion {
    /// Default: half-Kelly.
    fn default() -> Self {
        Self { fraction: dec!(0.5) }
    }
}

// ────────────────────────────────────────────
// KellySizer — f64 boundary API for usecases
// ────────────────────────────────────────────

/// Lightweight f64 wrapper around `KellyCriterion`.
///
/// Accepts and returns `f64` so usecases never import `Decimal`.
#[derive(Debug, Clone, Default)]
pub struct KellySizer {
    inner: KellyCriterion,
}

impl KellySizer {
    /// Create a sizer with the given Kelly fraction (e.g., 0.5 for half-Kelly).
    pub fn new(fraction: f64) -> Self {
        let frac = Decimal::from_f64(fraction).unwrap_or(dec!(0.5));
        Self {
            inner: KellyCriterion::new(frac),
        }
    }

    /// Suggested stake in units, or `None` for "no bet".
    pub fn suggest(&self, edge_pct: Option<f64>, decimal_odds: f64, bankroll: f64) -> Option<f64> {
        let edge = match edge_pct {
            Some(e) => Some(Decimal::from_f64(e)?),
            None => None,
        };
        let odds = Decimal::from_f64(decimal_odds)?;
        let bank = Decimal::from_f64(bankroll)?;

        self.inner
            .suggested_stake(edge, odds, bank)
            .and_then(|stake| stake.to_f64())
    }

    /// Access the underlying precise calculator.
    pub const fn inner(&self) -> &KellyCriterion {
        &self.inner
    }
}

/// Half-Kelly stake for a tip, rounded to 2 dp; `None` means "no bet".
pub fn compute_half_kelly(edge_pct: Option<f64>, decimal_odds: f64, bankroll_units: f64) -> Option<f64> {
    KellySizer::default().suggest(edge_pct, decimal_odds, bankroll_units)
}
