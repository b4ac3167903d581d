//! Cumulative P&L series and edge significance.
//!
//! The significance estimate tests whether the observed win rate differs
//! from the market's average implied win probability, using a one-sided
//! normal approximation to the binomial:
//!
//!   se = sqrt(p̄ (1 - p̄) / n)
//!   z  = (wins / n - p̄) / se
//!   p  = 1 - Φ(z)             (p = 1 when z <= 0)
//!
//! A small p-value says the win rate is distinguishable from the market's
//! expectation. It is reported as a number, not a verdict.

use serde::Serialize;

use super::bet::{BetResult, TrackedBet, profit_loss_for_bet};
use super::ledger::aggregate_pnl;

/// Odds floor used when converting odds to implied probability.
pub const MIN_PROBABILITY_ODDS: f64 = 1.01;

/// One point of the cumulative P&L curve.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PlPoint<'a> {
    /// Running profit after this bet.
    pub cumulative: f64,
    /// Profit or loss of this bet alone.
    pub delta_pl: f64,
    /// The bet behind this point; `None` for the starting anchor.
    pub bet: Option<&'a TrackedBet>,
}

/// Significance of the observed win rate over a window of settled bets.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SignificanceStats {
    pub n: usize,
    pub wins: usize,
    /// Mean of `1 / max(odds, 1.01)` over the window.
    pub avg_implied_prob: f64,
    pub observed_rate: f64,
    pub std_error: f64,
    pub z_score: f64,
    /// One-sided p-value of the null "no edge over the market".
    pub p_value: f64,
    pub roi_pct: f64,
}

/// Cumulative P&L curve with its significance estimate.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlSeries<'a> {
    /// Starts with a zero anchor, then one point per settled bet.
    pub points: Vec<PlPoint<'a>>,
    /// `None` when the window holds no settled bet.
    pub stats: Option<SignificanceStats>,
}

impl PlSeries<'_> {
    /// Running profit at the end of the series.
    pub fn final_cumulative(&self) -> f64 {
        self.points.last().map_or(0.0, |p| p.cumulative)
    }
}

/// Build the cumulative P&L series over chronologically ordered bets.
///
/// Pending bets are skipped.
pub fn build_pl_series<'a, I>(settled: I) -> PlSeries<'a>
where
    I: IntoIterator<Item = &'a TrackedBet>,
{
    let settled: Vec<&'a TrackedBet> = settled.into_iter().filter(|b| b.is_settled()).collect();

    let mut points = Vec::with_capacity(settled.len() + 1);
    points.push(PlPoint {
        cumulative: 0.0,
        delta_pl: 0.0,
        bet: None,
    });

    let mut cumulative = 0.0;
    for &bet in &settled {
        let delta_pl = profit_loss_for_bet(bet);
        cumulative += delta_pl;
        points.push(PlPoint {
            cumulative,
            delta_pl,
            bet: Some(bet),
        });
    }

    PlSeries {
        points,
        stats: significance(&settled),
    }
}

/// Win-rate significance over settled bets; `None` for an empty window.
pub fn significance(settled: &[&TrackedBet]) -> Option<SignificanceStats> {
    if settled.is_empty() {
        return None;
    }

    let n = settled.len();
    let n_f = n as f64;
    let wins = settled.iter().filter(|b| b.result == BetResult::Won).count();
    let avg_implied_prob = settled
        .iter()
        .map(|b| 1.0 / b.odds_at_tip.max(MIN_PROBABILITY_ODDS))
        .sum::<f64>()
        / n_f;
    let observed_rate = wins as f64 / n_f;

    let std_error = (avg_implied_prob * (1.0 - avg_implied_prob) / n_f).sqrt();
    let z_score = if std_error > 0.0 {
        (observed_rate - avg_implied_prob) / std_error
    } else {
        0.0
    };

    Some(SignificanceStats {
        n,
        wins,
        avg_implied_prob,
        observed_rate,
        std_error,
        z_score,
        p_value: one_sided_p_value(z_score),
        roi_pct: aggregate_pnl(settled.iter().copied()).roi_pct,
    })
}

/// Upper-tail probability `P(Z > z)`; 1 for non-positive `z`.
pub fn one_sided_p_value(z: f64) -> f64 {
    if z <= 0.0 {
        1.0
    } else {
        0.5 * (1.0 - libm::erf(z / std::f64::consts::SQRT_2))
    }
}
