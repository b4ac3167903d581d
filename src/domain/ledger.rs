//! Ledger aggregation over tracked bets.
//!
//! Every function here is pure: it reads a slice or iterator of bets and
//! returns plain values. Division-by-zero cases (no stake, no settled bets,
//! empty input) are defined to yield `0.0`, never `NaN`.

use std::collections::BTreeMap;

use serde::Serialize;

use super::bet::{BetResult, TrackedBet, implied_stake};

/// Default size of the "recent bets" window in the metrics table.
pub const DEFAULT_RECENT_WINDOW: usize = 20;

/// Default number of outcomes shown in the recent-results strip.
pub const DEFAULT_OUTCOME_WINDOW: usize = 30;

/// Labels of the fixed edge buckets, lowest first.
pub const EDGE_BUCKET_LABELS: [&str; 5] =
    ["< -5%", "-5% to 0%", "0% to 5%", "5% to 10%", ">= 10%"];

/// Stake, returns and return on investment over settled bets.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct PnlSummary {
    /// Total implied stake of settled bets.
    pub stake: f64,
    /// Gross returns of won bets (`stake * odds`).
    pub returns: f64,
    /// `returns - stake`.
    pub profit: f64,
    /// `100 * profit / stake`, or 0 without stake.
    pub roi_pct: f64,
}

/// Longest consecutive runs of wins and losses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct Streaks {
    pub best_win: u32,
    pub best_loss: u32,
}

/// One bar of the edge histogram.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct EdgeBucket {
    pub label: &'static str,
    pub count: usize,
}

/// Profit of one group of bets (a bookmaker or a track).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupPnl {
    pub label: String,
    /// Settled profit of the group in units.
    pub profit: f64,
    /// Number of bets in the group, pending included.
    pub bets: usize,
}

/// Strike rate and profit over the most recent bets.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct RecentWindow {
    /// Number of bets actually in the window.
    pub size: usize,
    pub strike_rate_pct: f64,
    pub profit: f64,
}

/// Summary figures shown in the ledger metrics table.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct LedgerMetrics {
    pub total: usize,
    pub settled: usize,
    pub won: usize,
    pub lost: usize,
    pub pending: usize,
    pub strike_rate_pct: f64,
    pub pnl: PnlSummary,
    pub avg_edge_pct: f64,
    pub avg_odds: f64,
    pub top_edge_pct: f64,
    pub streaks: Streaks,
    pub recent: RecentWindow,
}

/// Settled bets, in input order.
pub fn settled_bets<'a, I>(bets: I) -> Vec<&'a TrackedBet>
where
    I: IntoIterator<Item = &'a TrackedBet>,
{
    bets.into_iter().filter(|b| b.is_settled()).collect()
}

/// Sort bets by `tracked_at`, oldest first. Ties keep their input order.
pub fn sort_chronological(bets: &mut [TrackedBet]) {
    bets.sort_by_key(|b| b.tracked_at);
}

/// Return on investment in percent; 0 when nothing was staked.
pub fn roi_pct(profit: f64, stake: f64) -> f64 {
    if stake > 0.0 { 100.0 * profit / stake } else { 0.0 }
}

/// Aggregate stake, returns, profit and ROI over the settled bets.
///
/// Pending bets contribute to nothing. A losing bet adds its stake but
/// no returns.
pub fn aggregate_pnl<'a, I>(bets: I) -> PnlSummary
where
    I: IntoIterator<Item = &'a TrackedBet>,
{
    let (stake, returns) = bets
        .into_iter()
        .filter(|b| b.is_settled())
        .fold((0.0, 0.0), |(stake, returns), bet| {
            let s = implied_stake(bet);
            let gross = if bet.result == BetResult::Won { s * bet.odds_at_tip } else { 0.0 };
            (stake + s, returns + gross)
        });

    let profit = returns - stake;
    PnlSummary {
        stake,
        returns,
        profit,
        roi_pct: roi_pct(profit, stake),
    }
}

/// Longest win and loss runs, walking bets in the order given.
///
/// The caller supplies the ordering (normally chronological). Pending
/// entries are skipped and do not break a run.
pub fn streaks<'a, I>(settled: I) -> Streaks
where
    I: IntoIterator<Item = &'a TrackedBet>,
{
    let mut best = Streaks::default();
    let (mut curr_win, mut curr_loss) = (0u32, 0u32);

    for bet in settled {
        match bet.result {
            BetResult::Won => {
                curr_win += 1;
                curr_loss = 0;
            }
            BetResult::Lost => {
                curr_loss += 1;
                curr_win = 0;
            }
            BetResult::Pending => continue,
        }
        best.best_win = best.best_win.max(curr_win);
        best.best_loss = best.best_loss.max(curr_loss);
    }

    best
}

/// Percentage of settled bets that won, in `[0, 100]`; 0 for no input.
pub fn win_pct_from<'a, I>(settled: I) -> f64
where
    I: IntoIterator<Item = &'a TrackedBet>,
{
    let (won, total) = settled
        .into_iter()
        .filter(|b| b.is_settled())
        .fold((0usize, 0usize), |(won, total), bet| {
            (won + usize::from(bet.result == BetResult::Won), total + 1)
        });

    if total == 0 {
        0.0
    } else {
        100.0 * won as f64 / total as f64
    }
}

/// Index into [`EDGE_BUCKET_LABELS`] for an edge in percent.
///
/// Buckets are left-inclusive: `[-5, 0)`, `[0, 5)`, `[5, 10)`, with the
/// outer buckets open-ended.
pub fn edge_bucket_index(edge_pct: f64) -> usize {
    if edge_pct < -5.0 {
        0
    } else if edge_pct < 0.0 {
        1
    } else if edge_pct < 5.0 {
        2
    } else if edge_pct < 10.0 {
        3
    } else {
        4
    }
}

/// Histogram of bets by edge. Every bet lands in exactly one bucket.
pub fn bucket_edges<'a, I>(bets: I) -> Vec<EdgeBucket>
where
    I: IntoIterator<Item = &'a TrackedBet>,
{
    let mut counts = [0usize; EDGE_BUCKET_LABELS.len()];
    for bet in bets {
        counts[edge_bucket_index(bet.edge_or_zero())] += 1;
    }

    EDGE_BUCKET_LABELS
        .iter()
        .zip(counts)
        .map(|(&label, count)| EdgeBucket { label, count })
        .collect()
}

/// Settled profit per group, best group first.
///
/// `key` picks the grouping label, e.g. `|b| b.bookmaker.as_str()`.
/// Equal profits are ordered by label.
pub fn group_pnl<'a, I, F>(bets: I, key: F) -> Vec<GroupPnl>
where
    I: IntoIterator<Item = &'a TrackedBet>,
    F: Fn(&'a TrackedBet) -> &'a str,
{
    let mut groups: BTreeMap<&'a str, Vec<&'a TrackedBet>> = BTreeMap::new();
    for bet in bets {
        groups.entry(key(bet)).or_default().push(bet);
    }

    let mut rows: Vec<GroupPnl> = groups
        .into_iter()
        .map(|(label, members)| GroupPnl {
            label: label.to_string(),
            profit: aggregate_pnl(members.iter().copied()).profit,
            bets: members.len(),
        })
        .collect();

    rows.sort_by(|a, b| b.profit.total_cmp(&a.profit).then_with(|| a.label.cmp(&b.label)));
    rows
}

/// Results of the last `window` bets, oldest first.
pub fn recent_outcomes(chronological: &[TrackedBet], window: usize) -> Vec<BetResult> {
    tail(chronological, window).iter().map(|b| b.result).collect()
}

/// Metrics table for a chronologically ordered ledger.
///
/// `recent_window` sizes the "recent bets" block, counted back from the
/// newest bet.
pub fn ledger_metrics(chronological: &[TrackedBet], recent_window: usize) -> LedgerMetrics {
    let settled = settled_bets(chronological);
    let won = settled.iter().filter(|b| b.result == BetResult::Won).count();

    let recent = tail(chronological, recent_window);
    let recent_pnl = aggregate_pnl(recent);

    LedgerMetrics {
        total: chronological.len(),
        settled: settled.len(),
        won,
        lost: settled.len() - won,
        pending: chronological.len() - settled.len(),
        strike_rate_pct: win_pct_from(settled.iter().copied()),
        pnl: aggregate_pnl(chronological),
        avg_edge_pct: mean(chronological.iter().map(TrackedBet::edge_or_zero)),
        avg_odds: mean(chronological.iter().map(|b| b.odds_at_tip)),
        top_edge_pct: chronological
            .iter()
            .map(TrackedBet::edge_or_zero)
            .reduce(f64::max)
            .unwrap_or(0.0),
        streaks: streaks(settled.iter().copied()),
        recent: RecentWindow {
            size: recent.len(),
            strike_rate_pct: win_pct_from(recent),
            profit: recent_pnl.profit,
        },
    }
}

fn tail(bets: &[TrackedBet], window: usize) -> &[TrackedBet] {
    &bets[bets.len().saturating_sub(window)..]
}

fn mean(values: impl Iterator<Item = f64>) -> f64 {
    let (sum, count) = values.fold((0.0, 0usize), |(sum, count), v| (sum + v, count + 1));
    if count == 0 { 0.0 } else { sum / count as f64 }
}
