//! Bet selection: advanced filter criteria and date-range windows.
//!
//! All numeric bounds are inclusive. An absent or empty criterion places
//! no constraint, and a bet passes only if it satisfies every criterion
//! that is present.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, NaiveTime, TimeDelta, TimeZone, Utc};
use serde::{Deserialize, Serialize};

use super::bet::{BetResult, TrackedBet};
use crate::error::LedgerError;

// ────────────────────────────────────────────
// Result filter
// ────────────────────────────────────────────

/// Which settlement states a filter admits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResultFilter {
    #[default]
    All,
    /// Won or lost.
    Settled,
    Pending,
    Won,
    Lost,
}

impl ResultFilter {
    pub const fn matches(self, result: BetResult) -> bool {
        match self {
            Self::All => true,
            Self::Settled => result.is_settled(),
            Self::Pending => matches!(result, BetResult::Pending),
            Self::Won => matches!(result, BetResult::Won),
            Self::Lost => matches!(result, BetResult::Lost),
        }
    }
}

impl FromStr for ResultFilter {
    type Err = LedgerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "" | "all" => Ok(Self::All),
            "settled" => Ok(Self::Settled),
            "pending" => Ok(Self::Pending),
            "won" => Ok(Self::Won),
            "lost" => Ok(Self::Lost),
            _ => Err(LedgerError::UnknownResultFilter(s.to_string())),
        }
    }
}

// ────────────────────────────────────────────
// Advanced criteria
// ────────────────────────────────────────────

/// Advanced filter bar state.
///
/// Bounds on optional race attributes (barrier, back number, distance)
/// reject bets that do not carry the attribute.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterCriteria {
    pub min_edge: Option<f64>,
    pub min_odds: Option<f64>,
    pub max_odds: Option<f64>,
    pub min_barrier: Option<u32>,
    pub max_barrier: Option<u32>,
    pub min_distance: Option<u32>,
    pub max_distance: Option<u32>,
    pub min_back_number: Option<u32>,
    pub max_back_number: Option<u32>,
    /// Admitted tracks; empty admits every track.
    pub tracks: Vec<String>,
    /// Exact bookmaker; blank admits every bookmaker.
    pub bookmaker: Option<String>,
    pub result: ResultFilter,
    /// Case-insensitive substring of horse, track and bookmaker.
    pub search: Option<String>,
}

impl FilterCriteria {
    /// Whether no criterion is set.
    pub fn is_unconstrained(&self) -> bool {
        let bounds = [self.min_edge, self.min_odds, self.max_odds];
        let attributes = [
            self.min_barrier,
            self.max_barrier,
            self.min_distance,
            self.max_distance,
            self.min_back_number,
            self.max_back_number,
        ];
        bounds.iter().all(Option::is_none)
            && attributes.iter().all(Option::is_none)
            && self.tracks.is_empty()
            && self.bookmaker().is_none()
            && self.result == ResultFilter::All
            && self.search_needle().is_none()
    }

    /// Whether `bet` satisfies every supplied criterion.
    pub fn matches(&self, bet: &TrackedBet) -> bool {
        within(Some(bet.edge_or_zero()), self.min_edge, None)
            && within(Some(bet.odds_at_tip), self.min_odds, self.max_odds)
            && within(bet.barrier, self.min_barrier, self.max_barrier)
            && within(bet.distance_m, self.min_distance, self.max_distance)
            && within(bet.back_number, self.min_back_number, self.max_back_number)
            && (self.tracks.is_empty() || self.tracks.iter().any(|t| *t == bet.track))
            && self.bookmaker().is_none_or(|book| book == bet.bookmaker)
            && self.result.matches(bet.result)
            && self.search_needle().is_none_or(|needle| {
                format!("{} {} {}", bet.horse_name, bet.track, bet.bookmaker)
                    .to_lowercase()
                    .contains(&needle)
            })
    }

    fn bookmaker(&self) -> Option<&str> {
        self.bookmaker.as_deref().map(str::trim).filter(|b| !b.is_empty())
    }

    fn search_needle(&self) -> Option<String> {
        self.search
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_lowercase)
    }
}

fn within<T: PartialOrd + Copy>(value: Option<T>, min: Option<T>, max: Option<T>) -> bool {
    if min.is_none() && max.is_none() {
        return true;
    }
    value.is_some_and(|v| min.is_none_or(|lo| v >= lo) && max.is_none_or(|hi| v <= hi))
}

/// Bets satisfying `criteria`, in input order.
pub fn filter_bets<'a, I>(bets: I, criteria: &FilterCriteria) -> Vec<&'a TrackedBet>
where
    I: IntoIterator<Item = &'a TrackedBet>,
{
    bets.into_iter().filter(|b| criteria.matches(b)).collect()
}

// ────────────────────────────────────────────
// Date ranges
// ────────────────────────────────────────────

/// Calendar window over `tracked_at`, aligned to local midnight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DateRange {
    /// `[today 00:00, tomorrow 00:00)`
    Today,
    /// `[yesterday 00:00, today 00:00)`
    Yesterday,
    /// Today and the six days before it.
    Week,
    /// Today and the 29 days before it.
    Month,
    #[default]
    All,
}

impl DateRange {
    /// Half-open `[start, end)` bounds relative to `now`, in `now`'s zone.
    ///
    /// `None` for [`DateRange::All`].
    pub fn bounds<Tz: TimeZone>(self, now: &DateTime<Tz>) -> Option<(DateTime<Utc>, DateTime<Utc>)> {
        let (days_back, days_ahead) = match self {
            Self::All => return None,
            Self::Today => (0, 1),
            Self::Yesterday => (1, 0),
            Self::Week => (6, 1),
            Self::Month => (29, 1),
        };

        let tz = now.timezone();
        let today = now.date_naive();
        Some((
            local_midnight(&tz, today - TimeDelta::days(days_back)),
            local_midnight(&tz, today + TimeDelta::days(days_ahead)),
        ))
    }

    /// Whether `tracked_at` falls inside the window around `now`.
    pub fn contains<Tz: TimeZone>(self, tracked_at: &DateTime<Utc>, now: &DateTime<Tz>) -> bool {
        self.bounds(now)
            .is_none_or(|(start, end)| *tracked_at >= start && *tracked_at < end)
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Today => "today",
            Self::Yesterday => "yesterday",
            Self::Week => "week",
            Self::Month => "month",
            Self::All => "all",
        }
    }
}

impl fmt::Display for DateRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DateRange {
    type Err = LedgerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "today" => Ok(Self::Today),
            "yesterday" => Ok(Self::Yesterday),
            "week" => Ok(Self::Week),
            "month" => Ok(Self::Month),
            "all" => Ok(Self::All),
            _ => Err(LedgerError::UnknownDateRange(s.to_string())),
        }
    }
}

// Midnights skipped by a DST jump resolve to the earliest valid instant;
// if the zone has none, midnight UTC is used.
fn local_midnight<Tz: TimeZone>(tz: &Tz, date: NaiveDate) -> DateTime<Utc> {
    let naive = date.and_time(NaiveTime::MIN);
    tz.from_local_datetime(&naive)
        .earliest()
        .map_or_else(|| naive.and_utc(), |dt| dt.with_timezone(&Utc))
}

/// Bets tracked inside `range`, in input order.
pub fn filter_by_range<'a, I, Tz>(bets: I, range: DateRange, now: &DateTime<Tz>) -> Vec<&'a TrackedBet>
where
    I: IntoIterator<Item = &'a TrackedBet>,
    Tz: TimeZone,
{
    let bounds = range.bounds(now);
    bets.into_iter()
        .filter(|b| bounds.is_none_or(|(start, end)| b.tracked_at >= start && b.tracked_at < end))
        .collect()
}
