//! Tracked bet records and per-bet settlement arithmetic.
//!
//! A `TrackedBet` is read-only to this crate: records are fetched fresh for
//! every analysis pass and nothing in the domain layer mutates them.
//!
//! Decoding is tolerant of the backend's JSON: ids may be
//! numbers or strings, timestamps may be naive ISO-8601 (taken as UTC),
//! and null or missing numerics fall back to zero / absent.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize};

use crate::error::LedgerError;

/// Opaque bet identifier.
pub type BetId = String;

/// Stake assumed for records that carry no positive stake.
pub const NOMINAL_STAKE: f64 = 1.0;

// ────────────────────────────────────────────
// Settlement state
// ────────────────────────────────────────────

/// Outcome of a tracked bet.
///
/// `Pending` is the only non-terminal state; a bet moves to `Won` or
/// `Lost` exactly once.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BetResult {
    /// Race not yet run or not yet settled.
    #[default]
    Pending,
    /// Selection won; the bet returns `stake * odds`.
    Won,
    /// Selection lost; the stake is gone.
    Lost,
}

impl BetResult {
    /// Whether the bet has reached a terminal state.
    pub const fn is_settled(self) -> bool {
        matches!(self, Self::Won | Self::Lost)
    }

    /// Lowercase wire name.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Won => "won",
            Self::Lost => "lost",
        }
    }
}

impl fmt::Display for BetResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BetResult {
    type Err = LedgerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pending" => Ok(Self::Pending),
            "won" => Ok(Self::Won),
            "lost" => Ok(Self::Lost),
            _ => Err(LedgerError::UnknownResult(s.to_string())),
        }
    }
}

// ────────────────────────────────────────────
// Tracked bet record
// ────────────────────────────────────────────

/// A bet the user tracked from a tip, as served by the dashboard API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackedBet {
    /// Unique identifier (numeric ids are kept as their decimal string).
    #[serde(deserialize_with = "id_from_any")]
    pub id: BetId,
    /// Racecourse name.
    #[serde(default, deserialize_with = "null_as_default")]
    pub track: String,
    /// Race number on the card.
    #[serde(default, deserialize_with = "null_as_default")]
    pub race_number: u32,
    /// Runner name.
    #[serde(default, deserialize_with = "null_as_default")]
    pub horse_name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub jockey: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub trainer: String,
    /// Bookmaker the odds were taken from.
    #[serde(default, deserialize_with = "null_as_default")]
    pub bookmaker: String,
    /// Decimal odds at the time the tip was tracked.
    #[serde(default, deserialize_with = "null_as_default")]
    pub odds_at_tip: f64,
    /// Recorded stake in units. Missing or zero means a nominal unit stake.
    #[serde(default)]
    pub stake: Option<f64>,
    /// Model edge over the market, in percent.
    #[serde(default)]
    pub edge_pct: Option<f64>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub result: BetResult,
    /// When the bet was tracked.
    #[serde(deserialize_with = "timestamp_from_any")]
    pub tracked_at: DateTime<Utc>,
    /// Starting gate.
    #[serde(default)]
    pub barrier: Option<u32>,
    /// Saddlecloth number.
    #[serde(default)]
    pub back_number: Option<u32>,
    /// Race distance in metres.
    #[serde(default)]
    pub distance_m: Option<u32>,
}

impl TrackedBet {
    /// Minimal record with display fields left empty.
    pub fn new(
        id: impl Into<BetId>,
        odds_at_tip: f64,
        result: BetResult,
        tracked_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: id.into(),
            track: String::new(),
            race_number: 0,
            horse_name: String::new(),
            jockey: String::new(),
            trainer: String::new(),
            bookmaker: String::new(),
            odds_at_tip,
            stake: None,
            edge_pct: None,
            result,
            tracked_at,
            barrier: None,
            back_number: None,
            distance_m: None,
        }
    }

    /// Whether the bet has been settled as won or lost.
    pub const fn is_settled(&self) -> bool {
        self.result.is_settled()
    }

    /// Stake used for aggregation. See [`implied_stake`].
    pub fn implied_stake(&self) -> f64 {
        implied_stake(self)
    }

    /// Settled profit or loss. See [`profit_loss_for_bet`].
    pub fn profit_loss(&self) -> f64 {
        profit_loss_for_bet(self)
    }

    /// Edge in percent, with an absent edge read as zero.
    pub fn edge_or_zero(&self) -> f64 {
        self.edge_pct.unwrap_or(0.0)
    }
}

/// Stake to aggregate for a bet: the recorded stake when strictly
/// positive, otherwise one nominal unit.
pub fn implied_stake(bet: &TrackedBet) -> f64 {
    match bet.stake {
        Some(stake) if stake > 0.0 => stake,
        _ => NOMINAL_STAKE,
    }
}

/// Profit or loss of a single bet in units.
///
/// Won: `stake * (odds - 1)`. Lost: `-stake`. Pending bets contribute
/// nothing and return `0.0`; use [`TrackedBet::is_settled`] to tell a
/// pending bet apart from a settled break-even one.
pub fn profit_loss_for_bet(bet: &TrackedBet) -> f64 {
    let stake = implied_stake(bet);
    match bet.result {
        BetResult::Won => stake * (bet.odds_at_tip - 1.0),
        BetResult::Lost => -stake,
        BetResult::Pending => 0.0,
    }
}

/// Parse a timestamp as RFC 3339, or as a naive ISO-8601 value taken as UTC.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Some(parsed.with_timezone(&Utc));
    }
    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"]
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(raw, format).ok())
        .map(|naive| naive.and_utc())
}

// ── serde helpers ───────────────────────────────────────────

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawId {
    Int(i64),
    Text(String),
}

fn id_from_any<'de, D>(deserializer: D) -> Result<BetId, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match RawId::deserialize(deserializer)? {
        RawId::Int(n) => n.to_string(),
        RawId::Text(s) => s,
    })
}

fn timestamp_from_any<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_timestamp(&raw).ok_or_else(|| de::Error::custom(format!("invalid timestamp '{raw}'")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 14, hour, 0, 0).unwrap()
    }

    #[test]
    fn test_implied_stake_defaults_to_one_unit() {
        let mut bet = TrackedBet::new("1", 3.0, BetResult::Won, at(10));
        assert_eq!(implied_stake(&bet), 1.0);

        bet.stake = Some(0.0);
        assert_eq!(implied_stake(&bet), 1.0);

        bet.stake = Some(-2.0);
        assert_eq!(implied_stake(&bet), 1.0);

        bet.stake = Some(2.5);
        assert_eq!(implied_stake(&bet), 2.5);
    }

    #[test]
    fn test_profit_loss_by_result() {
        let won = TrackedBet {
            stake: Some(2.0),
            ..TrackedBet::new("w", 4.0, BetResult::Won, at(10))
        };
        let lost = TrackedBet {
            stake: Some(2.0),
            ..TrackedBet::new("l", 4.0, BetResult::Lost, at(11))
        };
        let pending = TrackedBet::new("p", 4.0, BetResult::Pending, at(12));

        assert!((won.profit_loss() - 6.0).abs() < 1e-12);
        assert!((lost.profit_loss() + 2.0).abs() < 1e-12);
        assert_eq!(pending.profit_loss(), 0.0);
        assert!(!pending.is_settled());
    }

    #[test]
    fn test_result_parse_and_display() {
        assert_eq!("WON".parse::<BetResult>(), Ok(BetResult::Won));
        assert_eq!(" lost ".parse::<BetResult>(), Ok(BetResult::Lost));
        assert_eq!(
            "void".parse::<BetResult>(),
            Err(LedgerError::UnknownResult("void".to_string()))
        );
        assert_eq!(BetResult::Pending.to_string(), "pending");
    }

    #[test]
    fn test_decode_backend_row() {
        let json = r#"{
            "id": 42,
            "tracked_at": "2026-03-14T09:30:00.123456",
            "race_id": 7,
            "track": "Flemington",
            "race_number": 4,
            "horse_name": "Quick Silver",
            "bookmaker": "sportsbet",
            "edge_pct": 6.5,
            "odds_at_tip": 3.4,
            "stake": null,
            "result": "won"
        }"#;
        let bet: TrackedBet = serde_json::from_str(json).unwrap();
        assert_eq!(bet.id, "42");
        assert_eq!(bet.result, BetResult::Won);
        assert_eq!(bet.stake, None);
        assert_eq!(bet.jockey, "");
        assert_eq!(bet.barrier, None);
        assert_eq!(
            bet.tracked_at,
            Utc.with_ymd_and_hms(2026, 3, 14, 9, 30, 0).unwrap()
                + chrono::Duration::microseconds(123_456)
        );
    }

    #[test]
    fn test_decode_missing_result_is_pending() {
        let json = r#"{"id": "abc", "tracked_at": "2026-03-14T09:30:00Z", "odds_at_tip": null}"#;
        let bet: TrackedBet = serde_json::from_str(json).unwrap();
        assert_eq!(bet.result, BetResult::Pending);
        assert_eq!(bet.odds_at_tip, 0.0);
    }

    #[test]
    fn test_decode_rejects_bad_timestamp() {
        let json = r#"{"id": 1, "tracked_at": "yesterday"}"#;
        assert!(serde_json::from_str::<TrackedBet>(json).is_err());
    }

    #[test]
    fn test_parse_timestamp_variants() {
        let expected = Utc.with_ymd_and_hms(2026, 3, 14, 9, 30, 0).unwrap();
        assert_eq!(parse_timestamp("2026-03-14T09:30:00Z"), Some(expected));
        assert_eq!(parse_timestamp("2026-03-14T19:30:00+10:00"), Some(expected));
        assert_eq!(parse_timestamp("2026-03-14 09:30:00"), Some(expected));
        assert_eq!(parse_timestamp("not a date"), None);
    }
}
