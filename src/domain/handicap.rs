//! Handicap math and GHIN freshness classification.
//!
//! Pure functions, deterministic given the current time. None of these
//! values are persisted; they are recomputed on every read.

use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;

use super::entities::Player;

/// Whole days before a GHIN handicap counts as stale.
pub const GHIN_STALE_DAYS: i64 = 4;

/// Forward-tee adjustment subtracted from the raw index.
const FORWARD_TEE_ADJUSTMENT: f64 = 2.0;

/// Freshness of a player's GHIN-sourced handicap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum GhinStatus {
    /// No raw handicap or no GHIN id on file.
    Missing,
    /// Refreshed within the last [`GHIN_STALE_DAYS`] whole days.
    Fresh,
    /// On file but not refreshed recently.
    Stale,
}

/// Computes the handicap a player actually plays from.
///
/// Forward-tee players get a two-stroke reduction; a missing raw index
/// propagates as `None`.
#[must_use]
pub fn playing_handicap(player: &Player) -> Option<f64> {
    player.handicap_raw.map(|raw| {
        if player.plays_forward_tees {
            raw - FORWARD_TEE_ADJUSTMENT
        } else {
            raw
        }
    })
}

/// Classifies GHIN freshness as of `now`.
///
/// `Missing` when the raw handicap is absent or no real GHIN id is on
/// file. Otherwise `Fresh` when the last update is at most
/// [`GHIN_STALE_DAYS`] whole days old (elapsed time floored to days;
/// partial days do not round up), else `Stale`. A handicap that was never
/// refreshed has no update timestamp and is `Stale`.
#[must_use]
pub fn ghin_status(player: &Player, now: DateTime<Utc>) -> GhinStatus {
    if player.handicap_raw.is_none() || !player.has_ghin() {
        return GhinStatus::Missing;
    }
    match player.last_handicap_update_at {
        Some(updated_at) if (now - updated_at).num_days() <= GHIN_STALE_DAYS => GhinStatus::Fresh,
        Some(_) | None => GhinStatus::Stale,
    }
}

/// Sums a roster's playing handicaps, ignoring players without one.
///
/// Returns `None` when no player has a handicap — "no data" is distinct
/// from an all-scratch roster summing to zero.
#[must_use]
pub fn combined_handicap(playing_handicaps: &[Option<f64>]) -> Option<f64> {
    playing_handicaps
        .iter()
        .flatten()
        .copied()
        .fold(None, |acc, h| Some(acc.unwrap_or(0.0) + h))
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use chrono::Duration;
    use uuid::Uuid;

    fn player(
        ghin: &str,
        handicap_raw: Option<f64>,
        plays_forward_tees: bool,
        updated: Option<DateTime<Utc>>,
    ) -> Player {
        Player {
            id: Uuid::new_v4(),
            first_name: "Sam".to_string(),
            last_name: "Hogan".to_string(),
            suffix: None,
            email: None,
            phone: None,
            ghin: ghin.to_string(),
            handicap_raw,
            plays_forward_tees,
            last_handicap_update_at: updated,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn playing_handicap_passes_through_standard_tees() {
        let p = player("123", Some(12.5), false, None);
        assert_eq!(playing_handicap(&p), Some(12.5));
    }

    #[test]
    fn playing_handicap_adjusts_forward_tees() {
        let p = player("123", Some(10.0), true, None);
        assert_eq!(playing_handicap(&p), Some(8.0));
    }

    #[test]
    fn playing_handicap_propagates_null() {
        let p = player("123", None, true, None);
        assert_eq!(playing_handicap(&p), None);
    }

    #[test]
    fn ghin_status_missing_without_raw_handicap() {
        let p = player("123", None, false, Some(Utc::now()));
        assert_eq!(ghin_status(&p, Utc::now()), GhinStatus::Missing);
    }

    #[test]
    fn ghin_status_missing_with_sentinel_ghin() {
        let p = player("NONE", Some(5.0), false, Some(Utc::now()));
        assert_eq!(ghin_status(&p, Utc::now()), GhinStatus::Missing);
    }

    #[test]
    fn ghin_status_fresh_when_just_updated() {
        let now = Utc::now();
        let p = player("123", Some(5.0), false, Some(now));
        assert_eq!(ghin_status(&p, now), GhinStatus::Fresh);
    }

    #[test]
    fn ghin_status_stale_after_ten_days() {
        let now = Utc::now();
        let p = player("123", Some(5.0), false, Some(now - Duration::days(10)));
        assert_eq!(ghin_status(&p, now), GhinStatus::Stale);
    }

    #[test]
    fn ghin_status_partial_days_do_not_round_up() {
        // 4 days and 20 hours floors to 4 whole days, still fresh.
        let now = Utc::now();
        let p = player(
            "123",
            Some(5.0),
            false,
            Some(now - Duration::days(4) - Duration::hours(20)),
        );
        assert_eq!(ghin_status(&p, now), GhinStatus::Fresh);

        let p = player("123", Some(5.0), false, Some(now - Duration::days(5)));
        assert_eq!(ghin_status(&p, now), GhinStatus::Stale);
    }

    #[test]
    fn ghin_status_stale_when_never_refreshed() {
        let p = player("123", Some(5.0), false, None);
        assert_eq!(ghin_status(&p, Utc::now()), GhinStatus::Stale);
    }

    #[test]
    fn combined_handicap_ignores_nulls() {
        assert_eq!(
            combined_handicap(&[Some(4.0), None, Some(6.5)]),
            Some(10.5)
        );
    }

    #[test]
    fn combined_handicap_all_null_is_none() {
        assert_eq!(combined_handicap(&[None, None]), None);
        assert_eq!(combined_handicap(&[]), None);
    }

    #[test]
    fn combined_handicap_scratch_roster_is_zero_not_none() {
        assert_eq!(combined_handicap(&[Some(0.0), Some(0.0)]), Some(0.0));
    }
}
