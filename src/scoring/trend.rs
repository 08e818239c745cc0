use super::engine::ScoreSnapshot;
use super::validation::EngineError;

/// Percentage change of one pillar between two snapshots.
///
/// `Undefined` means the previous score was exactly zero and the percentage
/// does not exist. It is a distinct value, not `0.0` and not infinity, so a
/// renderer can never misreport "0% change" for "cannot compute".
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PillarDelta {
    Change(f64),
    Undefined,
}

impl PillarDelta {
    pub fn as_change(&self) -> Option<f64> {
        match self {
            PillarDelta::Change(pct) => Some(*pct),
            PillarDelta::Undefined => None,
        }
    }
}

/// Per-pillar percentage deltas between the two most recent snapshots.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrendDelta {
    pub environmental: PillarDelta,
    pub social: PillarDelta,
    pub governance: PillarDelta,
}

fn delta(previous: f64, latest: f64) -> PillarDelta {
    if previous == 0.0 {
        PillarDelta::Undefined
    } else {
        PillarDelta::Change((latest - previous) / previous * 100.0)
    }
}

/// Compare the latest snapshot against the one immediately before it.
///
/// The input must already be sorted ascending by period (the caller owns the
/// ordering; equal adjacent periods are accepted). An unsorted sequence is a
/// caller bug and fails with `EngineError::Precondition` rather than being
/// silently re-sorted. Fewer than two snapshots returns `Ok(None)`: the trend
/// is unavailable, which is not the same thing as a zero delta.
pub fn compute_trend(snapshots: &[ScoreSnapshot]) -> Result<Option<TrendDelta>, EngineError> {
    if let Some(pair) = snapshots.windows(2).find(|w| w[0].period > w[1].period) {
        return Err(EngineError::Precondition(format!(
            "snapshots not sorted ascending by period ({} follows {})",
            pair[1].period, pair[0].period
        )));
    }

    if snapshots.len() < 2 {
        return Ok(None);
    }
    let previous = &snapshots[snapshots.len() - 2];
    let latest = &snapshots[snapshots.len() - 1];

    Ok(Some(TrendDelta {
        environmental: delta(previous.environmental, latest.environmental),
        social: delta(previous.social, latest.social),
        governance: delta(previous.governance, latest.governance),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDateTime;

    fn snapshot(day: u32, environmental: f64, social: f64, governance: f64) -> ScoreSnapshot {
        ScoreSnapshot {
            period: NaiveDateTime::parse_from_str(
                &format!("2024-03-{:02}T00:00:00", day),
                "%Y-%m-%dT%H:%M:%S",
            )
            .unwrap(),
            environmental,
            social,
            governance,
            composite: (environmental + social + governance) / 3.0,
        }
    }

    #[test]
    fn test_empty_sequence_is_unavailable() {
        assert_eq!(compute_trend(&[]).unwrap(), None);
    }

    #[test]
    fn test_single_snapshot_is_unavailable() {
        let result = compute_trend(&[snapshot(1, 50.0, 50.0, 50.0)]).unwrap();
        assert_eq!(result, None);
    }

    #[test]
    fn test_basic_percentage_delta() {
        let snapshots = [snapshot(1, 50.0, 80.0, 40.0), snapshot(2, 75.0, 60.0, 40.0)];
        let trend = compute_trend(&snapshots).unwrap().unwrap();
        assert_eq!(trend.environmental, PillarDelta::Change(50.0));
        assert_eq!(trend.social, PillarDelta::Change(-25.0));
        assert_eq!(trend.governance, PillarDelta::Change(0.0));
    }

    #[test]
    fn test_zero_previous_is_undefined_not_zero() {
        let snapshots = [snapshot(1, 0.0, 50.0, 50.0), snapshot(2, 50.0, 50.0, 50.0)];
        let trend = compute_trend(&snapshots).unwrap().unwrap();
        assert_eq!(trend.environmental, PillarDelta::Undefined);
        assert_eq!(trend.environmental.as_change(), None);
        // A real 0% delta stays a number.
        assert_eq!(trend.social, PillarDelta::Change(0.0));
    }

    #[test]
    fn test_negative_previous_keeps_sign_convention() {
        // Unclamped scores can be negative; the formula is applied as-is.
        let snapshots = [snapshot(1, -50.0, 10.0, 10.0), snapshot(2, -25.0, 10.0, 10.0)];
        let trend = compute_trend(&snapshots).unwrap().unwrap();
        assert_eq!(trend.environmental, PillarDelta::Change(-50.0));
    }

    #[test]
    fn test_only_latest_pair_is_compared() {
        let snapshots = [
            snapshot(1, 10.0, 10.0, 10.0),
            snapshot(2, 100.0, 100.0, 100.0),
            snapshot(3, 110.0, 50.0, 100.0),
        ];
        let trend = compute_trend(&snapshots).unwrap().unwrap();
        assert!((trend.environmental.as_change().unwrap() - 10.0).abs() < 1e-12);
        assert_eq!(trend.social, PillarDelta::Change(-50.0));
    }

    #[test]
    fn test_unsorted_sequence_is_a_precondition_error() {
        let snapshots = [snapshot(5, 50.0, 50.0, 50.0), snapshot(1, 60.0, 60.0, 60.0)];
        let err = compute_trend(&snapshots).unwrap_err();
        assert!(matches!(err, EngineError::Precondition(_)));
        assert!(err.to_string().contains("not sorted"));
    }

    #[test]
    fn test_equal_periods_are_accepted() {
        let snapshots = [snapshot(1, 50.0, 50.0, 50.0), snapshot(1, 55.0, 50.0, 50.0)];
        let trend = compute_trend(&snapshots).unwrap().unwrap();
        assert_eq!(trend.environmental, PillarDelta::Change(10.0));
    }
}
