// src/probe/status.rs
use serde::Serialize;
use std::fmt;

/// Current state of one probe's status cell.
///
/// A cell starts out `Unknown`, flips to `Checking` while a check is in
/// flight, and settles on `Success` or `Error` when the check completes.
/// Both settled states are terminal until the next invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ProbeStatus {
    Unknown,
    Checking,
    Success,
    Error,
}

impl ProbeStatus {
    /// State a completed check settles on.
    pub fn completed(success: bool) -> Self {
        if success {
            ProbeStatus::Success
        } else {
            ProbeStatus::Error
        }
    }

    pub fn is_checking(&self) -> bool {
        *self == ProbeStatus::Checking
    }

    /// Gauge encoding (0=unknown, 1=checking, 2=success, 3=error).
    pub fn as_gauge(&self) -> i64 {
        match self {
            ProbeStatus::Unknown => 0,
            ProbeStatus::Checking => 1,
            ProbeStatus::Success => 2,
            ProbeStatus::Error => 3,
        }
    }
}

impl fmt::Display for ProbeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ProbeStatus::Unknown => "unknown",
            ProbeStatus::Checking => "checking",
            ProbeStatus::Success => "success",
            ProbeStatus::Error => "error",
        };
        f.write_str(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn completed_maps_outcome_to_terminal_state() {
        assert_eq!(ProbeStatus::completed(true), ProbeStatus::Success);
        assert_eq!(ProbeStatus::completed(false), ProbeStatus::Error);
    }

    #[test]
    fn serializes_lowercase() {
        assert_eq!(
            serde_json::to_string(&ProbeStatus::Checking).unwrap(),
            "\"checking\""
        );
        assert_eq!(
            serde_json::to_string(&ProbeStatus::Unknown).unwrap(),
            "\"unknown\""
        );
    }

    #[test]
    fn gauge_values_are_distinct() {
        let states = [
            ProbeStatus::Unknown,
            ProbeStatus::Checking,
            ProbeStatus::Success,
            ProbeStatus::Error,
        ];
        for (i, a) in states.iter().enumerate() {
            for b in &states[i + 1..] {
                assert_ne!(a.as_gauge(), b.as_gauge());
            }
        }
    }

    proptest! {
        // Any non-empty sequence of check outcomes leaves the cell settled
        // on the last outcome, never back at Unknown.
        #[test]
        fn cell_tracks_the_last_outcome(outcomes in proptest::collection::vec(any::<bool>(), 1..32)) {
            let mut status = ProbeStatus::Unknown;
            for &ok in &outcomes {
                status = ProbeStatus::Checking;
                prop_assert!(status.is_checking());
                status = ProbeStatus::completed(ok);
            }
            let last = *outcomes.last().unwrap();
            prop_assert_eq!(status, ProbeStatus::completed(last));
            prop_assert_ne!(status, ProbeStatus::Unknown);
        }
    }
}
