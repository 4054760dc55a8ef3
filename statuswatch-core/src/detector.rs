//! Transition detection.
//!
//! The rule is deliberately binary: a service is either good
//! (`Operational`) or bad (anything else), and only a flip between the two
//! is a transition. Moving between two bad severities, or a change in the
//! summary text, is `Unchanged`.
//!
//! ```text
//!            prev = none         ──▶ FirstObservation
//!   good ──▶ good  /  bad ──▶ bad ──▶ Unchanged
//!   good ──▶ bad                  ──▶ Degraded
//!   bad  ──▶ good                 ──▶ Recovered
//! ```

use statuswatch_types::{NormalizedStatus, TransitionKind};

/// Classify `next` against the previously recorded status.
pub fn classify(previous: Option<&NormalizedStatus>, next: &NormalizedStatus) -> TransitionKind {
    let Some(previous) = previous else {
        return TransitionKind::FirstObservation;
    };

    match (previous.is_bad(), next.is_bad()) {
        (false, true) => TransitionKind::Degraded,
        (true, false) => TransitionKind::Recovered,
        _ => TransitionKind::Unchanged,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use statuswatch_types::Severity;

    const OBSERVABLE: [Severity; 4] = [
        Severity::Operational,
        Severity::Degraded,
        Severity::PartialOutage,
        Severity::MajorOutage,
    ];

    fn s(severity: Severity) -> NormalizedStatus {
        NormalizedStatus::new(severity)
    }

    #[test]
    fn first_observation_regardless_of_severity() {
        for severity in OBSERVABLE {
            assert_eq!(classify(None, &s(severity)), TransitionKind::FirstObservation);
        }
    }

    #[test]
    fn good_to_bad_and_back() {
        let ok = s(Severity::Operational);
        let down = s(Severity::MajorOutage);
        assert_eq!(classify(Some(&ok), &down), TransitionKind::Degraded);
        assert_eq!(classify(Some(&down), &ok), TransitionKind::Recovered);
    }

    #[test]
    fn shifting_between_bad_levels_is_unchanged() {
        let partial = s(Severity::PartialOutage);
        let major = s(Severity::MajorOutage);
        assert_eq!(classify(Some(&partial), &major), TransitionKind::Unchanged);
        assert_eq!(classify(Some(&major), &s(Severity::Degraded)), TransitionKind::Unchanged);
    }

    #[test]
    fn summary_change_alone_is_unchanged() {
        let a = s(Severity::Operational).with_summary("All Systems Operational");
        let b = s(Severity::Operational).with_summary("Everything is fine");
        assert_eq!(classify(Some(&a), &b), TransitionKind::Unchanged);
    }

    /// Walk every severity sequence up to length 6 and check that the
    /// number of Degraded/Recovered events equals the number of good/bad
    /// flips in the sequence.
    #[test]
    fn event_counts_match_flips_for_all_short_sequences() {
        fn walk(seq: &mut Vec<Severity>, depth: usize) {
            check(seq);
            if depth == 0 {
                return;
            }
            for severity in OBSERVABLE {
                seq.push(severity);
                walk(seq, depth - 1);
                seq.pop();
            }
        }

        fn check(seq: &[Severity]) {
            let mut previous: Option<NormalizedStatus> = None;
            let (mut degraded, mut recovered, mut first) = (0, 0, 0);
            for severity in seq {
                let next = s(*severity);
                match classify(previous.as_ref(), &next) {
                    TransitionKind::Degraded => degraded += 1,
                    TransitionKind::Recovered => recovered += 1,
                    TransitionKind::FirstObservation => first += 1,
                    TransitionKind::Unchanged => {}
                }
                previous = Some(next);
            }

            let flips_down = seq.windows(2).filter(|w| !w[0].is_bad() && w[1].is_bad()).count();
            let flips_up = seq.windows(2).filter(|w| w[0].is_bad() && !w[1].is_bad()).count();
            assert_eq!(degraded, flips_down, "sequence {:?}", seq);
            assert_eq!(recovered, flips_up, "sequence {:?}", seq);
            assert_eq!(first, usize::from(!seq.is_empty()));
        }

        walk(&mut Vec::new(), 6);
    }
}
