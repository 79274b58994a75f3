use crate::prelude::*;

/// The outcome of validating one entry of a snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    /// First sighting of this partner, the values become the baseline.
    Baseline,
    /// Both times advanced past the stored record.
    Accepted,
    /// One or both times failed to advance. The record was still replaced.
    Rejected(Vec<MonotonicityError>),
}

impl Verdict {
    pub fn is_rejected(&self) -> bool {
        matches!(self, Verdict::Rejected(_))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PartnerVerdict {
    pub partner: PartnerId,
    pub verdict: Verdict,
}

/// The result of a single `observe` call, one verdict per processed entry in
/// the order they were supplied.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ObservationReport {
    verdicts: Vec<PartnerVerdict>,
    aborted: bool,
}

impl ObservationReport {
    pub(crate) fn push(&mut self, partner: PartnerId, verdict: Verdict) {
        self.verdicts.push(PartnerVerdict { partner, verdict })
    }

    pub(crate) fn abort(&mut self) {
        self.aborted = true;
    }

    pub fn verdicts(&self) -> &[PartnerVerdict] {
        &self.verdicts
    }

    /// True when no processed entry was rejected.
    pub fn is_ok(&self) -> bool {
        !self.verdicts.iter().any(|pv| pv.verdict.is_rejected())
    }

    /// True if evaluation stopped early under [FailurePolicy::FailFast]. Entries after
    /// the rejected one were neither checked nor recorded.
    pub fn aborted(&self) -> bool {
        self.aborted
    }

    pub fn violations(&self) -> impl Iterator<Item = (PartnerId, MonotonicityError)> + '_ {
        self.verdicts
            .iter()
            .filter_map(|pv| match &pv.verdict {
                Verdict::Rejected(errs) => Some((pv.partner, errs)),
                Verdict::Baseline | Verdict::Accepted => None,
            })
            .flat_map(|(partner, errs)| errs.iter().map(move |e| (partner, *e)))
    }

    /// Convert the report into a fatal error if anything was rejected.
    pub fn into_result(self) -> Result<(), OperationError> {
        let violations: Vec<_> = self.violations().collect();
        if violations.is_empty() {
            Ok(())
        } else {
            Err(OperationError::ReplNonMonotonic(violations))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const P_A: PartnerId = PartnerId::new(uuid!("00000000-0000-0000-0000-00000000000a"));
    const P_B: PartnerId = PartnerId::new(uuid!("00000000-0000-0000-0000-00000000000b"));

    #[test]
    fn test_report_violations_in_order() {
        let mut report = ObservationReport::default();
        assert!(report.is_ok());
        assert_eq!(report.clone().into_result(), Ok(()));

        report.push(P_A, Verdict::Accepted);
        report.push(
            P_B,
            Verdict::Rejected(vec![
                MonotonicityError::NonMonotonicAttempt {
                    prior: 5,
                    observed: 5,
                },
                MonotonicityError::NonMonotonicSuccess {
                    prior: 5,
                    observed: 0,
                },
            ]),
        );

        assert!(!report.is_ok());
        assert!(!report.aborted());
        let v: Vec<_> = report.violations().collect();
        assert_eq!(v.len(), 2);
        assert!(v.iter().all(|(p, _)| *p == P_B));

        match report.into_result() {
            Err(OperationError::ReplNonMonotonic(v)) => assert_eq!(v.len(), 2),
            r => panic!("unexpected result {:?}", r),
        }
    }

    #[test]
    fn test_report_violations_skip_clean_verdicts() {
        let mut report = ObservationReport::default();
        report.push(
            P_A,
            Verdict::Rejected(vec![MonotonicityError::NonMonotonicSuccess {
                prior: 9,
                observed: 9,
            }]),
        );
        report.push(P_A, Verdict::Baseline);
        report.push(P_B, Verdict::Accepted);
        report.push(
            P_B,
            Verdict::Rejected(vec![MonotonicityError::NonMonotonicAttempt {
                prior: 4,
                observed: 0,
            }]),
        );

        let v: Vec<_> = report.violations().collect();
        assert_eq!(
            v,
            vec![
                (
                    P_A,
                    MonotonicityError::NonMonotonicSuccess {
                        prior: 9,
                        observed: 9
                    }
                ),
                (
                    P_B,
                    MonotonicityError::NonMonotonicAttempt {
                        prior: 4,
                        observed: 0
                    }
                ),
            ]
        );
    }
}
