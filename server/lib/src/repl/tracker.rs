use std::collections::BTreeMap;

use crate::prelude::*;
use crate::repl::report::Verdict;

/// Tracks the last attempt and last success times of each replication partner, and
/// asserts that every new observation of a known partner has moved both forward.
///
/// A tracker lives for one validation session. It is not shared, mutation needs
/// `&mut self`.
#[derive(Debug, Default)]
pub struct PartnerStateTracker {
    policy: FailurePolicy,
    state: BTreeMap<PartnerId, PartnerRecord>,
}

impl PartnerStateTracker {
    pub fn new(policy: FailurePolicy) -> Self {
        PartnerStateTracker {
            policy,
            state: BTreeMap::default(),
        }
    }

    pub fn policy(&self) -> FailurePolicy {
        self.policy
    }

    /// Ingest a complete snapshot of partner state. Each entry is checked against the
    /// stored record for that partner and then replaces it, whether or not it passed.
    ///
    /// Entries are applied in order, so a partner listed twice is checked against
    /// its own earlier entry.
    #[instrument(level = "debug", skip_all, fields(policy = %self.policy))]
    pub fn observe<I>(&mut self, snapshot: I) -> ObservationReport
    where
        I: IntoIterator,
        I::Item: Into<PartnerObservation>,
    {
        let mut report = ObservationReport::default();

        for obs in snapshot.into_iter().map(Into::into) {
            let verdict = self.apply(&obs);
            let rejected = verdict.is_rejected();
            report.push(obs.partner, verdict);

            if rejected && self.policy == FailurePolicy::FailFast {
                admin_warn!(partner = %obs.partner, "stopping snapshot evaluation at first violation");
                report.abort();
                break;
            }
        }

        report
    }

    fn apply(&mut self, obs: &PartnerObservation) -> Verdict {
        let next = PartnerRecord::from(obs);

        let Some(prior) = self.state.insert(obs.partner, next) else {
            repl_baseline!(
                partner = %obs.partner,
                last_attempt = obs.last_attempt,
                last_success = obs.last_success,
                "new partner"
            );
            return Verdict::Baseline;
        };

        let mut errs = Vec::new();

        if obs.last_attempt == 0 || obs.last_attempt <= prior.last_attempt {
            errs.push(MonotonicityError::NonMonotonicAttempt {
                prior: prior.last_attempt,
                observed: obs.last_attempt,
            });
        }

        if obs.last_success == 0 || obs.last_success <= prior.last_success {
            errs.push(MonotonicityError::NonMonotonicSuccess {
                prior: prior.last_success,
                observed: obs.last_success,
            });
        }

        if errs.is_empty() {
            repl_accept!(
                partner = %obs.partner,
                last_attempt = obs.last_attempt,
                last_success = obs.last_success,
                "partner advanced"
            );
            Verdict::Accepted
        } else {
            for e in errs.iter() {
                repl_violation!(partner = %obs.partner, "{}", e);
            }
            Verdict::Rejected(errs)
        }
    }

    /// A read only view of every partner seen so far.
    pub fn snapshot(&self) -> &BTreeMap<PartnerId, PartnerRecord> {
        &self.state
    }

    pub fn get(&self, partner: &PartnerId) -> Result<&PartnerRecord, OperationError> {
        self.state.get(partner).ok_or_else(|| {
            repl_trace!(%partner, "query for unobserved partner");
            OperationError::UnknownPartnerQuery(*partner)
        })
    }

    pub fn len(&self) -> usize {
        self.state.len()
    }

    pub fn is_empty(&self) -> bool {
        self.state.is_empty()
    }

    /// Forget every partner. The next observation of any partner is a new baseline.
    pub fn reset(&mut self) {
        admin_debug!(partners = self.state.len(), "resetting partner state");
        self.state.clear();
    }
}
