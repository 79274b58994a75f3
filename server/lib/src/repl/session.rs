//! A validation session drives a pair of replicas through a replication cycle and feeds
//! the partner state of the source replica into a [PartnerStateTracker] after each step.
//!
//! Any directory objects the session creates are removed again when it is dropped, no
//! matter how the session ended.

use std::collections::BTreeSet;

use crate::prelude::*;

/// Access to a single replica of the directory. The tracker never talks to a directory
/// itself, this is the seam where a real directory client is plugged in.
pub trait Replica {
    fn name(&self) -> &str;

    /// The replication state of every partner this replica notifies (its `repsTo`).
    /// This must always be the complete set, never a delta.
    fn partner_states(&mut self) -> Result<Vec<PartnerObservation>, OperationError>;

    /// Create a container object under the naming context, returning its guid.
    fn create_container(&mut self, rdn: &str) -> Result<Uuid, OperationError>;

    /// `Ok` if the object is visible on this replica, `NoMatchingEntries` if not.
    fn search(&mut self, uuid: Uuid) -> Result<(), OperationError>;

    /// Delete an object and everything below it. `NoMatchingEntries` if it is already gone.
    fn delete(&mut self, uuid: Uuid) -> Result<(), OperationError>;

    fn set_inbound_replication(&mut self, enabled: bool) -> Result<(), OperationError>;
}

pub struct ValidationSession<R: Replica> {
    source: R,
    target: R,
    tracker: PartnerStateTracker,
    settle_interval: Duration,
    fixture_rdn: String,
    fixtures: BTreeSet<Uuid>,
}

impl<R: Replica> ValidationSession<R> {
    pub fn new(source: R, target: R, config: &TrackerConfig) -> Self {
        ValidationSession {
            source,
            target,
            tracker: PartnerStateTracker::new(config.failure_policy),
            settle_interval: config.get_settle_interval(),
            fixture_rdn: config.get_fixture_rdn().to_string(),
            fixtures: BTreeSet::default(),
        }
    }

    pub fn tracker(&self) -> &PartnerStateTracker {
        &self.tracker
    }

    /// Read the source's partner state and check that it moved forward since the last
    /// call. Under [FailurePolicy::FailFast] a violation is returned as an error,
    /// otherwise the caller inspects the report.
    #[instrument(level = "debug", skip_all, fields(source = %self.source.name()))]
    pub fn validate_times(&mut self) -> Result<ObservationReport, OperationError> {
        let snapshot = self.source.partner_states().map_err(|e| {
            admin_error!(?e, "unable to read partner state");
            e
        })?;

        repl_trace!(partners = snapshot.len(), "read partner state");
        let report = self.tracker.observe(snapshot);

        if self.tracker.policy() == FailurePolicy::FailFast {
            report.clone().into_result()?;
        }
        Ok(report)
    }

    /// Create a container on the source. It is registered for removal when the
    /// session ends.
    pub fn create_fixture(&mut self) -> Result<Uuid, OperationError> {
        let uuid = self.source.create_container(&self.fixture_rdn)?;
        admin_info!(%uuid, rdn = %self.fixture_rdn, source = %self.source.name(), "created fixture");
        self.fixtures.insert(uuid);
        Ok(uuid)
    }

    /// Check the object reached the target replica.
    pub fn verify_propagated(&mut self, uuid: Uuid) -> Result<(), OperationError> {
        match self.target.search(uuid) {
            Ok(()) => Ok(()),
            Err(OperationError::NoMatchingEntries) => {
                admin_error!(%uuid, target = %self.target.name(), "object did not replicate");
                Err(OperationError::ReplPropagationFailure(uuid))
            }
            Err(e) => Err(e),
        }
    }

    pub fn delete_fixture(&mut self, uuid: Uuid) -> Result<(), OperationError> {
        self.source.delete(uuid)?;
        self.fixtures.remove(&uuid);
        Ok(())
    }

    /// Wait for replication to settle after a write.
    pub async fn settle(&self) {
        tokio::time::sleep(self.settle_interval).await
    }

    /// Create an object on the source, confirm it replicated, delete it again, checking
    /// the partner times advanced at each step. Returns the report of each check.
    #[instrument(level = "info", skip_all)]
    pub async fn run_reps_to_check(&mut self) -> Result<Vec<ObservationReport>, OperationError> {
        let mut reports = Vec::with_capacity(3);

        reports.push(self.validate_times()?);

        let uuid = self.create_fixture()?;
        self.settle().await;
        self.verify_propagated(uuid)?;
        reports.push(self.validate_times()?);

        self.delete_fixture(uuid)?;
        self.settle().await;
        reports.push(self.validate_times()?);

        Ok(reports)
    }
}

impl<R: Replica> Drop for ValidationSession<R> {
    fn drop(&mut self) {
        for replica in [&mut self.source, &mut self.target] {
            if let Err(e) = replica.set_inbound_replication(true) {
                admin_warn!(?e, replica = %replica.name(), "unable to re-enable inbound replication");
            }
        }

        for uuid in std::mem::take(&mut self.fixtures) {
            match self.target.delete(uuid) {
                Ok(()) => fixture_cleanup!(%uuid, "removed fixture"),
                // Already gone, possibly by replication of an earlier delete.
                Err(OperationError::NoMatchingEntries) => {
                    fixture_cleanup!(%uuid, "fixture already removed")
                }
                Err(e) => admin_error!(?e, %uuid, "unable to remove fixture"),
            }
        }
    }
}
