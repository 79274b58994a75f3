//! An in memory pair of replicas for exercising a [ValidationSession] without a directory.
//!
//! Every write on one side runs a replication cycle towards the other side at once. The
//! `repsTo` times of each partner advance by a fixed step per cycle unless the partner
//! has been stalled or rewound.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::{Arc, Mutex, MutexGuard};

use crate::prelude::*;

const CYCLE_STEP: ReplTimestamp = 10;
const INITIAL_TS: ReplTimestamp = 100;

pub const SOURCE: usize = 0;
pub const TARGET: usize = 1;

#[derive(Debug)]
struct DirectoryState {
    clock: ReplTimestamp,
    objects: [BTreeSet<Uuid>; 2],
    created: Vec<Uuid>,
    reps_to: [BTreeMap<PartnerId, PartnerRecord>; 2],
    inbound: [bool; 2],
    stalled: BTreeSet<PartnerId>,
    unavailable: bool,
}

impl DirectoryState {
    fn replicate_from(&mut self, side: usize) {
        let other = 1 - side;
        self.clock += CYCLE_STEP;
        let delivered = self.inbound[other];

        if delivered {
            self.objects[other] = self.objects[side].clone();
        }

        for (partner, record) in self.reps_to[side].iter_mut() {
            if self.stalled.contains(partner) {
                continue;
            }
            record.last_attempt = self.clock;
            if delivered {
                record.last_success = self.clock;
            }
        }
    }

    fn check_available(&self) -> Result<(), OperationError> {
        if self.unavailable {
            Err(OperationError::DirectoryUnavailable(
                "replica is not responding".to_string(),
            ))
        } else {
            Ok(())
        }
    }
}

/// A handle to the shared state, for setting up faults and inspecting the outcome.
#[derive(Clone, Debug)]
pub struct MemoryDirectory {
    inner: Arc<Mutex<DirectoryState>>,
}

#[allow(clippy::expect_used)]
impl MemoryDirectory {
    /// The source replica notifies each of `partners`. The target notifies nobody.
    pub fn new(partners: &[PartnerId]) -> Self {
        let reps_to = partners
            .iter()
            .map(|p| {
                (
                    *p,
                    PartnerRecord {
                        last_attempt: INITIAL_TS,
                        last_success: INITIAL_TS,
                    },
                )
            })
            .collect();

        MemoryDirectory {
            inner: Arc::new(Mutex::new(DirectoryState {
                clock: INITIAL_TS,
                objects: Default::default(),
                created: Vec::new(),
                reps_to: [reps_to, BTreeMap::default()],
                inbound: [true, true],
                stalled: BTreeSet::default(),
                unavailable: false,
            })),
        }
    }

    fn lock(&self) -> MutexGuard<'_, DirectoryState> {
        self.inner.lock().expect("directory state poisoned")
    }

    pub fn replica_pair(&self) -> (MemoryReplica, MemoryReplica) {
        (
            MemoryReplica {
                name: "dc1".to_string(),
                side: SOURCE,
                dir: self.clone(),
            },
            MemoryReplica {
                name: "dc2".to_string(),
                side: TARGET,
                dir: self.clone(),
            },
        )
    }

    /// The partner's times stop advancing.
    pub fn stall_partner(&self, partner: PartnerId) {
        self.lock().stalled.insert(partner);
    }

    /// The partner's times drop back to zero, as if its record was recreated.
    pub fn rewind_partner(&self, partner: PartnerId) {
        if let Some(record) = self.lock().reps_to[SOURCE].get_mut(&partner) {
            *record = PartnerRecord::default();
        }
    }

    pub fn set_unavailable(&self, unavailable: bool) {
        self.lock().unavailable = unavailable;
    }

    pub fn contains(&self, side: usize, uuid: Uuid) -> bool {
        self.lock().objects[side].contains(&uuid)
    }

    /// Every object created on either side, in creation order, deleted or not.
    pub fn created_objects(&self) -> Vec<Uuid> {
        self.lock().created.clone()
    }

    pub fn inbound_enabled(&self, side: usize) -> bool {
        self.lock().inbound[side]
    }

    pub fn reps_to(&self, side: usize) -> BTreeMap<PartnerId, PartnerRecord> {
        self.lock().reps_to[side].clone()
    }
}

#[derive(Debug)]
pub struct MemoryReplica {
    name: String,
    side: usize,
    dir: MemoryDirectory,
}

impl Replica for MemoryReplica {
    fn name(&self) -> &str {
        &self.name
    }

    fn partner_states(&mut self) -> Result<Vec<PartnerObservation>, OperationError> {
        let state = self.dir.lock();
        state.check_available()?;
        Ok(state.reps_to[self.side]
            .iter()
            .map(|(p, r)| PartnerObservation::new(*p, r.last_attempt, r.last_success))
            .collect())
    }

    fn create_container(&mut self, _rdn: &str) -> Result<Uuid, OperationError> {
        let mut state = self.dir.lock();
        state.check_available()?;
        let uuid = Uuid::new_v4();
        state.objects[self.side].insert(uuid);
        state.created.push(uuid);
        state.replicate_from(self.side);
        Ok(uuid)
    }

    fn search(&mut self, uuid: Uuid) -> Result<(), OperationError> {
        let state = self.dir.lock();
        state.check_available()?;
        if state.objects[self.side].contains(&uuid) {
            Ok(())
        } else {
            Err(OperationError::NoMatchingEntries)
        }
    }

    fn delete(&mut self, uuid: Uuid) -> Result<(), OperationError> {
        let mut state = self.dir.lock();
        state.check_available()?;
        if !state.objects[self.side].remove(&uuid) {
            return Err(OperationError::NoMatchingEntries);
        }
        state.replicate_from(self.side);
        Ok(())
    }

    fn set_inbound_replication(&mut self, enabled: bool) -> Result<(), OperationError> {
        self.dir.lock().inbound[self.side] = enabled;
        Ok(())
    }
}

/// Build a session over a fresh in memory replica pair. Settling is instant.
pub fn setup_pair_test(
    partners: &[PartnerId],
    policy: FailurePolicy,
) -> (MemoryDirectory, ValidationSession<MemoryReplica>) {
    sketching::test_init();

    let dir = MemoryDirectory::new(partners);
    let (source, target) = dir.replica_pair();
    let session = ValidationSession::new(source, target, &TrackerConfig::new_for_test(policy));
    (dir, session)
}
