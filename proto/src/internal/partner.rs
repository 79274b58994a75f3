use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A replication timestamp. The unit and epoch belong to whichever directory
/// accessor produced the value, the tracker only relies on ordering.
pub type ReplTimestamp = u64;

/// Identifies a remote replication partner, ie the source DSA object guid
/// found in a `repsTo` record.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(transparent)]
pub struct PartnerId(Uuid);

impl PartnerId {
    pub const fn new(u: Uuid) -> Self {
        PartnerId(u)
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl From<Uuid> for PartnerId {
    fn from(u: Uuid) -> Self {
        PartnerId(u)
    }
}

impl fmt::Display for PartnerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.as_hyphenated().fmt(f)
    }
}

impl FromStr for PartnerId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        // Directory tools often hand these over wrapped as `{guid}`.
        let s = s.trim().trim_start_matches('{').trim_end_matches('}');
        Uuid::parse_str(s).map(PartnerId)
    }
}

/// One partner's replication times as read from the directory at a single instant.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct PartnerObservation {
    pub partner: PartnerId,
    pub last_attempt: ReplTimestamp,
    pub last_success: ReplTimestamp,
}

impl PartnerObservation {
    pub fn new(
        partner: PartnerId,
        last_attempt: ReplTimestamp,
        last_success: ReplTimestamp,
    ) -> Self {
        PartnerObservation {
            partner,
            last_attempt,
            last_success,
        }
    }
}

impl From<(PartnerId, ReplTimestamp, ReplTimestamp)> for PartnerObservation {
    fn from(
        (partner, last_attempt, last_success): (PartnerId, ReplTimestamp, ReplTimestamp),
    ) -> Self {
        PartnerObservation::new(partner, last_attempt, last_success)
    }
}

/// The most recently accepted replication times for a partner.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PartnerRecord {
    pub last_attempt: ReplTimestamp,
    pub last_success: ReplTimestamp,
}

impl From<&PartnerObservation> for PartnerRecord {
    fn from(obs: &PartnerObservation) -> Self {
        PartnerRecord {
            last_attempt: obs.last_attempt,
            last_success: obs.last_success,
        }
    }
}
