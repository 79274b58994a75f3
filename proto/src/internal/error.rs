use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::partner::{PartnerId, ReplTimestamp};

/* ===== errors ===== */

/// A partner's replication times failed to move forward between two observations.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum MonotonicityError {
    NonMonotonicAttempt {
        prior: ReplTimestamp,
        observed: ReplTimestamp,
    },
    NonMonotonicSuccess {
        prior: ReplTimestamp,
        observed: ReplTimestamp,
    },
}

impl Display for MonotonicityError {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        match self {
            MonotonicityError::NonMonotonicAttempt { prior, observed } => write!(
                f,
                "last attempt did not advance (prior {prior}, observed {observed})"
            ),
            MonotonicityError::NonMonotonicSuccess { prior, observed } => write!(
                f,
                "last success did not advance (prior {prior}, observed {observed})"
            ),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "lowercase")]
pub enum OperationError {
    // Tracker errors.
    UnknownPartnerQuery(PartnerId),
    ReplNonMonotonic(Vec<(PartnerId, MonotonicityError)>),
    // Directory accessor errors.
    NoMatchingEntries,
    ReplPropagationFailure(Uuid),
    DirectoryUnavailable(String),
    // Configuration.
    InvalidConfiguration(String),
}

impl PartialEq for OperationError {
    fn eq(&self, other: &Self) -> bool {
        // Only the kind matters when comparing, this is mostly for tests.
        std::mem::discriminant(self) == std::mem::discriminant(other)
    }
}

impl Display for OperationError {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        let mut output = format!("{:?}", self)
            .split(['(', ' '])
            .next()
            .unwrap_or("")
            .to_string();

        if let Some(msg) = self.message() {
            output += &format!(" - {}", msg);
        };
        f.write_str(&output)
    }
}

impl std::error::Error for OperationError {}

impl OperationError {
    /// Return the message associated with the error if there is one.
    pub fn message(&self) -> Option<String> {
        match self {
            Self::UnknownPartnerQuery(p) => Some(format!("Partner {} has never been observed.", p)),
            Self::ReplNonMonotonic(violations) => Some(
                violations
                    .iter()
                    .map(|(p, e)| format!("{}: {}", p, e))
                    .collect::<Vec<_>>()
                    .join("; "),
            ),
            Self::NoMatchingEntries => None,
            Self::ReplPropagationFailure(u) => Some(format!(
                "Object {} was not visible on the target replica after settling.",
                u
            )),
            Self::DirectoryUnavailable(msg) => Some(msg.clone()),
            Self::InvalidConfiguration(msg) => Some(msg.clone()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_operationerror_as_nice_string() {
        assert_eq!(
            OperationError::NoMatchingEntries.to_string(),
            "NoMatchingEntries".to_string()
        );

        let p = PartnerId::new(uuid::uuid!("00000000-0000-0000-0000-000000000001"));
        assert_eq!(
            OperationError::UnknownPartnerQuery(p).to_string(),
            "UnknownPartnerQuery - Partner 00000000-0000-0000-0000-000000000001 has never been observed."
        );

        let err = OperationError::ReplNonMonotonic(vec![(
            p,
            MonotonicityError::NonMonotonicAttempt {
                prior: 150,
                observed: 150,
            },
        )]);
        assert_eq!(
            err.to_string(),
            "ReplNonMonotonic - 00000000-0000-0000-0000-000000000001: last attempt did not advance (prior 150, observed 150)"
        );
    }

    #[test]
    fn test_operationerror_eq_by_kind() {
        assert_eq!(
            OperationError::DirectoryUnavailable("a".into()),
            OperationError::DirectoryUnavailable("b".into())
        );
        assert_ne!(
            OperationError::DirectoryUnavailable("a".into()),
            OperationError::NoMatchingEntries
        );
    }
}
