//! The replication partner state library. This tracks, per replication partner, when
//! replication was last attempted and last succeeded, and asserts that these times
//! only ever move forward between replication cycles.

#![deny(warnings)]
#![warn(unused_extern_crates)]
// Enable some groups of clippy lints.
#![deny(clippy::suspicious)]
#![deny(clippy::perf)]
// Specific lints to enforce.
#![deny(clippy::todo)]
#![deny(clippy::unimplemented)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]
#![deny(clippy::await_holding_lock)]
#![deny(clippy::needless_pass_by_value)]
#![deny(clippy::trivially_copy_pass_by_ref)]
#![deny(clippy::manual_let_else)]

#[macro_use]
extern crate tracing;

pub mod config;
pub mod repl;
#[cfg(any(test, feature = "test"))]
pub mod testkit;

/// A prelude of imports that should be imported by all other modules to
/// help make imports cleaner.
pub mod prelude {
    pub use repstate_proto::constants::*;
    pub use repstate_proto::internal::{
        MonotonicityError, OperationError, PartnerId, PartnerObservation, PartnerRecord,
        ReplTimestamp,
    };
    pub use sketching::{
        admin_debug, admin_error, admin_info, admin_warn, fixture_cleanup, repl_accept,
        repl_baseline, repl_trace, repl_violation, tagged_event, EventTag,
    };
    pub use std::time::Duration;
    pub use uuid::{uuid, Uuid};

    pub use crate::config::{FailurePolicy, TrackerConfig};
    pub use crate::repl::report::{ObservationReport, PartnerVerdict, Verdict};
    pub use crate::repl::session::{Replica, ValidationSession};
    pub use crate::repl::tracker::PartnerStateTracker;
}
