//! Because consistency is great!

/// Seconds to wait after a directory write before partner state is re-read.
pub const DEFAULT_SETTLE_INTERVAL: u64 = 10;

/// The RDN of the container created to provoke a replication cycle.
pub const DEFAULT_FIXTURE_RDN: &str = "OU=ReplStateTest";
