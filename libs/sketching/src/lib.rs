#![deny(warnings)]
#![warn(unused_extern_crates)]
#![allow(non_snake_case)]
use num_enum::{IntoPrimitive, TryFromPrimitive};
use tracing_forest::printer::TestCapturePrinter;
use tracing_forest::tag::NoTag;
use tracing_forest::ForestLayer;
use tracing_subscriber::filter::{EnvFilter, LevelFilter};
use tracing_subscriber::prelude::*;

pub mod macros;

pub use {tracing, tracing_forest, tracing_subscriber};

/// Start up the logging for test mode.
pub fn test_init() {
    let filter = EnvFilter::from_default_env().add_directive(LevelFilter::TRACE.into());

    let _ = tracing_subscriber::Registry::default()
        .with(ForestLayer::new(TestCapturePrinter::new(), NoTag).with_filter(filter))
        .try_init();
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, IntoPrimitive, TryFromPrimitive)]
#[repr(u64)]
pub enum EventTag {
    AdminDebug,
    AdminError,
    AdminWarn,
    AdminInfo,
    ReplBaseline,
    ReplAccept,
    ReplViolation,
    ReplTrace,
    FixtureCleanup,
}

impl EventTag {
    pub fn pretty(self) -> &'static str {
        match self {
            EventTag::AdminDebug => "admin.debug",
            EventTag::AdminError => "admin.error",
            EventTag::AdminWarn => "admin.warn",
            EventTag::AdminInfo => "admin.info",
            EventTag::ReplBaseline => "repl.baseline",
            EventTag::ReplAccept => "repl.accept",
            EventTag::ReplViolation => "repl.violation",
            EventTag::ReplTrace => "repl.trace",
            EventTag::FixtureCleanup => "fixture.cleanup",
        }
    }

    pub fn emoji(self) -> &'static str {
        use EventTag::*;
        match self {
            AdminDebug => "🐛",
            AdminError | ReplViolation => "🚨",
            AdminWarn => "⚠️",
            AdminInfo | ReplBaseline | ReplAccept => "ℹ️",
            ReplTrace => "📍",
            FixtureCleanup => "🧹",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::EventTag;

    #[test]
    fn test_eventtag_roundtrip_id() {
        let id: u64 = EventTag::ReplViolation.into();
        assert_eq!(EventTag::try_from(id).ok(), Some(EventTag::ReplViolation));
        assert_eq!(EventTag::ReplViolation.pretty(), "repl.violation");
        assert!(EventTag::try_from(u64::MAX).is_err());
    }
}
