#[macro_export]
macro_rules! tagged_event {
    ($level:ident, $event_tag:path, $($arg:tt)*) => {{
        fn assert_eventtag(_: &$crate::EventTag) {}
        assert_eventtag(&$event_tag);
        let event_tag_id: u64 = $event_tag.into();
        $crate::tracing::event!($crate::tracing::Level::$level, event_tag_id, $($arg)*)
    }}
}

#[macro_export]
macro_rules! admin_debug {
    ($($arg:tt)*) => { $crate::tagged_event!(DEBUG, $crate::EventTag::AdminDebug, $($arg)*) }
}

#[macro_export]
macro_rules! admin_error {
    ($($arg:tt)*) => { $crate::tagged_event!(ERROR, $crate::EventTag::AdminError, $($arg)*) }
}

#[macro_export]
macro_rules! admin_warn {
    ($($arg:tt)*) => { $crate::tagged_event!(WARN, $crate::EventTag::AdminWarn, $($arg)*) }
}

#[macro_export]
macro_rules! admin_info {
    ($($arg:tt)*) => { $crate::tagged_event!(INFO, $crate::EventTag::AdminInfo, $($arg)*) }
}

#[macro_export]
macro_rules! repl_baseline {
    ($($arg:tt)*) => { $crate::tagged_event!(INFO, $crate::EventTag::ReplBaseline, $($arg)*) }
}

#[macro_export]
macro_rules! repl_accept {
    ($($arg:tt)*) => { $crate::tagged_event!(DEBUG, $crate::EventTag::ReplAccept, $($arg)*) }
}

#[macro_export]
macro_rules! repl_violation {
    ($($arg:tt)*) => { $crate::tagged_event!(WARN, $crate::EventTag::ReplViolation, $($arg)*) }
}

#[macro_export]
macro_rules! repl_trace {
    ($($arg:tt)*) => { $crate::tagged_event!(TRACE, $crate::EventTag::ReplTrace, $($arg)*) }
}

#[macro_export]
macro_rules! fixture_cleanup {
    ($($arg:tt)*) => { $crate::tagged_event!(INFO, $crate::EventTag::FixtureCleanup, $($arg)*) }
}
