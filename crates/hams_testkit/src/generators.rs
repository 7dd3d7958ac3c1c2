//! Property-based test generators using proptest.

use crate::fixtures::RecordFields;
use hams_abi::{Level, LevelFilter};
use proptest::prelude::*;

/// Strategy for generating severity levels.
pub fn level_strategy() -> impl Strategy<Value = Level> {
    prop::sample::select(Level::ALL.to_vec())
}

/// Strategy for generating level filters, `Off` included.
pub fn level_filter_strategy() -> impl Strategy<Value = LevelFilter> {
    prop::sample::select(vec![
        LevelFilter::Off,
        LevelFilter::Error,
        LevelFilter::Warn,
        LevelFilter::Info,
        LevelFilter::Debug,
        LevelFilter::Trace,
    ])
}

/// Strategy for generating arbitrary UTF-8 text, empty included.
pub fn text_strategy() -> impl Strategy<Value = String> {
    any::<String>()
}

/// Strategy for generating target names as `tracing` would produce them.
pub fn target_strategy() -> impl Strategy<Value = String> {
    prop::string::string_regex("[a-z_][a-z0-9_]{0,15}(::[a-z_][a-z0-9_]{0,15}){0,3}")
        .expect("Invalid regex")
}

/// Strategy for generating valid source line numbers.
pub fn line_strategy() -> impl Strategy<Value = Option<u32>> {
    prop::option::of(1..=u32::MAX)
}

/// Strategy for generating complete records.
pub fn record_strategy() -> impl Strategy<Value = RecordFields> {
    (
        level_strategy(),
        target_strategy(),
        text_strategy(),
        prop::option::of(target_strategy()),
        prop::option::of(text_strategy()),
        line_strategy(),
    )
        .prop_map(
            |(level, target, message, module_path, file, line)| RecordFields {
                level,
                target,
                message,
                module_path,
                file,
                line,
            },
        )
}
