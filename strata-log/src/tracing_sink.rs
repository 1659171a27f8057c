//! Bridge from `Logger` records to `tracing` events

use crate::logger::LogSink;
use crate::record::{Level, Record};

/// `tracing` needs the target at the call site, so each known target gets its own arm.
macro_rules! forward {
    ($target:literal, $record:expr) => {{
        let record = $record;
        let origin = record.target;
        let message = record.message.as_str();
        match record.level {
            Level::Trace => tracing::trace!(target: $target, origin, "{}", message),
            Level::Debug => tracing::debug!(target: $target, origin, "{}", message),
            Level::Info => tracing::info!(target: $target, origin, "{}", message),
            Level::Warn => tracing::warn!(target: $target, origin, "{}", message),
            Level::Error => tracing::error!(target: $target, origin, "{}", message),
        }
    }};
}

/// Re-emits every record as a `tracing` event
///
/// Records logged under one of the compiler's phase targets (`strata::parser`,
/// `strata::resolver`, ...) keep that target so a `Targets` filter can select
/// phases. Anything else, such as call-site module paths, lands under `strata`
/// with the original target in the `origin` field.
pub struct TracingSink;

impl LogSink for TracingSink {
    fn write(&self, record: &Record) {
        match record.target {
            "strata::driver" => forward!("strata::driver", record),
            "strata::parser" => forward!("strata::parser", record),
            "strata::binder" => forward!("strata::binder", record),
            "strata::fault_in" => forward!("strata::fault_in", record),
            "strata::verifier" => forward!("strata::verifier", record),
            "strata::resolver" => forward!("strata::resolver", record),
            "strata::flow" => forward!("strata::flow", record),
            _ => forward!("strata", record),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tracing_sink_without_subscriber() {
        // No subscriber installed: events are dropped without panicking.
        TracingSink.write(&Record::new(Level::Warn, "strata::driver", "bridged"));
        TracingSink.write(&Record::new(Level::Info, "strata_core::lookup", "fallback"));
    }
}
