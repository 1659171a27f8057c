//! Logging macros

#[macro_export]
macro_rules! trace {
    ($logger:expr, target: $target:expr, $($arg:tt)*) => {
        $crate::log!($logger, target: $target, $crate::Level::Trace, $($arg)*)
    };
    ($logger:expr, $($arg:tt)*) => {
        $crate::log!($logger, $crate::Level::Trace, $($arg)*)
    };
}

#[macro_export]
macro_rules! debug {
    ($logger:expr, target: $target:expr, $($arg:tt)*) => {
        $crate::log!($logger, target: $target, $crate::Level::Debug, $($arg)*)
    };
    ($logger:expr, $($arg:tt)*) => {
        $crate::log!($logger, $crate::Level::Debug, $($arg)*)
    };
}

#[macro_export]
macro_rules! info {
    ($logger:expr, target: $target:expr, $($arg:tt)*) => {
        $crate::log!($logger, target: $target, $crate::Level::Info, $($arg)*)
    };
    ($logger:expr, $($arg:tt)*) => {
        $crate::log!($logger, $crate::Level::Info, $($arg)*)
    };
}

#[macro_export]
macro_rules! warn {
    ($logger:expr, target: $target:expr, $($arg:tt)*) => {
        $crate::log!($logger, target: $target, $crate::Level::Warn, $($arg)*)
    };
    ($logger:expr, $($arg:tt)*) => {
        $crate::log!($logger, $crate::Level::Warn, $($arg)*)
    };
}

#[macro_export]
macro_rules! error {
    ($logger:expr, target: $target:expr, $($arg:tt)*) => {
        $crate::log!($logger, target: $target, $crate::Level::Error, $($arg)*)
    };
    ($logger:expr, $($arg:tt)*) => {
        $crate::log!($logger, $crate::Level::Error, $($arg)*)
    };
}

/// Shared implementation: the message is only formatted when the level is enabled
///
/// Without an explicit `target:` the call site's module path is used.
#[macro_export]
macro_rules! log {
    ($logger:expr, target: $target:expr, $level:expr, $($arg:tt)*) => {{
        if $logger.is_enabled($level) {
            let message = ::std::format!($($arg)*);
            $logger.log($level, $target, message);
        }
    }};
    ($logger:expr, $level:expr, $($arg:tt)*) => {{
        if $logger.is_enabled($level) {
            let message = ::std::format!($($arg)*);
            $logger.log($level, module_path!(), message);
        }
    }};
}
