/// Logs at `Trace` level through a [`Logger`](crate::Logger) handle.
///
/// ```
/// # use burstlog::{trace, Logger, NullSink};
/// # let logger = Logger::new(NullSink).unwrap();
/// trace!(logger, "polling {} descriptors", 3);
/// ```
#[macro_export]
macro_rules! trace {
    ($logger:expr, $($args:tt)+) => {
        $logger.trace(format_args!($($args)+))
    };
}

/// Logs at `Debug` level through a [`Logger`](crate::Logger) handle.
#[macro_export]
macro_rules! debug {
    ($logger:expr, $($args:tt)+) => {
        $logger.debug(format_args!($($args)+))
    };
}

/// Logs at `Info` level through a [`Logger`](crate::Logger) handle.
///
/// ```
/// # use burstlog::{info, Logger, NullSink};
/// # let logger = Logger::new(NullSink).unwrap();
/// info!(logger, "listener up on port {}", 8080);
/// ```
#[macro_export]
macro_rules! info {
    ($logger:expr, $($args:tt)+) => {
        $logger.info(format_args!($($args)+))
    };
}

/// Logs at `Warn` level through a [`Logger`](crate::Logger) handle.
#[macro_export]
macro_rules! warn {
    ($logger:expr, $($args:tt)+) => {
        $logger.warn(format_args!($($args)+))
    };
}

/// Logs at `Error` level through a [`Logger`](crate::Logger) handle.
#[macro_export]
macro_rules! error {
    ($logger:expr, $($args:tt)+) => {
        $logger.error(format_args!($($args)+))
    };
}

/// Logs at `Critical` level through a [`Logger`](crate::Logger) handle.
#[macro_export]
macro_rules! critical {
    ($logger:expr, $($args:tt)+) => {
        $logger.critical(format_args!($($args)+))
    };
}
