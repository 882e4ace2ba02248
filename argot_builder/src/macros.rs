// Emits a `tracing::debug!` event under the 'tracing_debug' feature, and nothing otherwise.
macro_rules! debug {
    ($($arg:tt)*) => {
        #[cfg(feature = "tracing_debug")]
        {
            tracing::debug!($($arg)*);
        }
    };
}
