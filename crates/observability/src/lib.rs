//! Process-wide logging setup shared by garrison binaries.

pub mod tracing;

pub use crate::tracing::LogFormat;

/// Initialize process-wide logging from the environment.
///
/// `RUST_LOG` selects the filter (default `info`), `LOG_FORMAT` selects
/// `json` (default) or `pretty`. Safe to call multiple times; subsequent calls
/// are no-ops.
pub fn init() {
    let format = std::env::var("LOG_FORMAT")
        .ok()
        .and_then(|v| LogFormat::parse(&v))
        .unwrap_or_default();

    tracing::init(format);
}
