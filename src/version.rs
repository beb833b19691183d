//! Build-time version information

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub const APP_NAME: &str = env!("CARGO_PKG_NAME");

/// Name and version, for the startup log line
pub fn full_version() -> String {
    format!("{} v{}", APP_NAME, VERSION)
}
