//! Shared constants used across Sharuco crates.

/// Default API port for Sharuco.
pub const DEFAULT_PORT: u16 = 38512;

/// Default maximum byte length of submitted `code`, before linearization.
pub const DEFAULT_MAX_SNIPPET_SIZE: usize = 1024 * 1024;

/// Request header carrying the acting user's stable handle.
pub const USER_HEADER: &str = "x-sharuco-user";

/// File name for the redb database within the configured DB directory.
pub const REDB_FILE_NAME: &str = "data.redb";
