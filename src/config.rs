//! Repository configuration
//!
//! Everything that used to be an implicit process-wide constant is carried
//! here and threaded into `Repository::new` by the binary: the name of the
//! hidden state directory and the commit clock.

use crate::artifacts::objects::commit::display_offset;
use anyhow::Context;

/// Name of the hidden directory holding all persisted repository state.
pub const DEFAULT_DIR_NAME: &str = ".jot";

/// Environment variable overriding the commit timestamp (RFC 2822),
/// used to pin commit ids in tests.
pub const AUTHOR_DATE_ENV: &str = "JOT_AUTHOR_DATE";

/// Configuration threaded into [`crate::areas::repository::Repository`].
#[derive(Debug, Clone)]
pub struct Config {
    /// Directory name the repository state lives under (`.jot`)
    pub dir_name: String,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            dir_name: String::from(DEFAULT_DIR_NAME),
        }
    }
}

/// The timestamp a commit created right now should carry.
///
/// Reads [`AUTHOR_DATE_ENV`] when set, otherwise the current wall-clock
/// time rendered in the repository's fixed display offset.
pub fn author_timestamp() -> anyhow::Result<chrono::DateTime<chrono::FixedOffset>> {
    if let Ok(raw) = std::env::var(AUTHOR_DATE_ENV) {
        return chrono::DateTime::parse_from_rfc2822(&raw)
            .with_context(|| format!("Invalid {AUTHOR_DATE_ENV} value: {raw}"));
    }

    Ok(chrono::Utc::now().with_timezone(&display_offset()?))
}
