//! Repository layer for runtime records.
//!
//! The analytics log is append-only: the commentary coordinator writes one
//! entry per narrative request and nothing reads it back during combat.
//! Static combat content lives in `combat-content`, not here.

mod error;
mod file;
mod memory;
mod traits;
mod types;

pub use error::{RepositoryError, Result};
pub use file::FileAnalyticsLog;
pub use memory::InMemoryAnalyticsLog;
pub use traits::AnalyticsRepository;
pub use types::{AnalyticsEntry, RequestOutcome};
