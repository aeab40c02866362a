//! CI provider abstraction.
//!
//! A `Provider` knows how to fetch the raw step/action document of a job and
//! the raw log records behind an action's output URL. Turning those into the
//! typed hierarchy is the job of `crate::engine`.

pub mod circleci;
pub mod mock;
pub mod traits;

// Re-export key types
pub use circleci::{CircleCiClient, CircleCiConfig, DEFAULT_API_BASE_URL, TOKEN_HEADER};
pub use mock::{MockConfig, MockProvider};
pub use traits::{Provider, RawJobDocument};
