//! # hnews core
//!
//! Core types, errors, and traits shared by every hnews crate.
//!
//! - **Types**: story types, raw upstream items, normalized stories
//! - **Errors**: the single error enum surfaced by the fetch path
//! - **Constants**: cache TTL, per-type story cap, upstream URLs
//! - **Traits**: the upstream source interface the fetcher is generic over
//!
//! ## Example
//!
//! ```rust
//! use hnews_core::{StoryType, HnError};
//!
//! let kind: StoryType = "show".parse().unwrap();
//! assert_eq!(kind.endpoint(), "showstories");
//!
//! let err = "jobs".parse::<StoryType>().unwrap_err();
//! assert!(matches!(err, HnError::InvalidStoryType(_)));
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms, clippy::all)]

pub mod constants;
pub mod error;
pub mod traits;
pub mod types;

// Re-export commonly used items at crate root
pub use constants::*;
pub use error::{HnError, Result};
pub use traits::*;
pub use types::*;
