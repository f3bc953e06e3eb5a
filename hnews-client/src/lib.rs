//! HTTP client for the Hacker News Firebase API.
//!
//! Implements [`hnews_core::StorySource`] over two endpoint shapes: the
//! per-type id listing and the per-id item lookup.

mod client;

pub use client::{ClientConfig, HnClient};
