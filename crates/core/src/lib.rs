//! Domain logic for the generation runner.
//!
//! Everything in this crate is pure: no network, no async, no file I/O.
//! The HTTP client and the async controller live in `runner-client`.

pub mod error;
pub mod generation;
pub mod lifecycle;
pub mod media;
pub mod reference;
pub mod snapshot;
pub mod workflow;
