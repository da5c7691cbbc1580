//! HTTP client and request orchestration for the generation backend.
//!
//! Provides the REST wrapper ([`api::GenerationApi`]), the typed response
//! contract, the [`backend::GenerationBackend`] seam, the async
//! [`controller::GenerationController`] that drives the request lifecycle,
//! and the media renderer contract.

pub mod api;
pub mod backend;
pub mod controller;
pub mod events;
pub mod render;
pub mod response;
