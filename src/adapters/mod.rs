//! Adapters layer
//!
//! Translation between transport payloads and application use cases.

pub mod http;
