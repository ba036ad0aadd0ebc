//! Application layer
//!
//! Use cases that turn raw caller input into domain calls on the
//! authentication service and shape the results for the transport layer.

pub mod auth;
