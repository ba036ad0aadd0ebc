//! Identity core of the HomeStorage backend.
//!
//! Registers accounts, checks credentials, issues signed access tokens and
//! opaque refresh tokens, and revokes refresh tokens on logout.

pub mod adapters;
pub mod application;
pub mod domain;
pub mod infrastructure;
