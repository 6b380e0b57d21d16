//! Core business logic, independent of the HTTP transport.
//!
//! Everything here operates on entities and claims; nothing knows about
//! routes, extractors, or response envelopes. The HTTP layer is a thin
//! adapter over these functions, and the tests exercise them directly.

/// Authorization gate for request-targeted operations
pub mod access;
/// Audit trail recording
pub mod audit;
/// Password hashing, token issuing and verification, login
pub mod auth;
/// Yearly budget ledger operations
pub mod budget;
/// Funding request lifecycle and settlement
pub mod request;
/// Payment history queries
pub mod transaction;
/// User account lookups and creation
pub mod user;
