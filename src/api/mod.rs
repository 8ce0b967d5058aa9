// =============================================================================
// API Module
// =============================================================================
//
// Read-only HTTP surface over the latest scan pass.

pub mod rest;

pub use rest::router;
