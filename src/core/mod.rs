//! Core business logic - framework-agnostic change request and asset operations.
//!
//! Operations are free async functions generic over a [`store::RecordStore`], so
//! the same code runs against the in-memory store in tests and against `SQLite`
//! in the binary.

pub mod asset;
pub mod change_request;
pub mod database_store;
pub mod seed;
pub mod store;
