//! Repository implementations module.
//!
//! Currently a single backend:
//! - `local`: in-memory implementation, populated from CSV ingest at startup
//!   and used directly in tests.

pub mod local;

pub use local::LocalRepository;
