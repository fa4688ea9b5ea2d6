//! Data generation helpers (no retrieval: callers own I/O).

pub mod synthetic;

pub use synthetic::*;
