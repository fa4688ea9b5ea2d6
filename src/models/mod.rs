//! LPPLS model function and the linear subsystem built on it.
//!
//! Everything here is a small, pure function so the search code can stay
//! generic over where its candidate parameters come from.

pub mod model;

pub use model::*;
