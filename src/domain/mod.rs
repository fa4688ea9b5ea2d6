//! Domain types used throughout the pipeline.
//!
//! This module defines:
//!
//! - the normalized observation type (`Observation`)
//! - the parameter vector and its derived quantities (`LpplsParams`)
//! - fit configuration (`FitOptions`, `SearchBounds`)
//! - fit outputs (`FitResult`, `FitQuality`)
//! - the post-fit bubble classification (`QualifyingFilter`)

pub mod types;

pub use types::*;
