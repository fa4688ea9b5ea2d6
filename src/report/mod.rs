//! Result reporting: ordinal-date conversion and formatted output.

pub mod dates;
pub mod format;

pub use dates::*;
pub use format::*;
