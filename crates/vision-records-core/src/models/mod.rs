//! Domain models for the vision-records system.

mod record;

pub use record::*;
