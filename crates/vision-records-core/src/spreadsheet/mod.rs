//! Tabular codec for bulk import/export.
//!
//! Exports emit CSV text; imports accept CSV as well as Excel workbooks
//! (first sheet). Both directions share one fixed column schema.

mod export;
mod import;
mod schema;

pub use export::*;
pub use import::*;
pub use schema::*;
