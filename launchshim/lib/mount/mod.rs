//! Mount table inspection and tmpfs remounting.

mod table;
mod writable;

//--------------------------------------------------------------------------------------------------
// Exports
//--------------------------------------------------------------------------------------------------

pub use table::*;
pub use writable::*;
