//! Environment construction for the delegate process.

mod process;
mod search_path;

//--------------------------------------------------------------------------------------------------
// Exports
//--------------------------------------------------------------------------------------------------

pub use process::*;
pub use search_path::*;
