//! Configuration types and helpers.

mod defaults;
mod launch;

//--------------------------------------------------------------------------------------------------
// Exports
//--------------------------------------------------------------------------------------------------

pub use defaults::*;
pub use launch::*;
