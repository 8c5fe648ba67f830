//! The launch driver that prepares the system and execs into the delegate.

mod launcher;

//--------------------------------------------------------------------------------------------------
// Exports
//--------------------------------------------------------------------------------------------------

pub use launcher::*;
