#![doc = "Single-threaded cooperative event loop for the clock face and timer."]

pub mod driver;
pub mod scheduler;

pub use driver::*;
pub use scheduler::*;
