//! Running independent jobs on a bounded pool, and printing from it.
pub mod printer;
pub mod scheduler;

pub use crate::parallel::printer::{Console, Printer};
pub use crate::parallel::scheduler::{Job, Scheduler};
