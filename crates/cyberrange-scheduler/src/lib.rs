//! # Adaptive Scheduler
//!
//! Allocates test budget across rounds and phases (exploration,
//! exploitation, validation) and decides when an evaluation should stop.
//! The scheduler never touches the network or the record store directly:
//! it reads a snapshot of accumulated [`cyberrange_types::TestRecord`]s and
//! returns a [`RoundPlan`] naming how many payloads to spend on each
//! technique next, or `None` when a termination condition has been met.

mod allocation;
mod plan;
mod scheduler;

pub use plan::{Phase, RoundPlan, TerminationReason};
pub use scheduler::Scheduler;
