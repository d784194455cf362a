//! Join barrier for callback-style asynchronous operations.
//!
//! A [`Gate`] hands out one [`Latch`] per operation and notifies once, with every result,
//! when all of them have completed, or with the first error when it is fail-fast.

mod call_site;
mod completion_args;
mod config;
mod config_option;
mod gate;
mod gate_error;
mod gate_state;
mod latch;
mod mapping;
mod notifier;
mod slot;


pub use self::{
  call_site::*, completion_args::*, config::*, config_option::*, gate::*, gate_error::*, latch::*, mapping::*,
  notifier::GateOutcome, slot::*,
};
