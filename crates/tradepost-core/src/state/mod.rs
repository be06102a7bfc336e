//! Reactive state primitives shared by every store.
//!
//! - `cell`: the observable single-writer container (`StateCell`)
//! - `in_flight`: scoped loading flags and last-request-wins sequencing

mod cell;
mod in_flight;

pub use cell::StateCell;
pub use in_flight::{InFlight, LoadingGuard, RequestSequencer, RequestTicket};
