//! tva-session
//!
//! Async runtime around a seating session:
//! - `SessionHandle` serializes all operations on one session (single writer)
//! - session events are broadcast to any number of observers
//! - `ReservationSource` / `ContractPersistence` are the seams to the
//!   reservation inventory and contract storage

mod collaborators;
mod handle;

pub use collaborators::{
    reservation_source_for, ContractPersistence, ContractReceipt, FixedReservations,
    InMemoryPersistence, NoReservations, ReservationSource, SimulatedPersistence,
    SimulatedReservations,
};
pub use handle::{GenerationResult, SessionHandle};
