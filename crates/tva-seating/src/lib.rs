//! tva-seating
//!
//! Seat and boarding-point assignment for trip contracts.
//!
//! Flow:
//! - `roster` builds the ordered passenger list (titular + companions)
//! - `seat_map` generates the bus layout and seeds pre-existing occupancy
//! - `engine` binds passengers to seats one-to-one, with focus auto-advance
//! - `boarding` collects one boarding point per passenger
//! - `gate` sequences seat selection → boarding assignment → contract
//! - `session` composes all of the above into one state container
//!
//! Deterministic, pure logic. No IO, no clock, no async.

mod boarding;
mod contract;
mod engine;
mod events;
mod gate;
mod roster;
pub mod seat_map;
mod session;
mod types;

pub use boarding::BoardingAssignment;
pub use contract::{
    age_on, ClientRecord, ContractContext, ContractPackage, TravellerInput, TripSummary,
};
pub use engine::{AssignmentEngine, SeatBinding};
pub use events::SessionEvent;
pub use gate::{ContractReadinessGate, GenerationStart};
pub use roster::{build_roster, companion_id, TITULAR_ID};
pub use seat_map::{OccupancySource, SeatRow, DEFAULT_CAPACITY, SEATS_PER_ROW};
pub use session::{ContractSession, GenerationOutcome, SessionSnapshot};
pub use types::*;
