//! Bus layout generation and occupancy seeding.
//!
//! Layouts are 4-across: seat `i` sits in row `ceil(i / 4)` at position
//! `i mod 4`. Positions 0 and 1 are window seats, 2 and 3 aisle seats.
//!
//! Occupancy is a pure function of an [`OccupancySource`]; the same source
//! always yields the same layout.

use std::collections::BTreeSet;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use crate::{PositionType, Seat, SeatNumber};

pub const SEATS_PER_ROW: u32 = 4;

/// Standard coach capacity.
pub const DEFAULT_CAPACITY: u32 = 54;

/// Where pre-existing reservations come from.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum OccupancySource {
    /// Empty bus.
    None,
    /// Each seat occupied independently with probability `percent / 100`.
    Seeded { percent: u32, seed: u64 },
    /// Exactly these seats are taken. Numbers outside the layout are ignored.
    Reserved { seats: Vec<SeatNumber> },
}

/// Position type derived from the seat number.
pub fn position_type_for(number: SeatNumber) -> PositionType {
    match number % SEATS_PER_ROW {
        0 | 1 => PositionType::Window,
        _ => PositionType::Aisle,
    }
}

/// Seats `1..=capacity`, none occupied.
pub fn generate(capacity: u32) -> Vec<Seat> {
    (1..=capacity)
        .map(|number| Seat {
            number,
            occupied: false,
            selected: false,
            assigned_passenger_id: None,
            position_type: position_type_for(number),
        })
        .collect()
}

/// Seats `1..=capacity` with occupancy seeded from `source`.
pub fn generate_with(capacity: u32, source: &OccupancySource) -> Vec<Seat> {
    let mut seats = generate(capacity);
    match source {
        OccupancySource::None => {}
        OccupancySource::Seeded { percent, seed } => {
            let pct = (*percent).min(100);
            let mut rng = ChaCha8Rng::seed_from_u64(*seed);
            for seat in seats.iter_mut() {
                seat.occupied = rng.gen_ratio(pct, 100);
            }
        }
        OccupancySource::Reserved { seats: reserved } => {
            let reserved: BTreeSet<SeatNumber> = reserved.iter().copied().collect();
            for seat in seats.iter_mut() {
                seat.occupied = reserved.contains(&seat.number);
            }
        }
    }
    seats
}

/// One row of the layout; `None` pads the last row when capacity is not a
/// multiple of four.
pub type SeatRow<'a> = [Option<&'a Seat>; SEATS_PER_ROW as usize];

/// Split a layout into rows of four for display.
pub fn rows(seats: &[Seat]) -> Vec<SeatRow<'_>> {
    seats
        .chunks(SEATS_PER_ROW as usize)
        .map(|chunk| {
            let mut row: SeatRow<'_> = [None; SEATS_PER_ROW as usize];
            for (slot, seat) in row.iter_mut().zip(chunk) {
                *slot = Some(seat);
            }
            row
        })
        .collect()
}
