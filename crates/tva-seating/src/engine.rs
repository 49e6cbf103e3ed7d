//! Passenger → seat allocation.
//!
//! # Invariants
//!
//! - An occupied seat is never selected and never carries a passenger.
//! - A selected seat carries exactly one passenger, and that passenger's
//!   `assigned_seat` points back at it (seats and passengers form a bijection
//!   over the selected subset).
//! - A passenger holds at most one seat. Re-selecting releases the old seat in
//!   the same call that binds the new one.

use crate::{Passenger, Seat, SeatNumber, SeatingError};

/// Result of a successful [`AssignmentEngine::select_seat`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SeatBinding {
    pub passenger_id: String,
    pub seat: SeatNumber,
    /// Seat the passenger held before, now free again.
    pub released: Option<SeatNumber>,
    /// Focus after auto-advance.
    pub next_focus: Option<String>,
}

#[derive(Clone, Debug)]
pub struct AssignmentEngine {
    passengers: Vec<Passenger>,
    seats: Vec<Seat>,
    focused: Option<String>,
}

impl AssignmentEngine {
    /// Seats are looked up by `Seat::number`, never by position, so any
    /// layout works; `seat_map` produces `1..=N` in order.
    pub fn new(passengers: Vec<Passenger>, seats: Vec<Seat>) -> Self {
        Self {
            passengers,
            seats,
            focused: None,
        }
    }

    pub fn passengers(&self) -> &[Passenger] {
        &self.passengers
    }

    pub fn seats(&self) -> &[Seat] {
        &self.seats
    }

    pub fn seat(&self, number: SeatNumber) -> Option<&Seat> {
        self.seats.iter().find(|s| s.number == number)
    }

    pub fn passenger(&self, id: &str) -> Option<&Passenger> {
        self.passengers.iter().find(|p| p.id == id)
    }

    pub fn focused_passenger_id(&self) -> Option<&str> {
        self.focused.as_deref()
    }

    /// Focus a passenger for the next seat selection.
    pub fn select_passenger(&mut self, id: &str) -> Result<(), SeatingError> {
        if self.passenger(id).is_none() {
            return Err(SeatingError::UnknownPassenger { id: id.to_string() });
        }
        self.focused = Some(id.to_string());
        Ok(())
    }

    /// Bind the focused passenger to `number`, releasing any seat they held,
    /// then advance focus to the first unseated passenger in roster order.
    pub fn select_seat(&mut self, number: SeatNumber) -> Result<SeatBinding, SeatingError> {
        let focused = self.focused.clone().ok_or(SeatingError::NoPassengerFocused)?;

        // Validate everything before touching state.
        let seat_idx = self
            .seat_index(number)
            .ok_or(SeatingError::SeatUnavailable { seat: number })?;
        let seat = &self.seats[seat_idx];
        if seat.occupied {
            return Err(SeatingError::SeatUnavailable { seat: number });
        }
        if let Some(holder) = &seat.assigned_passenger_id {
            if *holder != focused {
                return Err(SeatingError::SeatUnavailable { seat: number });
            }
        }
        let p_idx = self
            .passengers
            .iter()
            .position(|p| p.id == focused)
            .ok_or_else(|| SeatingError::UnknownPassenger { id: focused.clone() })?;

        let previous = self.passengers[p_idx].assigned_seat;
        let released = match previous {
            Some(prev) if prev != number => {
                if let Some(prev_idx) = self.seat_index(prev) {
                    let old = &mut self.seats[prev_idx];
                    old.selected = false;
                    old.assigned_passenger_id = None;
                }
                Some(prev)
            }
            _ => None,
        };

        let seat = &mut self.seats[seat_idx];
        seat.selected = true;
        seat.assigned_passenger_id = Some(focused.clone());
        self.passengers[p_idx].assigned_seat = Some(number);

        self.focused = self
            .passengers
            .iter()
            .find(|p| !p.is_seated())
            .map(|p| p.id.clone());

        Ok(SeatBinding {
            passenger_id: focused,
            seat: number,
            released,
            next_focus: self.focused.clone(),
        })
    }

    pub fn unassigned(&self) -> Vec<&Passenger> {
        self.passengers.iter().filter(|p| !p.is_seated()).collect()
    }

    pub fn assigned(&self) -> Vec<&Passenger> {
        self.passengers.iter().filter(|p| p.is_seated()).collect()
    }

    /// True iff every passenger has a seat.
    pub fn can_proceed(&self) -> bool {
        self.passengers.iter().all(Passenger::is_seated)
    }

    /// Boarding points are owned by the boarding assignment; the engine only
    /// mirrors them onto the passenger records it hands out.
    pub(crate) fn passengers_mut(&mut self) -> &mut [Passenger] {
        &mut self.passengers
    }

    fn seat_index(&self, number: SeatNumber) -> Option<usize> {
        self.seats.iter().position(|s| s.number == number)
    }
}
