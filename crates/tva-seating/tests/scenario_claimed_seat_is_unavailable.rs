//! Scenario: a seat held by one passenger cannot be taken by another.
//!
//! # Invariants under test
//!
//! 1. companion_0 selecting titular's seat fails with SeatUnavailable; the
//!    seat stays with titular and companion_0 stays unseated.
//! 2. Seat selection with nothing focused fails with NoPassengerFocused.
//! 3. The error slot holds the latest failure and is cleared by the next
//!    valid operation.

mod common;

use common::*;
use tva_seating::{OccupancySource, SeatingError};

#[test]
fn second_passenger_cannot_take_a_claimed_seat() {
    let mut s = session(1, &OccupancySource::None);

    s.select_passenger("titular").unwrap();
    s.select_seat(5).unwrap();

    s.select_passenger("companion_0").unwrap();
    let err = s.select_seat(5).unwrap_err();
    assert_eq!(err, SeatingError::SeatUnavailable { seat: 5 });

    assert_eq!(
        s.seat(5).unwrap().assigned_passenger_id.as_deref(),
        Some("titular")
    );
    assert_eq!(s.passenger("companion_0").unwrap().assigned_seat, None);
    assert_eq!(s.focused_passenger_id(), Some("companion_0"));
    assert_bijection(&s);
}

#[test]
fn seat_selection_without_focus_is_rejected() {
    let mut s = session(2, &OccupancySource::None);
    assert_eq!(s.select_seat(1), Err(SeatingError::NoPassengerFocused));
    assert!(s.seats().iter().all(|seat| !seat.selected));
}

#[test]
fn error_slot_is_cleared_by_next_valid_operation() {
    let mut s = session(0, &OccupancySource::None);

    let _ = s.select_seat(3);
    assert_eq!(s.last_error(), Some(&SeatingError::NoPassengerFocused));

    let _ = s.select_passenger("nobody");
    assert_eq!(
        s.last_error(),
        Some(&SeatingError::UnknownPassenger {
            id: "nobody".to_string()
        })
    );

    s.select_passenger("titular").unwrap();
    assert_eq!(s.last_error(), None);
}
