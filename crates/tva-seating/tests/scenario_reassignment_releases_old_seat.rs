//! Scenario: moving a passenger frees the seat they held.
//!
//! # Invariants under test
//!
//! 1. Assign P to A, then to B: A is free again, B is bound to P.
//! 2. A released seat can be taken by another passenger.
//! 3. The bijection holds after every step.

mod common;

use common::*;
use tva_seating::{OccupancySource, SessionEvent};

#[test]
fn reassignment_releases_the_previous_seat() {
    let mut s = session(2, &OccupancySource::None);

    s.select_passenger("titular").unwrap();
    s.select_seat(9).unwrap();
    assert_bijection(&s);

    s.select_passenger("titular").unwrap();
    s.drain_events();
    s.select_seat(14).unwrap();
    assert_bijection(&s);

    let a = s.seat(9).unwrap();
    assert!(!a.selected);
    assert_eq!(a.assigned_passenger_id, None);

    let b = s.seat(14).unwrap();
    assert!(b.selected);
    assert_eq!(b.assigned_passenger_id.as_deref(), Some("titular"));
    assert_eq!(s.passenger("titular").unwrap().assigned_seat, Some(14));

    let events = s.drain_events();
    assert!(events.contains(&SessionEvent::SeatAssigned {
        passenger_id: "titular".to_string(),
        seat: 14,
        released: Some(9),
    }));
}

#[test]
fn released_seat_is_available_to_others() {
    let mut s = session(1, &OccupancySource::None);

    s.select_passenger("titular").unwrap();
    s.select_seat(1).unwrap();
    s.select_passenger("titular").unwrap();
    s.select_seat(2).unwrap();

    // Focus auto-advanced to companion_0, who takes the freed seat.
    assert_eq!(s.focused_passenger_id(), Some("companion_0"));
    s.select_seat(1).unwrap();

    assert_eq!(s.passenger("companion_0").unwrap().assigned_seat, Some(1));
    assert_eq!(s.passenger("titular").unwrap().assigned_seat, Some(2));
    assert_bijection(&s);
}
