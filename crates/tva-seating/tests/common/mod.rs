#![allow(dead_code)]

use chrono::NaiveDate;
use tva_seating::{
    ContractContext, ContractSession, OccupancySource, SeatingError, TravellerInput, TripSummary,
};
use uuid::Uuid;

pub const CAPACITY: u32 = 54;

pub fn trip() -> TripSummary {
    let day = NaiveDate::from_ymd_opt(2025, 3, 15).unwrap();
    TripSummary {
        name: "Mazatlan Premium".to_string(),
        clave: "QRO-MAZ-0325".to_string(),
        departure_date_time: day.and_hms_opt(8, 0, 0).unwrap(),
        return_date_time: None,
        boarding_point_options: vec![
            "Terminal Central Queretaro - 08:00 AM".to_string(),
            "Plaza San Javier - 08:20 AM".to_string(),
        ],
    }
}

/// Titular plus `companions` companions.
pub fn context(companions: usize) -> ContractContext {
    ContractContext {
        trip_summary: trip(),
        titular: TravellerInput::new("Juan Perez", 35),
        companions: (0..companions)
            .map(|i| TravellerInput::new(format!("Companion {i}"), 10 + i as u32))
            .collect(),
    }
}

pub fn session(companions: usize, occupancy: &OccupancySource) -> ContractSession {
    ContractSession::open(Uuid::new_v4(), &context(companions), CAPACITY, occupancy)
}

/// Seat every passenger on consecutive seats starting at `first`.
pub fn seat_everyone(s: &mut ContractSession, first: u32) -> Result<(), SeatingError> {
    let ids: Vec<String> = s.passengers().iter().map(|p| p.id.clone()).collect();
    for (i, id) in ids.iter().enumerate() {
        s.select_passenger(id)?;
        s.select_seat(first + i as u32)?;
    }
    Ok(())
}

/// Assert the bijection invariant over the whole session.
pub fn assert_bijection(s: &ContractSession) {
    for seat in s.seats() {
        if seat.occupied {
            assert!(!seat.selected, "occupied seat {} selected", seat.number);
            assert!(seat.assigned_passenger_id.is_none());
        }
        assert_eq!(seat.selected, seat.assigned_passenger_id.is_some());
        if let Some(pid) = &seat.assigned_passenger_id {
            let p = s.passenger(pid).expect("seat points at unknown passenger");
            assert_eq!(p.assigned_seat, Some(seat.number), "seat {} not mirrored", seat.number);
        }
    }
    for p in s.passengers() {
        if let Some(n) = p.assigned_seat {
            let seat = s.seat(n).expect("passenger points at unknown seat");
            assert_eq!(seat.assigned_passenger_id.as_deref(), Some(p.id.as_str()));
        }
    }
    let mut held: Vec<u32> = s.passengers().iter().filter_map(|p| p.assigned_seat).collect();
    let before = held.len();
    held.sort_unstable();
    held.dedup();
    assert_eq!(before, held.len(), "two passengers share a seat");
}
