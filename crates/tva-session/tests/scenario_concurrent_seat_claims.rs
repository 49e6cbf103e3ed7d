//! Scenario: concurrent editors racing for one seat.
//!
//! # Invariants under test
//!
//! 1. Many tasks assigning different passengers to the same seat: exactly one
//!    wins, every other gets SeatUnavailable.
//! 2. The bijection holds afterwards.
//! 3. Observers receive the winning SeatAssigned event and one
//!    ValidationFailed per loser.

use std::collections::BTreeSet;
use std::sync::Arc;

use chrono::NaiveDate;
use tva_config::SeatingConfig;
use tva_seating::{ContractContext, SeatingError, SessionEvent, TravellerInput, TripSummary};
use tva_session::{FixedReservations, InMemoryPersistence, NoReservations, SessionHandle};

fn context(companions: usize) -> ContractContext {
    ContractContext {
        trip_summary: TripSummary {
            name: "Guanajuato".to_string(),
            clave: "QRO-GTO-0412".to_string(),
            departure_date_time: NaiveDate::from_ymd_opt(2025, 4, 12)
                .unwrap()
                .and_hms_opt(7, 30, 0)
                .unwrap(),
            return_date_time: None,
            boarding_point_options: vec![],
        },
        titular: TravellerInput::new("Titular", 40),
        companions: (0..companions)
            .map(|i| TravellerInput::new(format!("Companion {i}"), 20))
            .collect(),
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn only_first_claim_on_a_seat_wins() {
    let h = SessionHandle::open(
        &context(7),
        &SeatingConfig::default(),
        &NoReservations,
        Arc::new(InMemoryPersistence::new()),
    )
    .await
    .unwrap();
    let mut rx = h.subscribe();

    let ids: Vec<String> = h.snapshot().await.passengers.iter().map(|p| p.id.clone()).collect();
    let mut tasks = Vec::new();
    for id in ids.clone() {
        let h = h.clone();
        tasks.push(tokio::spawn(async move { h.assign_seat(&id, 12).await }));
    }

    let mut wins = 0;
    for t in tasks {
        match t.await.unwrap() {
            Ok(()) => wins += 1,
            Err(e) => assert_eq!(e, SeatingError::SeatUnavailable { seat: 12 }),
        }
    }
    assert_eq!(wins, 1);

    let snap = h.snapshot().await;
    let seated: Vec<_> = snap.passengers.iter().filter(|p| p.assigned_seat.is_some()).collect();
    assert_eq!(seated.len(), 1);
    let seat = &snap.seats[11];
    assert_eq!(seat.assigned_passenger_id.as_deref(), Some(seated[0].id.as_str()));

    let mut assigned = 0;
    let mut failed = 0;
    while let Ok(ev) = rx.try_recv() {
        match ev {
            SessionEvent::SeatAssigned { seat: 12, .. } => assigned += 1,
            SessionEvent::ValidationFailed { .. } => failed += 1,
            _ => {}
        }
    }
    assert_eq!(assigned, 1);
    assert_eq!(failed, ids.len() - 1);
}

#[tokio::test]
async fn reservations_from_collaborator_are_occupied() {
    let h = SessionHandle::open(
        &context(1),
        &SeatingConfig::default(),
        &FixedReservations(vec![1, 2, 3]),
        Arc::new(InMemoryPersistence::new()),
    )
    .await
    .unwrap();

    let snap = h.snapshot().await;
    let occupied: BTreeSet<u32> = snap.seats.iter().filter(|s| s.occupied).map(|s| s.number).collect();
    assert_eq!(occupied, BTreeSet::from([1, 2, 3]));

    assert_eq!(
        h.assign_seat("titular", 2).await,
        Err(SeatingError::SeatUnavailable { seat: 2 })
    );
    h.assign_seat("titular", 4).await.unwrap();
}
