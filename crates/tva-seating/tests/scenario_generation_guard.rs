//! Scenario: contract generation gating.
//!
//! # Invariants under test
//!
//! 1. Blank or whitespace-only labels keep can_generate false; generation is
//!    refused with IncompleteBoardingAssignment and the phase does not move.
//! 2. A complete map starts exactly one generation; a second request while it
//!    is outstanding is ignored.
//! 3. Success is terminal; failure returns to an idle BoardingAssignment and
//!    is not retried.
//! 4. The package carries passengers, boarding map and trip summary.

mod common;

use common::*;
use tva_seating::{
    ContractSession, GenerationOutcome, OccupancySource, Phase, SeatingError, SessionEvent,
};

fn ready_for_boarding(companions: usize) -> ContractSession {
    let mut s = session(companions, &OccupancySource::None);
    seat_everyone(&mut s, 1).unwrap();
    s.proceed_to_boarding().unwrap();
    s
}

#[test]
fn blank_labels_block_generation() {
    let mut s = ready_for_boarding(1);
    s.update_boarding_point("titular", "Juriquilla - 09:00 AM").unwrap();
    s.update_boarding_point("companion_0", "   ").unwrap();

    assert!(!s.can_generate());
    assert_eq!(
        s.begin_generation(),
        Err(SeatingError::IncompleteBoardingAssignment)
    );
    assert_eq!(s.phase(), Phase::BoardingAssignment);
    assert!(!s.is_generation_in_flight());
    assert_eq!(s.passenger("companion_0").unwrap().boarding_point, None);
}

#[test]
fn generation_is_refused_from_seat_selection() {
    let mut s = ready_for_boarding(0);
    s.update_boarding_point("titular", "Centro Historico").unwrap();
    s.back_to_seats().unwrap();

    assert_eq!(
        s.begin_generation(),
        Err(SeatingError::PhaseMismatch {
            phase: Phase::SeatSelection
        })
    );
}

#[test]
fn unknown_passenger_update_is_a_noop() {
    let mut s = ready_for_boarding(0);
    assert_eq!(s.update_boarding_point("companion_7", "Plaza"), Ok(false));
    assert_eq!(s.boarding_map().unwrap().len(), 1);
}

#[test]
fn only_one_generation_is_outstanding() {
    let mut s = ready_for_boarding(2);
    for id in ["titular", "companion_0", "companion_1"] {
        assert_eq!(s.update_boarding_point(id, " Plaza San Javier "), Ok(true));
    }
    assert!(s.can_generate());

    let package = match s.begin_generation().unwrap() {
        GenerationOutcome::Started(p) => p,
        other => panic!("expected Started, got {other:?}"),
    };
    assert_eq!(package.session_id, s.session_id());
    assert_eq!(package.passengers.len(), 3);
    assert_eq!(package.boarding_assignments.len(), 3);
    assert_eq!(package.trip_summary.clave, "QRO-MAZ-0325");
    assert_eq!(
        package.passengers[0].boarding_point.as_deref(),
        Some("Plaza San Javier")
    );

    assert_eq!(s.begin_generation(), Ok(GenerationOutcome::AlreadyInFlight));
    assert_eq!(
        s.update_boarding_point("titular", "Juriquilla"),
        Err(SeatingError::GenerationInFlight)
    );

    s.complete_generation(Ok(()));
    assert_eq!(s.phase(), Phase::ContractGenerated);
    assert!(s
        .drain_events()
        .contains(&SessionEvent::ContractGenerated {
            session_id: s.session_id()
        }));
}

#[test]
fn failed_generation_is_not_success_and_not_retried() {
    let mut s = ready_for_boarding(0);
    s.update_boarding_point("titular", "Terminal Central").unwrap();

    assert!(matches!(
        s.begin_generation(),
        Ok(GenerationOutcome::Started(_))
    ));
    s.drain_events();
    s.complete_generation(Err("persistence unavailable".to_string()));

    assert_eq!(s.phase(), Phase::BoardingAssignment);
    assert!(!s.is_generation_in_flight());
    let events = s.drain_events();
    assert_eq!(events.len(), 1);
    assert!(matches!(events[0], SessionEvent::GenerationFailed { .. }));

    // A stray completion after the fact changes nothing.
    s.complete_generation(Ok(()));
    assert_eq!(s.phase(), Phase::BoardingAssignment);
}
