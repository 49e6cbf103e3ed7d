//! One contract-finalization session.
//!
//! `ContractSession` composes roster, seat map, assignment engine, boarding
//! assignment and readiness gate behind a single `&mut self` surface. Every
//! operation runs to completion; there is no observable intermediate state.
//!
//! Errors are returned *and* kept in a single error slot (`last_error`), which
//! the next successful operation clears. Each outcome is also queued as a
//! [`SessionEvent`] for observers.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    build_roster, seat_map, AssignmentEngine, BoardingAssignment, BoardingMap, ContractContext,
    ContractPackage, ContractReadinessGate, GenerationStart, OccupancySource, Passenger, Phase,
    Seat, SeatNumber, SeatingError, SessionEvent, TripSummary,
};

/// Outcome of [`ContractSession::begin_generation`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GenerationOutcome {
    /// Hand this package to contract persistence, then call
    /// `complete_generation` with the result.
    Started(ContractPackage),
    /// A generation is already outstanding; the request was ignored.
    AlreadyInFlight,
}

/// Serializable read view of a session.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    pub session_id: Uuid,
    pub phase: Phase,
    pub focused_passenger_id: Option<String>,
    pub passengers: Vec<Passenger>,
    pub seats: Vec<Seat>,
    pub boarding_assignments: Option<BoardingMap>,
    pub can_proceed: bool,
    pub can_generate: bool,
    pub generation_in_flight: bool,
    pub last_error: Option<SeatingError>,
}

#[derive(Clone, Debug)]
pub struct ContractSession {
    session_id: Uuid,
    trip: TripSummary,
    engine: AssignmentEngine,
    boarding: Option<BoardingAssignment>,
    gate: ContractReadinessGate,
    last_error: Option<SeatingError>,
    events: Vec<SessionEvent>,
}

impl ContractSession {
    /// Build the roster from `ctx` and a `capacity`-seat layout seeded from
    /// `occupancy`.
    pub fn open(
        session_id: Uuid,
        ctx: &ContractContext,
        capacity: u32,
        occupancy: &OccupancySource,
    ) -> Self {
        let passengers = build_roster(ctx);
        let seats = seat_map::generate_with(capacity, occupancy);
        Self::from_parts(session_id, ctx.trip_summary.clone(), passengers, seats)
    }

    pub fn from_parts(
        session_id: Uuid,
        trip: TripSummary,
        passengers: Vec<Passenger>,
        seats: Vec<Seat>,
    ) -> Self {
        Self {
            session_id,
            trip,
            engine: AssignmentEngine::new(passengers, seats),
            boarding: None,
            gate: ContractReadinessGate::new(),
            last_error: None,
            events: Vec::new(),
        }
    }

    // -----------------------------------------------------------------------
    // Read accessors
    // -----------------------------------------------------------------------

    pub fn session_id(&self) -> Uuid {
        self.session_id
    }

    pub fn trip(&self) -> &TripSummary {
        &self.trip
    }

    pub fn phase(&self) -> Phase {
        self.gate.phase()
    }

    pub fn passengers(&self) -> &[Passenger] {
        self.engine.passengers()
    }

    pub fn seats(&self) -> &[Seat] {
        self.engine.seats()
    }

    pub fn seat(&self, number: SeatNumber) -> Option<&Seat> {
        self.engine.seat(number)
    }

    pub fn passenger(&self, id: &str) -> Option<&Passenger> {
        self.engine.passenger(id)
    }

    pub fn focused_passenger_id(&self) -> Option<&str> {
        self.engine.focused_passenger_id()
    }

    pub fn unassigned(&self) -> Vec<&Passenger> {
        self.engine.unassigned()
    }

    pub fn assigned(&self) -> Vec<&Passenger> {
        self.engine.assigned()
    }

    pub fn can_proceed(&self) -> bool {
        self.engine.can_proceed()
    }

    /// `false` until the boarding phase has been entered at least once.
    pub fn can_generate(&self) -> bool {
        self.boarding
            .as_ref()
            .is_some_and(BoardingAssignment::can_generate)
    }

    pub fn boarding_map(&self) -> Option<&BoardingMap> {
        self.boarding.as_ref().map(BoardingAssignment::map)
    }

    pub fn is_generation_in_flight(&self) -> bool {
        self.gate.is_generation_in_flight()
    }

    pub fn last_error(&self) -> Option<&SeatingError> {
        self.last_error.as_ref()
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            session_id: self.session_id,
            phase: self.phase(),
            focused_passenger_id: self.focused_passenger_id().map(str::to_string),
            passengers: self.passengers().to_vec(),
            seats: self.seats().to_vec(),
            boarding_assignments: self.boarding_map().cloned(),
            can_proceed: self.can_proceed(),
            can_generate: self.can_generate(),
            generation_in_flight: self.is_generation_in_flight(),
            last_error: self.last_error.clone(),
        }
    }

    /// Take all queued events, oldest first.
    pub fn drain_events(&mut self) -> Vec<SessionEvent> {
        std::mem::take(&mut self.events)
    }

    // -----------------------------------------------------------------------
    // Seat phase
    // -----------------------------------------------------------------------

    pub fn select_passenger(&mut self, id: &str) -> Result<(), SeatingError> {
        let res = self
            .gate
            .require(Phase::SeatSelection)
            .and_then(|()| self.engine.select_passenger(id));
        if res.is_ok() {
            self.events.push(SessionEvent::PassengerFocused {
                passenger_id: Some(id.to_string()),
            });
        }
        self.settle(res)
    }

    pub fn select_seat(&mut self, number: SeatNumber) -> Result<(), SeatingError> {
        let res = self
            .gate
            .require(Phase::SeatSelection)
            .and_then(|()| self.engine.select_seat(number));
        if let Ok(binding) = &res {
            self.events.push(SessionEvent::SeatAssigned {
                passenger_id: binding.passenger_id.clone(),
                seat: binding.seat,
                released: binding.released,
            });
            self.events.push(SessionEvent::PassengerFocused {
                passenger_id: binding.next_focus.clone(),
            });
        }
        self.settle(res.map(|_| ()))
    }

    /// SeatSelection → BoardingAssignment. Every entry starts from a fresh
    /// boarding map with one empty label per passenger.
    pub fn proceed_to_boarding(&mut self) -> Result<(), SeatingError> {
        let res = self.gate.proceed_to_boarding(self.engine.can_proceed());
        if res.is_ok() {
            let ids = self.engine.passengers().iter().map(|p| p.id.clone());
            self.boarding = Some(BoardingAssignment::new(ids));
            for p in self.engine.passengers_mut() {
                p.boarding_point = None;
            }
            self.events.push(SessionEvent::PhaseChanged {
                from: Phase::SeatSelection,
                to: Phase::BoardingAssignment,
            });
        }
        self.settle(res)
    }

    /// BoardingAssignment → SeatSelection. Seats and the boarding map are left
    /// as they are until boarding is entered again.
    pub fn back_to_seats(&mut self) -> Result<(), SeatingError> {
        let from = self.gate.phase();
        let res = self.gate.back_to_seats();
        if res.is_ok() && from != Phase::SeatSelection {
            self.events.push(SessionEvent::PhaseChanged {
                from,
                to: Phase::SeatSelection,
            });
        }
        self.settle(res)
    }

    // -----------------------------------------------------------------------
    // Boarding phase
    // -----------------------------------------------------------------------

    /// Overwrite a passenger's boarding point. Returns `Ok(false)` without
    /// changing anything for an id outside the roster.
    pub fn update_boarding_point(
        &mut self,
        passenger_id: &str,
        label: &str,
    ) -> Result<bool, SeatingError> {
        let res = self.gate.require(Phase::BoardingAssignment).map(|()| {
            let Some(boarding) = self.boarding.as_mut() else {
                return false;
            };
            if !boarding.update_boarding_point(passenger_id, label) {
                return false;
            }
            let trimmed = label.trim();
            if let Some(p) = self
                .engine
                .passengers_mut()
                .iter_mut()
                .find(|p| p.id == passenger_id)
            {
                p.boarding_point = (!trimmed.is_empty()).then(|| trimmed.to_string());
            }
            true
        });
        if let Ok(true) = res {
            self.events.push(SessionEvent::BoardingPointUpdated {
                passenger_id: passenger_id.to_string(),
                label: label.to_string(),
            });
        }
        self.settle(res)
    }

    /// Claim the single outstanding generation and package the contract.
    pub fn begin_generation(&mut self) -> Result<GenerationOutcome, SeatingError> {
        let res = self.gate.begin_generation(self.can_generate());
        let res = match res {
            Ok(GenerationStart::AlreadyInFlight) => {
                // Ignored: no error, no event, nothing to hand off.
                return Ok(GenerationOutcome::AlreadyInFlight);
            }
            Ok(GenerationStart::Started) => {
                self.events.push(SessionEvent::GenerationStarted {
                    session_id: self.session_id,
                });
                Ok(GenerationOutcome::Started(self.package()))
            }
            Err(e) => Err(e),
        };
        self.settle(res)
    }

    /// Resolve the outstanding generation with the persistence result.
    /// Failure leaves the session in `BoardingAssignment`; it is never retried
    /// from here.
    pub fn complete_generation(&mut self, result: Result<(), String>) {
        let succeeded = result.is_ok();
        if !self.gate.complete_generation(succeeded) {
            return;
        }
        match result {
            Ok(()) => {
                self.events.push(SessionEvent::PhaseChanged {
                    from: Phase::BoardingAssignment,
                    to: Phase::ContractGenerated,
                });
                self.events.push(SessionEvent::ContractGenerated {
                    session_id: self.session_id,
                });
            }
            Err(reason) => {
                self.events.push(SessionEvent::GenerationFailed {
                    session_id: self.session_id,
                    reason,
                });
            }
        }
    }

    fn package(&self) -> ContractPackage {
        ContractPackage {
            session_id: self.session_id,
            passengers: self.engine.passengers().to_vec(),
            boarding_assignments: self.boarding_map().cloned().unwrap_or_default(),
            trip_summary: self.trip.clone(),
        }
    }

    /// Maintain the error slot and queue validation failures.
    fn settle<T>(&mut self, res: Result<T, SeatingError>) -> Result<T, SeatingError> {
        match &res {
            Ok(_) => self.last_error = None,
            Err(e) => {
                self.last_error = Some(e.clone());
                self.events
                    .push(SessionEvent::ValidationFailed { error: e.clone() });
            }
        }
        res
    }
}
