//! Contract readiness gate.
//!
//! Owns the phase and the in-flight generation flag. Completeness itself is
//! evaluated by the caller (assignment engine / boarding assignment) and
//! passed in, so the gate stays a plain state machine.
//!
//! # Invariants
//!
//! - `BoardingAssignment` is only entered with every passenger seated.
//! - `ContractGenerated` is only entered from `BoardingAssignment`, after a
//!   started generation completes successfully.
//! - At most one generation is outstanding; a second request while one is in
//!   flight is ignored, not queued.

use crate::{Phase, SeatingError};

/// What `begin_generation` did.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GenerationStart {
    /// Caller now owns the single outstanding generation.
    Started,
    /// A generation is already outstanding; nothing changed.
    AlreadyInFlight,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ContractReadinessGate {
    phase: Phase,
    generation_in_flight: bool,
}

impl Default for ContractReadinessGate {
    fn default() -> Self {
        Self::new()
    }
}

impl ContractReadinessGate {
    pub fn new() -> Self {
        Self {
            phase: Phase::SeatSelection,
            generation_in_flight: false,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_generation_in_flight(&self) -> bool {
        self.generation_in_flight
    }

    /// Fails unless the gate is idle in `expected`.
    pub fn require(&self, expected: Phase) -> Result<(), SeatingError> {
        if self.generation_in_flight {
            return Err(SeatingError::GenerationInFlight);
        }
        if self.phase != expected {
            return Err(SeatingError::PhaseMismatch { phase: self.phase });
        }
        Ok(())
    }

    /// SeatSelection → BoardingAssignment.
    pub fn proceed_to_boarding(&mut self, seats_complete: bool) -> Result<(), SeatingError> {
        self.require(Phase::SeatSelection)?;
        if !seats_complete {
            return Err(SeatingError::IncompleteSeatAssignment);
        }
        self.phase = Phase::BoardingAssignment;
        Ok(())
    }

    /// BoardingAssignment → SeatSelection. A no-op when already selecting seats.
    pub fn back_to_seats(&mut self) -> Result<(), SeatingError> {
        if self.phase == Phase::SeatSelection && !self.generation_in_flight {
            return Ok(());
        }
        self.require(Phase::BoardingAssignment)?;
        self.phase = Phase::SeatSelection;
        Ok(())
    }

    /// Claim the single outstanding generation.
    pub fn begin_generation(
        &mut self,
        boarding_complete: bool,
    ) -> Result<GenerationStart, SeatingError> {
        if self.generation_in_flight {
            return Ok(GenerationStart::AlreadyInFlight);
        }
        self.require(Phase::BoardingAssignment)?;
        if !boarding_complete {
            return Err(SeatingError::IncompleteBoardingAssignment);
        }
        self.generation_in_flight = true;
        Ok(GenerationStart::Started)
    }

    /// Resolve the outstanding generation. Success is terminal; failure
    /// returns the gate to an idle `BoardingAssignment`.
    ///
    /// Returns `false` if no generation was outstanding.
    pub fn complete_generation(&mut self, succeeded: bool) -> bool {
        if !self.generation_in_flight {
            return false;
        }
        self.generation_in_flight = false;
        if succeeded {
            self.phase = Phase::ContractGenerated;
        }
        true
    }
}
