use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{Phase, SeatNumber, SeatingError};

/// Change notifications emitted by a [`ContractSession`](crate::ContractSession).
///
/// The session queues these; observers pull them with `drain_events` (or
/// receive them from the runtime's broadcast bus).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SessionEvent {
    PassengerFocused {
        passenger_id: Option<String>,
    },
    SeatAssigned {
        passenger_id: String,
        seat: SeatNumber,
        released: Option<SeatNumber>,
    },
    PhaseChanged {
        from: Phase,
        to: Phase,
    },
    BoardingPointUpdated {
        passenger_id: String,
        label: String,
    },
    ValidationFailed {
        error: SeatingError,
    },
    GenerationStarted {
        session_id: Uuid,
    },
    GenerationFailed {
        session_id: Uuid,
        reason: String,
    },
    ContractGenerated {
        session_id: Uuid,
    },
}
