use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Seat number, 1-based and contiguous within a layout.
pub type SeatNumber = u32;

/// Passenger id → boarding-point label (possibly empty until filled in).
pub type BoardingMap = BTreeMap<String, String>;

// ---------------------------------------------------------------------------
// Passenger
// ---------------------------------------------------------------------------

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PassengerRole {
    Titular,
    Companion,
}

/// One traveller on the contract.
///
/// `assigned_seat` is written only by the assignment engine and
/// `boarding_point` only by the boarding assignment; everything else is fixed
/// when the roster is built.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Passenger {
    pub id: String,
    pub name: String,
    pub age: u32,
    pub role: PassengerRole,
    pub assigned_seat: Option<SeatNumber>,
    pub boarding_point: Option<String>,
}

impl Passenger {
    pub fn new(id: impl Into<String>, name: impl Into<String>, age: u32, role: PassengerRole) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            age,
            role,
            assigned_seat: None,
            boarding_point: None,
        }
    }

    pub fn is_seated(&self) -> bool {
        self.assigned_seat.is_some()
    }
}

// ---------------------------------------------------------------------------
// Seat
// ---------------------------------------------------------------------------

/// Position of a seat within its row.
///
/// The 4-across layout only ever produces `Window` or `Aisle`; `Middle` is
/// kept for wider layouts and is currently unreachable from `SeatMap`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PositionType {
    Window,
    Aisle,
    Middle,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Seat {
    pub number: SeatNumber,
    /// Pre-existing reservation. Fixed once the layout is seeded.
    pub occupied: bool,
    /// Bound to a passenger of this session.
    pub selected: bool,
    pub assigned_passenger_id: Option<String>,
    pub position_type: PositionType,
}

impl Seat {
    /// 1-based row in a 4-across layout.
    pub fn row(&self) -> u32 {
        self.number.div_ceil(crate::SEATS_PER_ROW)
    }

    pub fn is_free(&self) -> bool {
        !self.occupied && !self.selected
    }

    pub fn status(&self) -> SeatStatus {
        if self.occupied {
            SeatStatus::Occupied
        } else if self.selected {
            SeatStatus::Selected
        } else {
            SeatStatus::Available
        }
    }
}

/// Display classification of a seat. Occupied wins over selected.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SeatStatus {
    Occupied,
    Selected,
    Available,
}

impl SeatStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SeatStatus::Occupied => "occupied",
            SeatStatus::Selected => "selected",
            SeatStatus::Available => "available",
        }
    }
}

// ---------------------------------------------------------------------------
// Phase
// ---------------------------------------------------------------------------

/// Contract readiness phases.
///
/// ```text
///  SeatSelection ──proceed_to_boarding──► BoardingAssignment ──generate──► ContractGenerated
///        ▲                                       │
///        └──────────────back_to_seats────────────┘
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    SeatSelection,
    BoardingAssignment,
    /// **Terminal.**
    ContractGenerated,
}

impl Phase {
    pub fn as_str(&self) -> &'static str {
        match self {
            Phase::SeatSelection => "SEAT_SELECTION",
            Phase::BoardingAssignment => "BOARDING_ASSIGNMENT",
            Phase::ContractGenerated => "CONTRACT_GENERATED",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Phase::ContractGenerated)
    }
}

// ---------------------------------------------------------------------------
// SeatingError
// ---------------------------------------------------------------------------

/// Validation failures surfaced to the operator.
///
/// All of these are recoverable: the session is left unchanged and the next
/// valid operation clears the error slot.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "code", rename_all = "snake_case")]
pub enum SeatingError {
    /// Seat selection attempted with nothing focused.
    NoPassengerFocused,
    /// Seat does not exist, is pre-occupied, or belongs to another passenger.
    SeatUnavailable { seat: SeatNumber },
    /// Phase advance attempted before every passenger has a seat.
    IncompleteSeatAssignment,
    /// Contract generation attempted before every passenger has a boarding point.
    IncompleteBoardingAssignment,
    /// Passenger id is not part of the roster.
    UnknownPassenger { id: String },
    /// Operation not accepted in the current phase.
    PhaseMismatch { phase: Phase },
    /// A contract generation is outstanding; the session is frozen until it resolves.
    GenerationInFlight,
}

impl SeatingError {
    /// Stable machine code.
    pub fn code(&self) -> &'static str {
        match self {
            SeatingError::NoPassengerFocused => "NO_PASSENGER_FOCUSED",
            SeatingError::SeatUnavailable { .. } => "SEAT_UNAVAILABLE",
            SeatingError::IncompleteSeatAssignment => "INCOMPLETE_SEAT_ASSIGNMENT",
            SeatingError::IncompleteBoardingAssignment => "INCOMPLETE_BOARDING_ASSIGNMENT",
            SeatingError::UnknownPassenger { .. } => "UNKNOWN_PASSENGER",
            SeatingError::PhaseMismatch { .. } => "PHASE_MISMATCH",
            SeatingError::GenerationInFlight => "GENERATION_IN_FLIGHT",
        }
    }
}

impl std::fmt::Display for SeatingError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SeatingError::NoPassengerFocused => write!(f, "select a passenger first"),
            SeatingError::SeatUnavailable { seat } => {
                write!(f, "seat {seat} is not available")
            }
            SeatingError::IncompleteSeatAssignment => {
                write!(f, "every passenger must have an assigned seat")
            }
            SeatingError::IncompleteBoardingAssignment => {
                write!(f, "every passenger must have a boarding point")
            }
            SeatingError::UnknownPassenger { id } => write!(f, "unknown passenger '{id}'"),
            SeatingError::PhaseMismatch { phase } => {
                write!(f, "operation not allowed in phase {}", phase.as_str())
            }
            SeatingError::GenerationInFlight => {
                write!(f, "contract generation already in progress")
            }
        }
    }
}

impl std::error::Error for SeatingError {}
