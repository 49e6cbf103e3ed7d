//! Transfer shapes at the boundary with the contract drafting and contract
//! persistence collaborators.

use chrono::{Datelike, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{BoardingMap, Passenger};

const SECS_PER_DAY: i64 = 86_400;

/// Trip as seen by the seating flow.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TripSummary {
    pub name: String,
    /// Catalog key, e.g. `QRO-MAZ-0325`.
    pub clave: String,
    pub departure_date_time: NaiveDateTime,
    #[serde(default)]
    pub return_date_time: Option<NaiveDateTime>,
    #[serde(default)]
    pub boarding_point_options: Vec<String>,
}

impl TripSummary {
    /// Whole days spanned by the trip, rounded up. `None` without a return date.
    pub fn duration_days(&self) -> Option<i64> {
        let ret = self.return_date_time?;
        let secs = (ret - self.departure_date_time).num_seconds().max(0);
        Some((secs + SECS_PER_DAY - 1) / SECS_PER_DAY)
    }
}

/// A person travelling on the contract, as drafted.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TravellerInput {
    pub name: String,
    pub age: u32,
}

impl TravellerInput {
    pub fn new(name: impl Into<String>, age: u32) -> Self {
        Self {
            name: name.into(),
            age,
        }
    }

    /// Draft a traveller from a client record, deriving the age on `today`.
    pub fn from_client(client: &ClientRecord, today: NaiveDate) -> Self {
        Self {
            name: client.name.clone(),
            age: age_on(client.birth_date, today),
        }
    }
}

/// Minimal client record handed over by client management.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientRecord {
    pub name: String,
    pub birth_date: NaiveDate,
}

/// Completed years between `birth` and `today`. Never negative.
pub fn age_on(birth: NaiveDate, today: NaiveDate) -> u32 {
    let mut years = today.year() - birth.year();
    if (today.month(), today.day()) < (birth.month(), birth.day()) {
        years -= 1;
    }
    u32::try_from(years).unwrap_or(0)
}

/// Input from the contract drafting step.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContractContext {
    pub trip_summary: TripSummary,
    pub titular: TravellerInput,
    #[serde(default)]
    pub companions: Vec<TravellerInput>,
}

/// Output handed to contract persistence, exactly once per session.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContractPackage {
    pub session_id: Uuid,
    pub passengers: Vec<Passenger>,
    pub boarding_assignments: BoardingMap,
    pub trip_summary: TripSummary,
}
