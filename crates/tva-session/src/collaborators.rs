//! Boundaries to the out-of-scope systems: the reservation inventory (who
//! already sits where) and contract persistence (where finished contracts go).

use std::sync::Mutex;
use std::time::Duration;

use anyhow::{anyhow, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use uuid::Uuid;

use tva_config::SeatingConfig;
use tva_seating::{seat_map, ContractPackage, OccupancySource, SeatNumber, TripSummary};

// ---------------------------------------------------------------------------
// Reservations
// ---------------------------------------------------------------------------

/// Pre-existing reservations for a trip's bus.
#[async_trait::async_trait]
pub trait ReservationSource: Send + Sync {
    fn source_name(&self) -> &'static str;

    /// Seats already sold on this trip. Numbers outside `1..=capacity` are
    /// ignored by the layout.
    async fn reserved_seats(&self, trip: &TripSummary, capacity: u32) -> Result<Vec<SeatNumber>>;
}

/// Empty bus.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoReservations;

#[async_trait::async_trait]
impl ReservationSource for NoReservations {
    fn source_name(&self) -> &'static str {
        "none"
    }

    async fn reserved_seats(&self, _trip: &TripSummary, _capacity: u32) -> Result<Vec<SeatNumber>> {
        Ok(Vec::new())
    }
}

/// A fixed list, e.g. loaded from config.
#[derive(Debug, Clone, Default)]
pub struct FixedReservations(pub Vec<SeatNumber>);

#[async_trait::async_trait]
impl ReservationSource for FixedReservations {
    fn source_name(&self) -> &'static str {
        "fixed"
    }

    async fn reserved_seats(&self, _trip: &TripSummary, _capacity: u32) -> Result<Vec<SeatNumber>> {
        Ok(self.0.clone())
    }
}

/// Deterministic stand-in for the reservation inventory: each seat taken with
/// probability `percent / 100`, drawn from `seed`.
#[derive(Debug, Clone, Copy)]
pub struct SimulatedReservations {
    pub percent: u32,
    pub seed: u64,
}

#[async_trait::async_trait]
impl ReservationSource for SimulatedReservations {
    fn source_name(&self) -> &'static str {
        "simulated"
    }

    async fn reserved_seats(&self, _trip: &TripSummary, capacity: u32) -> Result<Vec<SeatNumber>> {
        let src = OccupancySource::Seeded {
            percent: self.percent,
            seed: self.seed,
        };
        Ok(seat_map::generate_with(capacity, &src)
            .into_iter()
            .filter(|s| s.occupied)
            .map(|s| s.number)
            .collect())
    }
}

/// Reservation source described by configuration.
pub fn reservation_source_for(cfg: &SeatingConfig) -> Box<dyn ReservationSource> {
    match &cfg.occupancy {
        OccupancySource::None => Box::new(NoReservations),
        OccupancySource::Seeded { percent, seed } => Box::new(SimulatedReservations {
            percent: *percent,
            seed: *seed,
        }),
        OccupancySource::Reserved { seats } => Box::new(FixedReservations(seats.clone())),
    }
}

// ---------------------------------------------------------------------------
// Contract persistence
// ---------------------------------------------------------------------------

/// Acknowledgement from contract persistence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContractReceipt {
    pub contract_id: Uuid,
    pub session_id: Uuid,
    pub persisted_at: DateTime<Utc>,
}

impl ContractReceipt {
    fn for_package(package: &ContractPackage) -> Self {
        Self {
            contract_id: Uuid::new_v4(),
            session_id: package.session_id,
            persisted_at: Utc::now(),
        }
    }
}

/// Where finished contracts go.
///
/// Not idempotent: callers must not invoke `persist` twice for one session.
#[async_trait::async_trait]
pub trait ContractPersistence: Send + Sync {
    fn sink_name(&self) -> &'static str;

    async fn persist(&self, package: &ContractPackage) -> Result<ContractReceipt>;
}

/// Waits a fixed delay, logs the package and acknowledges it.
#[derive(Debug, Clone, Copy)]
pub struct SimulatedPersistence {
    pub delay: Duration,
}

impl SimulatedPersistence {
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }
}

#[async_trait::async_trait]
impl ContractPersistence for SimulatedPersistence {
    fn sink_name(&self) -> &'static str {
        "simulated"
    }

    async fn persist(&self, package: &ContractPackage) -> Result<ContractReceipt> {
        tokio::time::sleep(self.delay).await;
        let receipt = ContractReceipt::for_package(package);
        info!(
            session_id = %package.session_id,
            contract_id = %receipt.contract_id,
            trip = %package.trip_summary.clave,
            passengers = package.passengers.len(),
            "contract persisted (simulated)"
        );
        debug!(
            package = %serde_json::to_string(package).unwrap_or_default(),
            "contract package"
        );
        Ok(receipt)
    }
}

/// Keeps every persisted package in memory. Can be told to fail.
#[derive(Debug, Default)]
pub struct InMemoryPersistence {
    delay: Duration,
    failure: Mutex<Option<String>>,
    calls: Mutex<usize>,
    stored: Mutex<Vec<ContractPackage>>,
}

impl InMemoryPersistence {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_delay(delay: Duration) -> Self {
        Self {
            delay,
            ..Self::default()
        }
    }

    /// While set, every `persist` call fails with `reason`.
    pub fn set_failure(&self, reason: Option<&str>) {
        *lock(&self.failure) = reason.map(str::to_string);
    }

    /// Number of `persist` calls received, failed ones included.
    pub fn calls(&self) -> usize {
        *lock(&self.calls)
    }

    pub fn stored(&self) -> Vec<ContractPackage> {
        lock(&self.stored).clone()
    }
}

#[async_trait::async_trait]
impl ContractPersistence for InMemoryPersistence {
    fn sink_name(&self) -> &'static str {
        "in_memory"
    }

    async fn persist(&self, package: &ContractPackage) -> Result<ContractReceipt> {
        *lock(&self.calls) += 1;
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        if let Some(reason) = lock(&self.failure).clone() {
            return Err(anyhow!("CONTRACT_PERSIST_FAILED: {reason}"));
        }
        lock(&self.stored).push(package.clone());
        Ok(ContractReceipt::for_package(package))
    }
}

// Poisoned guards still hold a usable counter/list.
fn lock<T>(m: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    m.lock().unwrap_or_else(|e| e.into_inner())
}
