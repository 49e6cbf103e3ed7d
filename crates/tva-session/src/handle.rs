//! Shared, async handle to one contract session.
//!
//! The session is single-owner: every operation takes the mutex, runs to
//! completion and publishes the resulting events before releasing it, so
//! observers see events in state order. Concurrent seat clicks are resolved
//! first-come; later callers get `SeatUnavailable`.
//!
//! Contract generation is the only long call. It claims the session's single
//! in-flight slot under the lock, releases the lock while persistence runs,
//! then re-takes it to record the outcome. Dropping that call mid-persist
//! resolves the generation as failed.

use std::sync::Arc;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tokio::sync::{broadcast, Mutex};
use tracing::{debug, info, warn};
use uuid::Uuid;

use tva_config::SeatingConfig;
use tva_seating::{
    ContractContext, ContractPackage, ContractSession, GenerationOutcome, OccupancySource,
    SeatNumber, SeatingError, SessionEvent, SessionSnapshot,
};

use crate::{ContractPersistence, ContractReceipt, ReservationSource};

const EVENT_BUS_CAPACITY: usize = 256;

/// What a `generate_contract` call ended with.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "result", rename_all = "snake_case")]
pub enum GenerationResult {
    Generated {
        receipt: ContractReceipt,
        package: ContractPackage,
    },
    /// Another call owns the outstanding generation; this one did nothing.
    AlreadyInFlight,
    /// Persistence refused the contract. The session is back in the boarding
    /// phase and nothing was retried.
    Failed { reason: String },
}

#[derive(Clone)]
pub struct SessionHandle {
    session: Arc<Mutex<ContractSession>>,
    bus: broadcast::Sender<SessionEvent>,
    persistence: Arc<dyn ContractPersistence>,
}

impl SessionHandle {
    /// Open a session: ask `reservations` which seats are taken, lay out the
    /// bus and build the roster.
    pub async fn open(
        ctx: &ContractContext,
        cfg: &SeatingConfig,
        reservations: &dyn ReservationSource,
        persistence: Arc<dyn ContractPersistence>,
    ) -> Result<Self> {
        let reserved = reservations
            .reserved_seats(&ctx.trip_summary, cfg.capacity)
            .await
            .with_context(|| {
                format!(
                    "reservation lookup failed (source={}, trip={})",
                    reservations.source_name(),
                    ctx.trip_summary.clave
                )
            })?;
        let occupancy = OccupancySource::Reserved { seats: reserved };
        let session = ContractSession::open(Uuid::new_v4(), ctx, cfg.capacity, &occupancy);

        info!(
            session_id = %session.session_id(),
            trip = %ctx.trip_summary.clave,
            passengers = session.passengers().len(),
            capacity = cfg.capacity,
            occupied = session.seats().iter().filter(|s| s.occupied).count(),
            reservations = reservations.source_name(),
            persistence = persistence.sink_name(),
            "seating session opened"
        );
        Ok(Self::from_session(session, persistence))
    }

    pub fn from_session(session: ContractSession, persistence: Arc<dyn ContractPersistence>) -> Self {
        let (bus, _rx) = broadcast::channel(EVENT_BUS_CAPACITY);
        Self {
            session: Arc::new(Mutex::new(session)),
            bus,
            persistence,
        }
    }

    /// Receive every event published after this call.
    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.bus.subscribe()
    }

    pub async fn snapshot(&self) -> SessionSnapshot {
        self.session.lock().await.snapshot()
    }

    pub async fn select_passenger(&self, id: &str) -> Result<(), SeatingError> {
        self.apply("select_passenger", |s| s.select_passenger(id)).await
    }

    pub async fn select_seat(&self, number: SeatNumber) -> Result<(), SeatingError> {
        self.apply("select_seat", |s| s.select_seat(number)).await
    }

    /// Focus `passenger_id` and bind it to `number` under one lock, so a
    /// concurrent editor cannot move the focus in between.
    pub async fn assign_seat(&self, passenger_id: &str, number: SeatNumber) -> Result<(), SeatingError> {
        self.apply("assign_seat", |s| {
            s.select_passenger(passenger_id)?;
            s.select_seat(number)
        })
        .await
    }

    pub async fn proceed_to_boarding(&self) -> Result<(), SeatingError> {
        self.apply("proceed_to_boarding", ContractSession::proceed_to_boarding)
            .await
    }

    pub async fn back_to_seats(&self) -> Result<(), SeatingError> {
        self.apply("back_to_seats", ContractSession::back_to_seats).await
    }

    pub async fn update_boarding_point(
        &self,
        passenger_id: &str,
        label: &str,
    ) -> Result<bool, SeatingError> {
        self.apply("update_boarding_point", |s| {
            s.update_boarding_point(passenger_id, label)
        })
        .await
    }

    /// Package the contract and hand it to persistence, at most once at a
    /// time per session.
    pub async fn generate_contract(&self) -> Result<GenerationResult, SeatingError> {
        let package = match self
            .apply("generate_contract", ContractSession::begin_generation)
            .await?
        {
            GenerationOutcome::AlreadyInFlight => {
                debug!("generate_contract ignored: generation already in flight");
                return Ok(GenerationResult::AlreadyInFlight);
            }
            GenerationOutcome::Started(package) => package,
        };

        let session_id = package.session_id;
        info!(%session_id, sink = self.persistence.sink_name(), "contract generation started");

        let mut pending = PendingGeneration {
            session: Arc::clone(&self.session),
            bus: self.bus.clone(),
            armed: true,
        };
        let outcome = self.persistence.persist(&package).await;

        let mut s = self.session.lock().await;
        pending.armed = false;
        let result = match outcome {
            Ok(receipt) => {
                s.complete_generation(Ok(()));
                info!(%session_id, contract_id = %receipt.contract_id, "contract generated");
                GenerationResult::Generated { receipt, package }
            }
            Err(e) => {
                let reason = format!("{e:#}");
                s.complete_generation(Err(reason.clone()));
                warn!(%session_id, %reason, "contract generation failed");
                GenerationResult::Failed { reason }
            }
        };
        self.publish(s.drain_events());
        Ok(result)
    }

    async fn apply<T, F>(&self, op: &'static str, f: F) -> Result<T, SeatingError>
    where
        F: FnOnce(&mut ContractSession) -> Result<T, SeatingError>,
    {
        let mut s = self.session.lock().await;
        let res = f(&mut *s);
        match &res {
            Ok(_) => debug!(op, session_id = %s.session_id(), phase = s.phase().as_str(), "ok"),
            Err(e) => warn!(
                op,
                session_id = %s.session_id(),
                code = e.code(),
                error = %e,
                "rejected"
            ),
        }
        self.publish(s.drain_events());
        res
    }

    fn publish(&self, events: Vec<SessionEvent>) {
        publish(&self.bus, events);
    }
}

fn publish(bus: &broadcast::Sender<SessionEvent>, events: Vec<SessionEvent>) {
    for ev in events {
        // No subscribers is fine.
        let _ = bus.send(ev);
    }
}

const CANCELLED_REASON: &str = "contract generation cancelled";

/// Held across the persistence call. If the `generate_contract` future is
/// dropped before the outcome is recorded, the generation is resolved as
/// failed so the session returns to an idle boarding phase.
struct PendingGeneration {
    session: Arc<Mutex<ContractSession>>,
    bus: broadcast::Sender<SessionEvent>,
    armed: bool,
}

impl Drop for PendingGeneration {
    fn drop(&mut self) {
        if !self.armed {
            return;
        }
        let session = Arc::clone(&self.session);
        let bus = self.bus.clone();

        // Uncontended in practice: the lock is not held while persisting.
        if let Ok(mut s) = session.try_lock() {
            resolve_cancelled(&mut s, &bus);
            return;
        }
        match tokio::runtime::Handle::try_current() {
            Ok(rt) => {
                rt.spawn(async move {
                    let mut s = session.lock().await;
                    resolve_cancelled(&mut s, &bus);
                });
            }
            Err(_) => warn!("generation cancelled outside a runtime; session left in flight"),
        }
    }
}

fn resolve_cancelled(s: &mut ContractSession, bus: &broadcast::Sender<SessionEvent>) {
    if !s.is_generation_in_flight() {
        return;
    }
    s.complete_generation(Err(CANCELLED_REASON.to_string()));
    warn!(session_id = %s.session_id(), "contract generation cancelled before persistence answered");
    publish(bus, s.drain_events());
}
