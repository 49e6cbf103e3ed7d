use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tva_seating::{OccupancySource, SeatNumber, DEFAULT_CAPACITY};

/// Largest bus layout accepted from configuration.
pub const MAX_CAPACITY: u32 = 120;

const DEFAULT_SEEDED_PERCENT: u32 = 30;
const DEFAULT_GENERATION_DELAY_MS: u64 = 2_000;

/// Typed seating configuration.
///
/// ```yaml
/// bus:
///   capacity: 54
/// occupancy:
///   mode: seeded        # none | seeded | reserved
///   percent: 30
///   seed: 7
///   reserved: [3, 4]    # mode: reserved only
/// generation:
///   delay_ms: 2000
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeatingConfig {
    pub capacity: u32,
    pub occupancy: OccupancySource,
    /// Latency of the simulated contract persistence call.
    pub generation_delay_ms: u64,
}

impl Default for SeatingConfig {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_CAPACITY,
            occupancy: OccupancySource::None,
            generation_delay_ms: DEFAULT_GENERATION_DELAY_MS,
        }
    }
}

impl SeatingConfig {
    /// Build from the merged config JSON produced by `load_layered_yaml*`.
    /// Every key is optional; present keys are validated.
    pub fn from_config_json(cfg: &Value) -> Result<Self> {
        let defaults = Self::default();

        let capacity = match opt_u64(cfg, "/bus/capacity")? {
            None => defaults.capacity,
            Some(n) => {
                let n = u32::try_from(n).unwrap_or(u32::MAX);
                if n == 0 || n > MAX_CAPACITY {
                    bail!("CONFIG_INVALID bus.capacity must be in 1..={MAX_CAPACITY} (got {n})");
                }
                n
            }
        };

        let mode = match cfg.pointer("/occupancy/mode") {
            None | Some(Value::Null) => "none",
            Some(v) => v
                .as_str()
                .context("CONFIG_INVALID occupancy.mode must be a string")?,
        };

        let occupancy = match mode {
            "none" => OccupancySource::None,
            "seeded" => {
                let percent = opt_u64(cfg, "/occupancy/percent")?
                    .unwrap_or(u64::from(DEFAULT_SEEDED_PERCENT));
                if percent > 100 {
                    bail!("CONFIG_INVALID occupancy.percent must be in 0..=100 (got {percent})");
                }
                OccupancySource::Seeded {
                    percent: percent as u32,
                    seed: opt_u64(cfg, "/occupancy/seed")?.unwrap_or(0),
                }
            }
            "reserved" => OccupancySource::Reserved {
                seats: reserved_seats(cfg, capacity)?,
            },
            other => bail!(
                "CONFIG_INVALID occupancy.mode must be one of none|seeded|reserved (got '{other}')"
            ),
        };

        let generation_delay_ms =
            opt_u64(cfg, "/generation/delay_ms")?.unwrap_or(defaults.generation_delay_ms);

        Ok(Self {
            capacity,
            occupancy,
            generation_delay_ms,
        })
    }
}

fn opt_u64(cfg: &Value, ptr: &str) -> Result<Option<u64>> {
    match cfg.pointer(ptr) {
        None | Some(Value::Null) => Ok(None),
        Some(v) => v
            .as_u64()
            .map(Some)
            .with_context(|| format!("CONFIG_INVALID {ptr} must be a non-negative integer")),
    }
}

fn reserved_seats(cfg: &Value, capacity: u32) -> Result<Vec<SeatNumber>> {
    let Some(v) = cfg.pointer("/occupancy/reserved") else {
        return Ok(Vec::new());
    };
    let arr = v
        .as_array()
        .context("CONFIG_INVALID occupancy.reserved must be a list of seat numbers")?;
    arr.iter()
        .map(|item| -> Result<SeatNumber> {
            let n = item
                .as_u64()
                .context("CONFIG_INVALID occupancy.reserved entries must be integers")?;
            match u32::try_from(n) {
                Ok(seat) if (1..=capacity).contains(&seat) => Ok(seat),
                _ => bail!("CONFIG_INVALID occupancy.reserved seat {n} outside 1..={capacity}"),
            }
        })
        .collect()
}
