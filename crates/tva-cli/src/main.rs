use std::fs;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use tracing::{info, warn};

use tva_config::{LoadedConfig, SeatingConfig, UnusedKeyPolicy, MAX_CAPACITY};
use tva_seating::{seat_map, ContractContext, OccupancySource, Seat, DEFAULT_CAPACITY};
use tva_session::{reservation_source_for, GenerationResult, SessionHandle, SimulatedPersistence};

#[derive(Parser)]
#[command(name = "tva")]
#[command(about = "Trip contract seating CLI", long_about = None)]
struct Cli {
    #[command(subcommand)]
    cmd: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print a bus layout, row by row
    SeatMap {
        #[arg(long, default_value_t = DEFAULT_CAPACITY)]
        capacity: u32,

        /// Pre-occupy roughly this percentage of seats (0..=100)
        #[arg(long)]
        percent: Option<u32>,

        /// Seed for the occupancy draw
        #[arg(long, default_value_t = 0)]
        seed: u64,

        /// Print seats as JSON instead of rows
        #[arg(long, default_value_t = false)]
        json: bool,
    },

    /// Compute layered config hash + print canonical JSON
    ConfigHash {
        /// Paths in merge order (base -> env -> overrides...)
        #[arg(required = true)]
        paths: Vec<String>,
    },

    /// Run one session end to end: seat everyone, assign boarding points,
    /// generate the contract. Prints the persisted package.
    Simulate {
        /// Contract context JSON (trip summary, titular, companions)
        #[arg(long)]
        context: String,

        /// Layered config paths in merge order
        #[arg(long = "config")]
        config_paths: Vec<String>,

        /// Boarding point for every passenger (default: the trip's first option)
        #[arg(long)]
        boarding: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env.local if present. Silent when missing.
    let _ = dotenvy::from_filename(".env.local");

    init_tracing();

    let cli = Cli::parse();

    match cli.cmd {
        Commands::SeatMap {
            capacity,
            percent,
            seed,
            json,
        } => {
            if capacity == 0 || capacity > MAX_CAPACITY {
                bail!("capacity must be in 1..={MAX_CAPACITY} (got {capacity})");
            }
            let occupancy = match percent {
                None => OccupancySource::None,
                Some(p) if p > 100 => bail!("percent must be in 0..=100 (got {p})"),
                Some(p) => OccupancySource::Seeded { percent: p, seed },
            };
            let seats = seat_map::generate_with(capacity, &occupancy);
            if json {
                println!("{}", serde_json::to_string_pretty(&seats)?);
            } else {
                print_rows(&seats);
            }
        }

        Commands::ConfigHash { paths } => {
            let loaded = load_config(&paths)?;
            println!("config_hash={}", loaded.config_hash);
            println!("{}", loaded.canonical_json);
        }

        Commands::Simulate {
            context,
            config_paths,
            boarding,
        } => {
            let raw = fs::read_to_string(&context)
                .with_context(|| format!("failed to read context: {context}"))?;
            let ctx: ContractContext = serde_json::from_str(&raw)
                .with_context(|| format!("invalid context json: {context}"))?;

            let cfg = if config_paths.is_empty() {
                SeatingConfig::default()
            } else {
                let loaded = load_config(&config_paths)?;
                info!(config_hash = %loaded.config_hash, "config loaded");
                loaded.seating()?
            };

            let default_label = ctx.trip_summary.boarding_point_options.first().cloned();
            let label = match boarding.or(default_label) {
                Some(l) if !l.trim().is_empty() => l,
                _ => bail!("trip has no boarding point options; pass --boarding"),
            };

            let handle = SessionHandle::open(
                &ctx,
                &cfg,
                reservation_source_for(&cfg).as_ref(),
                Arc::new(SimulatedPersistence::new(Duration::from_millis(
                    cfg.generation_delay_ms,
                ))),
            )
            .await?;

            seat_in_roster_order(&handle).await?;
            handle.proceed_to_boarding().await?;
            let ids: Vec<String> = handle
                .snapshot()
                .await
                .passengers
                .into_iter()
                .map(|p| p.id)
                .collect();
            for id in &ids {
                handle.update_boarding_point(id, &label).await?;
            }

            match handle.generate_contract().await? {
                GenerationResult::Generated { receipt, package } => {
                    info!(contract_id = %receipt.contract_id, "contract generated");
                    println!("{}", serde_json::to_string_pretty(&package)?);
                }
                GenerationResult::AlreadyInFlight => bail!("contract generation already in flight"),
                GenerationResult::Failed { reason } => bail!("contract generation failed: {reason}"),
            }
        }
    }

    Ok(())
}

fn init_tracing() {
    // stdout carries command output; logs go to stderr.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn load_config(paths: &[String]) -> Result<LoadedConfig> {
    let path_refs: Vec<&str> = paths.iter().map(|s| s.as_str()).collect();
    let loaded = tva_config::load_layered_yaml(&path_refs)?;
    let report = tva_config::report_unused_keys(&loaded.config_json, UnusedKeyPolicy::Warn)?;
    for leaf in &report.unused_leaf_pointers {
        warn!(leaf = %leaf, "unused config key");
    }
    Ok(loaded)
}

/// Guided flow: each passenger, in roster order, takes the lowest free seat.
async fn seat_in_roster_order(handle: &SessionHandle) -> Result<()> {
    let snap = handle.snapshot().await;
    let mut free = snap.seats.iter().filter(|s| s.is_free()).map(|s| s.number);
    for p in &snap.passengers {
        let Some(seat) = free.next() else {
            bail!(
                "not enough free seats for {} passengers (capacity {})",
                snap.passengers.len(),
                snap.seats.len()
            );
        };
        handle.assign_seat(&p.id, seat).await?;
    }
    Ok(())
}

fn print_rows(seats: &[Seat]) {
    for (i, row) in seat_map::rows(seats).iter().enumerate() {
        let cells: Vec<String> = row
            .iter()
            .map(|slot| match slot {
                Some(s) => format!("{:>3}{}", s.number, if s.occupied { 'x' } else { '.' }),
                None => "    ".to_string(),
            })
            .collect();
        println!("{:>2} | {} {}   {} {}", i + 1, cells[0], cells[1], cells[2], cells[3]);
    }
    let occupied = seats.iter().filter(|s| s.occupied).count();
    println!(
        "capacity={} occupied={} available={}",
        seats.len(),
        occupied,
        seats.len() - occupied
    );
}
