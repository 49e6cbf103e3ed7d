//! Scenario: typed seating configuration.
//!
//! # Invariants under test
//!
//! 1. An empty document yields defaults (54 seats, no occupancy, 2s delay).
//! 2. Each occupancy mode maps to the matching OccupancySource.
//! 3. Out-of-range or mistyped values are rejected with CONFIG_INVALID.

use tva_config::{load_layered_yaml_from_strings, SeatingConfig};
use tva_seating::OccupancySource;

fn seating(yaml: &str) -> anyhow::Result<SeatingConfig> {
    load_layered_yaml_from_strings(&[yaml])?.seating()
}

#[test]
fn empty_document_uses_defaults() {
    let cfg = seating("").unwrap();
    assert_eq!(cfg, SeatingConfig::default());
    assert_eq!(cfg.capacity, 54);
    assert_eq!(cfg.occupancy, OccupancySource::None);
    assert_eq!(cfg.generation_delay_ms, 2000);
}

#[test]
fn seeded_mode_defaults_to_thirty_percent() {
    let cfg = seating("occupancy:\n  mode: seeded\n  seed: 11\n").unwrap();
    assert_eq!(
        cfg.occupancy,
        OccupancySource::Seeded {
            percent: 30,
            seed: 11
        }
    );
}

#[test]
fn reserved_mode_lists_seats() {
    let cfg = seating("bus:\n  capacity: 40\noccupancy:\n  mode: reserved\n  reserved: [1, 40]\n")
        .unwrap();
    assert_eq!(cfg.capacity, 40);
    assert_eq!(
        cfg.occupancy,
        OccupancySource::Reserved {
            seats: vec![1, 40]
        }
    );
}

#[test]
fn invalid_values_are_rejected() {
    for yaml in [
        "bus:\n  capacity: 0\n",
        "bus:\n  capacity: 500\n",
        "bus:\n  capacity: -3\n",
        "occupancy:\n  mode: lottery\n",
        "occupancy:\n  mode: seeded\n  percent: 101\n",
        "occupancy:\n  mode: reserved\n  reserved: [0]\n",
        "bus:\n  capacity: 10\noccupancy:\n  mode: reserved\n  reserved: [11]\n",
        "generation:\n  delay_ms: soon\n",
    ] {
        let err = seating(yaml).expect_err(yaml);
        assert!(
            format!("{err:#}").contains("CONFIG_INVALID"),
            "unexpected error for {yaml:?}: {err:#}"
        );
    }
}
