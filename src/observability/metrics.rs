//! Metrics collection.
//!
//! # Metrics
//! - `docket_reloads_total` (counter): reloads by slot and outcome
//! - `docket_snapshot_generation` (gauge): generation of the active snapshot
//! - `docket_relocated_clients_total` (counter): clients moved by area reloads
//! - `docket_startups_total` (counter): boots by outcome
//!
//! # Design Decisions
//! - Recording goes through the `metrics` facade; without an installed
//!   recorder every call is a no-op
//! - Label values are static strings

use crate::document::Slot;

pub fn record_reload(slot: Slot, outcome: &'static str) {
    ::metrics::counter!("docket_reloads_total", "slot" => slot.name(), "outcome" => outcome).increment(1);
}

pub fn record_generation(generation: u64) {
    ::metrics::gauge!("docket_snapshot_generation").set(generation as f64);
}

pub fn record_relocations(count: usize) {
    if count > 0 {
        ::metrics::counter!("docket_relocated_clients_total").increment(count as u64);
    }
}

pub fn record_startup(outcome: &'static str) {
    ::metrics::counter!("docket_startups_total", "outcome" => outcome).increment(1);
}
