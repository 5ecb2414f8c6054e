//! Integration tests grouped by training subsystem.

mod common;

#[path = "training/gbdt.rs"]
mod gbdt;

#[path = "training/evaluation.rs"]
mod evaluation;
