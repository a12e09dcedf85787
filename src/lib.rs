//! Payroll Run Computation Engine
//!
//! This crate turns a pay period into a persisted payroll run: it selects every
//! active employee with exactly one usable contract, derives one payroll line
//! per active salary component of that contract, aggregates the lines into
//! payslip amounts and the payslips into run totals, all inside a single store
//! transaction that either commits completely or leaves nothing behind.

#![warn(missing_docs)]

pub mod calculation;
pub mod catalog;
pub mod config;
pub mod error;
pub mod models;
pub mod run;
pub mod service;
pub mod store;

pub use error::{EngineError, EngineResult, ErrorKind};
pub use run::{GeneratedRun, RunChanges, RunOutcome, RunStage};
pub use service::PayrollService;
