//! ah-process: air-handling process engine.
//!
//! Provides:
//! - `Process` / `ProcessKind`: the eight process types and their parameters
//! - `ProcessEngine`: computes the outlet point and energy balance of a process
//! - `AirStream` and `validate_balance`: supply/exhaust airflow checks

pub mod airflow;
pub mod common;
pub mod engine;
pub mod error;
pub mod process;

pub use airflow::{
    AirStream, AirflowBalance, BalanceSettings, StreamKind, check_mass_flows, expected_mass_flow,
    validate_balance,
};
pub use engine::{Applied, ProcessEngine};
pub use error::{ProcessError, ProcessResult};
pub use process::{
    AirSupplyParams, CoilDuty, CoilParams, ExchangerEfficiency, FanParams, HeatExchangeParams,
    HumidifierType, MixingParams, MixingShare, MoistureParams, Process, ProcessKind,
    ProcessResults,
};
