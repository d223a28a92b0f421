//! # Printer Module
//!
//! Printer hardware profiles.
//!
//! - [`config`]: hardware limits used by graphics validation and the simulator

pub mod config;

pub use config::PrinterConfig;
