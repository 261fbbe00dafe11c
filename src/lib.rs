//! # hammerqr - QR configurator for the hammer impact measurement device
//!
//! The device is configured by scanning a QR code. This crate keeps the
//! editable form state derived from the device's configuration schema and
//! turns it into the compact `key=value;...` text that the QR code carries.
//!
//! ## Architecture
//!
//! - `schema`: the static section/field table
//! - `state`: editable items built from the schema
//! - `store`: canonical form state, bulk resets and merge-back of edits
//! - `visibility`: advanced/basic projection of the state
//! - `payload`: QR payload serialization and its live, timer-driven variant
//! - `timezone`: device clock timestamps
//! - `persistence`: optional local cache of the form state
//! - `config`: YAML application configuration
//! - `logging`: structured logging and tracing
//! - `web`: HTTP API consumed by the browser front-end

pub mod config;
pub mod error;
pub mod logging;
pub mod payload;
pub mod persistence;
pub mod schema;
pub mod state;
pub mod store;
pub mod timezone;
pub mod visibility;
#[cfg(feature = "web")]
pub mod web;


// Re-export commonly used types
pub use config::Config;
pub use error::{HammerError, Result};
pub use payload::{LivePayload, QrPayload};
pub use store::ConfigStore;
