//! Publish the weight broadcast by a Medisana KS 250 kitchen scale over Bluetooth Low Energy
//! as a device of a smart-home gateway.
//!
//! The scale needs no connection. Whenever it is switched on it advertises under the local
//! name `KS250` and puts the current reading into the last 5 bytes of the manufacturer
//! specific data of every advertisement.
//!
//! The crate is split in three parts:
//!
//! - [`decode`] / [`WeightMessage`]: turn a manufacturer data buffer into grams
//! - [`ScaleAdapter`]: remember every scale seen so far and push readings to a [`DeviceSink`]
//! - [`ScaleScanner`]: feed advertisements from the platform BLE stack into a `ScaleAdapter`
//!
//! # Example
//!
//! ```no_run
//! # #[tokio::main]
//! # pub async fn main() -> anyhow::Result<()> {
//!     let config = ks250::AdapterConfig::default();
//!     let sink = ks250::JsonLinesSink::new(std::io::stdout());
//!     let mut scale_adapter = ks250::ScaleAdapter::new(&config, sink);
//!     let scanner = ks250::ScaleScanner::new().await?;
//!     scanner.run(&mut scale_adapter).await?;
//! #   Ok(())
//! # }
//! ```

mod config;
mod device_sink;
mod error;
pub mod logging;
mod message;
mod scale_adapter;
mod scale_device;
mod scanner;

pub use config::AdapterConfig;
pub use device_sink::{DeviceSink, JsonLinesSink};
pub use error::{DecodeError, Error, Result};
pub use message::weight_message::{decode, WeightMessage};
pub use scale_adapter::{Advertisement, ScaleAdapter};
pub use scale_device::{DeviceDescription, DeviceIdScheme, PropertyDescription, ScaleDevice, WEIGHT_PROPERTY};
pub use scanner::ScaleScanner;
