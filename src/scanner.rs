//! Feed BLE advertisements from the platform Bluetooth stack into a [`ScaleAdapter`].
//!
//! The scale never accepts connections for its weight data. It broadcasts the
//! current reading in the manufacturer specific data of its advertisements, so
//! all that is needed is a passive scan with duplicate reporting.

use bluest::Adapter;
use bluest::AdvertisingDevice;
use futures_util::StreamExt;
use tracing::{info, warn};

use crate::device_sink::DeviceSink;
use crate::error::{Error, Result};
use crate::scale_adapter::{Advertisement, ScaleAdapter};

pub struct ScaleScanner {
    adapter: Adapter,
}

impl ScaleScanner {
    /// Open the default BLE adapter and wait for it to be powered on.
    pub async fn new() -> Result<Self> {
        let adapter = bluest::Adapter::default().await.ok_or(Error::AdapterUnavailable)?;
        adapter.wait_available().await?;
        info!("BLE adapter is available");

        Ok(Self { adapter })
    }

    /// Scan until the advertisement stream ends, handing every advertisement to
    /// `scale_adapter`.
    ///
    /// Returns early if the BLE layer or the device sink fails.
    pub async fn run<S: DeviceSink>(&self, scale_adapter: &mut ScaleAdapter<S>) -> Result<()> {
        info!("Start scanning for devices");
        let mut adapter_events = self.adapter.scan(&[]).await?;
        while let Some(device) = adapter_events.next().await {
            scale_adapter.on_advertisement(&Self::advertisement(&device))?;
        }

        warn!("End of advertisement stream");
        Ok(())
    }

    fn advertisement(device: &AdvertisingDevice) -> Advertisement {
        let local_name = device
            .adv_data
            .local_name
            .clone()
            .or_else(|| device.device.name().ok());
        let manufacturer_data = device
            .adv_data
            .manufacturer_data
            .as_ref()
            .map(|md| manufacturer_buffer(md.company_id, &md.data));

        Advertisement {
            peripheral_id: device.device.id().to_string(),
            local_name,
            manufacturer_data,
        }
    }
}

/// Rebuild the manufacturer specific AD structure as it appears on air: the
/// company id in little endian followed by the vendor bytes.
fn manufacturer_buffer(company_id: u16, data: &[u8]) -> Vec<u8> {
    let mut buffer = Vec::with_capacity(data.len() + 2);
    buffer.extend_from_slice(&company_id.to_le_bytes());
    buffer.extend_from_slice(data);
    buffer
}

#[test]
fn test_manufacturer_buffer() {
    let data = hex::decode("0000100020").unwrap();
    let buffer = manufacturer_buffer(0xaca0, &data);
    assert_eq!(hex::encode(&buffer), "a0ac0000100020");
    assert_eq!(crate::decode(&buffer), Ok(258));
}

#[test]
fn test_manufacturer_buffer_short_data() {
    // the company id alone is not enough to make a reading
    let buffer = manufacturer_buffer(0xaca0, &[0x12, 0x34]);
    assert_eq!(buffer.len(), 4);
    assert!(crate::decode(&buffer).is_err());
}
