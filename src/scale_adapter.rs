use std::collections::hash_map::Entry;
use std::collections::HashMap;

use tracing::{debug, info, trace, warn};

use crate::config::AdapterConfig;
use crate::device_sink::DeviceSink;
use crate::error::{Error, Result};
use crate::message::weight_message;
use crate::scale_device::{DeviceIdScheme, ScaleDevice, WEIGHT_PROPERTY};

/// One advertisement as reported by the BLE scanner
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Advertisement {
    /// Scanner-assigned id of the peripheral, stable for the scanning session
    pub peripheral_id: String,
    pub local_name: Option<String>,
    /// Raw manufacturer specific data, company id included
    pub manufacturer_data: Option<Vec<u8>>,
}

/// Keeps track of every scale seen so far and forwards their readings to the
/// host framework.
///
/// A device is registered with the host the first time an advertisement with
/// the expected local name arrives for its peripheral id, and is kept for the
/// rest of the process lifetime.
pub struct ScaleAdapter<S: DeviceSink> {
    local_name: String,
    id_scheme: DeviceIdScheme,
    sink: S,
    known_devices: HashMap<String, ScaleDevice>,
}

impl<S: DeviceSink> ScaleAdapter<S> {
    pub fn new(config: &AdapterConfig, sink: S) -> Self {
        Self {
            local_name: config.local_name.clone(),
            id_scheme: config.id_scheme(),
            sink,
            known_devices: HashMap::new(),
        }
    }

    /// Handle a single advertisement.
    ///
    /// Advertisements from other devices are ignored. A payload that cannot be
    /// decoded is logged and skipped. Only failures of the sink are returned.
    pub fn on_advertisement(&mut self, advertisement: &Advertisement) -> Result<()> {
        if advertisement.local_name.as_deref() != Some(self.local_name.as_str()) {
            trace!(peripheral = %advertisement.peripheral_id, "Ignoring {:?}", advertisement.local_name);
            return Ok(());
        }

        let device = match self.known_devices.entry(advertisement.peripheral_id.clone()) {
            Entry::Occupied(entry) => entry.into_mut(),
            Entry::Vacant(entry) => {
                info!("Detected new Medisana KS 250 {}", entry.key());
                let device = ScaleDevice::new(entry.key(), &self.id_scheme);
                self.sink.register_device(&device.description()).map_err(Error::Sink)?;
                entry.insert(device)
            }
        };

        let Some(data) = advertisement.manufacturer_data.as_deref() else {
            return Ok(());
        };

        debug!("SCALE {}: RX manufacturer data: 0x{}", device.id(), hex::encode(data));

        let weight_g = match weight_message::decode(data) {
            Ok(weight_g) => weight_g,
            Err(err) => {
                warn!("SCALE {}: Skipping advertisement: {err}", device.id());
                return Ok(());
            }
        };

        debug!("SCALE {}: weight {weight_g} g", device.id());

        device.set_weight(weight_g);
        self.sink.set_value(device.id(), WEIGHT_PROPERTY, weight_g).map_err(Error::Sink)?;
        self.sink.notify_changed(device.id(), WEIGHT_PROPERTY).map_err(Error::Sink)?;

        Ok(())
    }

    pub fn device(&self, peripheral_id: &str) -> Option<&ScaleDevice> {
        self.known_devices.get(peripheral_id)
    }

    pub fn devices(&self) -> impl Iterator<Item = &ScaleDevice> {
        self.known_devices.values()
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn into_sink(self) -> S {
        self.sink
    }
}
