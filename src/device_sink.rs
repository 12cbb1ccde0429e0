use std::collections::HashMap;
use std::io::Write;

use anyhow::anyhow;
use serde_json::json;

use crate::scale_device::DeviceDescription;

/// The part of the host framework the adapter talks to.
///
/// Errors returned here are handed back to whoever called the adapter; the
/// adapter itself never retries.
pub trait DeviceSink {
    /// Make the host aware of a new device
    fn register_device(&mut self, device: &DeviceDescription) -> anyhow::Result<()>;

    /// Update the cached value of a device property without notifying anyone
    fn set_value(&mut self, device_id: &str, property: &str, value: i32) -> anyhow::Result<()>;

    /// Tell the host that the cached value of a property changed
    fn notify_changed(&mut self, device_id: &str, property: &str) -> anyhow::Result<()>;
}

impl<S: DeviceSink + ?Sized> DeviceSink for &mut S {
    fn register_device(&mut self, device: &DeviceDescription) -> anyhow::Result<()> {
        (**self).register_device(device)
    }

    fn set_value(&mut self, device_id: &str, property: &str, value: i32) -> anyhow::Result<()> {
        (**self).set_value(device_id, property, value)
    }

    fn notify_changed(&mut self, device_id: &str, property: &str) -> anyhow::Result<()> {
        (**self).notify_changed(device_id, property)
    }
}

/// A `DeviceSink` which writes one JSON message per line, for a host that
/// runs the adapter as a child process and reads its stdout.
pub struct JsonLinesSink<W: Write> {
    out: W,
    values: HashMap<(String, String), i32>,
}

impl<W: Write> JsonLinesSink<W> {
    pub fn new(out: W) -> Self {
        Self { out, values: HashMap::new() }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn send(&mut self, message: serde_json::Value) -> anyhow::Result<()> {
        serde_json::to_writer(&mut self.out, &message)?;
        self.out.write_all(b"\n")?;
        self.out.flush()?;
        Ok(())
    }
}

impl<W: Write> DeviceSink for JsonLinesSink<W> {
    fn register_device(&mut self, device: &DeviceDescription) -> anyhow::Result<()> {
        self.send(json!({ "messageType": "deviceAdded", "data": device }))
    }

    fn set_value(&mut self, device_id: &str, property: &str, value: i32) -> anyhow::Result<()> {
        self.values.insert((device_id.to_string(), property.to_string()), value);
        Ok(())
    }

    fn notify_changed(&mut self, device_id: &str, property: &str) -> anyhow::Result<()> {
        let value = *self
            .values
            .get(&(device_id.to_string(), property.to_string()))
            .ok_or(anyhow!("No cached value for {device_id}/{property}"))?;
        self.send(json!({
            "messageType": "propertyChanged",
            "data": {
                "deviceId": device_id,
                "property": { "name": property, "value": value },
            },
        }))
    }
}

#[cfg(test)]
fn lines(sink: JsonLinesSink<Vec<u8>>) -> Vec<serde_json::Value> {
    String::from_utf8(sink.into_inner())
        .unwrap()
        .lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect()
}

#[test]
fn test_json_lines_device_added() {
    use crate::scale_device::{DeviceIdScheme, ScaleDevice};

    let device = ScaleDevice::new("abc", &DeviceIdScheme::default());
    let mut sink = JsonLinesSink::new(Vec::new());
    sink.register_device(&device.description()).unwrap();

    let messages = lines(sink);
    assert_eq!(messages.len(), 1);
    assert_eq!(messages[0]["messageType"], "deviceAdded");
    assert_eq!(messages[0]["data"]["id"], "MedisanaKS250-abc");
}

#[test]
fn test_json_lines_set_value_is_silent_until_notified() {
    let mut sink = JsonLinesSink::new(Vec::new());
    sink.set_value("dev", "weight", 120).unwrap();
    sink.set_value("dev", "weight", -3).unwrap();
    sink.notify_changed("dev", "weight").unwrap();

    let messages = lines(sink);
    assert_eq!(messages.len(), 1);
    assert_eq!(messages[0]["messageType"], "propertyChanged");
    assert_eq!(messages[0]["data"]["deviceId"], "dev");
    assert_eq!(messages[0]["data"]["property"]["name"], "weight");
    assert_eq!(messages[0]["data"]["property"]["value"], -3);
}

#[test]
fn test_json_lines_notify_without_value() {
    let mut sink = JsonLinesSink::new(Vec::new());
    assert!(sink.notify_changed("dev", "weight").is_err());
    assert!(lines(sink).is_empty());
}
