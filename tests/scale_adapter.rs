//! Behaviour of the scale registry against a recording device sink.

use anyhow::anyhow;
use ks250::{AdapterConfig, Advertisement, DeviceDescription, DeviceSink, Error, ScaleAdapter};

#[derive(Debug, PartialEq, Eq)]
enum Call {
    Register(String),
    SetValue(String, String, i32),
    NotifyChanged(String, String),
}

#[derive(Default)]
struct RecordingSink {
    calls: Vec<Call>,
    fail_register: bool,
    fail_notify: bool,
}

impl DeviceSink for RecordingSink {
    fn register_device(&mut self, device: &DeviceDescription) -> anyhow::Result<()> {
        if self.fail_register {
            return Err(anyhow!("gateway refused {}", device.id));
        }
        self.calls.push(Call::Register(device.id.clone()));
        Ok(())
    }

    fn set_value(&mut self, device_id: &str, property: &str, value: i32) -> anyhow::Result<()> {
        self.calls.push(Call::SetValue(device_id.to_string(), property.to_string(), value));
        Ok(())
    }

    fn notify_changed(&mut self, device_id: &str, property: &str) -> anyhow::Result<()> {
        if self.fail_notify {
            return Err(anyhow!("gateway went away"));
        }
        self.calls.push(Call::NotifyChanged(device_id.to_string(), property.to_string()));
        Ok(())
    }
}

fn advertisement(peripheral_id: &str, local_name: &str, manufacturer_data: Option<&str>) -> Advertisement {
    Advertisement {
        peripheral_id: peripheral_id.to_string(),
        local_name: Some(local_name.to_string()),
        manufacturer_data: manufacturer_data.map(|h| hex::decode(h).unwrap()),
    }
}

fn new_adapter() -> ScaleAdapter<RecordingSink> {
    ScaleAdapter::new(&AdapterConfig::default(), RecordingSink::default())
}

#[test]
fn first_sighting_registers_and_publishes() {
    let mut adapter = new_adapter();
    adapter.on_advertisement(&advertisement("p1", "KS250", Some("a0ac0000100020"))).unwrap();

    assert_eq!(adapter.device("p1").unwrap().weight(), Some(258));
    assert_eq!(
        adapter.sink().calls,
        vec![
            Call::Register("MedisanaKS250-p1".to_string()),
            Call::SetValue("MedisanaKS250-p1".to_string(), "weight".to_string(), 258),
            Call::NotifyChanged("MedisanaKS250-p1".to_string(), "weight".to_string()),
        ]
    );
}

#[test]
fn repeated_sightings_register_once() {
    let mut adapter = new_adapter();
    adapter.on_advertisement(&advertisement("p1", "KS250", None)).unwrap();
    adapter.on_advertisement(&advertisement("p1", "KS250", Some("0800100020"))).unwrap();
    adapter.on_advertisement(&advertisement("p1", "other", Some("0000100020"))).unwrap();

    assert_eq!(adapter.devices().count(), 1);
    assert_eq!(adapter.device("p1").unwrap().weight(), Some(-258));
    let registrations = adapter.sink().calls.iter().filter(|c| matches!(c, Call::Register(_))).count();
    assert_eq!(registrations, 1);
}

#[test]
fn distinct_peripherals_get_distinct_devices() {
    let mut adapter = new_adapter();
    adapter.on_advertisement(&advertisement("p1", "KS250", Some("0000100020"))).unwrap();
    adapter.on_advertisement(&advertisement("p2", "KS250", Some("0800100020"))).unwrap();

    assert_eq!(adapter.devices().count(), 2);
    assert_eq!(adapter.device("p1").unwrap().weight(), Some(258));
    assert_eq!(adapter.device("p2").unwrap().weight(), Some(-258));
    assert_eq!(adapter.device("p2").unwrap().id(), "MedisanaKS250-p2");
}

#[test]
fn other_local_names_are_ignored() {
    let mut adapter = new_adapter();
    adapter.on_advertisement(&advertisement("p1", "KS251", Some("0000100020"))).unwrap();
    adapter
        .on_advertisement(&Advertisement {
            peripheral_id: "p2".to_string(),
            local_name: None,
            manufacturer_data: Some(vec![0; 5]),
        })
        .unwrap();

    assert_eq!(adapter.devices().count(), 0);
    assert!(adapter.sink().calls.is_empty());
}

#[test]
fn missing_payload_keeps_last_weight() {
    let mut adapter = new_adapter();
    adapter.on_advertisement(&advertisement("p1", "KS250", Some("0000100020"))).unwrap();
    let calls_before = adapter.sink().calls.len();

    adapter.on_advertisement(&advertisement("p1", "KS250", None)).unwrap();

    assert_eq!(adapter.device("p1").unwrap().weight(), Some(258));
    assert_eq!(adapter.sink().calls.len(), calls_before);
}

#[test]
fn first_sighting_without_payload_leaves_weight_unset() {
    let mut adapter = new_adapter();
    adapter.on_advertisement(&advertisement("p1", "KS250", None)).unwrap();

    assert_eq!(adapter.device("p1").unwrap().weight(), None);
    assert_eq!(adapter.sink().calls, vec![Call::Register("MedisanaKS250-p1".to_string())]);
}

#[test]
fn short_payload_is_skipped_and_stream_continues() {
    let mut adapter = new_adapter();
    adapter.on_advertisement(&advertisement("p1", "KS250", Some("0000100020"))).unwrap();
    adapter.on_advertisement(&advertisement("p1", "KS250", Some("a0ac"))).unwrap();

    assert_eq!(adapter.device("p1").unwrap().weight(), Some(258));

    adapter.on_advertisement(&advertisement("p1", "KS250", Some("0800100020"))).unwrap();
    assert_eq!(adapter.device("p1").unwrap().weight(), Some(-258));
    assert_eq!(adapter.sink().calls.len(), 5);
}

#[test]
fn custom_naming_scheme() {
    let config = AdapterConfig::from_json(r#"{"adapter_name": "kitchen", "id_separator": "/", "local_name": "KS"}"#).unwrap();
    let mut adapter = ScaleAdapter::new(&config, RecordingSink::default());
    adapter.on_advertisement(&advertisement("p1", "KS", None)).unwrap();

    assert_eq!(adapter.device("p1").unwrap().id(), "kitchen/p1");
    assert_eq!(adapter.sink().calls, vec![Call::Register("kitchen/p1".to_string())]);
}

#[test]
fn register_failure_is_surfaced() {
    let sink = RecordingSink { fail_register: true, ..RecordingSink::default() };
    let mut adapter = ScaleAdapter::new(&AdapterConfig::default(), sink);

    let result = adapter.on_advertisement(&advertisement("p1", "KS250", Some("0000100020")));

    assert!(matches!(result, Err(Error::Sink(_))));
    assert!(adapter.device("p1").is_none());
}

#[test]
fn notify_failure_is_surfaced() {
    let sink = RecordingSink { fail_notify: true, ..RecordingSink::default() };
    let mut adapter = ScaleAdapter::new(&AdapterConfig::default(), sink);

    let result = adapter.on_advertisement(&advertisement("p1", "KS250", Some("0000100020")));

    assert!(matches!(result, Err(Error::Sink(_))));
    // the reading itself was taken
    assert_eq!(adapter.device("p1").unwrap().weight(), Some(258));
}

#[test]
fn borrowed_sink() {
    let mut sink = RecordingSink::default();
    {
        let mut adapter = ScaleAdapter::new(&AdapterConfig::default(), &mut sink);
        adapter.on_advertisement(&advertisement("p1", "KS250", Some("0000100020"))).unwrap();
    }
    assert_eq!(sink.calls.len(), 3);
}
