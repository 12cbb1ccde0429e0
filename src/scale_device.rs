use serde::Serialize;

/// Name of the single property a scale exposes
pub const WEIGHT_PROPERTY: &str = "weight";

const SCHEMA_CONTEXT: &str = "https://iot.mozilla.org/schemas/";
const DEVICE_DESCRIPTION: &str = "Medisana KS 250";
const WEIGHT_MIN_G: i32 = -5000;
const WEIGHT_MAX_G: i32 = 5000;

/// How the host-visible device id is built from a BLE peripheral id.
///
/// The id is `<prefix><separator><peripheral id>`, e.g. `MedisanaKS250-c8:b2:...`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceIdScheme {
    pub prefix: String,
    pub separator: String,
}

impl DeviceIdScheme {
    pub fn device_id(&self, peripheral_id: &str) -> String {
        format!("{}{}{}", self.prefix, self.separator, peripheral_id)
    }
}

impl Default for DeviceIdScheme {
    fn default() -> Self {
        Self {
            prefix: "MedisanaKS250".to_string(),
            separator: "-".to_string(),
        }
    }
}

/// What the host framework is told about a newly seen scale
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviceDescription {
    #[serde(rename = "@context")]
    pub context: &'static str,
    #[serde(rename = "@type")]
    pub capabilities: Vec<&'static str>,
    pub id: String,
    pub title: String,
    pub description: &'static str,
    pub properties: Vec<PropertyDescription>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertyDescription {
    pub name: &'static str,
    #[serde(rename = "type")]
    pub value_type: &'static str,
    #[serde(rename = "@type")]
    pub semantic_type: &'static str,
    pub minimum: i32,
    pub maximum: i32,
    pub unit: &'static str,
    pub title: &'static str,
    pub description: &'static str,
    pub read_only: bool,
}

impl PropertyDescription {
    /// The weight in grams, as measured on the scale
    pub fn weight() -> Self {
        Self {
            name: WEIGHT_PROPERTY,
            value_type: "number",
            semantic_type: "LevelProperty",
            minimum: WEIGHT_MIN_G,
            maximum: WEIGHT_MAX_G,
            unit: "gram",
            title: "weight",
            description: "The measured weight",
            read_only: true,
        }
    }
}

/// One physical scale seen by the adapter
#[derive(Debug, Clone)]
pub struct ScaleDevice {
    peripheral_id: String,
    id: String,
    weight_g: Option<i32>,
}

impl ScaleDevice {
    pub fn new(peripheral_id: &str, scheme: &DeviceIdScheme) -> Self {
        Self {
            peripheral_id: peripheral_id.to_string(),
            id: scheme.device_id(peripheral_id),
            weight_g: None,
        }
    }

    /// The BLE peripheral id this device was created for
    pub fn peripheral_id(&self) -> &str {
        &self.peripheral_id
    }

    /// The id the host framework knows this device by
    pub fn id(&self) -> &str {
        &self.id
    }

    /// The last weight received in grams, `None` until the first reading
    pub fn weight(&self) -> Option<i32> {
        self.weight_g
    }

    pub(crate) fn set_weight(&mut self, weight_g: i32) {
        self.weight_g = Some(weight_g);
    }

    pub fn description(&self) -> DeviceDescription {
        DeviceDescription {
            context: SCHEMA_CONTEXT,
            capabilities: vec!["MultiLevelSensor"],
            id: self.id.clone(),
            title: self.id.clone(),
            description: DEVICE_DESCRIPTION,
            properties: vec![PropertyDescription::weight()],
        }
    }
}

#[test]
fn test_default_device_id() {
    let device = ScaleDevice::new("c8b21a0f9e31", &DeviceIdScheme::default());
    assert_eq!(device.id(), "MedisanaKS250-c8b21a0f9e31");
    assert_eq!(device.peripheral_id(), "c8b21a0f9e31");
    assert_eq!(device.weight(), None);
}

#[test]
fn test_custom_device_id() {
    let scheme = DeviceIdScheme { prefix: "ks250".to_string(), separator: "_".to_string() };
    assert_eq!(ScaleDevice::new("abc", &scheme).id(), "ks250_abc");
}

#[test]
fn test_description_json() {
    let device = ScaleDevice::new("abc", &DeviceIdScheme::default());
    let json = serde_json::to_value(device.description()).unwrap();
    assert_eq!(json["@context"], "https://iot.mozilla.org/schemas/");
    assert_eq!(json["@type"][0], "MultiLevelSensor");
    assert_eq!(json["title"], "MedisanaKS250-abc");
    let weight = &json["properties"][0];
    assert_eq!(weight["name"], "weight");
    assert_eq!(weight["type"], "number");
    assert_eq!(weight["@type"], "LevelProperty");
    assert_eq!(weight["minimum"], -5000);
    assert_eq!(weight["maximum"], 5000);
    assert_eq!(weight["unit"], "gram");
    assert_eq!(weight["readOnly"], true);
}
