use serde::{Deserialize, Serialize, de::DeserializeOwned};
use serde_json::Value;

/// A decoded response body together with the JSON document it came from.
///
/// Tables and control flow read `data`. `--format json` prints `raw`, so
/// fields the wire types leave out are shown as the API sent them.
#[derive(Debug, Clone, PartialEq)]
pub struct Received<T> {
    pub data: T,
    pub raw: Value,
}

impl<T: DeserializeOwned> Received<T> {
    pub fn from_value(raw: Value) -> Result<Self, serde_json::Error> {
        let data = serde_json::from_value(raw.clone())?;
        Ok(Self { data, raw })
    }
}

/// One rendered table row: column label to display value, in column order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Row {
    cells: Vec<(String, String)>,
}

impl Row {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cell(mut self, label: impl Into<String>, value: impl Into<String>) -> Self {
        self.cells.push((label.into(), value.into()));
        self
    }

    pub fn cells(&self) -> &[(String, String)] {
        &self.cells
    }

    pub fn get(&self, label: &str) -> Option<&str> {
        self.cells
            .iter()
            .find(|(l, _)| l == label)
            .map(|(_, v)| v.as_str())
    }

    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.cells.iter().map(|(l, _)| l.as_str())
    }
}

// ---- channel access token ----

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct IssueTokenResponse {
    pub access_token: String,
    pub expires_in: u64,
    pub token_type: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct IssuedToken {
    pub access_token: String,
    pub token_type: String,
    pub expires_in: u64,
    pub obtained_at: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct VerifyTokenResponse {
    pub client_id: String,
    pub expires_in: u64,
    #[serde(default)]
    pub scope: Option<String>,
}

// ---- LINE Things ----

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct TrialProduct {
    pub id: String,
    pub name: String,
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
    #[serde(default)]
    pub channel_id: Option<u64>,
    #[serde(default)]
    pub service_uuid: Option<String>,
    #[serde(default)]
    pub psdi_service_uuid: Option<String>,
    #[serde(default)]
    pub psdi_characteristic_uuid: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AddTrialProductRequest {
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Device {
    pub id: String,
    #[serde(default)]
    pub product_id: Option<String>,
    #[serde(default)]
    pub user_id: Option<String>,
    #[serde(default)]
    pub device_id: Option<String>,
    #[serde(default)]
    pub psdi: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct DeviceProduct {
    pub product_id: String,
    #[serde(default)]
    pub device_id: Option<String>,
    #[serde(default)]
    pub psdi: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ScenarioSet {
    #[serde(default)]
    pub auto_close: Option<bool>,
    #[serde(default)]
    pub suppression_interval: Option<u64>,
    #[serde(default)]
    pub scenarios: Vec<Scenario>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<i64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Scenario {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub trigger: ScenarioTrigger,
    #[serde(default)]
    pub actions: Vec<Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ScenarioTrigger {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(flatten)]
    pub detail: serde_json::Map<String, Value>,
}

// ---- LINE TV ----

/// Envelope of every LINE TV response: `{ "body": ... }`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TvResponse<T> {
    pub body: Option<T>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CategoryList {
    #[serde(default)]
    pub tabs: Option<Vec<Category>>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub category_code: String,
    pub category_name: String,
    #[serde(default)]
    pub category_en_name: Option<String>,
    #[serde(default)]
    pub service_url: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CategoryHome {
    #[serde(default)]
    pub represent_clip: Option<Clip>,
    #[serde(default)]
    pub channels: Option<Vec<TvChannel>>,
    #[serde(default)]
    pub has_more: Option<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Clip {
    #[serde(default)]
    pub clip_no: Option<u64>,
    #[serde(default)]
    pub clip_title: Option<String>,
    #[serde(default)]
    pub clip_subtitle: Option<String>,
    #[serde(default)]
    pub service_url: Option<String>,
    #[serde(default)]
    pub thumbnail_url: Option<String>,
    #[serde(default)]
    pub display_play_time: Option<String>,
    #[serde(default)]
    pub play_count: Option<u64>,
    #[serde(default)]
    pub likeit_point: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TvChannel {
    pub channel_id: String,
    #[serde(default)]
    pub channel_name: Option<String>,
    #[serde(default)]
    pub channel_emblem: Option<String>,
    #[serde(default)]
    pub thumbnail_url: Option<String>,
    #[serde(default)]
    pub service_url: Option<String>,
    #[serde(default)]
    pub badge_type: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ModuleList {
    #[serde(default)]
    pub modules: Option<Vec<TvModule>>,
    #[serde(default)]
    pub has_more: Option<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TvModule {
    #[serde(default)]
    pub module_id: Option<String>,
    #[serde(default)]
    pub module_name: Option<String>,
    #[serde(default)]
    pub template_type: Option<String>,
    #[serde(default)]
    pub clips: Option<Vec<Clip>>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Spotlight {
    #[serde(default)]
    pub clips: Option<Vec<Clip>>,
}
