use serde::Deserialize;
use serde_json::Value;

/// Slot as sent by the client; both parts are checked before use.
#[derive(Debug, Deserialize)]
pub struct SlotInput {
    pub date: Option<String>,
    pub time: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplyProviderRequest {
    pub profession: Option<String>,
    pub experience: Option<f64>,
    pub services_offered: Option<Vec<String>>,
    pub available_slots: Option<Vec<SlotInput>>,
    pub bio: Option<String>,
    pub location: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProviderRequest {
    pub profession: Option<String>,
    pub experience: Option<f64>,
    pub bio: Option<String>,
    pub location: Option<String>,
    pub available_slots: Option<Vec<SlotInput>>,
}

#[derive(Debug, Deserialize)]
pub struct VerificationRequest {
    pub action: Option<String>,
}

/// `servicesOffered` stays untyped so a non-array is reported as a bad
/// request rather than a schema error.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectServicesRequest {
    pub services_offered: Option<Value>,
}
