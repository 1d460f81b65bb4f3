use serde::{Deserialize, Serialize};

/// Body of create and update requests. Every field is optional on the wire so
/// that missing values surface as a 400 with a readable message.
#[derive(Debug, Default, Clone, Deserialize)]
pub struct ContactInput {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
}

/// Query of `GET /contacts/validate`.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidateQuery {
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub exclude_id: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ValidResponse {
    pub valid: bool,
}
