// External crates
use serde::Deserialize;

/// Organization currently targeted by the CLI session
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct OrgSummary {
    #[serde(rename = "GUID", default)]
    pub guid: String,
    #[serde(rename = "Name", default)]
    pub name: String,
}

/// Space currently targeted by the CLI session
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct SpaceSummary {
    #[serde(rename = "GUID", default)]
    pub guid: String,
    #[serde(rename = "Name", default)]
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppSummary {
    pub guid: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceInstance {
    pub guid: String,
    pub name: String,
}
