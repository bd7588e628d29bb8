use serde::{Deserialize, Serialize};

/// A revision 3 source map, as exchanged with the host.
///
/// Content fields are optional: a map without `sourcesContent` is still a valid map.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawSourceMap {
    pub version: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file: Option<String>,
    #[serde(default)]
    pub sources: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sources_content: Option<Vec<Option<String>>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_root: Option<String>,
    #[serde(default)]
    pub names: Vec<String>,
    #[serde(default)]
    pub mappings: String,
}

impl RawSourceMap {
    pub fn from_json(json: &str) -> Result<RawSourceMap, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn from_slice(json: &[u8]) -> Result<RawSourceMap, serde_json::Error> {
        serde_json::from_slice(json)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// `true` when at least one segment is encoded in `mappings`
    pub fn has_mappings(&self) -> bool {
        self.mappings.bytes().any(|b| b != b';' && b != b',')
    }
}
