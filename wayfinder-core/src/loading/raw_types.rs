use serde::Deserialize;
use serde_json::Value;

use super::de::{deserialize_flag, deserialize_id};

/// Top level of the graph file. Items are kept as raw values so a single
/// malformed entry can be dropped without rejecting the whole file.
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub(super) struct RawGraph {
    pub nodes: Vec<Value>,
    pub edges: Vec<Value>,
    pub buildings: Vec<Value>,
    pub settings: Option<RawSettings>,
    pub overrides: RawOverrides,
    pub image: Option<Value>,
}

#[derive(Debug, Deserialize)]
pub(super) struct RawNode {
    #[serde(deserialize_with = "deserialize_id")]
    pub id: String,
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Deserialize)]
pub(super) struct RawEdge {
    #[serde(deserialize_with = "deserialize_id")]
    pub id: String,
    #[serde(deserialize_with = "deserialize_id")]
    pub from: String,
    #[serde(deserialize_with = "deserialize_id")]
    pub to: String,
    pub length_m: f64,
    #[serde(default)]
    pub penalty_s: Option<f64>,
    #[serde(default)]
    pub flags: Option<RawFlags>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub(super) struct RawFlags {
    #[serde(deserialize_with = "deserialize_flag")]
    pub blocked: bool,
    #[serde(deserialize_with = "deserialize_flag")]
    pub stairs: bool,
    #[serde(deserialize_with = "deserialize_flag")]
    pub steep: bool,
    #[serde(deserialize_with = "deserialize_flag")]
    pub covered: bool,
}

#[derive(Debug, Deserialize)]
pub(super) struct RawBuilding {
    #[serde(deserialize_with = "deserialize_id")]
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    /// Kept raw so one bad entry is trimmed instead of dropping the building
    #[serde(default, rename = "entranceNodeIds")]
    pub entrance_node_ids: Vec<Value>,
}

#[derive(Debug, Deserialize)]
pub(super) struct RawSettings {
    #[serde(default)]
    pub walking_speed_mps: Option<f64>,
    #[serde(default)]
    pub penalties: RawPenalties,
}

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub(super) struct RawPenalties {
    pub stairs_s: f64,
    pub steep_s: f64,
    pub covered_s: f64,
}

#[derive(Debug, Deserialize, Default)]
#[serde(default, rename_all = "camelCase")]
pub(super) struct RawOverrides {
    pub blocked_edge_ids: Vec<Value>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub(super) struct RawImage {
    pub width_px: Option<Value>,
    pub height_px: Option<Value>,
}
