//! record.json data structures

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Root structure for record.json, the format replayed by the play_launch runtime.
///
/// Flock plans hold no composable nodes, lifecycle nodes or parameter files, so
/// every list but `node` stays empty. They are still written because play_launch
/// requires all five keys.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RecordJson {
    pub node: Vec<NodeRecord>,
    pub container: Vec<serde_json::Value>,
    pub load_node: Vec<serde_json::Value>,
    pub lifecycle_node: Vec<String>,
    pub file_data: HashMap<String, String>,
}

impl RecordJson {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

/// Node record structure. Plain processes use the same record with no package.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeRecord {
    pub executable: String,
    pub package: Option<String>,
    pub name: Option<String>,
    pub namespace: Option<String>,
    pub exec_name: Option<String>,
    pub params: Vec<(String, String)>,
    pub params_files: Vec<String>,
    pub remaps: Vec<(String, String)>,
    pub ros_args: Option<Vec<String>>,
    pub args: Option<Vec<String>>,
    pub cmd: Vec<String>,
    pub env: Option<Vec<(String, String)>>,
    pub respawn: Option<bool>,
    pub respawn_delay: Option<f64>,
    pub global_params: Option<Vec<(String, String)>>,
}
