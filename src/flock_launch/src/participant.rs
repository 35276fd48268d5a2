//! Per-drone identity and derived identifiers

use crate::substitution::LaunchContext;

/// One simulated drone, identified by its roster name and position
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Participant {
    pub name: String,
    pub index: usize,
}

impl Participant {
    pub fn new(name: impl Into<String>, index: usize) -> Self {
        Self {
            name: name.into(),
            index,
        }
    }

    /// 1-based number used in frame IDs and URDF file names
    pub fn number(&self) -> usize {
        self.index + 1
    }

    /// Suffix appended to frame IDs and URDF base names, e.g. "_1" for index 0
    pub fn suffix(&self) -> String {
        format!("_{}", self.number())
    }

    /// Spawn coordinate handed to the entity injector. This is the raw 0-based
    /// index, NOT the suffix number.
    pub fn spawn_coordinate(&self) -> usize {
        self.index
    }

    /// Namespace of this drone's nodes: the name itself, unsuffixed
    pub fn namespace(&self) -> &str {
        &self.name
    }

    /// Publish the per-drone template variables into `context`
    pub fn apply(&self, context: &mut LaunchContext) {
        context.set_configuration("name", self.name.as_str());
        context.set_configuration("index", self.index.to_string());
        context.set_configuration("number", self.number().to_string());
        context.set_configuration("suffix", self.suffix());
    }
}

/// Enumerate a roster into participants, in roster order
pub fn participants<S: AsRef<str>>(roster: &[S]) -> Vec<Participant> {
    roster
        .iter()
        .enumerate()
        .map(|(index, name)| Participant::new(name.as_ref(), index))
        .collect()
}
