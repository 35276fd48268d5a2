//! Launch plan data structures

use serde::{Deserialize, Serialize};

/// Parameter value handed to a node
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParamValue {
    Bool(bool),
    Integer(i64),
    Float(f64),
    String(String),
    StringList(Vec<String>),
}

impl ParamValue {
    /// Render the value the way `--ros-args -p name:=value` expects it
    pub fn to_ros_arg(&self) -> String {
        match self {
            ParamValue::Bool(b) => b.to_string(),
            ParamValue::Integer(n) => n.to_string(),
            // Keep a decimal point so the value is not read back as an integer
            ParamValue::Float(f) if f.is_finite() && f.fract() == 0.0 => format!("{:.1}", f),
            ParamValue::Float(f) => f.to_string(),
            ParamValue::String(s) => s.clone(),
            ParamValue::StringList(items) => format!("[{}]", items.join(", ")),
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            ParamValue::String(s) => Some(s),
            _ => None,
        }
    }
}

impl From<bool> for ParamValue {
    fn from(b: bool) -> Self {
        ParamValue::Bool(b)
    }
}

impl From<i64> for ParamValue {
    fn from(n: i64) -> Self {
        ParamValue::Integer(n)
    }
}

impl From<f64> for ParamValue {
    fn from(f: f64) -> Self {
        ParamValue::Float(f)
    }
}

impl From<&str> for ParamValue {
    fn from(s: &str) -> Self {
        ParamValue::String(s.to_string())
    }
}

impl From<String> for ParamValue {
    fn from(s: String) -> Self {
        ParamValue::String(s)
    }
}

impl From<Vec<String>> for ParamValue {
    fn from(items: Vec<String>) -> Self {
        ParamValue::StringList(items)
    }
}

/// Where a launched process writes stdout/stderr
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputMode {
    #[default]
    Screen,
    Log,
    Both,
}

impl OutputMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            OutputMode::Screen => "screen",
            OutputMode::Log => "log",
            OutputMode::Both => "both",
        }
    }
}

/// A plain OS process
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcessDescriptor {
    pub cmd: Vec<String>,
    pub output: OutputMode,
}

impl ProcessDescriptor {
    pub fn new<I, S>(cmd: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            cmd: cmd.into_iter().map(Into::into).collect(),
            output: OutputMode::Screen,
        }
    }

    pub fn program(&self) -> Option<&str> {
        self.cmd.first().map(String::as_str)
    }
}

/// A ROS node started from a package executable
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeDescriptor {
    pub package: String,
    pub executable: String,
    pub name: Option<String>,
    pub namespace: Option<String>,
    pub parameters: Vec<(String, ParamValue)>,
    pub arguments: Vec<String>,
    pub output: OutputMode,
}

impl NodeDescriptor {
    pub fn new(package: impl Into<String>, executable: impl Into<String>) -> Self {
        Self {
            package: package.into(),
            executable: executable.into(),
            name: None,
            namespace: None,
            parameters: Vec::new(),
            arguments: Vec::new(),
            output: OutputMode::Screen,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = Some(namespace.into());
        self
    }

    pub fn with_param(mut self, name: impl Into<String>, value: impl Into<ParamValue>) -> Self {
        self.parameters.push((name.into(), value.into()));
        self
    }

    pub fn with_arguments<I, S>(mut self, arguments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.arguments.extend(arguments.into_iter().map(Into::into));
        self
    }

    pub fn param(&self, name: &str) -> Option<&ParamValue> {
        self.parameters
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value)
    }
}

/// One entry of a launch plan
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Descriptor {
    Process(ProcessDescriptor),
    Node(NodeDescriptor),
}

impl Descriptor {
    pub fn as_node(&self) -> Option<&NodeDescriptor> {
        match self {
            Descriptor::Node(node) => Some(node),
            Descriptor::Process(_) => None,
        }
    }

    pub fn as_process(&self) -> Option<&ProcessDescriptor> {
        match self {
            Descriptor::Process(process) => Some(process),
            Descriptor::Node(_) => None,
        }
    }
}

impl From<ProcessDescriptor> for Descriptor {
    fn from(process: ProcessDescriptor) -> Self {
        Descriptor::Process(process)
    }
}

impl From<NodeDescriptor> for Descriptor {
    fn from(node: NodeDescriptor) -> Self {
        Descriptor::Node(node)
    }
}

/// Ordered descriptors, in declared startup order. The order states intent only;
/// the runtime consuming the plan decides whether to enforce it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LaunchPlan {
    pub entities: Vec<Descriptor>,
}

impl LaunchPlan {
    pub fn new(entities: Vec<Descriptor>) -> Self {
        Self { entities }
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Descriptor> {
        self.entities.iter()
    }

    pub fn nodes(&self) -> impl Iterator<Item = &NodeDescriptor> {
        self.entities.iter().filter_map(Descriptor::as_node)
    }

    pub fn processes(&self) -> impl Iterator<Item = &ProcessDescriptor> {
        self.entities.iter().filter_map(Descriptor::as_process)
    }

    /// Find a node by name and namespace (`None` for un-namespaced nodes)
    pub fn find_node(&self, name: &str, namespace: Option<&str>) -> Option<&NodeDescriptor> {
        self.nodes()
            .find(|n| n.name.as_deref() == Some(name) && n.namespace.as_deref() == namespace)
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

impl<'a> IntoIterator for &'a LaunchPlan {
    type Item = &'a Descriptor;
    type IntoIter = std::slice::Iter<'a, Descriptor>;

    fn into_iter(self) -> Self::IntoIter {
        self.entities.iter()
    }
}
