//! Command-line and record generation

use crate::ament;
use crate::config::FlockConfig;
use crate::plan::{Descriptor, LaunchPlan, NodeDescriptor, ProcessDescriptor};
use crate::record::types::{NodeRecord, RecordJson};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Turns plan descriptors into record.json entries with full command lines
pub struct CommandGenerator {
    fallback_prefix: PathBuf,
    prefixes: HashMap<String, PathBuf>,
    exec_counts: HashMap<String, usize>,
}

impl CommandGenerator {
    pub fn new(fallback_prefix: impl Into<PathBuf>) -> Self {
        Self {
            fallback_prefix: fallback_prefix.into(),
            prefixes: HashMap::new(),
            exec_counts: HashMap::new(),
        }
    }

    /// Generator honoring the configured install prefix and share overrides
    pub fn from_config(config: &FlockConfig) -> Self {
        let mut generator = Self::new(&config.ros_prefix);
        for (package, share) in &config.share_directories {
            match install_prefix(package, share) {
                Some(prefix) => generator.set_package_prefix(package.as_str(), prefix),
                None => log::warn!(
                    "Share override for {} ({}) is not <prefix>/share/{}; \
                     resolving its executables through the ament index",
                    package,
                    share.display(),
                    package
                ),
            }
        }
        generator
    }

    pub fn set_package_prefix(&mut self, package: impl Into<String>, prefix: impl Into<PathBuf>) {
        self.prefixes.insert(package.into(), prefix.into());
    }

    pub fn generate_record(&mut self, plan: &LaunchPlan) -> RecordJson {
        let mut record = RecordJson::new();
        for entity in plan {
            let node = match entity {
                Descriptor::Node(node) => self.generate_node_record(node),
                Descriptor::Process(process) => self.generate_process_record(process),
            };
            record.node.push(node);
        }
        log::debug!("Generated {} record entries", record.node.len());
        record
    }

    pub fn generate_node_record(&mut self, node: &NodeDescriptor) -> NodeRecord {
        let name = node
            .name
            .clone()
            .unwrap_or_else(|| node.executable.clone());
        let exec_name = self.next_exec_name(&name);

        NodeRecord {
            executable: node.executable.clone(),
            package: Some(node.package.clone()),
            name: Some(name),
            namespace: Some(qualify_namespace(node.namespace.as_deref())),
            exec_name: Some(exec_name),
            params: node
                .parameters
                .iter()
                .map(|(key, value)| (key.clone(), value.to_ros_arg()))
                .collect(),
            params_files: Vec::new(),
            remaps: Vec::new(),
            ros_args: None,
            args: if node.arguments.is_empty() {
                None
            } else {
                Some(node.arguments.clone())
            },
            cmd: self.generate_node_command(node),
            env: None,
            respawn: Some(false),
            respawn_delay: None,
            global_params: None,
        }
    }

    pub fn generate_node_command(&self, node: &NodeDescriptor) -> Vec<String> {
        let mut cmd = Vec::new();

        // 1. Executable path and positional arguments
        cmd.push(self.resolve_executable_path(&node.package, &node.executable));
        cmd.extend(node.arguments.iter().cloned());

        // 2. ROS args delimiter
        cmd.push("--ros-args".to_string());

        // 3. Node name
        if let Some(name) = &node.name {
            cmd.push("-r".to_string());
            cmd.push(format!("__node:={}", name));
        }

        // 4. Namespace
        if let Some(namespace) = &node.namespace {
            cmd.push("-r".to_string());
            cmd.push(format!("__ns:={}", qualify_namespace(Some(namespace))));
        }

        // 5. Parameters
        for (key, value) in &node.parameters {
            cmd.push("-p".to_string());
            cmd.push(format!("{}:={}", key, value.to_ros_arg()));
        }

        cmd
    }

    pub fn generate_process_record(&mut self, process: &ProcessDescriptor) -> NodeRecord {
        let executable = process.program().unwrap_or_default().to_string();
        let exec_name = self.next_exec_name(&executable);
        let args = process.cmd.get(1..).unwrap_or_default();

        NodeRecord {
            executable: executable.clone(),
            package: None,
            name: Some(executable),
            namespace: Some("/".to_string()),
            exec_name: Some(exec_name),
            params: Vec::new(),
            params_files: Vec::new(),
            remaps: Vec::new(),
            ros_args: None,
            args: if args.is_empty() {
                None
            } else {
                Some(args.to_vec())
            },
            cmd: process.cmd.clone(),
            env: None,
            respawn: None,
            respawn_delay: None,
            global_params: None,
        }
    }

    fn resolve_executable_path(&self, package: &str, executable: &str) -> String {
        let prefix = self
            .prefixes
            .get(package)
            .cloned()
            .or_else(|| ament::find_package_prefix(package))
            .unwrap_or_else(|| {
                log::debug!(
                    "Package {} not in ament index, using {}",
                    package,
                    self.fallback_prefix.display()
                );
                self.fallback_prefix.clone()
            });

        prefix
            .join("lib")
            .join(package)
            .join(executable)
            .display()
            .to_string()
    }

    /// "vloc_node-1", "vloc_node-2", ... in plan order
    fn next_exec_name(&mut self, name: &str) -> String {
        let count = self.exec_counts.entry(name.to_string()).or_insert(0);
        *count += 1;
        format!("{}-{}", name, count)
    }
}

/// Install prefix of a share directory laid out as `<prefix>/share/<package>`
fn install_prefix<'p>(package: &str, share: &'p Path) -> Option<&'p Path> {
    if share.file_name()? != package {
        return None;
    }
    let share_root = share.parent()?;
    if share_root.file_name()? != "share" {
        return None;
    }
    share_root.parent()
}

fn qualify_namespace(namespace: Option<&str>) -> String {
    match namespace.map(|ns| ns.trim_matches('/')) {
        None | Some("") => "/".to_string(),
        Some(ns) => format!("/{}", ns),
    }
}
