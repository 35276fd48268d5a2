//! Flock launch configuration
//!
//! Every value the plan needs (roster, resource locations, per-node defaults)
//! lives here. `FlockConfig::default()` describes the two-drone Gazebo
//! simulation with fiducial localization. A YAML file may override any subset
//! of keys; the rest keep their defaults.
//!
//! `profile` selects which plan is built:
//!
//! - `gazebo`: simulated flock, one spawn/localize/control block per drone
//! - `one`: a single real drone in the `single.namespace` namespace
//! - `teleop`: a single real drone flown by joystick along a simple path
//! - `flock`: joystick and flock coordinator only, for an external fleet
//!
//! String values marked as templates accept `$(var ...)`, `$(env ...)` and
//! `$(find-pkg-share ...)`. Per-drone templates additionally see `name`,
//! `index`, `number` and `suffix`.

use crate::error::ConfigError;
use crate::substitution::LaunchContext;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FlockConfig {
    pub profile: Profile,
    /// Drone names, in spawn order. Each name becomes a namespace.
    pub drones: Vec<String>,
    pub use_sim_time: bool,
    pub resources: ResourceConfig,
    pub simulator: SimulatorConfig,
    pub localization: LocalizationConfig,
    pub spawn: SpawnConfig,
    pub odom_filter: OdomFilterConfig,
    pub single: SingleDroneConfig,
    pub teleop: TeleopConfig,
    /// Install prefix used for executables of packages missing from the ament index
    pub ros_prefix: PathBuf,
    /// Package share directories that take precedence over the ament index
    pub share_directories: BTreeMap<String, PathBuf>,
}

impl Default for FlockConfig {
    fn default() -> Self {
        Self {
            profile: Profile::default(),
            drones: vec!["drone1".to_string(), "drone2".to_string()],
            use_sim_time: true,
            resources: ResourceConfig::default(),
            simulator: SimulatorConfig::default(),
            localization: LocalizationConfig::default(),
            spawn: SpawnConfig::default(),
            odom_filter: OdomFilterConfig::default(),
            single: SingleDroneConfig::default(),
            teleop: TeleopConfig::default(),
            ros_prefix: PathBuf::from("/opt/ros/humble"),
            share_directories: BTreeMap::new(),
        }
    }
}

impl FlockConfig {
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::FileNotFound(path.display().to_string()));
        }
        let content = std::fs::read_to_string(path)?;
        let config = Self::from_yaml_str(&content)?;
        log::debug!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    pub fn from_yaml_str(content: &str) -> Result<Self, ConfigError> {
        // An empty document means "all defaults"
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(content)?)
    }

    pub fn to_yaml(&self) -> Result<String, ConfigError> {
        Ok(serde_yaml::to_string(self)?)
    }

    pub fn with_profile(mut self, profile: Profile) -> Self {
        self.profile = profile;
        self
    }

    pub fn with_drones<I, S>(mut self, drones: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.drones = drones.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_share_directory(
        mut self,
        package: impl Into<String>,
        path: impl Into<PathBuf>,
    ) -> Self {
        self.share_directories.insert(package.into(), path.into());
        self
    }

    /// Base context for template resolution, carrying the share overrides
    pub fn launch_context(&self) -> LaunchContext {
        let mut context = LaunchContext::new();
        for (package, path) in &self.share_directories {
            context.set_package_share(package.as_str(), path.as_path());
        }
        context
    }
}

/// Which launch plan to build
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum Profile {
    /// Simulated flock in Gazebo
    #[default]
    Gazebo,
    /// One real drone with driver, localization and odometry filter
    One,
    /// One real drone under joystick teleoperation
    Teleop,
    /// Flock coordinator and joystick for the configured roster
    Flock,
}

/// Files the external processes read. All fields are templates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ResourceConfig {
    pub world: String,
    pub map: String,
    /// Per-drone robot description
    pub urdf: String,
    pub rviz_config: String,
}

impl Default for ResourceConfig {
    fn default() -> Self {
        Self {
            world: "$(find-pkg-share tello_gazebo)/worlds/fiducial.world".to_string(),
            map: "$(find-pkg-share tello_gazebo)/worlds/fiducial_map.yaml".to_string(),
            urdf: "$(find-pkg-share tello_description)/urdf/tello$(var suffix).urdf".to_string(),
            rviz_config: "install/flock2/share/flock2/launch/two.rviz".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SimulatorConfig {
    pub command: String,
    pub verbose: bool,
    /// System plugins loaded with `-s`. The defaults publish /clock and
    /// provide the entity factory used to spawn drones.
    pub system_plugins: Vec<String>,
}

impl Default for SimulatorConfig {
    fn default() -> Self {
        Self {
            command: "gazebo".to_string(),
            verbose: true,
            system_plugins: vec![
                "libgazebo_ros_init.so".to_string(),
                "libgazebo_ros_factory.so".to_string(),
            ],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LocalizationConfig {
    /// Marker side length in meters
    pub marker_length: f64,
    /// 0 loads the map without saving a new one
    pub make_not_use_map: i64,
    /// 1 makes vloc_node publish transforms
    pub publish_tfs: i64,
    pub map_init_pose_z: f64,
    pub base_frame_id: String,
    pub camera_frame_id: String,
}

impl Default for LocalizationConfig {
    fn default() -> Self {
        Self {
            marker_length: 0.1778,
            make_not_use_map: 0,
            publish_tfs: 1,
            map_init_pose_z: -0.035,
            base_frame_id: "base_link$(var suffix)".to_string(),
            camera_frame_id: "camera_link$(var suffix)".to_string(),
        }
    }
}

/// Fixed spawn coordinates. The remaining coordinate is the drone index.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SpawnConfig {
    pub x: f64,
    pub z: f64,
}

impl Default for SpawnConfig {
    fn default() -> Self {
        Self { x: 0.0, z: 1.0 }
    }
}

/// Per-drone odometry filter. Declared but off unless enabled here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OdomFilterConfig {
    pub enabled: bool,
    pub map_frame: String,
    pub base_frame: String,
}

impl Default for OdomFilterConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            map_frame: "map".to_string(),
            base_frame: "base_link$(var suffix)".to_string(),
        }
    }
}

/// Single real drone (`one` profile)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SingleDroneConfig {
    pub namespace: String,
    /// Template
    pub urdf: String,
    pub rviz_config: String,
}

impl Default for SingleDroneConfig {
    fn default() -> Self {
        Self {
            namespace: "solo".to_string(),
            urdf: "$(find-pkg-share tello_description)/urdf/tello.urdf".to_string(),
            rviz_config: "install/flock2/share/flock2/launch/one.rviz".to_string(),
        }
    }
}

/// Joystick teleoperation (`teleop` profile)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TeleopConfig {
    /// Template
    pub urdf: String,
    pub rviz_config: String,
}

impl Default for TeleopConfig {
    fn default() -> Self {
        Self {
            urdf: "$(find-pkg-share flock2)/urdf/tello.urdf".to_string(),
            rviz_config: "install/flock2/share/flock2/launch/default.rviz".to_string(),
        }
    }
}
