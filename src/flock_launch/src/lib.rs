//! flock_launch library
//!
//! Builds the launch plan for a simulated Tello flock: Gazebo, fiducial map
//! and localization nodes, rviz2, a joystick driver, the flock coordinator,
//! and a spawn/localize/control block per drone. The plan is a value; starting
//! the processes is left to whichever launch runtime consumes it.
//!
//! Real-drone plans (single drone, teleoperation, coordinator only) are
//! selected with [`Profile`].

pub mod ament;
pub mod builder;
pub mod config;
pub mod error;
pub mod participant;
pub mod plan;
pub mod record;
pub mod substitution;
pub mod xml;

pub use builder::{build_launch_plan, PlanBuilder};
pub use config::{FlockConfig, Profile};
pub use error::{ConfigError, PlanError, Result, SubstitutionError};
pub use participant::Participant;
pub use plan::{Descriptor, LaunchPlan, NodeDescriptor, OutputMode, ParamValue, ProcessDescriptor};

use record::{CommandGenerator, RecordJson};

/// Build the plan and convert it to play_launch's record.json layout
pub fn generate_record(config: &FlockConfig) -> Result<RecordJson> {
    let plan = build_launch_plan(config)?;
    Ok(CommandGenerator::from_config(config).generate_record(&plan))
}
