//! Launch plan construction
//!
//! The default `gazebo` profile is five global entities (simulator, map
//! server, visualizer, joystick, flock coordinator) followed by a block of
//! entities per drone (spawn, localizer, controller and, when enabled, an
//! odometry filter). The `one`, `teleop` and `flock` profiles are fixed plans
//! for real drones.

use crate::{
    config::{FlockConfig, Profile},
    error::{PlanError, Result},
    participant::{participants, Participant},
    plan::{Descriptor, LaunchPlan, NodeDescriptor, ProcessDescriptor},
    substitution::{resolve_template, LaunchContext},
};
use std::collections::HashSet;

/// Number of entities emitted regardless of roster size
pub const GLOBAL_ENTITY_COUNT: usize = 5;

pub struct PlanBuilder<'a> {
    config: &'a FlockConfig,
    context: LaunchContext,
}

impl<'a> PlanBuilder<'a> {
    pub fn new(config: &'a FlockConfig) -> Self {
        Self {
            config,
            context: config.launch_context(),
        }
    }

    /// Number of entities emitted per drone with the current configuration
    pub fn entities_per_participant(&self) -> usize {
        if self.config.odom_filter.enabled {
            4
        } else {
            3
        }
    }

    pub fn build(self) -> Result<LaunchPlan> {
        let entities = match self.config.profile {
            Profile::Gazebo => self.gazebo_entities()?,
            Profile::One => self.single_drone_entities()?,
            Profile::Teleop => self.teleop_entities()?,
            Profile::Flock => self.flock_entities(),
        };

        for entity in &entities {
            log::debug!("Planned {}", describe(entity));
        }
        log::info!(
            "Built {:?} launch plan: {} entities",
            self.config.profile,
            entities.len()
        );

        Ok(LaunchPlan::new(entities))
    }

    fn gazebo_entities(&self) -> Result<Vec<Descriptor>> {
        check_roster(&self.config.drones);

        let mut context = self.context.scoped();
        let world_path = self.resolve(&self.config.resources.world, "world", &context)?;
        let map_path = self.resolve(&self.config.resources.map, "map", &context)?;
        context.set_configuration("world_path", world_path.as_str());
        context.set_configuration("map_path", map_path.as_str());

        let drones = participants(&self.config.drones);
        let mut entities = Vec::with_capacity(
            GLOBAL_ENTITY_COUNT + drones.len() * self.entities_per_participant(),
        );
        entities.extend(self.global_entities(&world_path, &map_path));

        for participant in &drones {
            entities.extend(self.participant_entities(participant, &context)?);
        }
        log::debug!("{} drone(s) in the simulated flock", drones.len());

        Ok(entities)
    }

    /// One real drone. Every per-drone node lives in the configured namespace.
    fn single_drone_entities(&self) -> Result<Vec<Descriptor>> {
        let single = &self.config.single;
        let namespace = single.namespace.as_str();
        let urdf = self.resolve(&single.urdf, "single drone", &self.context)?;

        Ok(vec![
            ProcessDescriptor::new(["rviz2", "-d", single.rviz_config.as_str()]).into(),
            NodeDescriptor::new("robot_state_publisher", "robot_state_publisher")
                .with_arguments([urdf])
                .into(),
            NodeDescriptor::new("tello_driver", "tello_driver")
                .with_name("tello_driver")
                .with_namespace(namespace)
                .into(),
            NodeDescriptor::new("joy", "joy_node").into(),
            NodeDescriptor::new("flock2", "flock_base").into(),
            NodeDescriptor::new("flock2", "drone_base")
                .with_name("drone_base")
                .with_namespace(namespace)
                .into(),
            NodeDescriptor::new("fiducial_vlam", "vmap_node").into(),
            NodeDescriptor::new("fiducial_vlam", "vloc_node")
                .with_name("vloc_node")
                .with_namespace(namespace)
                .into(),
            NodeDescriptor::new("odom_filter", "filter_node")
                .with_name("filter_node")
                .with_namespace(namespace)
                .into(),
            NodeDescriptor::new("flock2", "global_planner").into(),
        ])
    }

    fn teleop_entities(&self) -> Result<Vec<Descriptor>> {
        let teleop = &self.config.teleop;
        let urdf = self.resolve(&teleop.urdf, "teleop", &self.context)?;

        Ok(vec![
            ProcessDescriptor::new(["rviz2", "-d", teleop.rviz_config.as_str()]).into(),
            NodeDescriptor::new("robot_state_publisher", "robot_state_publisher")
                .with_arguments([urdf])
                .into(),
            NodeDescriptor::new("tello_driver", "tello_driver").into(),
            NodeDescriptor::new("joy", "joy_node").into(),
            NodeDescriptor::new("flock_vlam", "vloc_node").into(),
            NodeDescriptor::new("flock_vlam", "vmap_node").into(),
            NodeDescriptor::new("flock2", "filter_node").into(),
            NodeDescriptor::new("flock2", "flock_base").into(),
            NodeDescriptor::new("flock2", "flock_simple_path.py").into(),
        ])
    }

    /// Coordinator for drones started elsewhere
    fn flock_entities(&self) -> Vec<Descriptor> {
        check_roster(&self.config.drones);

        vec![
            NodeDescriptor::new("joy", "joy_node").into(),
            NodeDescriptor::new("flock2", "flock_base")
                .with_name("flock_base")
                .with_param("drones", self.config.drones.clone())
                .into(),
        ]
    }

    fn global_entities(&self, world_path: &str, map_path: &str) -> Vec<Descriptor> {
        let use_sim_time = self.config.use_sim_time;
        let localization = &self.config.localization;

        vec![
            self.simulator_process(world_path).into(),
            NodeDescriptor::new("fiducial_vlam", "vmap_node")
                .with_name("vmap_node")
                .with_param("use_sim_time", use_sim_time)
                .with_param("marker_length", localization.marker_length)
                .with_param("marker_map_load_full_filename", map_path)
                .with_param("make_not_use_map", localization.make_not_use_map)
                .into(),
            ProcessDescriptor::new(["rviz2", "-d", self.config.resources.rviz_config.as_str()])
                .into(),
            NodeDescriptor::new("joy", "joy_node")
                .with_name("joy_node")
                .with_param("use_sim_time", use_sim_time)
                .into(),
            NodeDescriptor::new("flock2", "flock_base")
                .with_name("flock_base")
                .with_param("use_sim_time", use_sim_time)
                .with_param("drones", self.config.drones.clone())
                .into(),
        ]
    }

    fn simulator_process(&self, world_path: &str) -> ProcessDescriptor {
        let simulator = &self.config.simulator;
        let mut cmd = vec![simulator.command.clone()];
        if simulator.verbose {
            cmd.push("--verbose".to_string());
        }
        for plugin in &simulator.system_plugins {
            cmd.push("-s".to_string());
            cmd.push(plugin.clone());
        }
        cmd.push(world_path.to_string());
        ProcessDescriptor::new(cmd)
    }

    fn participant_entities(
        &self,
        participant: &Participant,
        base: &LaunchContext,
    ) -> Result<Vec<Descriptor>> {
        let mut context = base.scoped();
        participant.apply(&mut context);

        let scope = format!("drone '{}'", participant.name);
        let localization = &self.config.localization;
        let spawn = &self.config.spawn;
        let use_sim_time = self.config.use_sim_time;

        let urdf_path = self.resolve(&self.config.resources.urdf, &scope, &context)?;
        let base_frame_id = self.resolve(&localization.base_frame_id, &scope, &context)?;
        let camera_frame_id = self.resolve(&localization.camera_frame_id, &scope, &context)?;

        let mut entities: Vec<Descriptor> = vec![
            NodeDescriptor::new("tello_gazebo", "inject_entity.py")
                .with_arguments([
                    urdf_path,
                    spawn.x.to_string(),
                    participant.spawn_coordinate().to_string(),
                    spawn.z.to_string(),
                ])
                .into(),
            NodeDescriptor::new("fiducial_vlam", "vloc_node")
                .with_name("vloc_node")
                .with_namespace(participant.namespace())
                .with_param("use_sim_time", use_sim_time)
                .with_param("publish_tfs", localization.publish_tfs)
                .with_param("base_frame_id", base_frame_id)
                .with_param("map_init_pose_z", localization.map_init_pose_z)
                .with_param("camera_frame_id", camera_frame_id)
                .into(),
            NodeDescriptor::new("flock2", "drone_base")
                .with_name("drone_base")
                .with_namespace(participant.namespace())
                .with_param("use_sim_time", use_sim_time)
                .into(),
        ];

        let odom_filter = self.odom_filter_node(participant, &context)?;
        if self.config.odom_filter.enabled {
            entities.push(odom_filter.into());
        } else {
            log::trace!("Odometry filter disabled for {}", participant.name);
        }

        Ok(entities)
    }

    /// Built for every drone, so its templates must resolve even while the
    /// filter is disabled. Emitted only when enabled.
    fn odom_filter_node(
        &self,
        participant: &Participant,
        context: &LaunchContext,
    ) -> Result<NodeDescriptor> {
        let filter = &self.config.odom_filter;
        let scope = format!("drone '{}'", participant.name);
        let base_frame = self.resolve(&filter.base_frame, &scope, context)?;

        Ok(NodeDescriptor::new("odom_filter", "filter_node")
            .with_name("filter_node")
            .with_namespace(participant.namespace())
            .with_param("use_sim_time", self.config.use_sim_time)
            .with_param("map_frame", filter.map_frame.as_str())
            .with_param("base_frame", base_frame))
    }

    fn resolve(&self, template: &str, scope: &str, context: &LaunchContext) -> Result<String> {
        resolve_template(template, context).map_err(|source| PlanError::Template {
            template: template.to_string(),
            scope: scope.to_string(),
            source,
        })
    }
}

/// Build the launch plan for `config`. Pure: nothing is started or checked on disk
/// beyond package share lookups.
pub fn build_launch_plan(config: &FlockConfig) -> Result<LaunchPlan> {
    PlanBuilder::new(config).build()
}

fn check_roster(drones: &[String]) {
    if drones.is_empty() {
        log::warn!("Drone roster is empty; only global entities will be planned");
        return;
    }

    let mut seen = HashSet::new();
    for name in drones {
        if !seen.insert(name.as_str()) {
            log::warn!("Duplicate drone name '{}' in roster", name);
        }
    }
}

fn describe(entity: &Descriptor) -> String {
    match entity {
        Descriptor::Process(process) => format!("process: {}", process.cmd.join(" ")),
        Descriptor::Node(node) => format!(
            "node: {}/{} name={} ns={}",
            node.package,
            node.executable,
            node.name.as_deref().unwrap_or("-"),
            node.namespace.as_deref().unwrap_or("/")
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plan::ParamValue;

    fn test_config() -> FlockConfig {
        FlockConfig::default()
            .with_share_directory("tello_gazebo", "/share/tello_gazebo")
            .with_share_directory("tello_description", "/share/tello_description")
    }

    #[test]
    fn test_global_order() {
        let plan = build_launch_plan(&test_config()).unwrap();
        let gazebo = plan.entities[0].as_process().unwrap();
        assert_eq!(gazebo.program(), Some("gazebo"));
        assert_eq!(
            plan.entities[1].as_node().unwrap().name.as_deref(),
            Some("vmap_node")
        );
        assert_eq!(plan.entities[2].as_process().unwrap().program(), Some("rviz2"));
        assert_eq!(
            plan.entities[3].as_node().unwrap().name.as_deref(),
            Some("joy_node")
        );
        assert_eq!(
            plan.entities[4].as_node().unwrap().name.as_deref(),
            Some("flock_base")
        );
    }

    #[test]
    fn test_simulator_command() {
        let plan = build_launch_plan(&test_config()).unwrap();
        let gazebo = plan.entities[0].as_process().unwrap();
        assert_eq!(
            gazebo.cmd,
            vec![
                "gazebo",
                "--verbose",
                "-s",
                "libgazebo_ros_init.so",
                "-s",
                "libgazebo_ros_factory.so",
                "/share/tello_gazebo/worlds/fiducial.world",
            ]
        );
    }

    #[test]
    fn test_simulator_quiet() {
        let mut config = test_config();
        config.simulator.verbose = false;
        config.simulator.system_plugins.clear();
        let plan = build_launch_plan(&config).unwrap();
        assert_eq!(
            plan.entities[0].as_process().unwrap().cmd,
            vec!["gazebo", "/share/tello_gazebo/worlds/fiducial.world"]
        );
    }

    #[test]
    fn test_map_node_params() {
        let plan = build_launch_plan(&test_config()).unwrap();
        let vmap = plan.find_node("vmap_node", None).unwrap();
        assert_eq!(vmap.param("marker_length"), Some(&ParamValue::Float(0.1778)));
        assert_eq!(vmap.param("make_not_use_map"), Some(&ParamValue::Integer(0)));
        assert_eq!(
            vmap.param("marker_map_load_full_filename"),
            Some(&ParamValue::String(
                "/share/tello_gazebo/worlds/fiducial_map.yaml".to_string()
            ))
        );
    }

    #[test]
    fn test_entities_per_participant() {
        let mut config = test_config();
        assert_eq!(PlanBuilder::new(&config).entities_per_participant(), 3);
        config.odom_filter.enabled = true;
        assert_eq!(PlanBuilder::new(&config).entities_per_participant(), 4);
    }

    #[test]
    fn test_urdf_template_error_names_drone() {
        let mut config = test_config();
        config.resources.urdf = "$(var missing)/tello.urdf".to_string();
        let PlanError::Template { scope, .. } = build_launch_plan(&config).unwrap_err();
        assert_eq!(scope, "drone 'drone1'");
    }

    #[test]
    fn test_disabled_filter_template_still_checked() {
        let mut config = test_config();
        config.odom_filter.base_frame = "$(var nope)".to_string();
        assert!(build_launch_plan(&config).is_err());
    }

    #[test]
    fn test_single_drone_namespace() {
        let config = test_config().with_profile(Profile::One);
        let plan = build_launch_plan(&config).unwrap();
        assert_eq!(plan.len(), 10);
        for name in ["tello_driver", "drone_base", "vloc_node", "filter_node"] {
            assert!(plan.find_node(name, Some("solo")).is_some(), "{name}");
        }
        let rsp = plan.entities[1].as_node().unwrap();
        assert_eq!(rsp.arguments, vec!["/share/tello_description/urdf/tello.urdf"]);
    }

    #[test]
    fn test_teleop_urdf_template_error() {
        let mut config = test_config().with_profile(Profile::Teleop);
        config.teleop.urdf = "$(var missing)".to_string();
        let PlanError::Template { scope, .. } = build_launch_plan(&config).unwrap_err();
        assert_eq!(scope, "teleop");
    }

    #[test]
    fn test_flock_profile_ignores_simulator_templates() {
        let mut config = test_config().with_profile(Profile::Flock);
        config.resources.world = "$(var missing)".to_string();
        let plan = build_launch_plan(&config).unwrap();
        assert_eq!(plan.len(), 2);
    }

    #[test]
    fn test_describe() {
        let node: Descriptor = NodeDescriptor::new("flock2", "drone_base")
            .with_name("drone_base")
            .with_namespace("drone1")
            .into();
        assert_eq!(describe(&node), "node: flock2/drone_base name=drone_base ns=drone1");
    }
}
