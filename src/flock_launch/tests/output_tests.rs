use flock_launch::{
    build_launch_plan, generate_record, xml::write_launch_xml, ConfigError, FlockConfig,
    PlanError, Profile,
};
use std::{io::Write, path::PathBuf};
use tempfile::NamedTempFile;

/// Helper to get fixture path from crate tests directory
fn get_fixture_path(filename: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures/config")
        .join(filename)
}

fn load_fixture(filename: &str) -> FlockConfig {
    let fixture = get_fixture_path(filename);
    assert!(fixture.exists(), "Fixture file should exist: {:?}", fixture);
    FlockConfig::from_file(&fixture).unwrap()
}

#[test]
fn test_fixture_three_drones() {
    let config = load_fixture("three_drones.yaml");
    assert_eq!(config.drones, vec!["alpha", "bravo", "charlie"]);
    assert!(!config.odom_filter.enabled);

    let plan = build_launch_plan(&config).unwrap();
    assert_eq!(plan.len(), 14);

    let json = serde_json::to_value(&plan).unwrap();
    let entities = json["entities"].as_array().unwrap();
    assert_eq!(entities[0]["type"], "process");
    assert_eq!(entities[1]["type"], "node");
    assert_eq!(entities[1]["name"], "vmap_node");

    let marker_length = entities[1]["parameters"]
        .as_array()
        .unwrap()
        .iter()
        .find(|p| p[0] == "marker_length")
        .unwrap();
    assert_eq!(marker_length[1], 0.2);
}

#[test]
fn test_fixture_with_filter() {
    let config = load_fixture("with_filter.yaml");
    let plan = build_launch_plan(&config).unwrap();
    assert_eq!(plan.len(), 13);

    let filter = plan.find_node("filter_node", Some("drone1")).unwrap();
    assert_eq!(
        filter.param("map_frame").and_then(|v| v.as_str()),
        Some("world")
    );
}

#[test]
fn test_fixture_bad_template() {
    let config = load_fixture("bad_template.yaml");
    let err = build_launch_plan(&config).unwrap_err();
    assert!(matches!(err, PlanError::Template { .. }));
    assert!(err.to_string().contains("camera_link$(var suffx)"));
}

#[test]
fn test_fixture_flock_profile() {
    let config = load_fixture("flock.yaml");
    assert_eq!(config.profile, Profile::Flock);

    let record = generate_record(&config).unwrap();
    assert_eq!(record.node.len(), 2);
    assert_eq!(record.node[1].name.as_deref(), Some("flock_base"));
    assert_eq!(
        record.node[1].params,
        vec![("drones".to_string(), "[dr1, dr2, dr3]".to_string())]
    );
}

#[test]
fn test_config_from_temp_file() {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(b"drones: [solo]\nuse_sim_time: false\n").unwrap();

    let config = FlockConfig::from_file(file.path()).unwrap();
    assert_eq!(config.drones, vec!["solo"]);
    assert!(!config.use_sim_time);
    assert_eq!(config.simulator.command, "gazebo");
}

#[test]
fn test_config_invalid_yaml() {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(b"drones: [unterminated\n").unwrap();
    assert!(matches!(
        FlockConfig::from_file(file.path()),
        Err(ConfigError::YamlError(_))
    ));
}

#[test]
fn test_record_json_layout() {
    let config = load_fixture("with_filter.yaml");
    let record = generate_record(&config).unwrap();
    assert_eq!(record.node.len(), 13);

    let json = serde_json::to_value(&record).unwrap();
    assert!(json["container"].as_array().unwrap().is_empty());
    assert!(json["load_node"].as_array().unwrap().is_empty());

    let nodes = json["node"].as_array().unwrap();
    let gazebo = &nodes[0];
    assert_eq!(gazebo["executable"], "gazebo");
    assert!(gazebo["package"].is_null());
    assert_eq!(gazebo["namespace"], "/");
}

#[test]
fn test_record_node_commands() {
    let config = load_fixture("with_filter.yaml");
    let record = generate_record(&config).unwrap();

    let vloc = record
        .node
        .iter()
        .find(|n| {
            n.name.as_deref() == Some("vloc_node") && n.namespace.as_deref() == Some("/drone2")
        })
        .unwrap();
    assert_eq!(vloc.exec_name.as_deref(), Some("vloc_node-2"));
    assert_eq!(vloc.cmd[1], "--ros-args");
    assert!(vloc.cmd.contains(&"__node:=vloc_node".to_string()));
    assert!(vloc.cmd.contains(&"__ns:=/drone2".to_string()));
    assert!(vloc.cmd.contains(&"base_frame_id:=base_link_2".to_string()));
    assert!(vloc.cmd.contains(&"map_init_pose_z:=-0.035".to_string()));
    assert!(vloc.cmd.contains(&"use_sim_time:=true".to_string()));

    let filter = record
        .node
        .iter()
        .find(|n| n.executable == "filter_node")
        .unwrap();
    assert!(filter.cmd[0].ends_with("/lib/odom_filter/filter_node"));
}

#[test]
fn test_xml_output_parses() {
    let config = load_fixture("three_drones.yaml");
    let plan = build_launch_plan(&config).unwrap();
    let xml = write_launch_xml(&plan);

    let doc = roxmltree::Document::parse(&xml).unwrap();
    let root = doc.root_element();
    assert_eq!(root.tag_name().name(), "launch");

    let children: Vec<_> = root.children().filter(|n| n.is_element()).collect();
    assert_eq!(children.len(), plan.len());
    assert_eq!(children[0].tag_name().name(), "executable");
    assert_eq!(children[2].tag_name().name(), "executable");
    assert!(children[2]
        .attribute("cmd")
        .is_some_and(|c| c.starts_with("rviz2 -d ")));

    let flock_base = children
        .iter()
        .find(|n| n.attribute("name") == Some("flock_base"))
        .unwrap();
    let drones = flock_base
        .children()
        .find(|p| p.attribute("name") == Some("drones"))
        .unwrap();
    assert_eq!(drones.attribute("value"), Some("alpha,bravo,charlie"));
    assert_eq!(drones.attribute("value-sep"), Some(","));

    let vloc = children
        .iter()
        .find(|n| {
            n.attribute("name") == Some("vloc_node") && n.attribute("namespace") == Some("charlie")
        })
        .unwrap();
    let camera = vloc
        .children()
        .find(|p| p.attribute("name") == Some("camera_frame_id"))
        .unwrap();
    assert_eq!(camera.attribute("value"), Some("camera_link_3"));
}

#[test]
fn test_xml_escapes_special_characters() {
    let mut config = load_fixture("three_drones.yaml");
    config.drones = vec!["a&b".to_string()];
    config.resources.rviz_config = "views/<flock>.rviz".to_string();

    let plan = build_launch_plan(&config).unwrap();
    let xml = write_launch_xml(&plan);
    let doc = roxmltree::Document::parse(&xml).unwrap();

    let namespaces: Vec<&str> = doc
        .descendants()
        .filter_map(|n| n.attribute("namespace"))
        .collect();
    assert_eq!(namespaces, vec!["a&b", "a&b"]);

    let rviz = doc
        .descendants()
        .find(|n| {
            n.has_tag_name("executable") && n.attribute("cmd").unwrap_or("").starts_with("rviz2")
        })
        .unwrap();
    assert_eq!(rviz.attribute("cmd"), Some("rviz2 -d views/<flock>.rviz"));
}
