//! ROS 2 XML launch file output

pub mod writer;

pub use writer::{escape_attr, write_launch_xml};
