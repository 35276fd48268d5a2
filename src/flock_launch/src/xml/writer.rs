//! Writes a launch plan as a ROS 2 `<launch>` XML document

use crate::plan::{Descriptor, LaunchPlan, NodeDescriptor, ParamValue, ProcessDescriptor};

const INDENT: &str = "  ";

/// Render `plan` as XML launch markup, one element per descriptor
pub fn write_launch_xml(plan: &LaunchPlan) -> String {
    let mut out = String::from("<?xml version=\"1.0\"?>\n<launch>\n");
    for entity in plan {
        let element = match entity {
            Descriptor::Process(process) => executable_element(process),
            Descriptor::Node(node) => node_element(node),
        };
        out.push_str(&element);
    }
    out.push_str("</launch>\n");
    out
}

fn executable_element(process: &ProcessDescriptor) -> String {
    format!(
        "{}<executable cmd=\"{}\" output=\"{}\"/>\n",
        INDENT,
        escape_attr(&join_tokens(&process.cmd)),
        process.output.as_str()
    )
}

fn node_element(node: &NodeDescriptor) -> String {
    let mut attrs = vec![
        attr("pkg", &node.package),
        attr("exec", &node.executable),
    ];
    if let Some(name) = &node.name {
        attrs.push(attr("name", name));
    }
    if let Some(namespace) = &node.namespace {
        attrs.push(attr("namespace", namespace));
    }
    if !node.arguments.is_empty() {
        attrs.push(attr("args", &join_tokens(&node.arguments)));
    }
    attrs.push(attr("output", node.output.as_str()));
    let attrs = attrs.join(" ");

    if node.parameters.is_empty() {
        return format!("{}<node {}/>\n", INDENT, attrs);
    }

    let mut element = format!("{}<node {}>\n", INDENT, attrs);
    for (key, value) in &node.parameters {
        element.push_str(INDENT);
        element.push_str(INDENT);
        element.push_str(&param_element(key, value));
        element.push('\n');
    }
    element.push_str(INDENT);
    element.push_str("</node>\n");
    element
}

fn attr(name: &str, value: &str) -> String {
    format!("{}=\"{}\"", name, escape_attr(value))
}

fn join_tokens(tokens: &[String]) -> String {
    tokens
        .iter()
        .map(|token| quote_token(token))
        .collect::<Vec<_>>()
        .join(" ")
}

fn param_element(key: &str, value: &ParamValue) -> String {
    match value {
        ParamValue::StringList(items) => format!(
            "<param name=\"{}\" value=\"{}\" value-sep=\",\"/>",
            escape_attr(key),
            escape_attr(&items.join(","))
        ),
        other => format!(
            "<param name=\"{}\" value=\"{}\"/>",
            escape_attr(key),
            escape_attr(&other.to_ros_arg())
        ),
    }
}

/// Double-quote tokens that would otherwise split on whitespace
fn quote_token(token: &str) -> String {
    if token.is_empty() || token.chars().any(char::is_whitespace) {
        format!("\"{}\"", token.replace('"', "\\\""))
    } else {
        token.to_string()
    }
}

/// Escape a string for use inside a double-quoted XML attribute
pub fn escape_attr(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            '\n' => escaped.push_str("&#10;"),
            other => escaped.push(other),
        }
    }
    escaped
}
