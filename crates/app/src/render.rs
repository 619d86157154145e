//! Graphviz DOT output for a topology.

use linksim_core::{NodeKind, Topology};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

fn color(kind: NodeKind) -> &'static str {
    match kind {
        NodeKind::EndDevice => "blue",
        NodeKind::Hub => "green",
        NodeKind::Switch => "red",
        NodeKind::Bridge => "orange",
    }
}

/// Render `topology` as an undirected DOT graph titled `title`.
pub fn to_dot(title: &str, topology: &Topology) -> String {
    let title = escape(title);
    let mut out = format!("graph \"{title}\" {{\n    label=\"{title}\";\n");
    out.push_str("    node [style=filled, fontcolor=white];\n");
    for node in topology.nodes() {
        out.push_str(&format!(
            "    \"{}\" [fillcolor={}];\n",
            escape(&node.name),
            color(node.kind)
        ));
    }
    for (a, b) in topology.links() {
        out.push_str(&format!("    \"{}\" -- \"{}\";\n", escape(a), escape(b)));
    }
    out.push_str("}\n");
    out
}

/// Write `topology` to `<dir>/<file_stem>.dot`, creating `dir` if needed.
pub fn write_dot(dir: &Path, file_stem: &str, title: &str, topology: &Topology) -> io::Result<PathBuf> {
    fs::create_dir_all(dir)?;
    let path = dir.join(format!("{file_stem}.dot"));
    fs::write(&path, to_dot(title, topology))?;
    Ok(path)
}

fn escape(s: &str) -> String {
    s.replace('\\', "\\\\").replace('"', "\\\"")
}
