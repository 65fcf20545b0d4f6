use crate::ir::Graph;
use crate::layout::Layout;
use serde::Serialize;
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

#[derive(Debug, Serialize)]
pub struct LayoutDump {
    pub width: f64,
    pub height: f64,
    pub nodes: Vec<NodeDump>,
    pub connections: Vec<ConnectionDump>,
}

#[derive(Debug, Serialize)]
pub struct NodeDump {
    pub key: String,
    pub label: String,
    pub x: f64,
    pub y: f64,
    pub radius: f64,
    pub input: bool,
    pub output: bool,
}

/// `None` on either side is the outside world.
#[derive(Debug, Serialize)]
pub struct ConnectionDump {
    pub src: Option<String>,
    pub dst: Option<String>,
}

impl LayoutDump {
    pub fn from_layout(layout: &Layout, graph: &Graph) -> Self {
        let inputs = graph.inputs();
        let outputs = graph.outputs();
        let nodes = layout
            .nodes
            .values()
            .map(|node| NodeDump {
                key: node.key.clone(),
                label: node.label.clone(),
                x: node.x,
                y: node.y,
                radius: node.radius,
                input: inputs.contains(node.key.as_str()),
                output: outputs.contains(node.key.as_str()),
            })
            .collect();

        let connections = graph
            .connections
            .iter()
            .map(|conn| ConnectionDump {
                src: conn.src.key().map(str::to_string),
                dst: conn.dst.key().map(str::to_string),
            })
            .collect();

        LayoutDump {
            width: layout.width,
            height: layout.height,
            nodes,
            connections,
        }
    }
}

pub fn write_layout_dump(path: &Path, layout: &Layout, graph: &Graph) -> anyhow::Result<()> {
    let file = File::create(path)?;
    let writer = BufWriter::new(file);
    let dump = LayoutDump::from_layout(layout, graph);
    serde_json::to_writer_pretty(writer, &dump)?;
    Ok(())
}
