use crate::ir::{Connection, Endpoint, Graph, GraphError};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;
use std::collections::HashSet;

static NODE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"^node\s+(?P<key>[\w.:-]+)(?:\s+"(?P<label>(?:[^"\\]|\\.)*)")?(?P<attrs>(?:\s+\w+=\S+)*)\s*$"#)
        .unwrap()
});
static ATTR_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(\w+)=(\S+)").unwrap());
static BOUNDARY_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(input|output)\s+(.+)$").unwrap());
static KEY_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[\w.:-]+$").unwrap());

#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    #[error("line {line}: {message}")]
    Syntax { line: usize, message: String },

    #[error("invalid JSON graph: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Graph(#[from] GraphError),
}

fn syntax(line: usize, message: impl Into<String>) -> ParseError {
    ParseError::Syntax {
        line,
        message: message.into(),
    }
}

/// Parses either encoding; documents whose first non-blank character is `{`
/// are read as JSON.
pub fn parse_graph(input: &str) -> Result<Graph, ParseError> {
    if input.trim_start().starts_with('{') {
        parse_json_graph(input)
    } else {
        parse_text_graph(input)
    }
}

/// Line-oriented format:
///
/// ```text
/// node a "Input" fill=#4477aa r=24
/// a -> b -> c
/// -> a
/// c ->
/// input a
/// output c
/// ```
///
/// Nodes mentioned in a connection are created on first use.
pub fn parse_text_graph(input: &str) -> Result<Graph, ParseError> {
    let mut graph = Graph::new();
    let mut declared = HashSet::new();

    for (idx, raw_line) in input.lines().enumerate() {
        let line_no = idx + 1;
        let line = strip_comment(raw_line).trim();
        if line.is_empty() {
            continue;
        }

        if let Some(caps) = NODE_RE.captures(line) {
            let key = &caps["key"];
            if !declared.insert(key.to_string()) {
                return Err(GraphError::DuplicateNode {
                    key: key.to_string(),
                }
                .into());
            }
            let label = caps.name("label").map(|m| unescape_label(m.as_str()));
            let mut fill = None;
            let mut radius = None;
            for attr in ATTR_RE.captures_iter(&caps["attrs"]) {
                let value = &attr[2];
                match &attr[1] {
                    "fill" => fill = Some(value.to_string()),
                    "r" | "radius" => {
                        let parsed = value
                            .parse::<f64>()
                            .map_err(|_| syntax(line_no, format!("invalid radius `{value}`")))?;
                        radius = Some(parsed);
                    }
                    other => return Err(syntax(line_no, format!("unknown node attribute `{other}`"))),
                }
            }
            graph.ensure_node(key, label, fill, radius);
            continue;
        }

        // `input -> b` is a chain starting at a node named `input`.
        if let Some(caps) = BOUNDARY_RE.captures(line).filter(|_| !line.contains("->")) {
            for key in caps[2].split(|c: char| c == ',' || c.is_whitespace()) {
                if key.is_empty() {
                    continue;
                }
                check_key(key, line_no)?;
                if &caps[1] == "input" {
                    graph.add_input(key);
                } else {
                    graph.add_output(key);
                }
            }
            continue;
        }

        if line.contains("->") {
            add_chain(line, line_no, &mut graph)?;
            continue;
        }

        return Err(syntax(line_no, format!("unrecognized statement `{line}`")));
    }

    graph.validate()?;
    Ok(graph)
}

/// `a -> b -> c`; an empty first or last segment is the outside world.
fn add_chain(line: &str, line_no: usize, graph: &mut Graph) -> Result<(), ParseError> {
    let parts: Vec<&str> = line.split("->").map(str::trim).collect();
    if parts.iter().all(|part| part.is_empty()) {
        return Err(syntax(line_no, "connection has no node on either end"));
    }
    let last = parts.len() - 1;
    let mut endpoints = Vec::with_capacity(parts.len());
    for (pos, part) in parts.iter().enumerate() {
        if part.is_empty() {
            if pos != 0 && pos != last {
                return Err(syntax(line_no, "missing node between arrows"));
            }
            endpoints.push(Endpoint::External);
        } else {
            check_key(part, line_no)?;
            graph.ensure_node(part, None, None, None);
            endpoints.push(Endpoint::node(*part));
        }
    }
    for pair in endpoints.windows(2) {
        graph
            .connections
            .push(Connection::new(pair[0].clone(), pair[1].clone()));
    }
    Ok(())
}

fn check_key(key: &str, line_no: usize) -> Result<(), ParseError> {
    if KEY_RE.is_match(key) {
        Ok(())
    } else {
        Err(syntax(line_no, format!("invalid node key `{key}`")))
    }
}

/// Drops a `#` comment that starts a line or follows whitespace, outside quotes.
fn strip_comment(line: &str) -> &str {
    let mut in_quotes = false;
    let mut escaped = false;
    let mut prev_space = true;
    for (idx, ch) in line.char_indices() {
        if escaped {
            escaped = false;
        } else if in_quotes && ch == '\\' {
            escaped = true;
        } else if ch == '"' {
            in_quotes = !in_quotes;
        } else if ch == '#' && !in_quotes && prev_space {
            return &line[..idx];
        }
        prev_space = ch.is_whitespace();
    }
    line
}

fn unescape_label(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars();
    while let Some(ch) = chars.next() {
        if ch == '\\' {
            if let Some(next) = chars.next() {
                out.push(next);
            }
        } else {
            out.push(ch);
        }
    }
    out
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum KeyValue {
    Number(i64),
    Text(String),
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct NodeRecord {
    key: KeyValue,
    label: Option<String>,
    fill: Option<String>,
    radius: Option<f64>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct PathRecord {
    src: Option<KeyValue>,
    dst: Option<KeyValue>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct GraphFile {
    #[serde(default)]
    nodes: Vec<NodeRecord>,
    #[serde(default)]
    paths: Vec<PathRecord>,
    #[serde(default)]
    inputs: Vec<KeyValue>,
    #[serde(default)]
    outputs: Vec<KeyValue>,
}

/// `null` and negative integers mark the outside world.
fn endpoint(value: Option<KeyValue>) -> Endpoint {
    match value {
        None => Endpoint::External,
        Some(KeyValue::Number(n)) if n < 0 => Endpoint::External,
        Some(KeyValue::Number(n)) => Endpoint::Node(n.to_string()),
        Some(KeyValue::Text(key)) => Endpoint::Node(key),
    }
}

/// JSON records as produced by an upstream network model. Unlike the text
/// format, every key must be declared in `nodes`.
pub fn parse_json_graph(input: &str) -> Result<Graph, ParseError> {
    let file: GraphFile = serde_json::from_str(input)?;
    let mut graph = Graph::new();

    for record in file.nodes {
        let key = match endpoint(Some(record.key)) {
            Endpoint::Node(key) => key,
            Endpoint::External => {
                return Err(ParseError::Syntax {
                    line: 0,
                    message: "node keys must not be negative".to_string(),
                });
            }
        };
        if graph.nodes.contains_key(&key) {
            return Err(GraphError::DuplicateNode { key }.into());
        }
        graph.ensure_node(&key, record.label, record.fill, record.radius);
    }

    for path in file.paths {
        graph
            .connections
            .push(Connection::new(endpoint(path.src), endpoint(path.dst)));
    }
    for value in file.inputs {
        graph
            .connections
            .push(Connection::new(Endpoint::External, endpoint(Some(value))));
    }
    for value in file.outputs {
        graph
            .connections
            .push(Connection::new(endpoint(Some(value)), Endpoint::External));
    }

    graph.validate()?;
    Ok(graph)
}
