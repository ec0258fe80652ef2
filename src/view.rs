//! Display tree produced from a request lifecycle.
//!
//! Rendering is a pure function of state: Idle shows nothing, Pending a
//! loading line, Failed the single error message, Succeeded the feature
//! layout. Base64 graph payloads are decoded here and nowhere else.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use std::io;
use std::path::{Path, PathBuf};

use crate::lifecycle::{Lifecycle, Status};

#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Heading(String),
    Line(String),
    Field { label: String, value: String },
    /// Pie-chart series; drawing is a consumer concern.
    Pie(Vec<Slice>),
    /// Decoded image payload, written out by the shell.
    Image { label: String, png: Vec<u8> },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Slice {
    pub name: String,
    pub value: f64,
}

impl Node {
    pub fn field(label: &str, value: impl ToString) -> Self {
        Node::Field {
            label: label.to_string(),
            value: value.to_string(),
        }
    }
}

/// Feature results know their own layout.
pub trait Render {
    fn render(&self) -> Vec<Node>;
}

pub fn render<T: Render>(state: &Lifecycle<T>) -> Vec<Node> {
    match state.status() {
        Status::Idle => Vec::new(),
        Status::Pending => vec![Node::Line("Loading...".to_string())],
        Status::Failed => vec![Node::Line(format!(
            "Error: {}",
            state.error().unwrap_or("unknown error")
        ))],
        Status::Succeeded => state.result().map(Render::render).unwrap_or_default(),
    }
}

/// Decode a base64 graph payload at the rendering boundary. The payload is
/// opaque everywhere else.
pub fn decode_graph(b64: &str) -> Option<Vec<u8>> {
    BASE64.decode(b64.trim()).ok()
}

/// Flatten a display tree into terminal lines.
pub fn flatten(nodes: &[Node]) -> Vec<String> {
    let mut out = Vec::new();
    for node in nodes {
        match node {
            Node::Heading(text) => {
                out.push(format!("== {} ==", text));
            }
            Node::Line(text) => out.push(text.clone()),
            Node::Field { label, value } => out.push(format!("{}: {}", label, value)),
            Node::Pie(slices) => {
                let total: f64 = slices.iter().map(|s| s.value).sum();
                for slice in slices {
                    let pct = if total > 0.0 {
                        slice.value / total * 100.0
                    } else {
                        0.0
                    };
                    out.push(format!("  {} {:.1}% ({:.2})", slice.name, pct, slice.value));
                }
            }
            Node::Image { label, png } => {
                out.push(format!("[image] {} ({} bytes)", label, png.len()));
            }
        }
    }
    out
}

/// Write image nodes as PNG files under `dir`, returning the paths written.
pub fn write_images(nodes: &[Node], dir: &Path) -> io::Result<Vec<PathBuf>> {
    let mut written = Vec::new();
    for node in nodes {
        if let Node::Image { label, png } = node {
            std::fs::create_dir_all(dir)?;
            let name: String = label
                .chars()
                .map(|c| if c.is_alphanumeric() { c.to_ascii_lowercase() } else { '_' })
                .collect();
            let path = dir.join(format!("{}.png", name));
            std::fs::write(&path, png)?;
            written.push(path);
        }
    }
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FetchError;

    struct Fixed(Vec<Node>);

    impl Render for Fixed {
        fn render(&self) -> Vec<Node> {
            self.0.clone()
        }
    }

    #[test]
    fn test_idle_renders_nothing() {
        let lc: Lifecycle<Fixed> = Lifecycle::new();
        assert!(render(&lc).is_empty());
    }

    #[test]
    fn test_pending_renders_loading() {
        let mut lc: Lifecycle<Fixed> = Lifecycle::new();
        lc.begin().unwrap();
        assert_eq!(render(&lc), vec![Node::Line("Loading...".to_string())]);
    }

    #[test]
    fn test_failed_renders_single_message() {
        let mut lc: Lifecycle<Fixed> = Lifecycle::new();
        lc.fail(FetchError::validation("bad symbol"));
        assert_eq!(render(&lc), vec![Node::Line("Error: bad symbol".to_string())]);
    }

    #[test]
    fn test_succeeded_renders_result_layout() {
        let mut lc: Lifecycle<Fixed> = Lifecycle::new();
        let ticket = lc.begin().unwrap();
        lc.complete(ticket, Ok(Fixed(vec![Node::field("MAE", 1.5)])));
        let nodes = render(&lc);
        assert_eq!(flatten(&nodes), vec!["MAE: 1.5".to_string()]);
    }

    #[test]
    fn test_decode_graph_roundtrip() {
        let png = vec![0x89u8, 0x50, 0x4e, 0x47];
        let b64 = BASE64.encode(&png);
        assert_eq!(decode_graph(&b64), Some(png));
        assert_eq!(decode_graph("not-base64!!!"), None);
    }

    #[test]
    fn test_pie_flattens_with_percentages() {
        let nodes = vec![Node::Pie(vec![
            Slice { name: "AAA".to_string(), value: 750.0 },
            Slice { name: "BBB".to_string(), value: 250.0 },
        ])];
        let lines = flatten(&nodes);
        assert_eq!(lines[0], "  AAA 75.0% (750.00)");
        assert_eq!(lines[1], "  BBB 25.0% (250.00)");
    }

    #[test]
    fn test_write_images() {
        let dir = tempfile::tempdir().unwrap();
        let nodes = vec![
            Node::Line("MAE: 1".to_string()),
            Node::Image {
                label: "Actual vs Predicted".to_string(),
                png: vec![1, 2, 3],
            },
        ];
        let written = write_images(&nodes, dir.path()).unwrap();
        assert_eq!(written.len(), 1);
        assert!(written[0].ends_with("actual_vs_predicted.png"));
        assert_eq!(std::fs::read(&written[0]).unwrap(), vec![1, 2, 3]);
    }
}
