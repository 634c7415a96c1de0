//! Interactive rendering as a Plotly figure.
//!
//! The figure serializes to the JSON shape `Plotly.newPlot` accepts, so it
//! can be written as a standalone page or handed to any Plotly front end.

use serde::Serialize;
use std::path::Path;

use crate::error::{NetworkError, Result};
use crate::layout::Layout;
use crate::network::CollabNetwork;

pub const INTERACTIVE_TITLE: &str = "Top 100 Organizations Collaboration Network";
pub const HOVER_CAPTION: &str = "Hover to inspect organization metrics";
const PLOTLY_CDN: &str = "https://cdn.plot.ly/plotly-2.35.2.min.js";

#[derive(Debug, Clone, PartialEq)]
pub struct InteractiveStyle {
    pub title: String,
    /// Marker size is `degree_centrality * size_scale`.
    pub size_scale: f64,
    pub colorscale: String,
    pub edge_color: String,
    pub edge_width: f64,
}

impl Default for InteractiveStyle {
    fn default() -> Self {
        InteractiveStyle {
            title: INTERACTIVE_TITLE.to_string(),
            size_scale: 30.0,
            colorscale: "YlGnBu".to_string(),
            edge_color: "#888".to_string(),
            edge_width: 0.5,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Figure {
    pub data: Vec<Scatter>,
    pub layout: FigureLayout,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Scatter {
    #[serde(rename = "type")]
    pub kind: &'static str,
    /// `None` entries break the line between consecutive segments.
    pub x: Vec<Option<f64>>,
    pub y: Vec<Option<f64>>,
    pub mode: &'static str,
    pub hoverinfo: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line: Option<Line>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub marker: Option<Marker>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Line {
    pub width: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Marker {
    pub showscale: bool,
    pub colorscale: String,
    pub size: Vec<f64>,
    pub color: Vec<f64>,
    pub colorbar: ColorBar,
    pub line: Line,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColorBar {
    pub thickness: f64,
    pub title: Title,
    pub xanchor: &'static str,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Title {
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub side: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font: Option<Font>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Font {
    pub size: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FigureLayout {
    pub title: Title,
    pub showlegend: bool,
    pub hovermode: &'static str,
    pub margin: Margin,
    pub annotations: Vec<Annotation>,
    pub xaxis: Axis,
    pub yaxis: Axis,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Margin {
    pub b: u32,
    pub l: u32,
    pub r: u32,
    pub t: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Annotation {
    pub text: String,
    pub showarrow: bool,
    pub xref: &'static str,
    pub yref: &'static str,
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Axis {
    pub showgrid: bool,
    pub zeroline: bool,
}

pub fn hover_text(id: &str, degree: f64, betweenness: f64) -> String {
    format!("Org ID: {id}<br>Degree: {degree:.3}<br>Betweenness: {betweenness:.3}")
}

pub fn encode_interactive(
    network: &CollabNetwork,
    layout: &Layout,
    style: &InteractiveStyle,
) -> Result<Figure> {
    let mut edge_x = Vec::with_capacity(network.edge_count() * 3);
    let mut edge_y = Vec::with_capacity(network.edge_count() * 3);
    for (source, target, _) in network.collaborations() {
        let (p0, p1) = (layout.position(source)?, layout.position(target)?);
        edge_x.extend([Some(p0.x), Some(p1.x), None]);
        edge_y.extend([Some(p0.y), Some(p1.y), None]);
    }

    let edge_trace = Scatter {
        kind: "scatter",
        x: edge_x,
        y: edge_y,
        mode: "lines",
        hoverinfo: "none",
        text: None,
        line: Some(Line {
            width: style.edge_width,
            color: Some(style.edge_color.clone()),
        }),
        marker: None,
    };

    let n = network.node_count();
    let (mut node_x, mut node_y) = (Vec::with_capacity(n), Vec::with_capacity(n));
    let (mut text, mut color, mut size) =
        (Vec::with_capacity(n), Vec::with_capacity(n), Vec::with_capacity(n));
    for org in network.organizations() {
        let metrics = org.metrics()?;
        let p = layout.position(&org.id)?;
        node_x.push(Some(p.x));
        node_y.push(Some(p.y));
        text.push(hover_text(&org.id, metrics.degree, metrics.betweenness));
        color.push(metrics.betweenness);
        size.push(metrics.degree * style.size_scale);
    }

    let node_trace = Scatter {
        kind: "scatter",
        x: node_x,
        y: node_y,
        mode: "markers",
        hoverinfo: "text",
        text: Some(text),
        line: None,
        marker: Some(Marker {
            showscale: true,
            colorscale: style.colorscale.clone(),
            size,
            color,
            colorbar: ColorBar {
                thickness: 15.0,
                title: Title {
                    text: "Betweenness".to_string(),
                    side: Some("right"),
                    font: None,
                },
                xanchor: "left",
            },
            line: Line {
                width: 2.0,
                color: None,
            },
        }),
    };

    Ok(Figure {
        data: vec![edge_trace, node_trace],
        layout: FigureLayout {
            title: Title {
                text: style.title.clone(),
                side: None,
                font: Some(Font { size: 16.0 }),
            },
            showlegend: false,
            hovermode: "closest",
            margin: Margin {
                b: 20,
                l: 5,
                r: 5,
                t: 40,
            },
            annotations: vec![Annotation {
                text: HOVER_CAPTION.to_string(),
                showarrow: false,
                xref: "paper",
                yref: "paper",
                x: 0.005,
                y: -0.002,
            }],
            xaxis: Axis {
                showgrid: false,
                zeroline: false,
            },
            yaxis: Axis {
                showgrid: false,
                zeroline: false,
            },
        },
    })
}

impl Figure {
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Standalone page that draws the figure with plotly.js.
    pub fn to_html(&self) -> Result<String> {
        // Keep ids such as "</script>" from closing the inline script.
        let payload = self.to_json()?.replace("</", "<\\/");
        Ok(format!(
            r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>{title}</title>
<script src="{PLOTLY_CDN}"></script>
</head>
<body>
<div id="network" style="width:100%;height:95vh;"></div>
<script>
const figure = {payload};
Plotly.newPlot("network", figure.data, figure.layout);
</script>
</body>
</html>
"#,
            title = self.layout.title.text,
        ))
    }

    pub fn write_json(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        std::fs::write(path, self.to_json()?).map_err(|e| NetworkError::io(path, e))
    }

    pub fn write_html(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        std::fs::write(path, self.to_html()?).map_err(|e| NetworkError::io(path, e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::SpringLayout;
    use crate::network::build_network;
    use crate::records::{EdgeRecord, NodeRecord};
    use serde_json::Value;

    fn sample() -> (CollabNetwork, Layout) {
        let nodes = vec![
            NodeRecord {
                organization_id: "A".to_string(),
                degree_centrality: 0.9,
                betweenness: 0.12345,
            },
            NodeRecord {
                organization_id: "B".to_string(),
                degree_centrality: 0.5,
                betweenness: 0.0,
            },
            NodeRecord {
                organization_id: "C".to_string(),
                degree_centrality: 0.1,
                betweenness: 0.25,
            },
        ];
        let edges = vec![
            EdgeRecord {
                source: "A".to_string(),
                target: "B".to_string(),
                weight: 1.0,
            },
            EdgeRecord {
                source: "B".to_string(),
                target: "C".to_string(),
                weight: 3.0,
            },
        ];
        let network = build_network(&nodes, &edges);
        let layout = SpringLayout::default().compute(&network).unwrap();
        (network, layout)
    }

    #[test]
    fn test_hover_text_format() {
        assert_eq!(
            hover_text("42", 0.9, 0.12345),
            "Org ID: 42<br>Degree: 0.900<br>Betweenness: 0.123"
        );
    }

    #[test]
    fn test_node_trace_encoding() {
        let (network, layout) = sample();
        let figure = encode_interactive(&network, &layout, &InteractiveStyle::default()).unwrap();
        let nodes = &figure.data[1];
        let marker = nodes.marker.as_ref().unwrap();

        assert_eq!(nodes.mode, "markers");
        assert_eq!(marker.size, vec![0.9 * 30.0, 0.5 * 30.0, 0.1 * 30.0]);
        assert_eq!(marker.color, vec![0.12345, 0.0, 0.25]);
        assert_eq!(marker.colorscale, "YlGnBu");
        assert_eq!(
            nodes.text.as_ref().unwrap()[0],
            "Org ID: A<br>Degree: 0.900<br>Betweenness: 0.123"
        );

        let a = layout.get("A").unwrap();
        assert_eq!(nodes.x[0], Some(a.x));
        assert_eq!(nodes.y[0], Some(a.y));
    }

    #[test]
    fn test_edge_trace_has_gaps() {
        let (network, layout) = sample();
        let figure = encode_interactive(&network, &layout, &InteractiveStyle::default()).unwrap();
        let edges = &figure.data[0];

        assert_eq!(edges.x.len(), 6);
        assert_eq!(edges.x[2], None);
        assert_eq!(edges.y[5], None);
        assert_eq!(edges.x[0], Some(layout.get("A").unwrap().x));
        assert!(edges.marker.is_none());
    }

    #[test]
    fn test_figure_json() {
        let (network, layout) = sample();
        let figure = encode_interactive(&network, &layout, &InteractiveStyle::default()).unwrap();
        let json: Value = serde_json::from_str(&figure.to_json().unwrap()).unwrap();

        assert_eq!(json["data"][0]["x"][2], Value::Null);
        assert_eq!(json["data"][0]["hoverinfo"], "none");
        assert_eq!(json["data"][1]["marker"]["colorbar"]["title"]["text"], "Betweenness");
        assert_eq!(json["layout"]["title"]["text"], INTERACTIVE_TITLE);
        assert_eq!(json["layout"]["annotations"][0]["text"], HOVER_CAPTION);
        assert_eq!(json["layout"]["xaxis"]["showgrid"], false);
        assert_eq!(json["layout"]["yaxis"]["zeroline"], false);
        assert_eq!(json["layout"]["showlegend"], false);
        assert!(json["data"][0].get("marker").is_none());
    }

    #[test]
    fn test_html_escapes_script_close() {
        let mut network = CollabNetwork::new();
        network.add_organization(
            "</script>",
            Some(crate::network::Centrality {
                degree: 0.1,
                betweenness: 0.1,
            }),
        );
        let layout = SpringLayout::default().compute(&network).unwrap();
        let figure = encode_interactive(&network, &layout, &InteractiveStyle::default()).unwrap();
        let html = figure.to_html().unwrap();

        assert!(html.contains("Plotly.newPlot"));
        assert_eq!(html.matches("</script>").count(), 2);
    }

    #[test]
    fn test_write_html() {
        let (network, layout) = sample();
        let figure = encode_interactive(&network, &layout, &InteractiveStyle::default()).unwrap();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("network.html");

        figure.write_html(&path).unwrap();
        let html = std::fs::read_to_string(&path).unwrap();
        assert!(html.contains(INTERACTIVE_TITLE));
    }
}
