//! Static SVG rendering of the filtered network, drawn with plotters.
//!
//! Marker sizes follow the point-squared area convention of the usual
//! plotting libraries: a node of size `s` is drawn with diameter `sqrt(s)`
//! points.

use std::path::Path;

use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};

use crate::colormap::{viridis, Normalize};
use crate::error::{NetworkError, Result};
use crate::layout::{Layout, Point};
use crate::network::CollabNetwork;

pub const STATIC_TITLE: &str = "Filtered Organization Collaboration Network";

#[derive(Debug, Clone, PartialEq)]
pub struct StaticStyle {
    pub title: String,
    /// Figure size in inches.
    pub width: f64,
    pub height: f64,
    pub dpi: f64,
    /// Node size is `degree_centrality * size_scale`.
    pub size_scale: f64,
    pub node_alpha: f64,
    pub edge_alpha: f64,
    pub edge_width: f64,
    pub label_size: f64,
    pub title_size: f64,
}

impl Default for StaticStyle {
    fn default() -> Self {
        StaticStyle {
            title: STATIC_TITLE.to_string(),
            width: 16.0,
            height: 10.0,
            dpi: 100.0,
            size_scale: 4000.0,
            node_alpha: 0.85,
            edge_alpha: 0.3,
            edge_width: 1.0,
            label_size: 8.0,
            title_size: 16.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct StaticMarker {
    pub id: String,
    pub position: Point,
    pub size: f64,
    /// Betweenness, the value fed through the colour scale.
    pub color_value: f64,
    pub fill: RGBColor,
}

#[derive(Debug, Clone, PartialEq)]
pub struct StaticScene {
    pub style: StaticStyle,
    pub markers: Vec<StaticMarker>,
    pub edges: Vec<(Point, Point)>,
}

pub fn encode_static(
    network: &CollabNetwork,
    layout: &Layout,
    style: &StaticStyle,
) -> Result<StaticScene> {
    let mut markers = Vec::with_capacity(network.node_count());
    for org in network.organizations() {
        let metrics = org.metrics()?;
        markers.push(StaticMarker {
            id: org.id.clone(),
            position: layout.position(&org.id)?,
            size: metrics.degree * style.size_scale,
            color_value: metrics.betweenness,
            fill: BLACK,
        });
    }

    let norm = Normalize::fit(markers.iter().map(|m| m.color_value));
    for marker in &mut markers {
        marker.fill = viridis(norm.apply(marker.color_value));
    }

    let edges = network
        .collaborations()
        .map(|(source, target, _)| -> Result<(Point, Point)> {
            Ok((layout.position(source)?, layout.position(target)?))
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(StaticScene {
        style: style.clone(),
        markers,
        edges,
    })
}

fn padded(lo: f64, hi: f64) -> std::ops::Range<f64> {
    if !lo.is_finite() || !hi.is_finite() {
        return -1.0..1.0;
    }
    if hi - lo <= f64::EPSILON {
        return lo - 1.0..hi + 1.0;
    }
    let pad = (hi - lo) * 0.05;
    lo - pad..hi + pad
}

fn plot_error(err: impl std::fmt::Display) -> NetworkError {
    NetworkError::Plot(err.to_string())
}

impl StaticScene {
    pub fn to_svg(&self) -> Result<String> {
        let style = &self.style;
        let px = style.dpi / 72.0;
        let size = (
            (style.width * style.dpi).round() as u32,
            (style.height * style.dpi).round() as u32,
        );

        let (mut xmin, mut xmax, mut ymin, mut ymax) =
            (f64::INFINITY, f64::NEG_INFINITY, f64::INFINITY, f64::NEG_INFINITY);
        for m in &self.markers {
            xmin = xmin.min(m.position.x);
            xmax = xmax.max(m.position.x);
            ymin = ymin.min(m.position.y);
            ymax = ymax.max(m.position.y);
        }

        let title_font = FontDesc::new(FontFamily::SansSerif, style.title_size * px, FontStyle::Normal);
        let label_style = TextStyle::from(FontDesc::new(
            FontFamily::SansSerif,
            style.label_size * px,
            FontStyle::Normal,
        ))
        .pos(Pos::new(HPos::Center, VPos::Center));
        let edge_style = BLACK
            .mix(style.edge_alpha)
            .stroke_width((style.edge_width * px).round().max(1.0) as u32);

        let mut svg = String::new();
        {
            let root = SVGBackend::with_string(&mut svg, size).into_drawing_area();
            root.fill(&WHITE).map_err(plot_error)?;

            // No mesh is configured, so the chart carries neither axes nor grid.
            let mut chart = ChartBuilder::on(&root)
                .caption(&style.title, title_font)
                .margin(20)
                .build_cartesian_2d(padded(xmin, xmax), padded(ymin, ymax))
                .map_err(plot_error)?;

            chart
                .draw_series(self.edges.iter().map(|&(a, b)| {
                    PathElement::new(vec![(a.x, a.y), (b.x, b.y)], edge_style)
                }))
                .map_err(plot_error)?;

            chart
                .draw_series(self.markers.iter().map(|m| {
                    let radius = m.size.max(0.0).sqrt() / 2.0 * px;
                    Circle::new(
                        (m.position.x, m.position.y),
                        radius.round().max(1.0) as u32,
                        m.fill.mix(style.node_alpha).filled(),
                    )
                }))
                .map_err(plot_error)?;

            chart
                .draw_series(self.markers.iter().map(|m| {
                    Text::new(
                        m.id.clone(),
                        (m.position.x, m.position.y),
                        label_style.clone(),
                    )
                }))
                .map_err(plot_error)?;

            root.present().map_err(plot_error)?;
        }
        Ok(svg)
    }

    pub fn write_svg(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        std::fs::write(path, self.to_svg()?).map_err(|e| NetworkError::io(path, e))
    }
}
