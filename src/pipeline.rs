use std::path::{Path, PathBuf};

use crate::error::{NetworkError, Result};
use crate::interactive_plot::{encode_interactive, Figure, InteractiveStyle};
use crate::layout::{Layout, SpringLayout};
use crate::network::{build_network, export_dot, top_n_subgraph, CollabNetwork, DEFAULT_TOP_N};
use crate::records::{EdgeRecord, NodeRecord};
use crate::static_plot::{encode_static, StaticScene, StaticStyle};

#[derive(Debug, Clone, PartialEq)]
pub struct PipelineConfig {
    pub top_n: usize,
    pub layout: SpringLayout,
    pub static_style: StaticStyle,
    pub interactive_style: InteractiveStyle,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        PipelineConfig {
            top_n: DEFAULT_TOP_N,
            layout: SpringLayout::default(),
            static_style: StaticStyle::default(),
            interactive_style: InteractiveStyle::default(),
        }
    }
}

/// Everything one run produces, from the full graph down to both renderings.
#[derive(Debug, Clone)]
pub struct Rendered {
    pub full: CollabNetwork,
    pub filtered: CollabNetwork,
    pub layout: Layout,
    pub scene: StaticScene,
    pub figure: Figure,
}

pub struct Pipeline {
    config: PipelineConfig,
}

impl Pipeline {
    pub fn new(config: PipelineConfig) -> Self {
        Pipeline { config }
    }

    pub fn run(&self, nodes: &[NodeRecord], edges: &[EdgeRecord]) -> Result<Rendered> {
        if nodes.is_empty() {
            return Err(NetworkError::EmptyDataset("nodes"));
        }

        let full = build_network(nodes, edges);
        let bare = full.bare_organizations();
        if !bare.is_empty() {
            log::warn!(
                "{} organizations appear only in the edge table and have no metrics",
                bare.len()
            );
        }

        let filtered = top_n_subgraph(&full, nodes, self.config.top_n);
        let layout = self.config.layout.compute(&filtered)?;
        let scene = encode_static(&filtered, &layout, &self.config.static_style)?;
        let figure = encode_interactive(&filtered, &layout, &self.config.interactive_style)?;

        Ok(Rendered {
            full,
            filtered,
            layout,
            scene,
            figure,
        })
    }
}

impl Rendered {
    /// Writes `network.svg`, `network.html`, `network.json` and `network.dot`.
    pub fn write_to(&self, dir: impl AsRef<Path>) -> Result<Vec<PathBuf>> {
        let dir = dir.as_ref();
        std::fs::create_dir_all(dir).map_err(|e| NetworkError::io(dir, e))?;

        let svg = dir.join("network.svg");
        self.scene.write_svg(&svg)?;
        let html = dir.join("network.html");
        self.figure.write_html(&html)?;
        let json = dir.join("network.json");
        self.figure.write_json(&json)?;
        let dot = dir.join("network.dot");
        export_dot(&self.filtered, &dot)?;

        let written = vec![svg, html, json, dot];
        for path in &written {
            log::info!("wrote {}", path.display());
        }
        Ok(written)
    }
}
