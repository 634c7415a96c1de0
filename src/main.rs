mod colormap;
mod dashboard;
mod error;
mod interactive_plot;
mod layout;
mod network;
mod pipeline;
mod records;
mod static_plot;

use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};

use crate::layout::SpringLayout;
use crate::network::DEFAULT_TOP_N;
use crate::pipeline::{Pipeline, PipelineConfig};
use crate::records::{read_edges, read_nodes};

#[derive(Parser)]
#[command(name = "collab-network", version, about = "Organization collaboration network renderer")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render the top organizations as an SVG image and an interactive Plotly page
    Render {
        /// Node table: organization_id, degree_centrality, betweenness
        #[arg(long)]
        nodes: PathBuf,

        /// Edge table: source, target, weight
        #[arg(long)]
        edges: PathBuf,

        /// Number of organizations kept, ranked by degree centrality
        #[arg(long, default_value_t = DEFAULT_TOP_N)]
        top_n: usize,

        /// Seed for the initial layout positions
        #[arg(long, default_value_t = 42)]
        seed: u64,

        /// Optimal node distance for the spring layout
        #[arg(long, default_value_t = 0.3, value_parser = parse_spring_distance)]
        k: f64,

        #[arg(long, default_value_t = 20)]
        iterations: usize,

        /// Let edge weights scale the spring attraction
        #[arg(long)]
        weighted_layout: bool,

        #[arg(long, default_value = ".")]
        out_dir: PathBuf,
    },
    /// Write the dashboard landing page and print its link
    Dashboard {
        #[arg(long, default_value = "dashboard.html")]
        out: PathBuf,
    },
}

fn parse_spring_distance(raw: &str) -> Result<f64, String> {
    let k: f64 = raw.parse().map_err(|e| format!("{raw:?} is not a number: {e}"))?;
    if !k.is_finite() || k <= 0.0 {
        return Err(format!("k must be a positive number, got {raw}"));
    }
    Ok(k)
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Render {
            nodes,
            edges,
            top_n,
            seed,
            k,
            iterations,
            weighted_layout,
            out_dir,
        } => {
            let node_rows = read_nodes(&nodes)
                .with_context(|| format!("loading node table {}", nodes.display()))?;
            let edge_rows = read_edges(&edges)
                .with_context(|| format!("loading edge table {}", edges.display()))?;

            let config = PipelineConfig {
                top_n,
                layout: SpringLayout {
                    k: Some(k),
                    iterations,
                    seed,
                    weighted: weighted_layout,
                    ..SpringLayout::default()
                },
                ..PipelineConfig::default()
            };
            let rendered = Pipeline::new(config).run(&node_rows, &edge_rows)?;
            log::info!(
                "full network: {} organizations, {} collaborations; layout placed {} organizations",
                rendered.full.node_count(),
                rendered.full.edge_count(),
                rendered.layout.len()
            );
            rendered
                .write_to(&out_dir)
                .with_context(|| format!("writing outputs to {}", out_dir.display()))?;
        }
        Commands::Dashboard { out } => {
            dashboard::write_landing_page(&out)?;
            log::info!("wrote {}", out.display());
            println!("{}", dashboard::dashboard_link());
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_spring_distance() {
        assert_eq!(parse_spring_distance("0.3"), Ok(0.3));
        assert!(parse_spring_distance("0").is_err());
        assert!(parse_spring_distance("-1").is_err());
        assert!(parse_spring_distance("NaN").is_err());
        assert!(parse_spring_distance("inf").is_err());
        assert!(parse_spring_distance("wide").is_err());
    }

    #[test]
    fn test_cli_rejects_zero_k() {
        let parsed = Cli::try_parse_from([
            "collab-network",
            "render",
            "--nodes",
            "nodes.csv",
            "--edges",
            "edges.csv",
            "--k",
            "0",
        ]);
        assert!(parsed.is_err());

        let parsed = Cli::try_parse_from([
            "collab-network",
            "render",
            "--nodes",
            "nodes.csv",
            "--edges",
            "edges.csv",
        ]);
        assert!(parsed.is_ok());
    }
}
