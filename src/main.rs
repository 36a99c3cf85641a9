use std::path::PathBuf;
use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand};

use patternflow::commands;
use patternflow::commands::export::ExportFormat;
use patternflow::models::Settings;
use patternflow::services::snapshot_watcher::watch_snapshot;
use patternflow::utils::config;

#[derive(Parser, Debug)]
#[command(name = "patternflow", about = "Lay out and render a day's pattern cascades")]
struct Cli {
    /// Settings file (JSON). Falls back to PATTERNFLOW_SETTINGS, then defaults.
    #[arg(long, global = true)]
    settings: Option<PathBuf>,

    /// Canvas width override
    #[arg(long, global = true)]
    width: Option<f64>,

    /// Canvas height override
    #[arg(long, global = true)]
    height: Option<f64>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Render a snapshot to SVG
    Render {
        snapshot: PathBuf,
        /// Output file; stdout when omitted
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Print computed node positions
    Layout {
        snapshot: PathBuf,
        #[arg(long)]
        json: bool,
    },

    /// Export computed positions as JSON or CSV
    Export {
        snapshot: PathBuf,
        #[arg(short, long, default_value = "json")]
        format: ExportFormat,
        #[arg(short, long, default_value = "exports")]
        dir: PathBuf,
    },

    /// Re-render whenever the snapshot is refreshed
    Watch {
        snapshot: PathBuf,
        #[arg(short, long)]
        output: PathBuf,
        /// Seconds between refreshes (defaults to settings)
        #[arg(long)]
        interval: Option<u64>,
    },
}

fn main() -> Result<()> {
    config::load_dotenv();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let settings = resolve_settings(&cli)?;

    match cli.command {
        Commands::Render { snapshot, output } => {
            let day = commands::flow::load_snapshot(&snapshot).map_err(|e| anyhow!(e))?;
            let svg = commands::flow::render_flow(&day, &settings).map_err(|e| anyhow!(e))?;
            match output {
                Some(path) => {
                    std::fs::write(&path, svg).with_context(|| format!("writing {}", path.display()))?;
                    log::info!("Rendered {} to {}", day.date, path.display());
                }
                None => print!("{}", svg),
            }
        }
        Commands::Layout { snapshot, json } => {
            let day = commands::flow::load_snapshot(&snapshot).map_err(|e| anyhow!(e))?;
            let records = commands::flow::compute_positions(&day, &settings).map_err(|e| anyhow!(e))?;
            if json {
                println!("{}", serde_json::to_string_pretty(&records)?);
            } else {
                for r in &records {
                    println!(
                        "col {:>2}  ({:>7.1}, {:>7.1})  {:<24} {}",
                        r.column, r.x, r.y, r.pattern_type, r.category
                    );
                }
            }
        }
        Commands::Export { snapshot, format, dir } => {
            let day = commands::flow::load_snapshot(&snapshot).map_err(|e| anyhow!(e))?;
            let path = commands::export::export_layout(&day, &settings, format, &dir).map_err(|e| anyhow!(e))?;
            println!("{}", path);
        }
        Commands::Watch {
            snapshot,
            output,
            interval,
        } => {
            let secs = interval.unwrap_or(settings.refresh.interval_secs).max(1);
            let model = patternflow::FlowModel::new(settings.clone(), settings.canvas_size())?;
            let runtime = tokio::runtime::Runtime::new()?;
            runtime.block_on(watch_snapshot(snapshot, output, model, Duration::from_secs(secs), None))?;
        }
    }

    Ok(())
}

fn resolve_settings(cli: &Cli) -> Result<Settings> {
    let path = cli.settings.clone().or_else(config::settings_path_from_env);
    let mut settings = config::load_settings(path.as_deref())?;
    if let Some(width) = cli.width {
        settings.canvas.width = width;
    }
    if let Some(height) = cli.height {
        settings.canvas.height = height;
    }
    settings.validate()?;
    Ok(settings)
}
