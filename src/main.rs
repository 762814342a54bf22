//! Replay a scripted input session and save the final frame as a PNG.

use anyhow::{Context, Result};
use clap::Parser;
use shapekit::script::Script;
use shapekit::{init_logging, InteractionSettings, BUILD_DATE, VERSION};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "shapekit")]
#[command(about = "Replay a scripted pointer/keyboard session against a shape scene")]
struct Cli {
    /// Script to replay (JSON)
    script: PathBuf,

    /// Where to write the final frame
    #[arg(short, long, default_value = "shapekit.png")]
    output: PathBuf,

    /// Interaction settings file (TOML or JSON), overriding the script's
    #[arg(short, long)]
    settings: Option<PathBuf>,
}

fn main() -> Result<()> {
    init_logging()?;
    let cli = Cli::parse();
    tracing::info!("ShapeKit {} (built {})", VERSION, BUILD_DATE);

    let mut script = Script::load(&cli.script)?;
    if let Some(path) = &cli.settings {
        script.settings = InteractionSettings::load_from_file(path)
            .with_context(|| format!("Failed to load settings from {}", path.display()))?;
    }

    let mut scene = script.build()?;
    let summary = script.run(&mut scene)?;
    tracing::info!(
        "Replayed {} step(s): {} handler call(s), {} prevented, {} frame(s)",
        summary.steps,
        summary.handlers,
        summary.prevented,
        summary.frames
    );

    let frame = scene.snapshot()?;
    frame
        .save(&cli.output)
        .with_context(|| format!("Failed to write {}", cli.output.display()))?;
    tracing::info!("Wrote {}", cli.output.display());
    Ok(())
}
