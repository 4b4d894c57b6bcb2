use anyhow::Result;
use options_lab::diagrams;

fn main() -> Result<()> {
  options_lab::telemetry::init();

  let paths = diagrams::write_all(diagrams::DEFAULT_OUTDIR)?;
  tracing::info!(count = paths.len(), outdir = diagrams::DEFAULT_OUTDIR, "strategy charts saved");
  Ok(())
}
