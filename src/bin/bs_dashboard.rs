use anyhow::Result;
use options_lab::dashboard::Dashboard;
use options_lab::dashboard::DashboardConfig;

fn main() -> Result<()> {
  options_lab::telemetry::init();

  let dashboard = Dashboard::new(DashboardConfig::default())?;
  dashboard.summary_table().printstd();

  let outputs = dashboard.run()?;
  tracing::info!(
    outdir = %dashboard.config.outdir.display(),
    charts = outputs.charts.len(),
    interactive = outputs.interactive.is_some(),
    "all outputs saved"
  );
  Ok(())
}
