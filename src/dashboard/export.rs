//! Files produced by the dashboard.

use std::fs;
use std::path::Path;
use std::path::PathBuf;

use anyhow::Context;
use anyhow::Result;
use plotly::common::DashType;
use serde::Serialize;

use super::sweep::atm_grid;
use super::sweep::interp;
use super::sweep::DashboardSweeps;
use super::Dashboard;
use crate::quant::pricing::bsm::bs_call_put;
use crate::quant::pricing::bsm::BSMSnapshot;
use crate::visualization::write_document;
use crate::visualization::write_html;
use crate::visualization::GridPlotter;
use crate::visualization::LineChart;
use crate::visualization::Theme;

pub const CSV_FILE: &str = "sample_atm.csv";
pub const DOCUMENT_FILE: &str = "bs_dashboard_multi_panel.html";
pub const INTERACTIVE_FILE: &str = "bs_dashboard_interactive.html";

/// Panel file stems, in page order.
pub const PANELS: [&str; 6] = [
  "premium_vs_spot",
  "delta_vs_spot",
  "gamma_vs_spot",
  "vega_vs_vol",
  "theta_vs_time",
  "rho_vs_r",
];

/// One row of the ATM sample.
#[derive(Serialize, Clone, Copy, Debug, PartialEq)]
pub struct DashboardRow {
  #[serde(rename = "S")]
  pub s: f64,
  #[serde(rename = "CallPrice")]
  pub call_price: f64,
  #[serde(rename = "PutPrice")]
  pub put_price: f64,
  #[serde(rename = "CallDelta")]
  pub call_delta: f64,
  #[serde(rename = "PutDelta")]
  pub put_delta: f64,
  #[serde(rename = "Gamma")]
  pub gamma: f64,
  #[serde(rename = "Vega")]
  pub vega: f64,
  #[serde(rename = "CallTheta_per_day")]
  pub call_theta_per_day: f64,
  #[serde(rename = "PutTheta_per_day")]
  pub put_theta_per_day: f64,
}

impl DashboardRow {
  pub fn new(s: f64, snap: &BSMSnapshot) -> Self {
    Self {
      s,
      call_price: snap.call,
      put_price: snap.put,
      call_delta: snap.call_delta,
      put_delta: snap.put_delta,
      gamma: snap.gamma,
      vega: snap.vega,
      call_theta_per_day: snap.call_theta,
      put_theta_per_day: snap.put_theta,
    }
  }
}

/// Paths written by [`Dashboard::run`].
#[derive(Clone, Debug, Default)]
pub struct DashboardOutputs {
  pub charts: Vec<PathBuf>,
  pub document: PathBuf,
  pub csv: PathBuf,
  pub interactive: Option<PathBuf>,
  pub images: Vec<PathBuf>,
}

pub(super) fn write_all(dashboard: &Dashboard, sweeps: &DashboardSweeps) -> Result<DashboardOutputs> {
  let outdir = dashboard.config.outdir.as_path();
  fs::create_dir_all(outdir)
    .with_context(|| format!("failed creating dashboard output directory {:?}", outdir))?;

  let mut outputs = DashboardOutputs::default();

  let annotated = panels(dashboard, sweeps, true);
  for (stem, chart) in PANELS.iter().zip(annotated.iter()) {
    let path = outdir.join(format!("{stem}.html"));
    write_html(&chart.plot(), &path)?;
    tracing::info!(path = %path.display(), "saved chart");
    outputs.charts.push(path);
  }
  outputs.images.extend(export_images(outdir, &annotated));

  let [premium, delta, gamma, vega, theta, rho] = panels(dashboard, sweeps, false);
  let pages = vec![
    page(vec![premium, delta, gamma]),
    page(vec![vega, theta, rho]),
  ];
  let document = outdir.join(DOCUMENT_FILE);
  write_document(&pages, "Black-Scholes Dashboard", &document)?;
  tracing::info!(path = %document.display(), pages = pages.len(), "saved multi-panel document");
  outputs.images.extend(export_pages(outdir, &pages));
  outputs.document = document;

  let csv = outdir.join(CSV_FILE);
  let rows = atm_rows(dashboard);
  write_csv(&csv, &rows)?;
  tracing::info!(path = %csv.display(), rows = rows.len(), "saved CSV sample");
  outputs.csv = csv;

  outputs.interactive = export_interactive(dashboard, sweeps);

  Ok(outputs)
}

/// The 21-row ATM sample around spot.
pub fn atm_rows(dashboard: &Dashboard) -> Vec<DashboardRow> {
  let c = &dashboard.config;
  atm_grid(c.s_center)
    .iter()
    .map(|&s| DashboardRow::new(s, &bs_call_put(s, c.k, c.r, c.sigma, dashboard.t_ref)))
    .collect()
}

pub fn write_csv<P: AsRef<Path>>(path: P, rows: &[DashboardRow]) -> Result<()> {
  let path = path.as_ref();
  let mut wtr =
    csv::Writer::from_path(path).with_context(|| format!("failed creating {:?}", path))?;
  for row in rows {
    wtr.serialize(row)?;
  }
  wtr.flush()?;
  Ok(())
}

fn page(charts: Vec<LineChart>) -> plotly::Plot {
  charts
    .into_iter()
    .fold(
      GridPlotter::new().theme(Theme::Dark).row_height(520).width(1000),
      GridPlotter::register,
    )
    .plot()
}

/// The six dashboard panels. Labels at the marked values are added when `annotated`.
fn panels(dashboard: &Dashboard, sweeps: &DashboardSweeps, annotated: bool) -> [LineChart; 6] {
  let c = &dashboard.config;
  let spot = dashboard.spot_snapshot();
  let s_label = format!("{:.0}", c.s_center);

  let calls = sweeps.spot_column(|g| g.call);
  let puts = sweeps.spot_column(|g| g.put);
  let call_delta = sweeps.spot_column(|g| g.call_delta);
  let put_delta = sweeps.spot_column(|g| g.put_delta);
  let gamma = sweeps.spot_column(|g| g.gamma);

  let mut premium = LineChart::new("Option Premium vs Spot Price (Call & Put)")
    .x_label("Spot Price (S)")
    .y_label("Option Premium")
    .line("Call Price", &sweeps.spot, &calls)
    .line("Put Price", &sweeps.spot, &puts)
    .vline(c.s_center, DashType::Dash)
    .vline(c.k, DashType::Dot);

  let mut delta = LineChart::new("Delta vs Spot Price")
    .x_label("Spot Price (S)")
    .y_label("Delta")
    .line("Call Delta", &sweeps.spot, &call_delta)
    .line("Put Delta", &sweeps.spot, &put_delta)
    .vline(c.s_center, DashType::Dash);

  let mut gamma_chart = LineChart::new("Gamma vs Spot Price")
    .x_label("Spot Price (S)")
    .y_label("Gamma")
    .line("Gamma", &sweeps.spot, &gamma)
    .vline(c.s_center, DashType::Dash);

  let mut vega = LineChart::new(&format!("Vega vs Volatility (for S = {s_label})"))
    .x_label("Volatility (sigma, decimal)")
    .y_label("Vega (per 1 vol point)")
    .line("Vega", &sweeps.sigma, &sweeps.vega)
    .vline(c.sigma, DashType::Dash);

  let mut theta = LineChart::new(&format!("Theta vs Time to Expiry (for S = {s_label})"))
    .x_label("Time to expiry (days)")
    .y_label("Theta (per day)")
    .line("Call Theta (per day)", &sweeps.theta.x, &sweeps.theta.call)
    .line("Put Theta (per day)", &sweeps.theta.x, &sweeps.theta.put)
    .vline(sweeps.days_ref, DashType::Dash);

  let mut rho = LineChart::new(&format!("Rho vs Interest Rate (for S = {s_label})"))
    .x_label("Risk-free rate (r)")
    .y_label("Rho (sensitivity to r)")
    .line("Call Rho", &sweeps.rho.x, &sweeps.rho.call)
    .line("Put Rho", &sweeps.rho.x, &sweeps.rho.put)
    .vline(c.r, DashType::Dash);

  if annotated {
    premium = premium
      .annotate(
        c.s_center,
        spot.call.max(spot.put),
        &format!("Spot={s_label}\nCall={:.2}\nPut={:.2}", spot.call, spot.put),
      )
      .annotate(c.k, 0.0, &format!("Strike={:.0}", c.k));

    let cd = interp(c.s_center, &sweeps.spot, &call_delta);
    let pd = interp(c.s_center, &sweeps.spot, &put_delta);
    delta = delta.annotate(c.s_center, cd, &format!("CallΔ={cd:.3}\nPutΔ={pd:.3}"));

    let gm = interp(c.s_center, &sweeps.spot, &gamma);
    gamma_chart = gamma_chart.annotate(c.s_center, gm, &format!("Gamma@S={s_label} = {gm:.6e}"));

    let vg = interp(c.sigma, &sweeps.sigma, &sweeps.vega);
    vega = vega.annotate(c.sigma, vg, &format!("sigma={:.2}\nVega={vg:.1}", c.sigma));

    let ct = interp(sweeps.days_ref, &sweeps.theta.x, &sweeps.theta.call);
    let pt = interp(sweeps.days_ref, &sweeps.theta.x, &sweeps.theta.put);
    theta = theta.annotate(
      sweeps.days_ref,
      ct,
      &format!("T_ref={:.0}d\nCallθ={ct:.2}\nPutθ={pt:.2}", sweeps.days_ref),
    );

    let cr = interp(c.r, &sweeps.rho.x, &sweeps.rho.call);
    let pr = interp(c.r, &sweeps.rho.x, &sweeps.rho.put);
    rho = rho.annotate(
      c.r,
      cr,
      &format!("r={:.2}\nCallRho={cr:.1}\nPutRho={pr:.1}", c.r),
    );
  }

  [premium, delta, gamma_chart, vega, theta, rho].map(|chart| chart.theme(Theme::Dark))
}

/// Optional interactive chart; any failure is logged and skipped.
pub fn export_interactive(dashboard: &Dashboard, sweeps: &DashboardSweeps) -> Option<PathBuf> {
  match try_export_interactive(dashboard, sweeps) {
    Ok(path) => {
      tracing::info!(path = %path.display(), "interactive HTML exported");
      Some(path)
    }
    Err(err) => {
      tracing::warn!("interactive export unavailable ({err:#}), skipping interactive HTML export (optional)");
      None
    }
  }
}

#[cfg(feature = "interactive")]
fn try_export_interactive(dashboard: &Dashboard, sweeps: &DashboardSweeps) -> Result<PathBuf> {
  let c = &dashboard.config;
  let s_label = format!("Spot={:.0}", c.s_center);
  let k_label = format!("Strike={:.0}", c.k);

  let premium = LineChart::new("Premium vs Spot (Call & Put)")
    .line("Call Price", &sweeps.spot, &sweeps.spot_column(|g| g.call))
    .line("Put Price", &sweeps.spot, &sweeps.spot_column(|g| g.put))
    .vline(c.s_center, DashType::Dash)
    .vline(c.k, DashType::Dot)
    .text(c.s_center, 0.0, &s_label)
    .text(c.k, 0.0, &k_label);
  let delta = LineChart::new("Delta vs Spot")
    .line("Call Delta", &sweeps.spot, &sweeps.spot_column(|g| g.call_delta))
    .line("Put Delta", &sweeps.spot, &sweeps.spot_column(|g| g.put_delta))
    .vline(c.s_center, DashType::Dash)
    .vline(c.k, DashType::Dot);

  let plot = GridPlotter::new()
    .theme(Theme::Dark)
    .shared_x()
    .row_height(390)
    .width(1100)
    .register(premium)
    .register(delta)
    .plot();

  let path = c.outdir.join(INTERACTIVE_FILE);
  write_html(&plot, &path)?;
  Ok(path)
}

#[cfg(not(feature = "interactive"))]
fn try_export_interactive(_dashboard: &Dashboard, _sweeps: &DashboardSweeps) -> Result<PathBuf> {
  anyhow::bail!("built without the `interactive` feature")
}

#[cfg(feature = "static-export")]
fn export_images(outdir: &Path, charts: &[LineChart]) -> Vec<PathBuf> {
  use crate::visualization::CHART_HEIGHT;
  use crate::visualization::CHART_WIDTH;

  PANELS
    .iter()
    .zip(charts.iter())
    .filter_map(|(stem, chart)| {
      let path = outdir.join(format!("{stem}.png"));
      let written = crate::visualization::write_image(
        &chart.plot(),
        &path,
        plotly::ImageFormat::PNG,
        CHART_WIDTH,
        CHART_HEIGHT,
      );
      log_static(written, path)
    })
    .collect()
}

#[cfg(not(feature = "static-export"))]
fn export_images(_outdir: &Path, _charts: &[LineChart]) -> Vec<PathBuf> {
  Vec::new()
}

#[cfg(feature = "static-export")]
fn export_pages(outdir: &Path, pages: &[plotly::Plot]) -> Vec<PathBuf> {
  pages
    .iter()
    .enumerate()
    .filter_map(|(i, page)| {
      let path = outdir.join(format!("bs_dashboard_multi_panel_page{}.pdf", i + 1));
      let written =
        crate::visualization::write_image(page, &path, plotly::ImageFormat::PDF, 1000, 1680);
      log_static(written, path)
    })
    .collect()
}

#[cfg(not(feature = "static-export"))]
fn export_pages(_outdir: &Path, _pages: &[plotly::Plot]) -> Vec<PathBuf> {
  Vec::new()
}

#[cfg(feature = "static-export")]
fn log_static(written: Result<()>, path: PathBuf) -> Option<PathBuf> {
  written
    .inspect_err(|err| tracing::warn!("static export failed ({err:#})"))
    .ok()
    .map(|()| {
      tracing::info!(path = %path.display(), "saved image");
      path
    })
}
