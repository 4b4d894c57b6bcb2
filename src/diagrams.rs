//! # Strategy Diagrams
//!
//! $$
//! S_T\mapsto\big(\Pi(S_T),\ \text{P\&L}(S_T)\big)
//! $$
//!
//! Payoff/profit charts of the basic strategies, one HTML file each.
//!
use std::fs;
use std::path::Path;
use std::path::PathBuf;

use anyhow::Context;
use anyhow::Result;
use plotly::common::DashType;

use crate::quant::strategies::profile;
use crate::quant::strategies::CoveredCall;
use crate::quant::strategies::FiduciaryCall;
use crate::quant::strategies::LongForward;
use crate::quant::strategies::ProtectivePut;
use crate::quant::strategies::ShortCall;
use crate::quant::strategies::ShortPut;
use crate::traits::PayoffExt;
use crate::visualization::strategy_chart;
use crate::visualization::write_html;
use crate::visualization::LineChart;

pub const DEFAULT_OUTDIR: &str = "./strategy_outputs";

const GAIN_FILL: &str = "rgba(0,160,0,0.15)";
const LOSS_FILL: &str = "rgba(200,0,0,0.15)";

/// Every strategy chart with its file stem.
pub fn strategy_charts() -> Vec<(&'static str, LineChart)> {
  vec![
    ("covered_call", covered_call(&CoveredCall::default())),
    ("short_call", short_call(&ShortCall::default())),
    ("protective_put", protective_put(&ProtectivePut::default())),
    ("fiduciary_call", fiduciary_call(&FiduciaryCall::default())),
    (
      "long_forward_short_put",
      long_forward_short_put(&LongForward::default(), &ShortPut::default()),
    ),
  ]
}

/// Write every chart as `<stem>.html` under `outdir`.
pub fn write_all<P: AsRef<Path>>(outdir: P) -> Result<Vec<PathBuf>> {
  let outdir = outdir.as_ref();
  fs::create_dir_all(outdir)
    .with_context(|| format!("failed creating strategy output directory {:?}", outdir))?;

  strategy_charts()
    .into_iter()
    .map(|(stem, chart)| {
      let path = outdir.join(format!("{stem}.html"));
      write_html(&chart.plot(), &path)?;
      tracing::info!(path = %path.display(), "saved strategy chart");
      Ok(path)
    })
    .collect()
}

/// Legs dashed, profit and loss zones shaded, capped profit marked at the strike.
pub fn covered_call(cc: &CoveredCall) -> LineChart {
  let grid = CoveredCall::grid().to_array();
  let prof = profile(cc, &grid);
  let stock = grid.mapv(|s| cc.stock_leg(s));
  let call = grid.mapv(|s| cc.short_call_leg(s));

  let mut chart = strategy_chart(cc, &prof, cc.k, "green")
    .styled_line("Long Stock", &grid, &stock, DashType::Dash, 1.0, Some("gray"))
    .styled_line("Short Call", &grid, &call, DashType::Dash, 1.0, Some("orange"))
    .fill_to_zero(&grid, &prof.profit.mapv(|v| v.max(0.0)), GAIN_FILL)
    .fill_to_zero(&grid, &prof.profit.mapv(|v| v.min(0.0)), LOSS_FILL)
    .annotate(
      cc.s0 - 2.0,
      -2.0,
      "Downside Protection\n(The Premium cushions the loss)",
    )
    .x_range(80.0, 130.0)
    .y_range(-20.0, 20.0);

  if let Some(max_profit) = cc.max_profit() {
    chart = chart.point(cc.k, max_profit, "green").text(
      cc.k + 2.0,
      max_profit,
      &format!("Max Profit Capped at ${max_profit}\n(Stock Gain + Premium)"),
    );
  }
  chart
}

pub fn short_call(sc: &ShortCall) -> LineChart {
  let prof = profile(sc, &ShortCall::grid().to_array());
  let mut chart = strategy_chart(sc, &prof, sc.k, "red")
    .x_range(0.0, 200.0)
    .y_range(-100.0, 50.0);

  if let Some(max_profit) = sc.max_profit() {
    chart = chart.text(5.0, max_profit + 2.0, &format!("Max Profit = Premium (${max_profit})"));
  }
  chart
}

pub fn protective_put(pp: &ProtectivePut) -> LineChart {
  let prof = profile(pp, &ProtectivePut::grid().to_array());
  let x = prof.s_t.get(0).copied().unwrap_or(0.0);
  let max_loss = pp.max_loss();

  strategy_chart(pp, &prof, pp.k, "blue")
    .text(x, max_loss, &format!("Max Loss = ${max_loss}"))
}

pub fn fiduciary_call(fc: &FiduciaryCall) -> LineChart {
  let prof = profile(fc, &FiduciaryCall::grid().to_array());
  strategy_chart(fc, &prof, fc.k, "purple")
}

/// Long forward payoff against the short put profit on one chart.
pub fn long_forward_short_put(fwd: &LongForward, sp: &ShortPut) -> LineChart {
  let grid = LongForward::grid().to_array();
  let fwd_prof = profile(fwd, &grid);
  let sp_prof = profile(sp, &grid);

  let mut chart = LineChart::new(&format!(
    "Long Forward (F0={}) vs Short Put (K={}, p0={})",
    fwd.f0, sp.k, sp.p0
  ))
  .x_label("Stock Price at Expiration (S_T)")
  .y_label("Profit / Loss")
  .styled_line(
    "Long Forward Payoff",
    &grid,
    &fwd_prof.payoff,
    DashType::Solid,
    2.0,
    Some("blue"),
  )
  .styled_line(
    "Short Put Payoff (No Premium)",
    &grid,
    &sp_prof.payoff,
    DashType::Dash,
    1.5,
    None,
  )
  .styled_line(
    "Short Put Profit",
    &grid,
    &sp_prof.profit,
    DashType::Solid,
    2.5,
    Some("red"),
  )
  .zero_line()
  .colored_vline(sp.k, DashType::Dot, "gray")
  .x_range(0.0, 200.0)
  .y_range(-120.0, 120.0);

  for (name, breakeven) in [(fwd.name(), fwd.breakeven()), (sp.name(), sp.breakeven())] {
    if let Some(b) = breakeven {
      chart = chart
        .point(b, 0.0, "black")
        .annotate(b, 0.0, &format!("{name} Breakeven\n(${b})"));
    }
  }
  if let Some(max_profit) = sp.max_profit() {
    chart = chart.text(sp.k, max_profit, &format!("Short Put Max Profit = ${max_profit}"));
  }
  chart
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn five_charts_with_distinct_stems() {
    let charts = strategy_charts();
    let mut stems = charts.iter().map(|(s, _)| *s).collect::<Vec<_>>();
    assert_eq!(stems[4], "long_forward_short_put");

    stems.sort_unstable();
    stems.dedup();
    assert_eq!(stems.len(), 5);
  }

  #[test]
  fn covered_call_adds_legs_and_zones() {
    let chart = covered_call(&CoveredCall::default());
    // payoff, profit, two legs, two fills
    assert_eq!(chart.n_series(), 6);

    let json = chart.plot().to_json();
    assert!(json.contains("Long Stock"));
    assert!(json.contains("Breakeven<br>($95)"));
    assert!(json.contains("Max Profit Capped at $10<br>(Stock Gain + Premium)"));
    assert!(json.contains("\"range\":[-20.0,20.0]"));
  }

  #[test]
  fn covered_call_marks_the_cap_at_the_strike() {
    let cc = CoveredCall::default();
    let json = covered_call(&cc).plot().to_json();

    // single-point marker traces: breakeven at (95, 0), cap at (105, 10)
    assert!(json.contains("[95.0]"));
    assert!(json.contains("[105.0]"));
    assert!(json.contains("[10.0]"));
  }

  #[test]
  fn short_call_limits_and_premium_label() {
    let json = short_call(&ShortCall::default()).plot().to_json();

    assert!(json.contains("Max Profit = Premium ($20)"));
    assert!(json.contains("\"range\":[0.0,200.0]"));
    assert!(json.contains("\"range\":[-100.0,50.0]"));
  }

  #[test]
  fn protective_put_labels_max_loss() {
    let json = protective_put(&ProtectivePut::default()).plot().to_json();
    assert!(json.contains("Max Loss = $-9"));
    assert!(json.contains("Breakeven<br>($104)"));
  }

  #[test]
  fn forward_and_put_share_a_chart() {
    let chart = long_forward_short_put(&LongForward::default(), &ShortPut::default());
    assert_eq!(chart.n_series(), 3);

    let json = chart.plot().to_json();
    assert!(json.contains("Long Forward Breakeven<br>($100)"));
    assert!(json.contains("Short Put Breakeven<br>($75)"));
    assert!(json.contains("\"range\":[-120.0,120.0]"));
  }

  #[test]
  fn writes_one_file_per_chart() {
    let dir = tempfile::tempdir().unwrap();
    let paths = write_all(dir.path()).unwrap();

    assert_eq!(paths.len(), 5);
    assert!(paths.iter().all(|p| p.exists()));
    assert!(dir.path().join("fiduciary_call.html").exists());
  }
}
