//! # Black-Scholes Dashboard
//!
//! $$
//! \theta\in\{S,\sigma,T,r\}\;\mapsto\;\big(C,P,\Delta,\Gamma,\mathcal V,\Theta,\rho\big)(\theta)
//! $$
//!
//! Sweeps prices and greeks around a reference market state and writes one
//! chart per panel, a two-page panel document, an ATM CSV sample and an
//! optional interactive chart.
//!
use std::path::Path;
use std::path::PathBuf;

use anyhow::ensure;
use anyhow::Result;
use chrono::NaiveDate;
use chrono::NaiveDateTime;
use prettytable::row;
use prettytable::Table;

use crate::quant::pricing::bsm::BSMPricer;
use crate::quant::pricing::bsm::BSMSnapshot;
use crate::quant::pricing::finite_difference::RHO_BUMP;
use crate::traits::TimeExt;

pub mod export;
pub mod sweep;

pub use export::DashboardOutputs;
pub use export::DashboardRow;
pub use sweep::interp;
pub use sweep::DashboardSweeps;

/// Lower bound on the reference time to expiry, in years.
pub const T_FLOOR: f64 = 1e-8;

/// Market state and output location of the dashboard.
#[derive(Clone, Debug)]
pub struct DashboardConfig {
  /// Spot marked on the charts
  pub s_center: f64,
  /// Strike marked on the charts
  pub k: f64,
  /// Risk-free rate
  pub r: f64,
  /// Volatility
  pub sigma: f64,
  /// Option expiry
  pub expiry: NaiveDateTime,
  /// Valuation time, `None` for the local wall clock
  pub valuation: Option<NaiveDateTime>,
  /// Output directory
  pub outdir: PathBuf,
}

impl Default for DashboardConfig {
  fn default() -> Self {
    Self {
      s_center: 82_000.0,
      k: 93_800.0,
      r: 0.05,
      sigma: 0.50,
      expiry: NaiveDate::from_ymd_opt(2026, 1, 10)
        .and_then(|d| d.and_hms_opt(14, 0, 0))
        .unwrap_or_default(),
      valuation: None,
      outdir: PathBuf::from("./bs_dashboard_outputs"),
    }
  }
}

impl DashboardConfig {
  pub fn s_center(mut self, s_center: f64) -> Self {
    self.s_center = s_center;
    self
  }
  pub fn k(mut self, k: f64) -> Self {
    self.k = k;
    self
  }
  pub fn r(mut self, r: f64) -> Self {
    self.r = r;
    self
  }
  pub fn sigma(mut self, sigma: f64) -> Self {
    self.sigma = sigma;
    self
  }
  pub fn expiry(mut self, expiry: NaiveDateTime) -> Self {
    self.expiry = expiry;
    self
  }
  pub fn valuation(mut self, valuation: NaiveDateTime) -> Self {
    self.valuation = Some(valuation);
    self
  }
  pub fn outdir<P: AsRef<Path>>(mut self, outdir: P) -> Self {
    self.outdir = outdir.as_ref().to_path_buf();
    self
  }

  /// Reject inputs that would feed a non-positive value into `ln` or `sqrt`.
  pub fn validate(&self) -> Result<()> {
    ensure!(
      self.s_center.is_finite() && self.s_center > 0.0,
      "spot must be finite and positive, got {}",
      self.s_center
    );
    ensure!(
      self.k.is_finite() && self.k > 0.0,
      "strike must be finite and positive, got {}",
      self.k
    );
    ensure!(
      self.sigma.is_finite() && self.sigma > 0.0,
      "volatility must be finite and positive, got {}",
      self.sigma
    );
    ensure!(self.r.is_finite(), "rate must be finite, got {}", self.r);
    Ok(())
  }

  /// Reference time to expiry in years, floored at [`T_FLOOR`].
  pub fn t_ref(&self) -> f64 {
    self.calculate_tau_in_years().max(T_FLOOR)
  }
}

impl TimeExt for DashboardConfig {
  fn tau(&self) -> Option<f64> {
    None
  }

  fn eval(&self) -> Option<NaiveDateTime> {
    Some(
      self
        .valuation
        .unwrap_or_else(|| chrono::Local::now().naive_local()),
    )
  }

  fn expiration(&self) -> Option<NaiveDateTime> {
    Some(self.expiry)
  }
}

/// Validated dashboard with its reference time fixed.
#[derive(Clone, Debug)]
pub struct Dashboard {
  pub config: DashboardConfig,
  pub t_ref: f64,
}

impl Dashboard {
  pub fn new(config: DashboardConfig) -> Result<Self> {
    config.validate()?;
    let t_ref = config.t_ref();
    tracing::debug!(t_ref, expiry = %config.expiry, "resolved reference time to expiry");
    Ok(Self { config, t_ref })
  }

  /// Pricer at the reference market state.
  pub fn pricer(&self) -> BSMPricer {
    let c = &self.config;
    BSMPricer::builder(c.s_center, c.sigma, c.k, c.r)
      .tau(self.t_ref)
      .build()
  }

  /// Prices and greeks at spot.
  pub fn spot_snapshot(&self) -> BSMSnapshot {
    self.pricer().snapshot()
  }

  pub fn sweeps(&self) -> DashboardSweeps {
    DashboardSweeps::compute(&self.pricer())
  }

  /// Console summary of every greek at spot.
  pub fn summary_table(&self) -> Table {
    let snap = self.spot_snapshot();
    let (call_rho, put_rho) = self.pricer().rho_fd(RHO_BUMP);

    let mut table = Table::new();
    table.set_titles(row![
      format!("S={:.0} K={:.0}", self.config.s_center, self.config.k),
      "Call",
      "Put"
    ]);
    table.add_row(row![
      "Premium",
      format!("{:.2}", snap.call),
      format!("{:.2}", snap.put)
    ]);
    table.add_row(row![
      "Delta",
      format!("{:.4}", snap.call_delta),
      format!("{:.4}", snap.put_delta)
    ]);
    table.add_row(row![
      "Gamma",
      format!("{:.6e}", snap.gamma),
      format!("{:.6e}", snap.gamma)
    ]);
    table.add_row(row![
      "Vega",
      format!("{:.2}", snap.vega),
      format!("{:.2}", snap.vega)
    ]);
    table.add_row(row![
      "Theta/day",
      format!("{:.2}", snap.call_theta),
      format!("{:.2}", snap.put_theta)
    ]);
    table.add_row(row![
      "Rho",
      format!("{:.2}", call_rho),
      format!("{:.2}", put_rho)
    ]);
    table
  }

  /// Write every output under the configured directory.
  pub fn run(&self) -> Result<DashboardOutputs> {
    let sweeps = self.sweeps();
    export::write_all(self, &sweeps)
  }
}

#[cfg(test)]
mod tests {
  use approx::assert_abs_diff_eq;

  use super::*;

  fn at(y: i32, m: u32, d: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(y, m, d)
      .unwrap()
      .and_hms_opt(14, 0, 0)
      .unwrap()
  }

  #[test]
  fn t_ref_from_valuation() {
    let config = DashboardConfig::default().valuation(at(2025, 1, 10));
    assert_abs_diff_eq!(config.t_ref(), 1.0, epsilon = 1e-12);
  }

  #[test]
  fn t_ref_is_floored_after_expiry() {
    let config = DashboardConfig::default().valuation(at(2026, 10, 14));
    assert_eq!(config.t_ref(), T_FLOOR);
  }

  #[test]
  fn validation_rejects_degenerate_inputs() {
    assert!(DashboardConfig::default().validate().is_ok());
    assert!(DashboardConfig::default().sigma(0.0).validate().is_err());
    assert!(DashboardConfig::default().k(-1.0).validate().is_err());

    let err = Dashboard::new(DashboardConfig::default().s_center(0.0)).unwrap_err();
    assert!(err.to_string().contains("spot"));
  }

  #[test]
  fn summary_lists_every_greek() {
    let dashboard =
      Dashboard::new(DashboardConfig::default().valuation(at(2025, 7, 10))).unwrap();
    let rendered = dashboard.summary_table().to_string();

    for label in ["Premium", "Delta", "Gamma", "Vega", "Theta/day", "Rho"] {
      assert!(rendered.contains(label), "missing {label}");
    }
  }
}
