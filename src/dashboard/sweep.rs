//! Parameter sweeps behind the dashboard panels.
//!
//! Every sweep is an element-wise map over an evenly spaced grid and runs on
//! the rayon pool; results keep grid order.

use ndarray::Array1;
use ndarray::Zip;

use crate::quant::pricing::bsm::BSMPricer;
use crate::quant::pricing::bsm::BSMSnapshot;
use crate::quant::pricing::bsm::DAYS_PER_YEAR;
use crate::quant::pricing::finite_difference::RHO_BUMP;
use crate::traits::TimeExt;

pub const SPOT_POINTS: usize = 400;
pub const SIGMA_POINTS: usize = 300;
pub const DAY_POINTS: usize = 300;
pub const RATE_POINTS: usize = 200;
pub const ATM_POINTS: usize = 21;

/// A call/put pair of curves over one grid.
#[derive(Clone, Debug)]
pub struct PairSweep {
  pub x: Array1<f64>,
  pub call: Array1<f64>,
  pub put: Array1<f64>,
}

/// All dashboard sweeps around a reference pricer.
#[derive(Clone, Debug)]
pub struct DashboardSweeps {
  /// Spot grid, $\pm30\%$ around spot
  pub spot: Array1<f64>,
  pub spot_snapshots: Array1<BSMSnapshot>,
  /// Volatility grid and vega at spot
  pub sigma: Array1<f64>,
  pub vega: Array1<f64>,
  /// Theta per day against days to expiry
  pub theta: PairSweep,
  /// Finite-difference rho against the rate
  pub rho: PairSweep,
  /// Days to expiry at the reference time, at least one
  pub days_ref: f64,
}

impl DashboardSweeps {
  pub fn compute(pricer: &BSMPricer) -> Self {
    let s = pricer.s;
    let t_ref = pricer.calculate_tau_in_years();

    let spot = Array1::linspace(s * 0.7, s * 1.3, SPOT_POINTS);
    let spot_snapshots = Zip::from(&spot).par_map_collect(|&x| pricer.with_spot(x).snapshot());

    let sigma = Array1::linspace(0.01, 1.2, SIGMA_POINTS);
    let vega = Zip::from(&sigma).par_map_collect(|&v| pricer.with_vol(v).vega());

    let days_max = ((t_ref * DAYS_PER_YEAR).max(30.0) as usize).max(365);
    let days = Array1::linspace(1.0, days_max as f64, DAY_POINTS);
    let thetas = Zip::from(&days).par_map_collect(|&d| {
      let snap = pricer.with_tau(d / DAYS_PER_YEAR).snapshot();
      (snap.call_theta, snap.put_theta)
    });
    let theta = PairSweep {
      call: thetas.mapv(|(c, _)| c),
      put: thetas.mapv(|(_, p)| p),
      x: days,
    };

    let rates = Array1::linspace(0.0, 0.20, RATE_POINTS);
    let rhos = Zip::from(&rates).par_map_collect(|&r| pricer.with_rate(r).rho_fd(RHO_BUMP));
    let rho = PairSweep {
      call: rhos.mapv(|(c, _)| c),
      put: rhos.mapv(|(_, p)| p),
      x: rates,
    };

    Self {
      spot,
      spot_snapshots,
      sigma,
      vega,
      theta,
      rho,
      days_ref: (t_ref * DAYS_PER_YEAR).max(1.0),
    }
  }

  /// One field of the spot sweep.
  pub fn spot_column<F>(&self, f: F) -> Array1<f64>
  where
    F: Fn(&BSMSnapshot) -> f64,
  {
    self.spot_snapshots.map(f)
  }
}

/// Spot grid of the ATM sample, $\pm10\%$ around spot.
pub fn atm_grid(s_center: f64) -> Array1<f64> {
  Array1::linspace(s_center * 0.9, s_center * 1.1, ATM_POINTS)
}

/// Piecewise-linear interpolation on increasing `xs`, clamped to the end values.
pub fn interp(x: f64, xs: &Array1<f64>, ys: &Array1<f64>) -> f64 {
  let n = xs.len().min(ys.len());
  if n == 0 {
    return f64::NAN;
  }
  if x <= xs[0] {
    return ys[0];
  }
  if x >= xs[n - 1] {
    return ys[n - 1];
  }

  let hi = xs
    .iter()
    .take(n)
    .position(|&v| v > x)
    .unwrap_or(n - 1);
  let lo = hi - 1;
  let w = (x - xs[lo]) / (xs[hi] - xs[lo]);
  ys[lo] + w * (ys[hi] - ys[lo])
}

#[cfg(test)]
mod tests {
  use approx::assert_abs_diff_eq;

  use super::*;
  use crate::quant::pricing::bsm::bs_call_put;
  use crate::traits::PricerExt;

  fn pricer(t: f64) -> BSMPricer {
    BSMPricer::builder(82_000.0, 0.5, 93_800.0, 0.05).tau(t).build()
  }

  #[test]
  fn interp_clamps_and_blends() {
    let xs = Array1::from(vec![0.0, 1.0, 3.0]);
    let ys = Array1::from(vec![10.0, 20.0, 0.0]);

    assert_eq!(interp(-5.0, &xs, &ys), 10.0);
    assert_eq!(interp(9.0, &xs, &ys), 0.0);
    assert_abs_diff_eq!(interp(0.5, &xs, &ys), 15.0);
    assert_abs_diff_eq!(interp(2.0, &xs, &ys), 10.0);
    assert_eq!(interp(1.0, &xs, &ys), 20.0);
  }

  #[test]
  fn grids_have_dashboard_sizes() {
    let sweeps = DashboardSweeps::compute(&pricer(0.25));

    assert_eq!(sweeps.spot.len(), SPOT_POINTS);
    assert_eq!(sweeps.spot_snapshots.len(), SPOT_POINTS);
    assert_eq!(sweeps.vega.len(), SIGMA_POINTS);
    assert_eq!(sweeps.theta.x.len(), DAY_POINTS);
    assert_eq!(sweeps.rho.call.len(), RATE_POINTS);
    assert_abs_diff_eq!(sweeps.spot[0], 82_000.0 * 0.7, epsilon = 1e-6);
    assert_abs_diff_eq!(sweeps.spot[SPOT_POINTS - 1], 82_000.0 * 1.3, epsilon = 1e-6);
    assert_abs_diff_eq!(sweeps.theta.x[DAY_POINTS - 1], 365.0, epsilon = 1e-9);
    assert_abs_diff_eq!(sweeps.days_ref, 0.25 * 365.0, epsilon = 1e-9);
  }

  #[test]
  fn long_reference_extends_day_grid() {
    let sweeps = DashboardSweeps::compute(&pricer(2.0));
    assert_abs_diff_eq!(sweeps.theta.x[DAY_POINTS - 1], 730.0, epsilon = 1e-9);
  }

  #[test]
  fn parallel_sweep_matches_pointwise() {
    let p = pricer(0.5);
    let sweeps = DashboardSweeps::compute(&p);

    for i in [0, 137, SPOT_POINTS - 1] {
      let s = sweeps.spot[i];
      assert_eq!(sweeps.spot_snapshots[i], bs_call_put(s, p.k, p.r, p.v, 0.5));
    }
    let calls = sweeps.spot_column(|g| g.call);
    assert_eq!(calls[42], p.with_spot(sweeps.spot[42]).calculate_call_put().0);
  }

  #[test]
  fn rho_sweep_uses_centered_difference() {
    let p = pricer(0.5);
    let sweeps = DashboardSweeps::compute(&p);
    let r = sweeps.rho.x[50];
    let (call_rho, put_rho) = p.with_rate(r).rho_fd(RHO_BUMP);

    assert_eq!(sweeps.rho.call[50], call_rho);
    assert_eq!(sweeps.rho.put[50], put_rho);
    assert!(sweeps.rho.call.iter().all(|&v| v > 0.0));
    assert!(sweeps.rho.put.iter().all(|&v| v < 0.0));
  }

  #[test]
  fn near_expiry_spot_sweep_is_intrinsic() {
    let sweeps = DashboardSweeps::compute(&pricer(1e-8));
    let puts = sweeps.spot_column(|g| g.put);

    assert_abs_diff_eq!(puts[0], 93_800.0 - 82_000.0 * 0.7, epsilon = 1e-3);
    assert_eq!(sweeps.days_ref, 1.0);
  }

  #[test]
  fn atm_grid_has_21_points() {
    let grid = atm_grid(82_000.0);
    assert_eq!(grid.len(), 21);
    assert_abs_diff_eq!(grid[10], 82_000.0, epsilon = 1e-6);
  }
}
