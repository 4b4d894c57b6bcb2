//! # Single-Period Binomial (CPT)
//!
//! One-step replication under simple interest:
//! $$
//! S_u=S_0u,\quad S_d=S_0d,\quad R=1+rT,\quad
//! p=\frac{R-d}{u-d},\quad
//! V_0=\frac{pC_u+(1-p)C_d}{R}.
//! $$
//!
//! Replicating portfolio:
//! $$
//! \Delta=\frac{C_u-C_d}{S_u-S_d},\qquad B=V_0-\Delta S_0.
//! $$
//!
//! Worksheet convention: $p$ is rounded to two decimals before it is used,
//! then price, $\Delta$ and $B$ are each rounded to two decimals.

use std::fmt::Display;

use anyhow::ensure;
use anyhow::Result;
use impl_new_derive::ImplNew;

use crate::quant::OptionType;
use crate::traits::PricerExt;
use crate::traits::TimeExt;

#[derive(ImplNew, Clone, Copy, Debug)]
pub struct BinomialPricer {
  /// Spot price $S_0$
  pub s0: f64,
  /// Strike price
  pub k: f64,
  /// Simple risk-free rate
  pub r: f64,
  /// Horizon in years
  pub t: f64,
  /// Up factor
  pub u: f64,
  /// Down factor
  pub d: f64,
  /// Option type
  pub option_type: OptionType,
}

/// Cost/price table of a single-period replication.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BinomialCpt {
  pub option_type: OptionType,
  pub s0: f64,
  pub su: f64,
  pub sd: f64,
  pub cu: f64,
  pub cd: f64,
  /// Growth factor $1+rT$
  pub r_factor: f64,
  /// Risk-neutral probability, rounded
  pub p: f64,
  /// Undiscounted expectation with the rounded $p$
  pub expected_payoff: f64,
  /// Hedge ratio
  pub delta: f64,
  /// Bond position
  pub bond: f64,
  pub price: f64,
}

impl BinomialPricer {
  /// Build the CPT. Fails on a degenerate tree ($u=d$).
  pub fn cpt(&self) -> Result<BinomialCpt> {
    ensure!(
      self.u != self.d,
      "degenerate tree: u == d ({}), risk-neutral probability is undefined",
      self.u
    );

    let su = self.s0 * self.u;
    let sd = self.s0 * self.d;
    let cu = self.option_type.payoff(su, self.k);
    let cd = self.option_type.payoff(sd, self.k);

    let r_factor = 1.0 + self.r * self.t;
    if !(self.d < r_factor && r_factor < self.u) {
      tracing::warn!(
        u = self.u,
        d = self.d,
        r_factor,
        "no-arbitrage bound d < 1 + rT < u is violated"
      );
    }

    let p = round_to((r_factor - self.d) / (self.u - self.d), 2);
    let expected_payoff = p * cu + (1.0 - p) * cd;
    let price = round_to(expected_payoff / r_factor, 2);
    let delta = round_to((cu - cd) / (su - sd), 2);
    let bond = round_to(price - delta * self.s0, 2);

    Ok(BinomialCpt {
      option_type: self.option_type,
      s0: self.s0,
      su,
      sd,
      cu,
      cd,
      r_factor,
      p,
      expected_payoff,
      delta,
      bond,
      price,
    })
  }

  fn with_option_type(&self, option_type: OptionType) -> Self {
    Self {
      option_type,
      ..*self
    }
  }
}

impl PricerExt for BinomialPricer {
  /// Degenerate trees price to NaN here; use [`BinomialPricer::cpt`] for the error.
  fn calculate_call_put(&self) -> (f64, f64) {
    let price = |option_type| {
      self
        .with_option_type(option_type)
        .cpt()
        .map_or(f64::NAN, |cpt| cpt.price)
    };
    (price(OptionType::Call), price(OptionType::Put))
  }

  fn calculate_price(&self) -> f64 {
    self.cpt().map_or(f64::NAN, |cpt| cpt.price)
  }

  fn derivatives(&self) -> Vec<f64> {
    self.cpt().map_or_else(|_| vec![], |cpt| vec![cpt.delta])
  }
}

impl TimeExt for BinomialPricer {
  fn tau(&self) -> Option<f64> {
    Some(self.t)
  }
}

impl Display for BinomialCpt {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    let rule = "=".repeat(35);
    writeln!(f)?;
    writeln!(f, "{rule}")?;
    writeln!(
      f,
      "PAPER-STYLE CPT ({})",
      self.option_type.to_string().to_uppercase()
    )?;
    writeln!(f, "{rule}")?;

    writeln!(f, "S0: {}", self.s0)?;
    writeln!(f, "Su = S0·u: {}", self.su)?;
    writeln!(f, "Sd = S0·d: {}\n", self.sd)?;

    writeln!(f, "Cu: {}", self.cu)?;
    writeln!(f, "Cd: {}\n", self.cd)?;

    writeln!(f, "R = 1 + rT: {}", self.r_factor)?;
    writeln!(f, "Risk-neutral p: {}\n", self.p)?;

    writeln!(f, "Δ (hedge ratio): {}", self.delta)?;
    writeln!(f, "Bond position B: {}\n", self.bond)?;

    writeln!(f, "OPTION PRICE: {}", self.price)?;
    write!(f, "{rule}")
  }
}

/// Round the exact binary value of `x` to `digits` decimals, ties to even.
pub fn round_to(x: f64, digits: usize) -> f64 {
  format!("{x:.digits$}").parse().unwrap_or(x)
}
