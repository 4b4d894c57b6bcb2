//! # options-lab
//!
//! $$
//! V_0=\frac{1}{R}\,\mathbb E^{\mathbb Q}\!\left[\Pi(S_T)\right]
//! $$
//!
//! Closed-form option worksheets:
//! - [`quant::pricing::binomial`]: one-period binomial replication (CPT report)
//! - [`quant::pricing::bsm`]: Black-Scholes prices and greeks
//! - [`quant::strategies`]: payoff/profit of basic option strategies
//! - [`diagrams`]: strategy payoff/profit charts
//! - [`dashboard`]: Black-Scholes sweeps rendered to charts and CSV
//!
pub mod dashboard;
pub mod diagrams;
pub mod quant;
pub mod telemetry;
pub mod traits;
pub mod visualization;
