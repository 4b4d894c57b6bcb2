//! # Finite Difference Sensitivities
//!
//! $$
//! f'(x)\approx\frac{f(x+\varepsilon)-f(x-\varepsilon)}{2\varepsilon},\qquad
//! \text{error}=\mathcal O(\varepsilon^2)
//! $$
//!

/// Bump size used for rate sensitivities.
pub const RHO_BUMP: f64 = 1e-5;

/// Centered first derivative of `f` at `x`.
pub fn central_difference<F>(f: F, x: f64, eps: f64) -> f64
where
  F: Fn(f64) -> f64,
{
  (f(x + eps) - f(x - eps)) / (2.0 * eps)
}

/// Centered first derivative of a function returning a pair, e.g. call and put prices.
pub fn central_difference_pair<F>(f: F, x: f64, eps: f64) -> (f64, f64)
where
  F: Fn(f64) -> (f64, f64),
{
  let (up_a, up_b) = f(x + eps);
  let (dn_a, dn_b) = f(x - eps);
  ((up_a - dn_a) / (2.0 * eps), (up_b - dn_b) / (2.0 * eps))
}
