//! Triangular membership functions.
//!
//! A [`Triangle`] maps a crisp value to a degree in `[0, 1]`:
//!
//! ```text
//!  1 ┤        /\
//!    │       /  \
//!    │      /    \
//!  0 ┼─────a──b───c─────
//! ```
//!
//! Shoulders are expressed with coincident breakpoints: `(0, 0, 25)` is a
//! left shoulder (degree 1 at 0), `(25, 50, 50)` a right shoulder.

use crate::error::ConfigError;
use crate::variable::Universe;
use serde::{Deserialize, Serialize};

/// Triangle with breakpoints `a <= b <= c`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "[f64; 3]", into = "[f64; 3]")]
pub struct Triangle {
    a: f64,
    b: f64,
    c: f64,
}

impl Triangle {
    /// Build a triangle, rejecting non-finite or unordered breakpoints.
    pub fn new(a: f64, b: f64, c: f64) -> Result<Self, ConfigError> {
        let finite = a.is_finite() && b.is_finite() && c.is_finite();
        if !finite || a > b || b > c {
            return Err(ConfigError::MalformedTriangle { a, b, c });
        }
        Ok(Self { a, b, c })
    }

    pub fn breakpoints(&self) -> (f64, f64, f64) {
        (self.a, self.b, self.c)
    }

    /// Degree of membership of `x`.
    ///
    /// Total over `f64`: values outside `[a, c]` (and NaN) yield 0. The peak
    /// wins over the feet, so a shoulder `(a, a, c)` has degree 1 at `a`.
    pub fn degree(&self, x: f64) -> f64 {
        let Self { a, b, c } = *self;
        if x == b {
            return 1.0;
        }
        if x.is_nan() || x <= a || x >= c {
            return 0.0;
        }
        // a < x < c and x != b, so the divisor below is strictly positive.
        if x < b { (x - a) / (b - a) } else { (c - x) / (c - b) }
    }

    /// Sample the curve over every point of `universe`.
    pub fn sample(&self, universe: &Universe) -> Vec<f64> {
        universe.points().iter().map(|&x| self.degree(x)).collect()
    }
}

impl TryFrom<[f64; 3]> for Triangle {
    type Error = ConfigError;

    fn try_from([a, b, c]: [f64; 3]) -> Result<Self, Self::Error> {
        Triangle::new(a, b, c)
    }
}

impl From<Triangle> for [f64; 3] {
    fn from(t: Triangle) -> Self {
        [t.a, t.b, t.c]
    }
}
