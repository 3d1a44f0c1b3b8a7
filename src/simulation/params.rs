//! Numerical and physical parameters for the simulation
//!
//! `Parameters` holds runtime settings:
//! - fixed integration step size and end time,
//! - gravitational constant `G`

use crate::error::SimError;

#[allow(non_snake_case)]
#[derive(Debug, Clone)]
pub struct Parameters {
    pub t_end: f64, // total simulated time
    pub h0: f64, // step size
    pub G: f64, // gravitational constant
}

impl Parameters {
    /// Reject parameters no run can start with.
    ///
    /// Both times must be finite, `h0 > 0`, `t_end >= 0`, and `t_end / h0`
    /// must be a step count that fits in `usize` (a subnormal `h0` does not).
    pub fn validate(&self) -> Result<(), SimError> {
        let times_ok = self.h0 > 0.0 && self.h0.is_finite() && self.t_end >= 0.0 && self.t_end.is_finite();
        let ratio = self.t_end / self.h0;
        if !times_ok || !ratio.is_finite() || ratio >= usize::MAX as f64 {
            return Err(SimError::InvalidTimeStep(self.h0));
        }
        if !(self.G > 0.0) {
            return Err(SimError::InvalidGravitationalConstant(self.G));
        }
        Ok(())
    }

    /// Number of whole steps that fit in `t_end`
    pub fn steps(&self) -> usize {
        (self.t_end / self.h0).floor() as usize
    }
}
