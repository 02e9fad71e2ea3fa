use super::SWE_LOW;
use crate::StrError;

/// Implements the van Genuchten model in terms of the effective wetting saturation
///
/// ```text
/// pc = (Swe^(-1/m) - 1)^(1/n) / α       with m = 1 - 1/n
/// krw = √Swe (1 - (1 - Swe^(1/m))^m)²
/// krn = (1 - Swe)^(1/3) (1 - Swe^(1/m))^(2m)
/// ```
///
/// The capillary pressure is extrapolated linearly for Swe < 0.01 and is zero for Swe ≥ 1.
#[derive(Clone, Copy, Debug)]
pub struct VanGenuchten {
    alpha: f64,
    n: f64,
    m: f64,
}

impl VanGenuchten {
    /// Allocates a new instance
    pub fn new(alpha: f64, n: f64) -> Result<Self, StrError> {
        if alpha <= 0.0 {
            return Err("van Genuchten: alpha must be > 0.0");
        }
        if n <= 1.0 {
            return Err("van Genuchten: n must be > 1.0");
        }
        Ok(VanGenuchten {
            alpha,
            n,
            m: 1.0 - 1.0 / n,
        })
    }

    /// Returns the capillary pressure
    pub fn pc(&self, swe: f64) -> f64 {
        if swe >= 1.0 {
            return 0.0;
        }
        if swe < SWE_LOW {
            return self.pc(SWE_LOW) + self.dpc_dswe(SWE_LOW) * (swe - SWE_LOW);
        }
        f64::powf(f64::powf(swe, -1.0 / self.m) - 1.0, 1.0 / self.n) / self.alpha
    }

    /// Returns the derivative of the capillary pressure with respect to Swe
    pub fn dpc_dswe(&self, swe: f64) -> f64 {
        if swe >= 1.0 {
            return 0.0;
        }
        let s = f64::max(swe, SWE_LOW);
        let a = f64::powf(s, -1.0 / self.m) - 1.0;
        -1.0 / (self.alpha * self.n * self.m)
            * f64::powf(a, 1.0 / self.n - 1.0)
            * f64::powf(s, -1.0 / self.m - 1.0)
    }

    /// Returns the effective saturation given the capillary pressure
    pub fn swe(&self, pc: f64) -> f64 {
        if pc <= 0.0 {
            return 1.0;
        }
        let pc_low = self.pc(SWE_LOW);
        if pc > pc_low {
            return SWE_LOW + (pc - pc_low) / self.dpc_dswe(SWE_LOW);
        }
        f64::powf(1.0 + f64::powf(self.alpha * pc, self.n), -self.m)
    }

    /// Returns the relative permeability of the wetting phase
    pub fn krw(&self, swe: f64) -> f64 {
        let s = swe.clamp(0.0, 1.0);
        let a = 1.0 - f64::powf(1.0 - f64::powf(s, 1.0 / self.m), self.m);
        f64::sqrt(s) * a * a
    }

    /// Returns the relative permeability of the non-wetting phase
    pub fn krn(&self, swe: f64) -> f64 {
        let s = swe.clamp(0.0, 1.0);
        f64::powf(1.0 - s, 1.0 / 3.0) * f64::powf(1.0 - f64::powf(s, 1.0 / self.m), 2.0 * self.m)
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use super::VanGenuchten;
    use russell_lab::{approx_eq, deriv1_central5};

    #[test]
    fn new_captures_errors() {
        assert_eq!(VanGenuchten::new(0.0, 2.0).err(), Some("van Genuchten: alpha must be > 0.0"));
        assert_eq!(VanGenuchten::new(0.1, 1.0).err(), Some("van Genuchten: n must be > 1.0"));
    }

    #[test]
    fn curves_work() {
        let law = VanGenuchten::new(0.0037, 4.7).unwrap();
        assert_eq!(law.pc(1.0), 0.0);
        assert_eq!(law.swe(-10.0), 1.0);
        assert_eq!(law.krw(1.0), 1.0);
        assert_eq!(law.krw(0.0), 0.0);
        assert_eq!(law.krn(1.0), 0.0);
        assert_eq!(law.krn(0.0), 1.0);
        for swe in [0.005, 0.01, 0.3, 0.7, 0.99] {
            approx_eq(law.swe(law.pc(swe)), swe, 1e-10);
        }
        assert!(law.pc(0.3) > law.pc(0.7));
    }

    #[test]
    fn derivative_works() {
        let law = VanGenuchten::new(0.00045, 7.3).unwrap();
        let mut args = 0;
        for swe in [0.005, 0.1, 0.5, 0.9] {
            let num = deriv1_central5(swe, &mut args, |s, _| Ok(law.pc(s))).unwrap();
            approx_eq(law.dpc_dswe(swe) / num, 1.0, 1e-6);
        }
    }
}
