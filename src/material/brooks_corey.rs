use crate::StrError;

/// Effective saturation below which the capillary pressure curves are extrapolated linearly
pub(crate) const SWE_LOW: f64 = 0.01;

/// Implements the Brooks-Corey model in terms of the effective wetting saturation
///
/// ```text
/// pc = pe Swe^(-1/λ)
/// krw = Swe^((2 + 3λ)/λ)
/// krn = (1 - Swe)² (1 - Swe^((2 + λ)/λ))
/// ```
///
/// The capillary pressure is extrapolated linearly for Swe < 0.01 and equals pe for Swe ≥ 1.
#[derive(Clone, Copy, Debug)]
pub struct BrooksCorey {
    lambda: f64,
    pe: f64,
}

impl BrooksCorey {
    /// Allocates a new instance
    pub fn new(lambda: f64, pe: f64) -> Result<Self, StrError> {
        if lambda <= 0.0 {
            return Err("Brooks-Corey: lambda must be > 0.0");
        }
        if pe <= 0.0 {
            return Err("Brooks-Corey: pe must be > 0.0");
        }
        Ok(BrooksCorey { lambda, pe })
    }

    /// Returns the capillary pressure
    pub fn pc(&self, swe: f64) -> f64 {
        if swe >= 1.0 {
            return self.pe;
        }
        if swe < SWE_LOW {
            return self.pc(SWE_LOW) + self.dpc_dswe(SWE_LOW) * (swe - SWE_LOW);
        }
        self.pe * f64::powf(swe, -1.0 / self.lambda)
    }

    /// Returns the derivative of the capillary pressure with respect to Swe
    pub fn dpc_dswe(&self, swe: f64) -> f64 {
        if swe >= 1.0 {
            return 0.0;
        }
        let s = f64::max(swe, SWE_LOW);
        -self.pe / self.lambda * f64::powf(s, -1.0 / self.lambda - 1.0)
    }

    /// Returns the effective saturation given the capillary pressure
    pub fn swe(&self, pc: f64) -> f64 {
        if pc <= self.pe {
            return 1.0;
        }
        let pc_low = self.pc(SWE_LOW);
        if pc > pc_low {
            return SWE_LOW + (pc - pc_low) / self.dpc_dswe(SWE_LOW);
        }
        f64::powf(pc / self.pe, -self.lambda)
    }

    /// Returns the relative permeability of the wetting phase
    pub fn krw(&self, swe: f64) -> f64 {
        let s = swe.clamp(0.0, 1.0);
        f64::powf(s, (2.0 + 3.0 * self.lambda) / self.lambda)
    }

    /// Returns the relative permeability of the non-wetting phase
    pub fn krn(&self, swe: f64) -> f64 {
        let s = swe.clamp(0.0, 1.0);
        let a = 1.0 - s;
        a * a * (1.0 - f64::powf(s, (2.0 + self.lambda) / self.lambda))
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
