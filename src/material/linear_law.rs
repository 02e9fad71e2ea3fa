use crate::StrError;

/// Implements a linear capillary pressure curve with linear relative permeabilities
///
/// ```text
/// pc = pc_max + (pc_min - pc_max) Swe
/// krw = Swe
/// krn = 1 - Swe
/// ```
#[derive(Clone, Copy, Debug)]
pub struct LinearLaw {
    pc_min: f64,
    pc_max: f64,
}

impl LinearLaw {
    /// Allocates a new instance
    pub fn new(pc_min: f64, pc_max: f64) -> Result<Self, StrError> {
        if pc_max <= pc_min {
            return Err("linear law: pc_max must be > pc_min");
        }
        Ok(LinearLaw { pc_min, pc_max })
    }

    /// Returns the capillary pressure
    pub fn pc(&self, swe: f64) -> f64 {
        self.pc_max + (self.pc_min - self.pc_max) * swe
    }

    /// Returns the effective saturation given the capillary pressure
    pub fn swe(&self, pc: f64) -> f64 {
        (pc - self.pc_max) / (self.pc_min - self.pc_max)
    }

    /// Returns the relative permeability of the wetting phase
    pub fn krw(&self, swe: f64) -> f64 {
        swe.clamp(0.0, 1.0)
    }

    /// Returns the relative permeability of the non-wetting phase
    pub fn krn(&self, swe: f64) -> f64 {
        1.0 - swe.clamp(0.0, 1.0)
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
