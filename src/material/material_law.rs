use super::{BrooksCorey, LinearLaw, VanGenuchten};
use crate::base::ParamMaterialLaw;
use crate::fluid::FluidState;
use crate::StrError;

/// Holds the effective-saturation law
#[derive(Clone, Copy, Debug)]
enum EffectiveLaw {
    BrooksCorey(BrooksCorey),
    VanGenuchten(VanGenuchten),
    Linear(LinearLaw),
    Null,
}

/// Implements the capillary pressure and relative permeability relations of a porous medium
///
/// The two-phase laws operate on the effective saturation of the wetting phase (phase 0):
///
/// ```text
///        Sw - swr
/// Swe = ——————————————
///       1 - swr - snr
/// ```
///
/// The capillary pressures follow the convention `pc[α] = pα - p₀`; thus `pc[0] = 0`.
#[derive(Clone, Copy, Debug)]
pub struct MaterialLaw {
    law: EffectiveLaw,
    swr: f64,
    snr: f64,
}

impl MaterialLaw {
    /// Allocates a new instance
    pub fn new(param: &ParamMaterialLaw) -> Result<Self, StrError> {
        let (law, swr, snr) = match *param {
            ParamMaterialLaw::BrooksCorey { lambda, pe, swr, snr } => {
                (EffectiveLaw::BrooksCorey(BrooksCorey::new(lambda, pe)?), swr, snr)
            }
            ParamMaterialLaw::VanGenuchten { alpha, n, swr, snr } => {
                (EffectiveLaw::VanGenuchten(VanGenuchten::new(alpha, n)?), swr, snr)
            }
            ParamMaterialLaw::Linear {
                pc_min,
                pc_max,
                swr,
                snr,
            } => (EffectiveLaw::Linear(LinearLaw::new(pc_min, pc_max)?), swr, snr),
            ParamMaterialLaw::Null => (EffectiveLaw::Null, 0.0, 0.0),
        };
        if swr < 0.0 || snr < 0.0 || swr + snr >= 1.0 {
            return Err("residual saturations must be ≥ 0.0 and satisfy swr + snr < 1.0");
        }
        Ok(MaterialLaw { law, swr, snr })
    }

    /// Indicates whether this is the null law (no capillarity)
    pub fn is_null(&self) -> bool {
        matches!(self.law, EffectiveLaw::Null)
    }

    /// Checks if the law can handle the given number of phases
    pub fn check_n_phase(&self, n_phase: usize) -> Result<(), StrError> {
        if !self.is_null() && n_phase != 2 {
            return Err("the capillary pressure laws other than Null require exactly two phases");
        }
        Ok(())
    }

    /// Returns the effective saturation of the wetting phase (not clamped)
    pub fn effective_saturation(&self, sw: f64) -> f64 {
        (sw - self.swr) / (1.0 - self.swr - self.snr)
    }

    /// Returns the absolute saturation of the wetting phase
    pub fn absolute_saturation(&self, swe: f64) -> f64 {
        self.swr + swe * (1.0 - self.swr - self.snr)
    }

    /// Returns the capillary pressure pn - pw given the wetting saturation
    pub fn pc(&self, sw: f64) -> f64 {
        let swe = self.effective_saturation(sw);
        match &self.law {
            EffectiveLaw::BrooksCorey(m) => m.pc(swe),
            EffectiveLaw::VanGenuchten(m) => m.pc(swe),
            EffectiveLaw::Linear(m) => m.pc(swe),
            EffectiveLaw::Null => 0.0,
        }
    }

    /// Returns the wetting saturation given the capillary pressure pn - pw
    ///
    /// The result is limited to the range `[swr, 1 - snr]`.
    pub fn saturation_from_pc(&self, pc: f64) -> f64 {
        let swe = match &self.law {
            EffectiveLaw::BrooksCorey(m) => m.swe(pc),
            EffectiveLaw::VanGenuchten(m) => m.swe(pc),
            EffectiveLaw::Linear(m) => m.swe(pc),
            EffectiveLaw::Null => 1.0,
        };
        self.absolute_saturation(swe.clamp(0.0, 1.0))
    }

    /// Returns the relative permeability of the wetting phase
    pub fn krw(&self, sw: f64) -> f64 {
        let swe = self.effective_saturation(sw).clamp(0.0, 1.0);
        match &self.law {
            EffectiveLaw::BrooksCorey(m) => m.krw(swe),
            EffectiveLaw::VanGenuchten(m) => m.krw(swe),
            EffectiveLaw::Linear(m) => m.krw(swe),
            EffectiveLaw::Null => sw.clamp(0.0, 1.0),
        }
    }

    /// Returns the relative permeability of the non-wetting phase
    pub fn krn(&self, sw: f64) -> f64 {
        let swe = self.effective_saturation(sw).clamp(0.0, 1.0);
        match &self.law {
            EffectiveLaw::BrooksCorey(m) => m.krn(swe),
            EffectiveLaw::VanGenuchten(m) => m.krn(swe),
            EffectiveLaw::Linear(m) => m.krn(swe),
            EffectiveLaw::Null => (1.0 - sw).clamp(0.0, 1.0),
        }
    }

    /// Calculates the capillary pressures of all phases with respect to phase 0
    ///
    /// `pc[α] = pα - p₀`
    pub fn capillary_pressures(&self, pc: &mut [f64], fs: &FluidState) -> Result<(), StrError> {
        let n_phase = fs.n_phase();
        if pc.len() != n_phase {
            return Err("the array of capillary pressures must have n_phase entries");
        }
        self.check_n_phase(n_phase)?;
        pc.fill(0.0);
        if !self.is_null() {
            pc[1] = self.pc(fs.saturation[0]);
        }
        Ok(())
    }

    /// Calculates the relative permeabilities of all phases
    pub fn relative_permeabilities(&self, kr: &mut [f64], fs: &FluidState) -> Result<(), StrError> {
        let n_phase = fs.n_phase();
        if kr.len() != n_phase {
            return Err("the array of relative permeabilities must have n_phase entries");
        }
        self.check_n_phase(n_phase)?;
        if self.is_null() {
            for alpha in 0..n_phase {
                kr[alpha] = fs.saturation[alpha].clamp(0.0, 1.0);
            }
        } else {
            kr[0] = self.krw(fs.saturation[0]);
            kr[1] = self.krn(fs.saturation[0]);
        }
        Ok(())
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
