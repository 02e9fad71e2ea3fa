use crate::base::ParamHeatConduction;
use crate::StrError;

/// Implements the effective heat conductivity of the fluid-filled porous medium
#[derive(Clone, Copy, Debug)]
pub struct HeatConductionLaw {
    param: ParamHeatConduction,
}

impl HeatConductionLaw {
    /// Allocates a new instance
    pub fn new(param: &ParamHeatConduction) -> Result<Self, StrError> {
        match *param {
            ParamHeatConduction::Constant { lambda } => {
                if lambda < 0.0 {
                    return Err("heat conductivity must be ≥ 0.0");
                }
            }
            ParamHeatConduction::Somerton { lambda_dry, lambda_sat } => {
                if lambda_dry < 0.0 || lambda_sat < 0.0 {
                    return Err("Somerton conductivities must be ≥ 0.0");
                }
            }
        }
        Ok(HeatConductionLaw { param: *param })
    }

    /// Returns the effective heat conductivity given the saturation of the wetting (water) phase
    ///
    /// Somerton: `λ = λdry + √Sw (λsat - λdry)`
    pub fn conductivity(&self, sw: f64) -> f64 {
        match self.param {
            ParamHeatConduction::Constant { lambda } => lambda,
            ParamHeatConduction::Somerton { lambda_dry, lambda_sat } => {
                let s = sw.clamp(0.0, 1.0);
                lambda_dry + f64::sqrt(s) * (lambda_sat - lambda_dry)
            }
        }
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use super::HeatConductionLaw;
    use crate::base::ParamHeatConduction;
    use russell_lab::approx_eq;

    #[test]
    fn new_captures_errors() {
        let param = ParamHeatConduction::Constant { lambda: -1.0 };
        assert_eq!(HeatConductionLaw::new(&param).err(), Some("heat conductivity must be ≥ 0.0"));
        let param = ParamHeatConduction::Somerton {
            lambda_dry: -1.0,
            lambda_sat: 1.0,
        };
        assert_eq!(
            HeatConductionLaw::new(&param).err(),
            Some("Somerton conductivities must be ≥ 0.0")
        );
    }

    #[test]
    fn conductivity_works() {
        let law = HeatConductionLaw::new(&ParamHeatConduction::Constant { lambda: 2.0 }).unwrap();
        assert_eq!(law.conductivity(0.3), 2.0);
        let param = ParamHeatConduction::Somerton {
            lambda_dry: 0.5,
            lambda_sat: 2.5,
        };
        let law = HeatConductionLaw::new(&param).unwrap();
        assert_eq!(law.conductivity(0.0), 0.5);
        assert_eq!(law.conductivity(1.0), 2.5);
        approx_eq(law.conductivity(0.25), 1.5, 1e-15);
        assert_eq!(law.conductivity(-0.1), 0.5);
    }
}
