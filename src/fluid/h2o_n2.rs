use super::{FluidState, FluidSystem};
use crate::base::{GAS_CONSTANT, MOLAR_MASS_N2, MOLAR_MASS_WATER, ZERO_CELSIUS};

/// Implements a two-phase two-component fluid system made of water and nitrogen
///
/// * The liquid phase is water with dissolved nitrogen (Henry's law)
/// * The gas phase is an ideal mixture of water vapour and nitrogen
/// * Phase 0 is the (wetting) liquid and phase 1 is the gas
/// * Component 0 is water and component 1 is nitrogen
#[derive(Clone, Debug)]
pub struct H2oN2FluidSystem {
    /// Liquid density at the reference state (kg/m³)
    pub liquid_density_ref: f64,

    /// Liquid compressibility (1/Pa)
    pub liquid_compressibility: f64,

    /// Liquid thermal expansion coefficient (1/K)
    pub liquid_expansion: f64,

    /// Reference pressure (Pa)
    pub p_ref: f64,

    /// Reference temperature (K)
    pub t_ref: f64,

    /// Liquid viscosity (Pa s)
    pub liquid_viscosity: f64,

    /// Gas viscosity (Pa s)
    pub gas_viscosity: f64,
}

impl H2oN2FluidSystem {
    /// Index of the liquid phase
    pub const LIQUID: usize = 0;

    /// Index of the gas phase
    pub const GAS: usize = 1;

    /// Index of the water component
    pub const H2O: usize = 0;

    /// Index of the nitrogen component
    pub const N2: usize = 1;

    /// Allocates a new instance
    pub fn new() -> Self {
        H2oN2FluidSystem {
            liquid_density_ref: 999.7,
            liquid_compressibility: 4.5e-10,
            liquid_expansion: 2.1e-4,
            p_ref: 1e5,
            t_ref: 283.15,
            liquid_viscosity: 1e-3,
            gas_viscosity: 1.8e-5,
        }
    }

    /// Returns the vapour pressure of pure water (Pa)
    ///
    /// Uses the saturation-pressure equation of IAPWS-IF97 (region 4).
    pub fn vapor_pressure(temperature: f64) -> f64 {
        const N: [f64; 10] = [
            0.11670521452767e4,
            -0.72421316703206e6,
            -0.17073846940092e2,
            0.12020824702470e5,
            -0.32325550322333e7,
            0.14915108613530e2,
            -0.48232657361591e4,
            0.40511340542057e6,
            -0.23855557567849,
            0.65017534844798e3,
        ];
        let sigma = temperature + N[8] / (temperature - N[9]);
        let a = (sigma + N[0]) * sigma + N[1];
        let b = (N[2] * sigma + N[3]) * sigma + N[4];
        let c = (N[5] * sigma + N[6]) * sigma + N[7];
        let tmp = 2.0 * c / (f64::sqrt(b * b - 4.0 * a * c) - b);
        1e6 * f64::powi(tmp, 4)
    }

    /// Returns Henry's coefficient of nitrogen in water (Pa)
    ///
    /// ```text
    /// H(T) = H₀ exp(-C (1/T - 1/T₀))
    /// ```
    pub fn henry(temperature: f64) -> f64 {
        const H0: f64 = 9.077e9;
        const C: f64 = 1300.0;
        const T0: f64 = 298.15;
        H0 * f64::exp(-C * (1.0 / temperature - 1.0 / T0))
    }

    /// Returns the molar density of the liquid (mol/m³)
    ///
    /// The volume of the dissolved gas is neglected.
    fn liquid_molar_density(&self, pressure: f64, temperature: f64) -> f64 {
        let rho = self.liquid_density_ref
            * (1.0 + self.liquid_compressibility * (pressure - self.p_ref)
                - self.liquid_expansion * (temperature - self.t_ref));
        rho / MOLAR_MASS_WATER
    }
}

impl FluidSystem for H2oN2FluidSystem {
    fn n_phase(&self) -> usize {
        2
    }

    fn n_component(&self) -> usize {
        2
    }

    fn phase_name(&self, phase: usize) -> &'static str {
        if phase == Self::LIQUID {
            "l"
        } else {
            "g"
        }
    }

    fn component_name(&self, comp: usize) -> &'static str {
        if comp == Self::H2O {
            "H2O"
        } else {
            "N2"
        }
    }

    fn is_liquid(&self, phase: usize) -> bool {
        phase == Self::LIQUID
    }

    fn molar_mass(&self, comp: usize) -> f64 {
        if comp == Self::H2O {
            MOLAR_MASS_WATER
        } else {
            MOLAR_MASS_N2
        }
    }

    fn density(&self, fs: &FluidState, phase: usize) -> f64 {
        self.molar_density(fs, phase) * fs.average_molar_mass(phase)
    }

    fn molar_density(&self, fs: &FluidState, phase: usize) -> f64 {
        let p = fs.pressure[phase];
        let t = fs.temperature;
        if phase == Self::LIQUID {
            self.liquid_molar_density(p, t)
        } else {
            p / (GAS_CONSTANT * t)
        }
    }

    fn viscosity(&self, _fs: &FluidState, phase: usize) -> f64 {
        if phase == Self::LIQUID {
            self.liquid_viscosity
        } else {
            self.gas_viscosity
        }
    }

    fn enthalpy(&self, fs: &FluidState, phase: usize) -> f64 {
        let dt = fs.temperature - ZERO_CELSIUS;
        if phase == Self::LIQUID {
            4180.0 * dt
        } else {
            let h_vapor = 2.501e6 + 1850.0 * dt;
            let h_n2 = 1040.0 * dt;
            let xw = fs.mass_fraction(phase, Self::H2O);
            xw * h_vapor + (1.0 - xw) * h_n2
        }
    }

    fn fugacity_coefficient(&self, fs: &FluidState, phase: usize, comp: usize) -> f64 {
        if phase == Self::GAS {
            return 1.0; // ideal gas
        }
        let p = fs.pressure[phase].max(1.0);
        let t = fs.temperature;
        if comp == Self::H2O {
            Self::vapor_pressure(t) / p
        } else {
            Self::henry(t) / p
        }
    }

    fn diffusion_coefficient(&self, fs: &FluidState, phase: usize, _comp: usize) -> f64 {
        if phase == Self::LIQUID {
            2.0e-9
        } else {
            let p = fs.pressure[phase].max(1.0);
            2.15e-5 * f64::powf(fs.temperature / ZERO_CELSIUS, 1.75) * (1e5 / p)
        }
    }

    fn thermal_conductivity(&self, _fs: &FluidState, phase: usize) -> f64 {
        if phase == Self::LIQUID {
            0.6
        } else {
            0.025
        }
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
