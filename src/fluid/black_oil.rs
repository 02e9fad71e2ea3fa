use super::{FluidState, FluidSystem};
use crate::base::{ParamBlackOil, ZERO_CELSIUS};
use crate::util::Tabulated1d;
use crate::StrError;

/// Implements the black-oil fluid system with water, oil, and gas
///
/// The properties are given by tables of formation volume factors and gas dissolution factors.
/// Gas may dissolve in the oil phase; the water and gas phases are pure.
///
/// * Phases: 0 water, 1 oil, 2 gas
/// * Components: 0 water, 1 oil, 2 gas
///
/// The oil composition is given by the mass fraction of gas in oil `X_oG` which relates to the
/// gas dissolution factor by:
///
/// ```text
///          X_oG      ρo_ref
/// Rs = ——————————— · ——————
///       1 - X_oG     ρg_ref
/// ```
#[derive(Clone, Debug)]
pub struct BlackOilFluidSystem {
    param: ParamBlackOil,
    rs_sat: Tabulated1d,
    bo: Tabulated1d,
    mu_o: Tabulated1d,
    bg: Tabulated1d,
    mu_g: Tabulated1d,
}

impl BlackOilFluidSystem {
    /// Index of the water phase (and component)
    pub const WATER: usize = 0;

    /// Index of the oil phase (and component)
    pub const OIL: usize = 1;

    /// Index of the gas phase (and component)
    pub const GAS: usize = 2;

    /// Allocates a new instance
    pub fn new(param: &ParamBlackOil) -> Result<Self, StrError> {
        if let Some(_) = param.validate() {
            return Err("cannot allocate black-oil fluid system because param.validate() failed");
        }
        Ok(BlackOilFluidSystem {
            param: param.clone(),
            rs_sat: Tabulated1d::new(&param.pressure, &param.rs_sat)?,
            bo: Tabulated1d::new(&param.pressure, &param.bo)?,
            mu_o: Tabulated1d::new(&param.pressure, &param.mu_o)?,
            bg: Tabulated1d::new(&param.pressure, &param.bg)?,
            mu_g: Tabulated1d::new(&param.pressure, &param.mu_g)?,
        })
    }

    /// Returns the surface (reference) density of a phase
    pub fn surface_density(&self, phase: usize) -> f64 {
        self.param.surface_density[phase]
    }

    /// Returns the gas dissolution factor of saturated oil `Rs,sat(p)`
    pub fn gas_dissolution_factor(&self, _temperature: f64, pressure: f64) -> f64 {
        self.rs_sat.eval(pressure).max(0.0)
    }

    /// Returns the formation volume factor of saturated oil `Bo(p)`
    pub fn saturated_oil_formation_volume_factor(&self, _temperature: f64, pressure: f64) -> f64 {
        self.bo.eval(pressure)
    }

    /// Returns the formation volume factor of gas `Bg(p)`
    pub fn gas_formation_volume_factor(&self, _temperature: f64, pressure: f64) -> f64 {
        self.bg.eval(pressure).max(1e-6)
    }

    /// Returns the formation volume factor of water
    pub fn water_formation_volume_factor(&self, _temperature: f64, pressure: f64) -> f64 {
        self.param.bw_ref / (1.0 + self.param.cw * (pressure - self.param.pw_ref))
    }

    /// Returns the mass fraction of gas in saturated oil
    pub fn saturated_oil_gas_mass_fraction(&self, temperature: f64, pressure: f64) -> f64 {
        let rs = self.gas_dissolution_factor(temperature, pressure);
        let rho_o = self.param.surface_density[Self::OIL];
        let rho_g = self.param.surface_density[Self::GAS];
        rs * rho_g / (rho_o + rs * rho_g)
    }

    /// Returns the gas dissolution factor corresponding to a mass fraction of gas in oil
    pub fn dissolution_factor_from_mass_fraction(&self, x_og: f64) -> f64 {
        let rho_o = self.param.surface_density[Self::OIL];
        let rho_g = self.param.surface_density[Self::GAS];
        x_og / rho_g * rho_o / (1.0 - x_og)
    }

    /// Returns the saturation (bubble point) pressure of oil with the given mass fraction of gas
    pub fn oil_saturation_pressure(&self, _temperature: f64, x_og: f64) -> Result<f64, StrError> {
        let rs = self.dissolution_factor_from_mass_fraction(x_og);
        self.rs_sat.inverse(rs)
    }

    /// Returns the formation volume factor of oil with the gas dissolution factor `rs`
    ///
    /// Undersaturated oil (`rs < Rs,sat(p)`) keeps the volume factor of its bubble point.
    pub fn oil_formation_volume_factor(&self, temperature: f64, pressure: f64, rs: f64) -> f64 {
        if rs >= self.gas_dissolution_factor(temperature, pressure) {
            return self.saturated_oil_formation_volume_factor(temperature, pressure);
        }
        let p_bubble = self.rs_sat.inverse(rs).unwrap_or(pressure);
        self.saturated_oil_formation_volume_factor(temperature, p_bubble)
    }

    /// Returns the density of oil given the pressure and the gas dissolution factor
    pub fn oil_density(&self, temperature: f64, pressure: f64, rs: f64) -> f64 {
        let bo = self.oil_formation_volume_factor(temperature, pressure, rs);
        (self.param.surface_density[Self::OIL] + rs * self.param.surface_density[Self::GAS]) / bo
    }
}

impl FluidSystem for BlackOilFluidSystem {
    fn n_phase(&self) -> usize {
        3
    }

    fn n_component(&self) -> usize {
        3
    }

    fn phase_name(&self, phase: usize) -> &'static str {
        match phase {
            0 => "w",
            1 => "o",
            _ => "g",
        }
    }

    fn component_name(&self, comp: usize) -> &'static str {
        match comp {
            0 => "Water",
            1 => "Oil",
            _ => "Gas",
        }
    }

    fn is_liquid(&self, phase: usize) -> bool {
        phase != Self::GAS
    }

    fn molar_mass(&self, comp: usize) -> f64 {
        self.param.molar_mass[comp]
    }

    fn density(&self, fs: &FluidState, phase: usize) -> f64 {
        let p = fs.pressure[phase];
        let t = fs.temperature;
        match phase {
            Self::WATER => self.param.surface_density[Self::WATER] / self.water_formation_volume_factor(t, p),
            Self::OIL => {
                let rs = self.dissolution_factor_from_mass_fraction(fs.mass_fraction(Self::OIL, Self::GAS));
                self.oil_density(t, p, rs)
            }
            _ => self.param.surface_density[Self::GAS] / self.gas_formation_volume_factor(t, p),
        }
    }

    fn viscosity(&self, fs: &FluidState, phase: usize) -> f64 {
        let p = fs.pressure[phase];
        match phase {
            Self::WATER => self.param.mu_w,
            Self::OIL => self.mu_o.eval(p).max(1e-6),
            _ => self.mu_g.eval(p).max(1e-7),
        }
    }

    fn enthalpy(&self, fs: &FluidState, phase: usize) -> f64 {
        let cp = match phase {
            Self::WATER => 4180.0,
            Self::OIL => 2000.0,
            _ => 2200.0,
        };
        cp * (fs.temperature - ZERO_CELSIUS)
    }

    fn fugacity_coefficient(&self, _fs: &FluidState, _phase: usize, _comp: usize) -> f64 {
        1.0
    }

    fn diffusion_coefficient(&self, _fs: &FluidState, _phase: usize, _comp: usize) -> f64 {
        0.0
    }

    fn thermal_conductivity(&self, _fs: &FluidState, phase: usize) -> f64 {
        match phase {
            Self::WATER => 0.6,
            Self::OIL => 0.15,
            _ => 0.03,
        }
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
