use serde::{Deserialize, Serialize};

/// Holds parameters for the capillary pressure and relative permeability curves
///
/// The two-phase laws are written in terms of the effective wetting saturation:
///
/// ```text
///        Sw - swr
/// Swe = ——————————————
///       1 - swr - snr
/// ```
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub enum ParamMaterialLaw {
    /// Brooks-Corey model
    BrooksCorey {
        /// Pore size distribution index
        lambda: f64,

        /// Entry pressure
        pe: f64,

        /// Residual saturation of the wetting phase
        swr: f64,

        /// Residual saturation of the non-wetting phase
        snr: f64,
    },

    /// van Genuchten model
    VanGenuchten {
        /// Inverse of the air entry pressure (1/Pa)
        alpha: f64,

        /// Shape exponent (m = 1 - 1/n)
        n: f64,

        /// Residual saturation of the wetting phase
        swr: f64,

        /// Residual saturation of the non-wetting phase
        snr: f64,
    },

    /// Linear capillary pressure and linear relative permeabilities
    Linear {
        /// Capillary pressure at Swe = 1
        pc_min: f64,

        /// Capillary pressure at Swe = 0
        pc_max: f64,

        /// Residual saturation of the wetting phase
        swr: f64,

        /// Residual saturation of the non-wetting phase
        snr: f64,
    },

    /// No capillarity and relative permeabilities equal to the saturations (any number of phases)
    Null,
}

/// Holds parameters for the effective heat conductivity of the fluid-filled medium
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub enum ParamHeatConduction {
    /// Constant conductivity (W/(m K))
    Constant { lambda: f64 },

    /// Somerton's interpolation between the dry and the fully saturated conductivities
    ///
    /// ```text
    /// λ = λdry + √Sw (λsat - λdry)
    /// ```
    Somerton {
        /// Conductivity of the dry medium
        lambda_dry: f64,

        /// Conductivity of the medium fully saturated with water
        lambda_sat: f64,
    },
}

impl ParamHeatConduction {
    /// Derives Somerton's parameters from the conductivities of the solid and the fluids
    ///
    /// Uses the geometric means:
    ///
    /// ```text
    /// λdry = λsolid^(1-φ) · λgas^φ
    /// λsat = λsolid^(1-φ) · λwater^φ
    /// ```
    pub fn somerton(lambda_solid: f64, lambda_water: f64, lambda_gas: f64, porosity: f64) -> Self {
        let ls = f64::powf(lambda_solid, 1.0 - porosity);
        ParamHeatConduction::Somerton {
            lambda_dry: ls * f64::powf(lambda_gas, porosity),
            lambda_sat: ls * f64::powf(lambda_water, porosity),
        }
    }
}

/// Holds the parameters of the soil (rock) in a region of the domain
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct ParamSoil {
    /// Porosity
    pub porosity: f64,

    /// Intrinsic permeabilities along the coordinate axes (m²)
    ///
    /// Only the first `ndim` values are used.
    pub permeability: [f64; 3],

    /// Parameters of the capillary pressure and relative permeability curves
    pub material_law: ParamMaterialLaw,

    /// Volumetric heat capacity of the solid grains (J/(m³ K)), i.e., cs · ρs
    pub heat_capacity_solid: f64,

    /// Parameters of the heat conduction law
    pub heat_conduction: ParamHeatConduction,

    /// Tortuosity; None means Millington-Quirk
    pub tortuosity: Option<f64>,

    /// Longitudinal dispersivity (m); None means no mechanical dispersion
    pub dispersivity: Option<f64>,
}

impl ParamSoil {
    /// Returns a sample of a coarse sand with Brooks-Corey curves
    pub fn sample_brooks_corey() -> Self {
        ParamSoil {
            porosity: 0.3,
            permeability: [1e-12, 1e-12, 1e-12],
            material_law: ParamMaterialLaw::BrooksCorey {
                lambda: 2.0,
                pe: 1e4,
                swr: 0.2,
                snr: 0.05,
            },
            heat_capacity_solid: 790.0 * 2700.0,
            heat_conduction: ParamHeatConduction::somerton(2.8, 0.6, 0.025, 0.3),
            tortuosity: None,
            dispersivity: None,
        }
    }

    /// Returns a sample of a sandy soil with van Genuchten curves
    pub fn sample_van_genuchten() -> Self {
        ParamSoil {
            porosity: 0.4,
            permeability: [5e-12, 5e-12, 5e-12],
            material_law: ParamMaterialLaw::VanGenuchten {
                alpha: 0.0037,
                n: 4.7,
                swr: 0.05,
                snr: 0.0,
            },
            heat_capacity_solid: 800.0 * 2650.0,
            heat_conduction: ParamHeatConduction::Constant { lambda: 2.0 },
            tortuosity: None,
            dispersivity: None,
        }
    }

    /// Returns a sample of a reservoir rock without capillarity
    pub fn sample_null() -> Self {
        ParamSoil {
            porosity: 0.2,
            permeability: [1e-13, 1e-13, 1e-13],
            material_law: ParamMaterialLaw::Null,
            heat_capacity_solid: 900.0 * 2650.0,
            heat_conduction: ParamHeatConduction::Constant { lambda: 2.5 },
            tortuosity: None,
            dispersivity: None,
        }
    }
}

/// Holds parameters for the density of a fluid phase made of a single component
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub enum ParamDensity {
    /// Constant density (kg/m³)
    Constant { rho: f64 },

    /// Constant compressibility: ρ = ρ_ref · (1 + cc · (p - p_ref))
    Compressible { rho_ref: f64, cc: f64, p_ref: f64 },

    /// Ideal gas: ρ = p M / (R T)
    IdealGas,
}

/// Holds the parameters of a fluid phase made of a single component
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct ParamPhase {
    /// Liquid or gas
    pub liquid: bool,

    /// Molar mass of the (only) component (kg/mol)
    pub molar_mass: f64,

    /// Density parameters
    pub density: ParamDensity,

    /// Dynamic viscosity (Pa s)
    pub viscosity: f64,

    /// Specific heat capacity (J/(kg K))
    pub heat_capacity: f64,

    /// Thermal conductivity (W/(m K))
    pub thermal_conductivity: f64,
}

impl ParamPhase {
    /// Returns the parameters of liquid water
    pub fn sample_water() -> Self {
        ParamPhase {
            liquid: true,
            molar_mass: 18.01528e-3,
            density: ParamDensity::Compressible {
                rho_ref: 1000.0,
                cc: 4.5e-10,
                p_ref: 1e5,
            },
            viscosity: 1e-3,
            heat_capacity: 4180.0,
            thermal_conductivity: 0.6,
        }
    }

    /// Returns the parameters of a dense non-aqueous liquid (e.g., TCE)
    pub fn sample_dnapl() -> Self {
        ParamPhase {
            liquid: true,
            molar_mass: 131.39e-3,
            density: ParamDensity::Constant { rho: 1460.0 },
            viscosity: 5.7e-4,
            heat_capacity: 950.0,
            thermal_conductivity: 0.12,
        }
    }

    /// Returns the parameters of nitrogen (ideal gas)
    pub fn sample_nitrogen() -> Self {
        ParamPhase {
            liquid: false,
            molar_mass: 28.0134e-3,
            density: ParamDensity::IdealGas,
            viscosity: 1.8e-5,
            heat_capacity: 1040.0,
            thermal_conductivity: 0.025,
        }
    }
}

/// Holds the PVT tables and reference data of the black-oil fluid system
///
/// All tables are indexed by the `pressure` column (Pa) and interpolated linearly.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ParamBlackOil {
    /// Surface densities of water, oil, and gas (kg/m³)
    pub surface_density: [f64; 3],

    /// Pressure column of the tables (Pa), strictly increasing
    pub pressure: Vec<f64>,

    /// Gas dissolution factor of saturated oil (m³ gas at surface / m³ oil at surface)
    pub rs_sat: Vec<f64>,

    /// Formation volume factor of saturated oil
    pub bo: Vec<f64>,

    /// Viscosity of saturated oil (Pa s)
    pub mu_o: Vec<f64>,

    /// Formation volume factor of gas
    pub bg: Vec<f64>,

    /// Viscosity of gas (Pa s)
    pub mu_g: Vec<f64>,

    /// Formation volume factor of water at the reference pressure
    pub bw_ref: f64,

    /// Compressibility of water (1/Pa)
    pub cw: f64,

    /// Reference pressure of water (Pa)
    pub pw_ref: f64,

    /// Viscosity of water (Pa s)
    pub mu_w: f64,

    /// Molar masses of the water, oil, and gas components (kg/mol)
    pub molar_mass: [f64; 3],
}

impl ParamBlackOil {
    /// Returns a sample of a light oil (SPE-1 like tables in SI units)
    pub fn sample() -> Self {
        ParamBlackOil {
            surface_density: [1000.0, 859.5, 0.82],
            pressure: vec![1e5, 2e6, 5e6, 1e7, 2e7, 3e7],
            rs_sat: vec![0.18, 16.0, 40.0, 78.0, 150.0, 220.0],
            bo: vec![1.062, 1.10, 1.15, 1.23, 1.37, 1.50],
            mu_o: vec![1.04e-3, 0.975e-3, 0.91e-3, 0.83e-3, 0.695e-3, 0.594e-3],
            bg: vec![0.93576, 0.0678, 0.0352, 0.0179, 0.0097, 0.0068],
            mu_g: vec![0.8e-5, 0.96e-5, 1.12e-5, 1.4e-5, 1.89e-5, 2.28e-5],
            bw_ref: 1.0,
            cw: 4.5e-10,
            pw_ref: 1e5,
            mu_w: 0.5e-3,
            molar_mass: [18.01528e-3, 175e-3, 16.04e-3],
        }
    }

    /// Validates all data
    ///
    /// Returns a message with the inconsistent data, or returns None if everything is all right.
    pub fn validate(&self) -> Option<String> {
        let n = self.pressure.len();
        if n < 2 {
            return Some("the PVT tables must have at least two rows".to_string());
        }
        let columns = [&self.rs_sat, &self.bo, &self.mu_o, &self.bg, &self.mu_g];
        if columns.iter().any(|c| c.len() != n) {
            return Some("all PVT columns must have the same length as the pressure column".to_string());
        }
        for i in 1..n {
            if self.pressure[i] <= self.pressure[i - 1] {
                return Some(format!("pressure[{}] = {:?} must be greater than the previous", i, self.pressure[i]));
            }
            if self.rs_sat[i] <= self.rs_sat[i - 1] {
                return Some(format!("rs_sat[{}] = {:?} must be greater than the previous", i, self.rs_sat[i]));
            }
        }
        if self.surface_density.iter().any(|&d| d <= 0.0) {
            return Some("surface densities must be positive".to_string());
        }
        None // all good
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
