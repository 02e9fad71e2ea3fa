/// Defines the directory where the simulation result files are saved
pub const DEFAULT_OUT_DIR: &str = "/tmp/pmfv/results";

/// Defines an auxiliary directory where the test result files are saved
pub const DEFAULT_TEST_DIR: &str = "/tmp/pmfv/test";

/// Standard gravity acceleration (m/s²)
pub const GRAVITY: f64 = 9.81;

/// Universal gas constant (J/(mol K))
pub const GAS_CONSTANT: f64 = 8.314462618;

/// Zero degrees Celsius in Kelvin
pub const ZERO_CELSIUS: f64 = 273.15;

/// Atmospheric pressure (Pa)
pub const ATMOSPHERIC_PRESSURE: f64 = 1.01325e5;

/// Molar mass of water (kg/mol)
pub const MOLAR_MASS_WATER: f64 = 18.01528e-3;

/// Molar mass of nitrogen (kg/mol)
pub const MOLAR_MASS_N2: f64 = 28.0134e-3;

/// Molar mass of dry air (kg/mol)
pub const MOLAR_MASS_AIR: f64 = 28.965e-3;
