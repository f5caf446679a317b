/// Universal gas constant [J/(mol·K)]
pub const GAS_CONSTANT: f64 = 8.314462618;

/// Abel–Noble co-volume of hydrogen [cm³/mol]
pub const ABEL_NOBLE_CO_VOLUME: f64 = 15.84;

/// Pressure at which the reference fugacity of pure H2 is evaluated [MPa]
pub const REFERENCE_PRESSURE: f64 = 106.0;

/// Admissible gas temperature range [K]
pub const TEMPERATURE_MIN: f64 = 230.0;
pub const TEMPERATURE_MAX: f64 = 330.0;

/// Crack depth ratio a/t treated as through-wall for stepping purposes.
pub const CRITICAL_DEPTH_RATIO: f64 = 0.8;

/// Lower and upper percentiles evaluated by a bounding study.
pub const BOUNDING_PERCENTILES: [f64; 2] = [0.01, 0.99];
