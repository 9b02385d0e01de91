/// Mathematica constant pi
pub const PI: f64 = std::f64::consts::PI;

/// Conversion factor from nanometres to millimetres, the length unit used throughout the crate.
pub const NM_TO_MM: f64 = 1.0e-6;

/// Rayleigh range in mm above which a beam segment is reported as collimated.
pub const COLLIMATION_THRESHOLD: f64 = 10000.0;

/// Distance in mm past the last element at which a newly created lens is placed.
pub const NEW_ELEMENT_SPACING: f64 = 10.0;

/// Focal length in mm given to a newly created lens.
pub const NEW_ELEMENT_FOCAL_LENGTH: f64 = 100.0;

/// Tolerance, in units of grid steps, used when mapping positions onto the grid.
///
/// Absorbs round-off for elements placed exactly on a grid point.
pub const GRID_INDEX_TOLERANCE: f64 = 1.0e-9;

/// Largest number of grid points a single propagation may allocate.
pub const MAX_GRID_POINTS: usize = 50_000_000;
