//! Mathematical utilities for gaussian beam optics.
//!
//! All lengths are in mm.

use crate::constant::{GRID_INDEX_TOLERANCE, PI};

/// Calculates the rayleigh range of a gaussian beam.
///
/// # Arguments
///
/// `wavelength`: wavelength of the light, in units of mm.
///
/// `waist`: 1/e^2 half width of the beam at its focus, in units of mm.
pub fn calculate_rayleigh_range(wavelength: f64, waist: f64) -> f64 {
    PI * waist.powi(2) / wavelength
}

/// Half width of a gaussian beam at a distance along the propagation axis.
///
/// # Arguments
///
/// `waist`: 1/e^2 half width at the focus.
///
/// `origin`: z position of the focus.
///
/// `rayleigh_range`: rayleigh range of the beam.
///
/// `z`: position at which to evaluate the width.
pub fn gaussian_beam_width(waist: f64, origin: f64, rayleigh_range: f64, z: f64) -> f64 {
    waist * (1.0 + ((z - origin) / rayleigh_range).powi(2)).sqrt()
}

/// Number of points in the grid `z_min, z_min + z_step, ...` strictly below `z_max`.
pub fn grid_length(z_min: f64, z_max: f64, z_step: f64) -> usize {
    ((z_max - z_min) / z_step).ceil().max(0.0) as usize
}

/// Builds the propagation grid covering `[z_min, z_max)`.
pub fn build_grid(z_min: f64, z_max: f64, z_step: f64) -> Vec<f64> {
    (0..grid_length(z_min, z_max, z_step))
        .map(|i| z_min + i as f64 * z_step)
        .collect()
}

/// Maps a position onto the index of the grid point at or immediately before it.
///
/// Positions outside the grid are clipped into `[0, length - 1]`.
pub fn position_to_grid_index(position: f64, z_min: f64, z_step: f64, length: usize) -> usize {
    if length == 0 {
        return 0;
    }
    let fraction = ((position - z_min) / z_step + GRID_INDEX_TOLERANCE).floor();
    if fraction.is_nan() || fraction < 0.0 {
        0
    } else {
        (fraction as usize).min(length - 1)
    }
}
