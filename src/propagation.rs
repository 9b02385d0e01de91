//! Propagation of a gaussian beam through the optics table.
//!
//! The beam is described by its waist, the position of that waist (the beam's
//! effective origin) and its rayleigh range. Between elements the width follows
//! the gaussian beam law; at each thin lens the three quantities are transformed
//! and the beam continues with the new values.
//!
//! Evaluation is a pure function of the settings and table: neither is modified.

use crate::constant::COLLIMATION_THRESHOLD;
use crate::error::{OpticsError, Result};
use crate::maths;
use crate::optics::{ElementType, OpticalElement, OpticsTable};
use crate::report;
use crate::settings::BeamSettings;
use rayon::prelude::*;
use tracing::debug;

/// The beam parameters in effect between two elements.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PropagationState {
    /// 1/e^2 half width at the focus, mm.
    pub waist: f64,
    /// Position of the focus along the propagation axis, mm. May lie outside the grid.
    pub origin: f64,
    /// Rayleigh range, mm.
    pub rayleigh_range: f64,
}

impl PropagationState {
    /// State of the beam as it leaves the origin at `z_min`.
    pub fn initial(settings: &BeamSettings) -> Self {
        PropagationState {
            waist: settings.waist,
            origin: settings.z_min,
            rayleigh_range: maths::calculate_rayleigh_range(settings.wavelength_mm(), settings.waist),
        }
    }

    /// Half width of the beam at `z`.
    pub fn width_at(&self, z: f64) -> f64 {
        maths::gaussian_beam_width(self.waist, self.origin, self.rayleigh_range, z)
    }

    /// Transforms the beam through a thin lens at `z_lens`.
    ///
    /// Returns `None` if the transformation is singular, which happens when the lens
    /// sits exactly one focal length from the incoming focus.
    pub fn through_lens(&self, z_lens: f64, focal_length: f64) -> Option<Self> {
        let z_rel = z_lens - self.origin;
        let defocus = z_rel - focal_length;
        if defocus == 0.0 {
            return None;
        }
        let r = self.rayleigh_range / defocus;
        let magnification = (focal_length / defocus).abs() / (1.0 + r.powi(2)).sqrt();
        let m2 = magnification.powi(2);
        let next = PropagationState {
            waist: self.waist * magnification,
            origin: m2 * defocus + focal_length + z_lens,
            rayleigh_range: self.rayleigh_range * m2,
        };
        if next.waist.is_finite()
            && next.origin.is_finite()
            && next.rayleigh_range.is_finite()
            && next.rayleigh_range > 0.0
        {
            Some(next)
        } else {
            None
        }
    }

    /// Distance over which the beam stays within √2 of its waist.
    pub fn depth_of_focus(&self) -> f64 {
        2.0 * self.rayleigh_range
    }

    pub fn is_collimated(&self) -> bool {
        self.rayleigh_range >= COLLIMATION_THRESHOLD
    }
}

/// Marks where a lens acts on the beam, for annotating plots.
#[derive(Debug, Clone, PartialEq)]
pub struct LensMarker {
    pub label: String,
    /// Grid position of the lens, mm.
    pub position: f64,
    /// Half width of the beam arriving at the lens, mm.
    pub width: f64,
}

/// The beam after passing an element.
#[derive(Debug, Clone, PartialEq)]
pub struct TraceEntry {
    pub element_id: i64,
    pub element_type: ElementType,
    /// Grid position at which the element acts, mm.
    pub grid_position: f64,
    pub state: PropagationState,
}

impl TraceEntry {
    /// Signed distance from the element to the focus. Positive if the focus lies after the element.
    pub fn focus_offset(&self) -> f64 {
        self.state.origin - self.grid_position
    }

    pub fn focus_is_after(&self) -> bool {
        self.focus_offset() > 0.0
    }
}

/// Result of propagating a beam across the grid.
#[derive(Debug, Clone)]
pub struct Evaluation {
    /// Positions `z_min, z_min + z_step, ...` below `z_max`.
    pub grid: Vec<f64>,
    /// Beam half width at each grid position.
    pub width_profile: Vec<f64>,
    pub lens_markers: Vec<LensMarker>,
    pub trace: Vec<TraceEntry>,
    /// Human readable account of `trace`.
    pub trace_text: String,
}

impl Evaluation {
    /// Smallest width on the grid and its position. The first occurrence wins on ties.
    pub fn smallest_spot(&self) -> Option<(f64, f64)> {
        let mut best: Option<(f64, f64)> = None;
        for (z, w) in self.grid.iter().zip(self.width_profile.iter()) {
            match best {
                Some((_, smallest)) if *w >= smallest => (),
                _ => best = Some((*z, *w)),
            }
        }
        best
    }
}

/// Grid index at which an element acts. The origin always acts at the start of the grid.
fn element_grid_index(element: &OpticalElement, settings: &BeamSettings, length: usize) -> usize {
    if element.is_origin() {
        0
    } else {
        maths::position_to_grid_index(element.position, settings.z_min, settings.z_step, length)
    }
}

/// Propagates the beam described by `settings` through every element of `table`.
pub fn evaluate(settings: &BeamSettings, table: &OpticsTable) -> Result<Evaluation> {
    settings.validate()?;
    let grid = maths::build_grid(settings.z_min, settings.z_max, settings.z_step);
    let length = grid.len();
    if length == 0 {
        return Err(OpticsError::InvertedGrid {
            z_min: settings.z_min,
            z_max: settings.z_max,
        });
    }
    let starts: Vec<usize> = table
        .iter()
        .map(|element| element_grid_index(element, settings, length))
        .collect();

    let mut state = PropagationState::initial(settings);
    let mut width_profile = vec![state.waist; length];
    let mut lens_markers = Vec::new();
    let mut trace = Vec::with_capacity(table.len());

    for (i, element) in table.iter().enumerate() {
        let start = starts[i];
        let end = starts.get(i + 1).copied().unwrap_or(length).max(start);

        if element.element_type == ElementType::Lens {
            if !element.focal_length.is_finite() || element.focal_length == 0.0 {
                return Err(OpticsError::InvalidFocalLength {
                    element_id: element.element_id,
                    focal_length: element.focal_length,
                });
            }
            let arriving_width = match start.checked_sub(1) {
                Some(previous) => width_profile[previous],
                None => state.width_at(grid[start]),
            };
            state = state
                .through_lens(grid[start], element.focal_length)
                .ok_or(OpticsError::FocalSingularity {
                    element_id: element.element_id,
                })?;
            lens_markers.push(LensMarker {
                label: element.label(),
                position: grid[start],
                width: arriving_width,
            });
        }

        debug!(
            "Element {} at z={}: waist {} mm, focus at {} mm, rayleigh range {} mm",
            element.element_id, grid[start], state.waist, state.origin, state.rayleigh_range
        );

        let segment = &mut width_profile[start..end];
        segment
            .par_iter_mut()
            .zip(grid[start..end].par_iter())
            .for_each(|(w, z)| *w = state.width_at(*z));

        trace.push(TraceEntry {
            element_id: element.element_id,
            element_type: element.element_type,
            grid_position: grid[start],
            state,
        });
    }

    let trace_text = report::format_trace(&trace);
    Ok(Evaluation {
        grid,
        width_profile,
        lens_markers,
        trace,
        trace_text,
    })
}

#[cfg(test)]
pub mod tests {
    use super::*;
    use crate::optics::OpticalElement;
    use assert_approx_eq::assert_approx_eq;

    fn settings(z_min: f64, z_max: f64, z_step: f64) -> BeamSettings {
        BeamSettings {
            z_min,
            z_max,
            z_step,
            ..BeamSettings::default()
        }
    }

    #[test]
    fn test_origin_only_follows_growth_law() {
        let settings = settings(0.0, 200000.0, 10.0);
        let table = OpticsTable::new(vec![OpticalElement::origin(0, 123.0)]).unwrap();
        let evaluation = evaluate(&settings, &table).unwrap();

        let rayleigh = maths::calculate_rayleigh_range(settings.wavelength_mm(), settings.waist);
        assert_eq!(evaluation.width_profile.len(), 20000);
        for (z, w) in evaluation.grid.iter().zip(evaluation.width_profile.iter()) {
            let expected = settings.waist * (1.0 + (z / rayleigh).powi(2)).sqrt();
            assert_approx_eq!(*w, expected, 1e-12_f64);
        }
        assert!(evaluation.lens_markers.is_empty());
        assert_eq!(evaluation.trace.len(), 1);
        assert_eq!(evaluation.trace[0].state.origin, 0.0);
    }

    #[test]
    fn test_last_sample_is_filled() {
        let settings = settings(0.0, 100.0, 1.0);
        let table = OpticsTable::new(vec![
            OpticalElement::origin(0, 0.0),
            OpticalElement::lens(1, 50.0, 20.0),
        ])
        .unwrap();
        let evaluation = evaluate(&settings, &table).unwrap();
        let last = evaluation.trace[1].state;
        assert_approx_eq!(
            *evaluation.width_profile.last().unwrap(),
            last.width_at(99.0),
            1e-12_f64
        );
        assert!(*evaluation.width_profile.last().unwrap() != settings.waist);
    }

    #[test]
    fn test_lens_transformation() {
        // A lens one rayleigh range after a waist refocuses at a known distance.
        let state = PropagationState {
            waist: 1.0,
            origin: 0.0,
            rayleigh_range: 100.0,
        };
        let next = state.through_lens(100.0, 50.0).unwrap();
        let defocus: f64 = 100.0 - 50.0;
        let m = (50.0 / defocus) / (1.0 + (100.0 / defocus).powi(2)).sqrt();
        assert_approx_eq!(next.waist, m, 1e-12_f64);
        assert_approx_eq!(next.rayleigh_range, 100.0 * m * m, 1e-12_f64);
        assert_approx_eq!(next.origin, m * m * defocus + 50.0 + 100.0, 1e-12_f64);
        // Waist and rayleigh range stay consistent with the same wavelength.
        assert_approx_eq!(next.rayleigh_range / next.waist.powi(2), 100.0, 1e-9_f64);
    }

    #[test]
    fn test_focal_singularity_is_reported() {
        let settings = settings(0.0, 100.0, 1.0);
        let table = OpticsTable::new(vec![
            OpticalElement::origin(0, 0.0),
            OpticalElement::lens(4, 20.0, 20.0),
        ])
        .unwrap();
        match evaluate(&settings, &table) {
            Err(OpticsError::FocalSingularity { element_id: 4 }) => (),
            other => panic!("expected singularity at element 4, got {:?}", other),
        }
    }

    #[test]
    fn test_zero_focal_length_is_rejected() {
        let settings = settings(0.0, 100.0, 1.0);
        let table = OpticsTable::new(vec![
            OpticalElement::origin(0, 0.0),
            OpticalElement::lens(2, 20.0, 0.0),
        ])
        .unwrap();
        assert!(matches!(
            evaluate(&settings, &table),
            Err(OpticsError::InvalidFocalLength { element_id: 2, .. })
        ));
    }

    #[test]
    fn test_invalid_settings_are_rejected() {
        let table = OpticsTable::new(vec![OpticalElement::origin(0, 0.0)]).unwrap();
        assert!(matches!(
            evaluate(&settings(10.0, 0.0, 1.0), &table),
            Err(OpticsError::InvertedGrid { .. })
        ));
        assert!(matches!(
            evaluate(&settings(0.0, 10.0, 0.0), &table),
            Err(OpticsError::InvalidSetting { name: "z_step", .. })
        ));
    }

    #[test]
    fn test_oversized_grid_is_rejected() {
        let table = OpticsTable::new(vec![OpticalElement::origin(0, 0.0)]).unwrap();
        assert!(matches!(
            evaluate(&settings(0.0, 1e300, 1e-300), &table),
            Err(OpticsError::GridTooLarge { .. })
        ));
    }

    #[test]
    fn test_out_of_range_lenses_are_clipped() {
        let settings = settings(0.0, 100.0, 1.0);
        let table = OpticsTable::new(vec![
            OpticalElement::origin(0, 0.0),
            OpticalElement::lens(1, -50.0, 30.0),
            OpticalElement::lens(2, 500.0, 30.0),
        ])
        .unwrap();
        let evaluation = evaluate(&settings, &table).unwrap();
        assert_eq!(evaluation.lens_markers.len(), 2);
        assert_eq!(evaluation.lens_markers[0].position, 0.0);
        assert_eq!(evaluation.lens_markers[0].width, settings.waist);
        assert_eq!(evaluation.lens_markers[1].position, 99.0);
        assert!(evaluation.width_profile.iter().all(|w| w.is_finite()));
    }

    #[test]
    fn test_marker_records_width_before_lens() {
        let settings = settings(0.0, 1000.0, 1.0);
        let table = OpticsTable::new(vec![
            OpticalElement::origin(0, 0.0),
            OpticalElement::lens(1, 400.0, 100.0),
        ])
        .unwrap();
        let evaluation = evaluate(&settings, &table).unwrap();
        let initial = PropagationState::initial(&settings);
        assert_eq!(evaluation.lens_markers[0].label, "1");
        assert_eq!(evaluation.lens_markers[0].position, 400.0);
        assert_approx_eq!(evaluation.lens_markers[0].width, initial.width_at(399.0), 1e-12_f64);
    }

    #[test]
    fn test_inputs_unchanged() {
        let settings = settings(-100.0, 100.0, 0.5);
        let table = OpticsTable::new(vec![
            OpticalElement::origin(0, 55.0),
            OpticalElement::lens(1, 0.0, 40.0),
        ])
        .unwrap();
        let table_copy = table.clone();
        let settings_copy = settings.clone();
        let first = evaluate(&settings, &table).unwrap();
        let second = evaluate(&settings, &table).unwrap();
        assert_eq!(table, table_copy);
        assert_eq!(settings, settings_copy);
        assert_eq!(first.width_profile, second.width_profile);
        assert_eq!(table.origin().position, 55.0);
    }

    #[test]
    fn test_smallest_spot_first_occurrence() {
        let evaluation = Evaluation {
            grid: vec![0.0, 1.0, 2.0, 3.0],
            width_profile: vec![3.0, 1.0, 1.0, 2.0],
            lens_markers: vec![],
            trace: vec![],
            trace_text: String::new(),
        };
        assert_eq!(evaluation.smallest_spot(), Some((1.0, 1.0)));
    }
}
