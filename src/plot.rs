//! Scaled data series and lens annotations, ready to be handed to a plotting front end.

use crate::propagation::Evaluation;
use crate::settings::BeamSettings;
use serde::Serialize;

/// An arrow pointing at a lens, labelled with the lens identifier.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Annotation {
    pub text: String,
    pub x: f64,
    pub y: f64,
    /// Vertical position of the arrow tail, in data coordinates.
    pub ay: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlotData {
    pub x_label: String,
    pub y_label: String,
    pub x: Vec<f64>,
    /// Upper edge of the beam.
    pub upper: Vec<f64>,
    /// Lower edge of the beam, present when plotting double sided.
    pub lower: Option<Vec<f64>>,
    pub annotations: Vec<Annotation>,
}

impl PlotData {
    pub fn new(evaluation: &Evaluation, settings: &BeamSettings) -> Self {
        let xs = settings.x_scale;
        let ys = settings.y_scale;
        let upper: Vec<f64> = evaluation.width_profile.iter().map(|w| w / ys).collect();
        let lower = if settings.double_sided {
            Some(upper.iter().map(|w| -w).collect())
        } else {
            None
        };
        let annotations = evaluation
            .lens_markers
            .iter()
            .map(|marker| {
                if settings.double_sided {
                    Annotation {
                        text: marker.label.clone(),
                        x: marker.position / xs,
                        y: -marker.width / ys,
                        ay: marker.width / (ys * 1.5),
                    }
                } else {
                    Annotation {
                        text: marker.label.clone(),
                        x: marker.position / xs,
                        y: marker.width / ys,
                        ay: marker.width / (ys * 2.0),
                    }
                }
            })
            .collect();
        PlotData {
            x_label: settings.x_label(),
            y_label: settings.y_label(),
            x: evaluation.grid.iter().map(|z| z / xs).collect(),
            upper,
            lower,
            annotations,
        }
    }
}

#[cfg(test)]
pub mod tests {
    use super::*;
    use crate::propagation::LensMarker;
    use assert_approx_eq::assert_approx_eq;

    fn evaluation() -> Evaluation {
        Evaluation {
            grid: vec![0.0, 500.0, 1000.0],
            width_profile: vec![3.0, 1.5, 3.0],
            lens_markers: vec![LensMarker {
                label: "1".to_string(),
                position: 500.0,
                width: 3.0,
            }],
            trace: vec![],
            trace_text: String::new(),
        }
    }

    #[test]
    fn test_single_sided() {
        let settings = BeamSettings {
            x_scale: 1000.0,
            double_sided: false,
            ..BeamSettings::default()
        };
        let plot = PlotData::new(&evaluation(), &settings);
        assert_eq!(plot.x_label, "z (m)");
        assert_eq!(plot.y_label, "Width (mm)");
        assert_eq!(plot.x, vec![0.0, 0.5, 1.0]);
        assert!(plot.lower.is_none());
        let annotation = &plot.annotations[0];
        assert_eq!(annotation.text, "1");
        assert_approx_eq!(annotation.x, 0.5, 1e-12_f64);
        assert_approx_eq!(annotation.y, 3.0, 1e-12_f64);
        assert_approx_eq!(annotation.ay, 1.5, 1e-12_f64);
    }

    #[test]
    fn test_double_sided() {
        let settings = BeamSettings {
            y_scale: 0.001,
            double_sided: true,
            ..BeamSettings::default()
        };
        let plot = PlotData::new(&evaluation(), &settings);
        assert_eq!(plot.y_label, "Width (μm)");
        let lower = plot.lower.unwrap();
        assert_approx_eq!(lower[1], -1500.0, 1e-9_f64);
        let annotation = &plot.annotations[0];
        assert_approx_eq!(annotation.y, -3000.0, 1e-9_f64);
        assert_approx_eq!(annotation.ay, 2000.0, 1e-9_f64);
    }
}
