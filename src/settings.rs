//! Beam and grid settings used for a single propagation.
//!
//! Settings are stored as JSON (or YAML) mappings with the keys `x_scale`, `y_scale`,
//! `wavelength`, `waist`, `z_min`, `z_max`, `z_step`, `double_sided` and optionally
//! `reset_index`. Numbers may be written as strings, and flags as booleans or 0/1.

use crate::constant::{MAX_GRID_POINTS, NM_TO_MM};
use crate::error::{OpticsError, Result};
use serde::{Deserialize, Deserializer, Serialize};
use std::fs::read_to_string;
use std::path::Path;
use tracing::{info, warn};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BeamSettings {
    /// Divisor applied to z coordinates for plotting. Selects the axis unit label.
    #[serde(deserialize_with = "number")]
    pub x_scale: f64,

    /// Divisor applied to widths for plotting. Selects the axis unit label.
    #[serde(deserialize_with = "number")]
    pub y_scale: f64,

    /// Wavelength of the light, in nm.
    #[serde(deserialize_with = "number")]
    pub wavelength: f64,

    /// 1/e^2 half width of the beam at the origin, in mm.
    #[serde(deserialize_with = "number")]
    pub waist: f64,

    /// Start of the propagation grid, in mm. The beam origin is placed here.
    #[serde(deserialize_with = "number")]
    pub z_min: f64,

    /// End of the propagation grid (exclusive), in mm.
    #[serde(deserialize_with = "number")]
    pub z_max: f64,

    /// Spacing of the propagation grid, in mm.
    #[serde(deserialize_with = "number")]
    pub z_step: f64,

    /// Plot the beam mirrored about the axis.
    #[serde(deserialize_with = "flag")]
    pub double_sided: bool,

    /// Reassign element identifiers when a table is loaded from text.
    #[serde(default, deserialize_with = "flag")]
    pub reset_index: bool,
}

impl Default for BeamSettings {
    fn default() -> Self {
        BeamSettings {
            x_scale: 1.0,
            y_scale: 1.0,
            wavelength: 800.0,
            waist: 5.0,
            z_min: -1000.0,
            z_max: 2000.0,
            z_step: 0.05,
            double_sided: true,
            reset_index: false,
        }
    }
}

impl BeamSettings {
    /// Wavelength converted to mm.
    pub fn wavelength_mm(&self) -> f64 {
        self.wavelength * NM_TO_MM
    }

    /// Checks that the settings describe a non-empty grid of bounded size, a physical
    /// beam and usable plot scales.
    pub fn validate(&self) -> Result<()> {
        let positive = [
            ("x_scale", self.x_scale),
            ("y_scale", self.y_scale),
            ("waist", self.waist),
            ("wavelength", self.wavelength),
            ("z_step", self.z_step),
        ];
        for (name, value) in positive.iter() {
            if !(value.is_finite() && *value > 0.0) {
                return Err(OpticsError::InvalidSetting {
                    name: *name,
                    value: *value,
                });
            }
        }
        for (name, value) in [("z_min", self.z_min), ("z_max", self.z_max)].iter() {
            if !value.is_finite() {
                return Err(OpticsError::InvalidSetting {
                    name: *name,
                    value: *value,
                });
            }
        }
        if self.z_max <= self.z_min {
            return Err(OpticsError::InvertedGrid {
                z_min: self.z_min,
                z_max: self.z_max,
            });
        }
        let points = ((self.z_max - self.z_min) / self.z_step).ceil();
        if !(points.is_finite() && points <= MAX_GRID_POINTS as f64) {
            return Err(OpticsError::GridTooLarge {
                points,
                max: MAX_GRID_POINTS,
            });
        }
        Ok(())
    }

    /// Loads settings from a JSON file, or a YAML file if the extension is `.yaml` or `.yml`.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let contents = read_to_string(path)?;
        let settings: BeamSettings = match path.extension().and_then(|e| e.to_str()) {
            Some("yaml") | Some("yml") => serde_yaml::from_str(&contents)?,
            _ => serde_json::from_str(&contents)?,
        };
        info!("Loaded settings from {:?}", path);
        Ok(settings)
    }

    /// Loads settings if the file exists and can be read, otherwise uses the defaults.
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Self {
        match Self::load(&path) {
            Ok(settings) => settings,
            Err(why) => {
                warn!(
                    "Could not load settings from {:?} ({}), using defaults",
                    path.as_ref(),
                    why
                );
                BeamSettings::default()
            }
        }
    }

    /// Axis label for the propagation axis.
    pub fn x_label(&self) -> String {
        format!("z{}", scale_text(self.x_scale))
    }

    /// Axis label for the beam width.
    pub fn y_label(&self) -> String {
        format!("Width{}", scale_text(self.y_scale))
    }
}

/// Unit label for a plotting scale factor, given relative to mm.
pub fn scale_text(factor: f64) -> &'static str {
    if factor == 1.0 {
        " (mm)"
    } else if factor == 1000.0 {
        " (m)"
    } else if factor == 0.001 {
        " (μm)"
    } else {
        ""
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum NumberOrText {
    Number(f64),
    Text(String),
}

fn number<'de, D: Deserializer<'de>>(deserializer: D) -> std::result::Result<f64, D::Error> {
    match NumberOrText::deserialize(deserializer)? {
        NumberOrText::Number(value) => Ok(value),
        NumberOrText::Text(text) => text.trim().parse().map_err(serde::de::Error::custom),
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum FlagValue {
    Bool(bool),
    Number(f64),
    Text(String),
}

fn flag<'de, D: Deserializer<'de>>(deserializer: D) -> std::result::Result<bool, D::Error> {
    match FlagValue::deserialize(deserializer)? {
        FlagValue::Bool(value) => Ok(value),
        FlagValue::Number(value) => Ok(value != 0.0),
        FlagValue::Text(text) => match text.trim() {
            "1" | "true" => Ok(true),
            "0" | "false" | "" => Ok(false),
            other => Err(serde::de::Error::custom(format!("invalid flag {:?}", other))),
        },
    }
}
