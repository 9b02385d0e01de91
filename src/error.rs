//! Errors raised while building optics tables and propagating beams.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum OpticsError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("Unknown optics type: {0}")]
    UnknownElementType(i64),
    #[error("No element with ID {0}")]
    UnknownElement(i64),
    #[error("The optics table contains no elements")]
    EmptyTable,
    #[error("The optics table has no beam origin")]
    MissingOrigin,
    #[error("The optics table has {0} beam origins, expected exactly one")]
    MultipleOrigins(usize),
    #[error("Element {element_id} has an invalid position {position}")]
    InvalidPosition { element_id: i64, position: f64 },
    #[error("Invalid value {value} for setting {name}")]
    InvalidSetting { name: &'static str, value: f64 },
    #[error("z_max ({z_max}) must be greater than z_min ({z_min})")]
    InvertedGrid { z_min: f64, z_max: f64 },
    #[error("The grid would hold {points} points, more than the limit of {max}")]
    GridTooLarge { points: f64, max: usize },
    #[error("Element {element_id} has an invalid focal length {focal_length}")]
    InvalidFocalLength { element_id: i64, focal_length: f64 },
    #[error("Element {element_id} sits exactly at the focus of the incoming beam")]
    FocalSingularity { element_id: i64 },
}

pub type Result<T> = std::result::Result<T, OpticsError>;
