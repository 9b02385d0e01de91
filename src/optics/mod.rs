//! Optical elements placed along the propagation axis.
//!
//! An [OpticsTable](table::OpticsTable) holds a beam origin followed by thin lenses,
//! sorted by position. Tables are values: every edit returns a new table.

pub mod table;
pub mod text;

use crate::error::{OpticsError, Result};

pub use table::OpticsTable;

/// The kinds of element that can sit on the propagation axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ElementType {
    /// Where the beam starts, with its initial waist.
    Origin,
    /// An ideal thin lens.
    Lens,
}

impl ElementType {
    /// Type code used in the textual table format.
    pub fn code(&self) -> i64 {
        match self {
            ElementType::Origin => 0,
            ElementType::Lens => 1,
        }
    }

    pub fn from_code(code: i64) -> Result<Self> {
        match code {
            0 => Ok(ElementType::Origin),
            1 => Ok(ElementType::Lens),
            other => Err(OpticsError::UnknownElementType(other)),
        }
    }

    /// Human readable description, either as a phrase or as a single word for tables.
    pub fn describe(&self, short: bool) -> &'static str {
        match (self, short) {
            (ElementType::Origin, false) => "the origin of the beam",
            (ElementType::Origin, true) => "origin",
            (ElementType::Lens, false) => "a lens",
            (ElementType::Lens, true) => "lens",
        }
    }
}

/// Describes a type code. Fails for any code other than those of [ElementType].
pub fn characterize(code: i64, short: bool) -> Result<&'static str> {
    Ok(ElementType::from_code(code)?.describe(short))
}

/// One row of the optics table.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OpticalElement {
    /// Identifier chosen by the user, independent of position.
    pub element_id: i64,
    /// Position along the propagation axis, mm.
    pub position: f64,
    pub element_type: ElementType,
    /// Focal length in mm. Ignored for the origin.
    pub focal_length: f64,
    /// Rank of the element in position order, assigned on normalisation.
    pub index: usize,
}

impl OpticalElement {
    pub fn origin(element_id: i64, position: f64) -> Self {
        OpticalElement {
            element_id,
            position,
            element_type: ElementType::Origin,
            focal_length: 0.0,
            index: 0,
        }
    }

    pub fn lens(element_id: i64, position: f64, focal_length: f64) -> Self {
        OpticalElement {
            element_id,
            position,
            element_type: ElementType::Lens,
            focal_length,
            index: 0,
        }
    }

    pub fn is_origin(&self) -> bool {
        self.element_type == ElementType::Origin
    }

    /// Label used to annotate the element in reports and plots.
    pub fn label(&self) -> String {
        self.element_id.to_string()
    }
}
