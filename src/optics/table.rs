//! The ordered table of optical elements and the edits that can be made to it.

use super::{ElementType, OpticalElement};
use crate::constant::{NEW_ELEMENT_FOCAL_LENGTH, NEW_ELEMENT_SPACING};
use crate::error::{OpticsError, Result};
use tracing::{debug, warn};

/// An ordered, non-empty collection of optical elements.
///
/// Elements are sorted by position, except that the single beam origin always
/// occupies the first slot.
#[derive(Debug, Clone, PartialEq)]
pub struct OpticsTable {
    elements: Vec<OpticalElement>,
}

/// Summary of a single element, shown when the element is selected for editing.
#[derive(Debug, Clone, PartialEq)]
pub struct ElementDescription {
    pub text: String,
    pub position: f64,
    pub focal_length: f64,
}

impl OpticsTable {
    /// Creates a normalised table, checking that it holds exactly one origin and
    /// that every position is finite.
    pub fn new(elements: Vec<OpticalElement>) -> Result<Self> {
        if elements.is_empty() {
            return Err(OpticsError::EmptyTable);
        }
        let origins = elements.iter().filter(|e| e.is_origin()).count();
        match origins {
            0 => return Err(OpticsError::MissingOrigin),
            1 => (),
            n => return Err(OpticsError::MultipleOrigins(n)),
        }
        if let Some(bad) = elements.iter().find(|e| !e.position.is_finite()) {
            return Err(OpticsError::InvalidPosition {
                element_id: bad.element_id,
                position: bad.position,
            });
        }
        Ok(OpticsTable { elements }.normalize())
    }

    pub fn elements(&self) -> &[OpticalElement] {
        &self.elements
    }

    pub fn iter(&self) -> std::slice::Iter<'_, OpticalElement> {
        self.elements.iter()
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// The beam origin, which always comes first.
    pub fn origin(&self) -> &OpticalElement {
        &self.elements[0]
    }

    /// Finds an element by identifier. If identifiers are duplicated the first match wins.
    pub fn find(&self, element_id: i64) -> Option<&OpticalElement> {
        self.elements.iter().find(|e| e.element_id == element_id)
    }

    /// Sorts elements by position, moves the origin to the front and reassigns
    /// each element's positional index.
    pub fn normalize(&self) -> Self {
        let mut elements = self.elements.clone();
        elements.sort_by(|a, b| a.position.total_cmp(&b.position));
        if let Some(origin) = elements.iter().position(|e| e.is_origin()) {
            let origin = elements.remove(origin);
            elements.insert(0, origin);
        }
        for (index, element) in elements.iter_mut().enumerate() {
            element.index = index;
        }
        OpticsTable { elements }
    }

    /// Adds a new lens after the last element.
    ///
    /// The lens receives the next free identifier, sits 10 mm after the current last
    /// element and has a focal length of 100 mm.
    pub fn append(&self) -> Self {
        let element_id = self.elements.iter().map(|e| e.element_id).max().unwrap_or(-1) + 1;
        let last_position = self
            .elements
            .last()
            .map(|e| e.position)
            .unwrap_or_default();
        let lens = OpticalElement::lens(
            element_id,
            last_position + NEW_ELEMENT_SPACING,
            NEW_ELEMENT_FOCAL_LENGTH,
        );
        debug!("Adding lens {} at {} mm", element_id, lens.position);
        let mut elements = self.elements.clone();
        elements.push(lens);
        OpticsTable { elements }.normalize()
    }

    /// Moves an element and changes its focal length.
    ///
    /// Missing or non-finite values, as produced by an empty input field, leave the table unchanged.
    /// Fails if no element carries the identifier.
    pub fn set_position_and_focal(
        &self,
        element_id: i64,
        position: Option<f64>,
        focal_length: Option<f64>,
    ) -> Result<Self> {
        let chosen = self
            .elements
            .iter()
            .position(|e| e.element_id == element_id)
            .ok_or(OpticsError::UnknownElement(element_id))?;
        let (position, focal_length) = match (position, focal_length) {
            (Some(p), Some(f)) if p.is_finite() && f.is_finite() => (p, f),
            _ => {
                warn!(
                    "Ignoring update of element {}: position and focal length must both be numbers",
                    element_id
                );
                return Ok(self.clone());
            }
        };
        let mut elements = self.elements.clone();
        elements[chosen].position = position;
        elements[chosen].focal_length = focal_length;
        Ok(OpticsTable { elements }.normalize())
    }

    /// Reassigns identifiers from position order, so the origin becomes 0.
    pub fn with_reset_ids(&self) -> Self {
        let mut table = self.normalize();
        for element in table.elements.iter_mut() {
            element.element_id = element.index as i64;
        }
        table
    }

    /// Identifiers of the elements that can be selected for editing: every element but the origin.
    pub fn selectable_ids(&self) -> Vec<i64> {
        self.elements
            .iter()
            .filter(|e| !e.is_origin())
            .map(|e| e.element_id)
            .collect()
    }

    /// Describes the element with the given identifier.
    pub fn describe(&self, element_id: i64) -> Result<ElementDescription> {
        let element = self
            .find(element_id)
            .ok_or(OpticsError::UnknownElement(element_id))?;
        Ok(ElementDescription {
            text: format!(
                "Element {} is {}. ",
                element_id,
                element.element_type.describe(false)
            ),
            position: element.position,
            focal_length: element.focal_length,
        })
    }

    /// Number of lenses in the table.
    pub fn lens_count(&self) -> usize {
        self.elements
            .iter()
            .filter(|e| e.element_type == ElementType::Lens)
            .count()
    }
}
