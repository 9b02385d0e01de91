//! Reads and writes optics tables in their textual CSV form.
//!
//! The format has the header `Element,Position,Type,FocalLength`, where `Type` is 0
//! for the origin of the beam and 1 for a lens. It is both the format users paste
//! into the loading box and the format a table is saved in.

use super::{ElementType, OpticalElement, OpticsTable};
use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;
use tracing::{info, warn};

extern crate csv;

/// A row of the textual table.
#[derive(Debug, Serialize, Deserialize)]
struct OpticsRecord {
    #[serde(rename = "Element")]
    element: i64,
    #[serde(rename = "Position")]
    position: f64,
    #[serde(rename = "Type")]
    element_type: i64,
    #[serde(rename = "FocalLength")]
    focal_length: f64,
}

impl OpticsRecord {
    fn into_element(self) -> Result<OpticalElement> {
        Ok(OpticalElement {
            element_id: self.element,
            position: self.position,
            element_type: ElementType::from_code(self.element_type)?,
            focal_length: self.focal_length,
            index: 0,
        })
    }
}

impl From<&OpticalElement> for OpticsRecord {
    fn from(element: &OpticalElement) -> Self {
        OpticsRecord {
            element: element.element_id,
            position: element.position,
            element_type: element.element_type.code(),
            focal_length: element.focal_length,
        }
    }
}

/// Parses every row of a textual table, without checking the table invariants.
fn read_elements<R: Read>(reader: R) -> Result<Vec<OpticalElement>> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    let mut elements = Vec::new();
    for record in reader.deserialize::<OpticsRecord>() {
        elements.push(record?.into_element()?);
    }
    Ok(elements)
}

/// Parses a textual table.
pub fn parse_table(text: &str) -> Result<OpticsTable> {
    OpticsTable::new(read_elements(text.as_bytes())?)
}

impl OpticsTable {
    /// Replaces the table with one parsed from text.
    ///
    /// Text that cannot be parsed into a valid table is discarded and the current
    /// table returned unchanged. When `reset_ids` is set, identifiers of the parsed
    /// table are reassigned in position order.
    pub fn replace_from_text(&self, text: &str, reset_ids: bool) -> Self {
        match parse_table(text) {
            Ok(table) => {
                info!("Loaded optics table with {} elements", table.len());
                if reset_ids {
                    table.with_reset_ids()
                } else {
                    table
                }
            }
            Err(why) => {
                warn!("Discarding optics text: {}", why);
                self.clone()
            }
        }
    }

    /// Loads the table shown when the program starts.
    ///
    /// The file may omit the origin, in which case one is placed at `z_min`.
    /// Identifiers are assigned in position order.
    pub fn load_initial<P: AsRef<Path>>(path: P, z_min: f64) -> Result<Self> {
        let path = path.as_ref();
        info!("Loading initial optics from {:?}", path);
        let mut elements = read_elements(File::open(path)?)?;
        if !elements.iter().any(|e| e.is_origin()) {
            elements.push(OpticalElement::origin(0, z_min));
        }
        Ok(OpticsTable::new(elements)?.with_reset_ids())
    }

    /// Writes the table in its textual form.
    pub fn write_csv<W: Write>(&self, writer: W) -> Result<()> {
        let mut wtr = csv::Writer::from_writer(writer);
        for element in self.iter() {
            wtr.serialize(OpticsRecord::from(element))?;
        }
        wtr.flush()?;
        Ok(())
    }

    pub fn to_csv_string(&self) -> Result<String> {
        let mut buffer = Vec::new();
        self.write_csv(&mut buffer)?;
        Ok(String::from_utf8_lossy(&buffer).into_owned())
    }
}
