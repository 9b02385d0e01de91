//! Writes the beam width profile and plot series to file.

use crate::error::Result;
use crate::plot::PlotData;
use crate::propagation::Evaluation;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use tracing::info;

extern crate byteorder;
use byteorder::{LittleEndian, WriteBytesExt};

/// A trait implemented for each profile output format.
pub trait Format<W: Write> {
    /// Writes data preceding the samples.
    fn write_header(writer: &mut W, sample_number: usize) -> std::io::Result<()>;

    /// Writes the beam width at a single grid position.
    fn write_sample(writer: &mut W, z: f64, width: f64) -> std::io::Result<()>;
}

/// Prints profiles in a [Format] that is human readable.
///
/// The file begins with the header line `z,width`, followed by one line per grid
/// position holding the position and beam half width in mm.
pub struct Text {}
impl<W: Write> Format<W> for Text {
    fn write_header(writer: &mut W, _sample_number: usize) -> std::io::Result<()> {
        writeln!(writer, "z,width")
    }

    fn write_sample(writer: &mut W, z: f64, width: f64) -> std::io::Result<()> {
        writeln!(writer, "{},{}", z, width)
    }
}

type Endianness = LittleEndian;

/// Writes profiles as little endian binary: the number of samples as a `u64`, then
/// `(z, width)` pairs of `f64`.
pub struct Binary {}
impl<W: Write> Format<W> for Binary {
    fn write_header(writer: &mut W, sample_number: usize) -> std::io::Result<()> {
        writer.write_u64::<Endianness>(sample_number as u64)
    }

    fn write_sample(writer: &mut W, z: f64, width: f64) -> std::io::Result<()> {
        writer.write_f64::<Endianness>(z)?;
        writer.write_f64::<Endianness>(width)
    }
}

/// Writes the width profile of an evaluation using the format `F`.
pub fn write_profile<F: Format<W>, W: Write>(writer: &mut W, evaluation: &Evaluation) -> Result<()> {
    F::write_header(writer, evaluation.grid.len())?;
    for (z, width) in evaluation.grid.iter().zip(evaluation.width_profile.iter()) {
        F::write_sample(writer, *z, *width)?;
    }
    writer.flush()?;
    Ok(())
}

/// Creates a file and writes the width profile of an evaluation to it using the format `F`.
pub fn save_profile<F, P>(path: P, evaluation: &Evaluation) -> Result<()>
where
    F: Format<BufWriter<File>>,
    P: AsRef<Path>,
{
    let path = path.as_ref();
    let mut writer = BufWriter::new(File::create(path)?);
    write_profile::<F, _>(&mut writer, evaluation)?;
    info!("Wrote {} profile samples to {:?}", evaluation.grid.len(), path);
    Ok(())
}

/// Writes the scaled plot series as CSV, with columns `x,upper` and `lower` when double sided.
pub fn write_plot_series<W: Write>(writer: W, plot: &PlotData) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    match &plot.lower {
        Some(lower) => {
            wtr.write_record(&[plot.x_label.as_str(), "upper", "lower"])?;
            for ((x, upper), lower) in plot.x.iter().zip(plot.upper.iter()).zip(lower.iter()) {
                wtr.write_record(&[x.to_string(), upper.to_string(), lower.to_string()])?;
            }
        }
        None => {
            wtr.write_record(&[plot.x_label.as_str(), "upper"])?;
            for (x, upper) in plot.x.iter().zip(plot.upper.iter()) {
                wtr.write_record(&[x.to_string(), upper.to_string()])?;
            }
        }
    }
    wtr.flush()?;
    Ok(())
}
