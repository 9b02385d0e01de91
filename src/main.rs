//! Command line front end: loads settings and optics, applies edits, propagates the
//! beam and prints the report.
//!
//! Usage:
//!   beamprop --settings assets/default_settings.json \
//!            --optics assets/initial_lens.csv \
//!            --add-lens 1 --set 1,-200,150 \
//!            --profile profile.csv

extern crate beamprop as lib;

use anyhow::Result;
use clap::Parser;
use lib::output::file::{save_profile, write_plot_series, Binary, Text};
use lib::plot::PlotData;
use lib::{evaluate, report, BeamSettings, OpticsTable};
use std::fs::{read_to_string, File};
use std::io::BufWriter;
use std::path::PathBuf;
use std::sync::Mutex;
use tracing::{info, warn, Level};
use tracing_subscriber::FmtSubscriber;

#[derive(Parser, Debug)]
#[command(
    name = "beamprop",
    about = "Propagate a gaussian beam through a sequence of thin lenses"
)]
struct Args {
    /// Settings file, JSON or YAML
    #[arg(short, long, default_value = "assets/default_settings.json")]
    settings: PathBuf,

    /// Initial optics table (CSV). An origin is added at z_min if it has none
    #[arg(short, long, default_value = "assets/initial_lens.csv")]
    optics: PathBuf,

    /// Replace the table with the contents of this CSV file, keeping the current table if it is invalid
    #[arg(long)]
    load_text: Option<PathBuf>,

    /// Reassign element IDs in position order when loading text
    #[arg(long)]
    reset_ids: bool,

    /// Number of lenses to add after the last element
    #[arg(long, default_value_t = 0)]
    add_lens: usize,

    /// Move an element and set its focal length, given as ID,POSITION,FOCAL_LENGTH
    #[arg(long = "set", value_name = "ID,POSITION,FOCAL_LENGTH")]
    edits: Vec<String>,

    /// Write the resulting optics table to this CSV file
    #[arg(long)]
    save_optics: Option<PathBuf>,

    /// Write the width profile to this file
    #[arg(long)]
    profile: Option<PathBuf>,

    /// Write the profile in binary rather than text
    #[arg(long)]
    binary: bool,

    /// Write the scaled plot series to this CSV file
    #[arg(long)]
    plot: Option<PathBuf>,

    /// Write the log to this file instead of stderr
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

/// Splits an edit of the form `ID,POSITION,FOCAL_LENGTH`.
///
/// Position and focal length that are not numbers are passed on as missing.
fn parse_edit(edit: &str) -> Option<(i64, Option<f64>, Option<f64>)> {
    let mut fields = edit.split(',').map(str::trim);
    let element_id = fields.next()?.parse().ok()?;
    let position = fields.next().and_then(|p| p.parse().ok());
    let focal_length = fields.next().and_then(|f| f.parse().ok());
    Some((element_id, position, focal_length))
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    let level = if args.verbose { Level::DEBUG } else { Level::INFO };
    match &args.log_file {
        Some(path) => {
            let subscriber = FmtSubscriber::builder()
                .with_max_level(level)
                .with_ansi(false)
                .with_writer(Mutex::new(File::create(path)?))
                .finish();
            tracing::subscriber::set_global_default(subscriber)?;
        }
        None => {
            let subscriber = FmtSubscriber::builder()
                .with_max_level(level)
                .with_writer(std::io::stderr)
                .finish();
            tracing::subscriber::set_global_default(subscriber)?;
        }
    }
    info!("beamprop started");

    let mut settings = BeamSettings::load_or_default(&args.settings);
    settings.reset_index |= args.reset_ids;

    let mut table = OpticsTable::load_initial(&args.optics, settings.z_min)?;

    if let Some(path) = &args.load_text {
        let text = read_to_string(path)?;
        table = table.replace_from_text(&text, settings.reset_index);
    }
    for _ in 0..args.add_lens {
        table = table.append();
    }
    for edit in args.edits.iter() {
        match parse_edit(edit) {
            Some((element_id, position, focal_length)) => {
                table = table.set_position_and_focal(element_id, position, focal_length)?;
            }
            None => warn!("Ignoring malformed edit {:?}", edit),
        }
    }

    let evaluation = evaluate(&settings, &table)?;
    println!("{}", report::full_report(&evaluation, &table));

    for element_id in table.selectable_ids() {
        let description = table.describe(element_id)?;
        info!(
            "{}Position {} mm, focal length {} mm",
            description.text, description.position, description.focal_length
        );
    }

    if let Some(path) = &args.save_optics {
        let text = table.to_csv_string()?;
        std::fs::write(path, text)?;
        info!("Wrote optics table to {:?}", path);
    }

    if let Some(path) = &args.profile {
        if args.binary {
            save_profile::<Binary, _>(path, &evaluation)?;
        } else {
            save_profile::<Text, _>(path, &evaluation)?;
        }
    }

    if let Some(path) = &args.plot {
        let plot = PlotData::new(&evaluation, &settings);
        write_plot_series(BufWriter::new(File::create(path)?), &plot)?;
        info!("Wrote plot series to {:?}", path);
    }

    Ok(())
}
