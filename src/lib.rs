//! Gaussian beam propagation through a one-dimensional sequence of thin lenses.
//!
//! An [OpticsTable](optics::OpticsTable) and [BeamSettings](settings::BeamSettings)
//! are passed to [evaluate](propagation::evaluate), which returns the beam width
//! across the grid together with a per-element account of the beam.

pub mod constant;
pub mod error;
pub mod maths;
pub mod optics;
pub mod output;
pub mod plot;
pub mod propagation;
pub mod report;
pub mod settings;

mod integration_tests;

pub use error::{OpticsError, Result};
pub use optics::{OpticalElement, OpticsTable};
pub use propagation::{evaluate, Evaluation};
pub use settings::BeamSettings;
