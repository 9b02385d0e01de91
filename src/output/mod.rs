//! Create output from a propagation, such as the beam width profile.

pub mod file;
