pub mod reference_system;
