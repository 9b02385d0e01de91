//! Integration tests for a single lens focusing a collimated beam.
//!
//! A 5 mm waist beam starts at z = -1000 mm and meets a 250 mm lens at z = -250 mm,
//! so it comes to a focus close to z = 0.
