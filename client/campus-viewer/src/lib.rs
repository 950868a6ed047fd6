//! Explorable 3D campus with a drivable vehicle.
//!
//! This library exposes the built-in campus data for the headless
//! `drive-sim` binary.

pub mod campus;
