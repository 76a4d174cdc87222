//! Test fixtures for travel-itinerary.
//!
//! Provides:
//! - Real Baguio City locations
//! - Recording mock matrix and route providers

#![allow(dead_code)]

pub mod baguio_locations;
pub mod mocks;

pub use baguio_locations::*;
pub use mocks::*;
