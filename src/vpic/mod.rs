//! NHTSA vPIC (vehicle product information catalog) module
//!
//! Decodes a VIN into descriptive vehicle attributes using the public
//! `DecodeVinValuesExtended` endpoint.

pub mod types;
pub mod errors;
pub mod client;

pub use types::*;
pub use errors::VinError;
pub use client::{VinLookup, VpicClient};
