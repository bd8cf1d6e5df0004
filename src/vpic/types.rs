//! vPIC response types

use serde::{Deserialize, Serialize};

/// `DecodeVinValuesExtended` response envelope
#[derive(Debug, Deserialize)]
pub struct DecodeResponse {
    /// Informational message from the service, logged when nothing decodes
    #[serde(rename = "Message", default)]
    pub message: Option<String>,
    /// Decoded records; only the first one is used
    #[serde(rename = "Results", default)]
    pub results: Vec<DecodedVehicle>,
}

/// Attributes decoded from a VIN.
///
/// Values are kept exactly as the service returns them. Absent or null
/// fields are `None`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DecodedVehicle {
    #[serde(rename = "ModelYear", default)]
    pub model_year: Option<String>,

    #[serde(rename = "Make", default)]
    pub make: Option<String>,

    #[serde(rename = "Model", default)]
    pub model: Option<String>,

    #[serde(rename = "Trim", default)]
    pub trim: Option<String>,

    #[serde(rename = "BodyClass", default)]
    pub body_class: Option<String>,

    #[serde(rename = "EngineCylinders", default)]
    pub engine_cylinders: Option<String>,

    #[serde(rename = "FuelTypePrimary", default)]
    pub fuel_type: Option<String>,

    #[serde(rename = "PlantCountry", default)]
    pub plant_country: Option<String>,
}

impl DecodedVehicle {
    /// Label/value pairs in display order
    pub fn attributes(&self) -> [(&'static str, Option<&str>); 8] {
        [
            ("Model Year", self.model_year.as_deref()),
            ("Make", self.make.as_deref()),
            ("Model", self.model.as_deref()),
            ("Trim", self.trim.as_deref()),
            ("Body Class", self.body_class.as_deref()),
            ("Engine Cylinders", self.engine_cylinders.as_deref()),
            ("Fuel Type", self.fuel_type.as_deref()),
            ("Plant Country", self.plant_country.as_deref()),
        ]
    }
}

/// vPIC API endpoints and constants
pub struct VpicApi;

impl VpicApi {
    /// Path segments of the extended decode endpoint, without the VIN
    pub const DECODE_PATH: [&'static str; 3] = ["api", "vehicles", "DecodeVinValuesExtended"];
    /// Response format query value
    pub const FORMAT: &'static str = "json";
}
