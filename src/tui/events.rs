//! Completion events delivered back to the UI loop

use crate::database::DatabaseError;
use crate::models::{CarRecord, Owner};
use crate::tui::app::Screen;
use crate::vpic::{DecodedVehicle, VinError};

/// Result of a background request, tagged with the requesting mount
#[derive(Debug)]
pub enum AppEvent {
    /// VIN decode finished
    VinDecoded {
        origin: Screen,
        generation: u64,
        result: Result<DecodedVehicle, VinError>,
    },
    /// Owner directory load finished
    OwnersLoaded {
        generation: u64,
        result: Result<Vec<Owner>, DatabaseError>,
    },
    /// Car insert finished
    CarInserted {
        generation: u64,
        result: Result<(), DatabaseError>,
    },
    /// Car search finished
    CarsFound {
        generation: u64,
        result: Result<Vec<CarRecord>, DatabaseError>,
    },
}
