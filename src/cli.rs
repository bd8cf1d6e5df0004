use clap::{Parser, Subcommand};

use crate::models::{CarSearch, NewCar, RecordId, ValidationError};
use crate::tui::Screen;

#[derive(Parser)]
#[command(name = "carbook")]
#[command(about = "Decode VINs and manage cars and their owners in a Supabase database")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Decode a VIN with the NHTSA vPIC service
    Decode {
        /// 17-character vehicle identification number
        vin: String,
    },

    /// List every owner in the database
    Owners,

    /// Add a car owned by an existing owner
    Add {
        /// Model year
        #[arg(long)]
        year: String,

        #[arg(long)]
        make: String,

        #[arg(long)]
        model: String,

        /// 17-character vehicle identification number
        #[arg(long)]
        vin: String,

        /// Owner id as listed by `carbook owners`
        #[arg(long)]
        owner: String,
    },

    /// Find cars with their owners; omitted filters match everything
    Find {
        /// Case-insensitive part of the make
        #[arg(long)]
        make: Option<String>,

        /// Case-insensitive part of the model
        #[arg(long)]
        model: Option<String>,

        /// Exact model year
        #[arg(long)]
        year: Option<String>,
    },

    /// Launch the terminal UI
    Tui {
        /// Screen to open instead of the main menu
        #[arg(short, long, value_enum, default_value = "main-menu")]
        screen: Screen,
    },
}

impl Commands {
    /// Validated insert payload for `add`, with the VIN uppercased like the form does
    pub fn new_car(
        year: &str,
        make: &str,
        model: &str,
        vin: &str,
        owner: &str,
    ) -> Result<NewCar, ValidationError> {
        let owner = (!owner.is_empty()).then(|| RecordId::parse(owner));
        NewCar::from_form(year, make, model, &vin.to_uppercase(), owner.as_ref())
    }

    /// Search filters for `find`
    pub fn car_search(
        make: Option<&str>,
        model: Option<&str>,
        year: Option<&str>,
    ) -> Result<CarSearch, ValidationError> {
        CarSearch::from_filters(
            make.unwrap_or(""),
            model.unwrap_or(""),
            year.unwrap_or(""),
        )
    }
}
