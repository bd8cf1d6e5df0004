//! Managed database access over the Supabase REST (PostgREST) interface
//!
//! The schema lives entirely on the service side; this module only reads
//! `owners`, inserts into `cars` and runs filtered `cars` selects joined to
//! their owner.

pub mod errors;
pub mod query;
pub mod client;

pub use errors::DatabaseError;
pub use query::{Filter, SelectQuery};
pub use client::SupabaseClient;

use async_trait::async_trait;

use crate::models::{CarRecord, CarSearch, NewCar, Owner};

/// Table holding owner records
pub const OWNERS_TABLE: &str = "owners";
/// Table holding car records
pub const CARS_TABLE: &str = "cars";

/// Storage operations the application needs from the database service
#[async_trait]
pub trait CarStore: Send + Sync {
    /// Every owner, unfiltered
    async fn list_owners(&self) -> Result<Vec<Owner>, DatabaseError>;

    /// Insert one car
    async fn insert_car(&self, car: &NewCar) -> Result<(), DatabaseError>;

    /// Cars matching the search, each joined with its owner
    async fn search_cars(&self, search: &CarSearch) -> Result<Vec<CarRecord>, DatabaseError>;
}
