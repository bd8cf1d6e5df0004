//! Carbook: record cars and their owners in a Supabase database and decode
//! VINs with the NHTSA vPIC service, from a terminal UI or the command line.

pub mod cli;
pub mod config;
pub mod database;
pub mod models;
pub mod tui;
pub mod vpic;
