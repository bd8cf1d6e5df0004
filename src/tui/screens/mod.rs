//! Screen modules for the carbook TUI

pub mod decoder;
pub mod main_menu;
pub mod manager;

pub use decoder::DecoderScreen;
pub use main_menu::MainMenuScreen;
pub use manager::ManagerScreen;
