pub mod pe_adjust;
pub mod pe_compose;
pub mod pe_history;
pub mod pe_main;
pub mod pe_presets;
pub mod pe_remote;
pub mod pe_state;
mod pe_ui;

pub use pe_main::{PhotoEditor, StatusKind};
