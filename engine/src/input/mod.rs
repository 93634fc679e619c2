//! Input handling

pub mod state;

pub use state::InputState;
