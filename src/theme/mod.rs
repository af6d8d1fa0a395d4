//! Theme layer: palette presets and the mutable theme state.

pub mod palette;
pub mod state;
