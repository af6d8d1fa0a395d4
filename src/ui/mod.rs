//! UI layer: App orchestrator, AppWindow trait, visuals, tree table, and dialogs.

pub mod app;
pub mod tree_view;
pub mod visuals;
pub mod window;
pub mod windows;
