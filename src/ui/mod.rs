pub mod app;
pub mod dialogs;
pub mod draw;
pub mod modal;
pub mod preview;
pub mod theme;
pub mod theme_loader;
