pub mod theme_controller;
