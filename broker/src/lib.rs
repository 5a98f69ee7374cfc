pub mod application;
pub mod settings;
