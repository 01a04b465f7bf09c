pub mod config;
pub mod detect;
pub mod generate;
pub mod install;
pub mod registry;
pub mod scaffold;
pub mod templates;
