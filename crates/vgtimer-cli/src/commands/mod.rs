pub mod bindings;
pub mod config;
pub mod timer;
