pub mod decoder;
pub mod monitor;
