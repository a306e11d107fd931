pub mod codec;
pub mod config;
pub mod display;
pub mod error;
pub mod gateway;
pub mod pipeline;
