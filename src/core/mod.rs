pub mod config;
pub mod constants;
pub mod controller;
pub mod geo;
pub mod range;
pub mod scheduler;
pub mod status;
pub mod transform;
pub mod viewport;
pub mod zoom;
