pub mod display;
pub mod runtime;
pub mod telemetry;
