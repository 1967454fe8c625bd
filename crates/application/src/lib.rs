//! dns-noise application layer: ports, pacing and the lookup use cases
pub mod ports;
pub mod services;
pub mod use_cases;
