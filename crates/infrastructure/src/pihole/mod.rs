pub mod client;

pub use client::{count_real_queries, PiholeActivityMonitor};
