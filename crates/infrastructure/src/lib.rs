pub mod corpus;
pub mod database;
pub mod dns;
pub mod metrics;
pub mod pihole;
pub mod repositories;
pub mod system;
