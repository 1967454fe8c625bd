pub mod exchange;
pub mod forwarding;
pub mod transport;

pub use exchange::HickoryDnsExchange;
