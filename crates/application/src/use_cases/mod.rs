pub mod lookup;
pub mod noise_tick;
pub mod resolver_set;

pub use lookup::LookupDomainUseCase;
pub use noise_tick::{extra_query_types, query_families, GenerateNoiseUseCase, NoiseTickReport};
pub use resolver_set::BuildResolverSetUseCase;
