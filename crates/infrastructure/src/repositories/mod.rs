pub mod domain_repository;

pub use domain_repository::SqliteDomainRepository;
