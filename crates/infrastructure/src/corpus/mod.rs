pub mod fetcher;
pub mod source;

pub use fetcher::{parse_csv_column, CsvFetcher};
pub use source::CorpusDomainSource;
