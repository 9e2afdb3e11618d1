pub mod data_fetcher;
pub mod engine;
pub mod error;
pub mod form;
pub mod insight;
pub mod metrics;
pub mod predictor;
pub mod radar;
pub mod repository;
pub mod snapshot;

#[cfg(test)]
pub mod test_support;

pub use data_fetcher::*;
pub use engine::*;
pub use error::*;
pub use form::*;
pub use metrics::*;
pub use predictor::*;
pub use radar::*;
pub use repository::*;
pub use snapshot::*;
