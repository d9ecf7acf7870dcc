pub mod disabled;
pub mod openfda;

pub use disabled::DisabledEnrichment;
pub use openfda::OpenFdaClient;
