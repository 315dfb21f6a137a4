pub mod chain;
pub mod generator;
pub mod trends;

pub use chain::ChainService;
pub use generator::GeneratorService;
pub use trends::TrendsService;
