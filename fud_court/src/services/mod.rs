pub mod analysis;
pub mod collector;

pub use analysis::MarketAnalysisService;
pub use collector::MarketDataCollectorService;
