pub mod llm;
pub mod market_source;
pub mod price_source;
pub mod resolution_store;
