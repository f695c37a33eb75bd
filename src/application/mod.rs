pub mod backfill;
pub mod correlation;
pub mod hedge;
pub mod llm_json;
pub mod matching;
pub mod quote;
pub mod related_markets;
pub mod stats;
