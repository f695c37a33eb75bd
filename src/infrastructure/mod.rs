pub mod llm;
pub mod polymarket;
pub mod retry;
pub mod storage;
pub mod yahoo;
