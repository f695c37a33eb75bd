pub mod correlation;
pub mod hedge;
pub mod prediction_event;
pub mod resolution;
pub mod stock_match;
