pub mod entity_matcher;
pub mod text;
pub mod topic_classifier;

pub use entity_matcher::StockMatcher;
pub use topic_classifier::{TopicClassification, TopicClassifier};
