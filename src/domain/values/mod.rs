pub mod confidence;
pub mod outcome;
pub mod portfolio;
pub mod sector;
pub mod sizing;
pub mod topic;
