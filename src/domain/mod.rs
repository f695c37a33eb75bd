pub mod catalog;
pub mod entities;
pub mod error;
pub mod ports;
pub mod values;
