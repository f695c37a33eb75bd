pub mod gamma;

pub use gamma::GammaClient;
