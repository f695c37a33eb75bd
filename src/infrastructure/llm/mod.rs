pub mod groq;
pub mod noop;

pub use groq::GroqProvider;
pub use noop::NoopLlm;
