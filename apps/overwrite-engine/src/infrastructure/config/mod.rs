//! Dependency wiring.

mod container;

pub use container::{AlpacaContainer, Container, InMemoryContainer};
