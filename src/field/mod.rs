// field/mod.rs
// Re-exports and module declarations for the particle field

pub mod field;
pub mod physics;
pub use field::*;

#[cfg(test)]
mod tests;
