//! Automated market maker pricing

pub mod clmsr;

pub use clmsr::*;
