//! Core domain types and logic.

pub mod bar;
pub mod builder;
pub mod combine;
pub mod definition;
pub mod error;
pub mod evaluator;
pub mod indicator;
pub mod reference;
pub mod registry;
pub mod signal;
pub mod signal_rules;
pub mod validate;
