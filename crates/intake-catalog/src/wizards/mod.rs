//! Definiciones concretas.

pub mod diabetes_monitor;
pub mod diet_planner;
pub mod fever_flu;
pub mod sleep_companion;
