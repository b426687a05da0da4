//! Decision Labs: small, seeded simulations for teaching decision
//! theory and probability.
//!
//! - [`airplane`]: passenger show-up simulation (overbooking).
//! - [`convergence`]: law-of-large-numbers demonstrator.
//! - [`ranking`]: Wilson lower-bound scores for voted items.

pub mod airplane;
pub mod config;
pub mod convergence;
pub mod error;
pub mod ranking;
pub mod report;
pub mod rng;
pub mod tabulate;
pub mod types;
