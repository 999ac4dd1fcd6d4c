//! API route handlers.

pub mod health;
pub mod portfolios;
pub mod risk;
