//! API Routes
//!
//! Route handlers organized by functionality.

pub mod health;
pub mod home;
pub mod series;
pub mod stations;
pub mod temperature;
