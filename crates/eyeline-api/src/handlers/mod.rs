//! Route handlers organized by domain.

pub mod health;
pub mod jobs;
pub mod legacy;
