//! Path parameter helpers.

pub mod path;

pub use path::parse_job_id;
