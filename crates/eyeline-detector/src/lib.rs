//! # eyeline-detector
//!
//! Detector adapters for Eyeline. The production adapter runs an external
//! face/eye localisation program once per image and parses its JSON answer.

pub mod command;

pub use command::CommandDetector;
