//! Machine learning components.

pub mod section_classifier;
