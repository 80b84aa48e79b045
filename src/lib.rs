//! rosterfit: NHL Shooting Hand Classifier Library
//!
//! Validates and cleans NHL roster data, splits it reproducibly, standardizes
//! height and weight, and fits a class-balanced logistic regression that
//! predicts whether a player shoots left.

pub mod cli;
pub mod pipeline;
pub mod report;
pub mod utils;
