//! lingograde-core: scoring core for short-answer language tests.
//!
//! This crate holds the text normalizer, the edit-distance engine, one pure
//! grader per question type, the writing rubric, and the session
//! aggregator that turns per-question scores into a scaled score and band.

pub mod aggregate;
pub mod config;
pub mod dispatch;
pub mod distance;
pub mod engine;
pub mod error;
pub mod graders;
pub mod model;
pub mod normalize;
pub mod parser;
pub mod report;
pub mod writing;
