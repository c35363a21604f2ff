//! scout: a retrying three-stage recommendation pipeline for football scouting.
//!
//! Collects a player or coach brief from the operator, then runs
//! Retrieve (web-search grounded) → Score → Rank against the Gemini API.

pub mod config;
pub mod errors;
pub mod intake;
pub mod llm_client;
pub mod logging;
pub mod models;
pub mod pipeline;
pub mod report;
