//! # Study Planner Backend
//!
//! Weekly study plans for students, built around a deterministic schedule
//! skeleton.
//!
//! The student describes their fixed week (school, courses, enrichment
//! program, private commitments) and their preferred study tempo. The
//! skeleton builder fills the free time with alternating study and break
//! blocks; a text generator then assigns a subject to every study block and
//! the result is stored as the student's active plan.
//!
//! ## Features
//!
//! - **Skeleton Builder**: Pure, total weekly schedule construction
//! - **Plan Generation**: Subject labels and advice from a text generator
//! - **Tracking**: Study and reading records, books and sources
//! - **Coaching**: Invite codes, coach rosters and weekly progress summaries
//! - **HTTP API**: RESTful endpoints for the web frontend
//!
//! ## Architecture
//!
//! - [`api`]: Identifier types and re-exported domain types
//! - [`models`]: Profile, schedule and entity types
//! - [`scheduler`]: The skeleton builder
//! - [`generation`]: Prompt, reply parsing and the chat completion client
//! - [`auth`]: Bearer credential verification
//! - [`db`]: Repository traits and their backends
//! - [`services`]: Plan generation, rosters and progress summaries
//! - [`http`]: Axum-based HTTP server and request handlers

// Allow large error types - RepositoryError contains rich context for debugging
#![allow(clippy::result_large_err)]

pub mod api;
pub mod auth;
pub mod db;
pub mod generation;
pub mod models;
pub mod scheduler;
pub mod services;

#[cfg(feature = "http-server")]
pub mod http;
