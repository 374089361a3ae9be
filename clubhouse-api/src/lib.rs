//! # Clubhouse API Server Library
//!
//! ## Modules
//!
//! - `app`: application state, router and authentication middleware
//! - `config`: configuration from the environment
//! - `error`: transport errors rendered as failure envelopes
//! - `extract`: request extractors
//! - `routes`: route handlers

pub mod app;
pub mod config;
pub mod error;
pub mod extract;
pub mod routes;
