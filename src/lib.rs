// src/lib.rs

//! chapter-radar Library
//!
//! Scrapes the latest-updates page of a manga site, caches the extracted
//! entries briefly and serves a filtered JSON feed.

pub mod error;
pub mod models;
pub mod server;
pub mod services;
pub mod utils;
