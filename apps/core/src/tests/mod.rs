//! Test Module
//!
//! Cross-module test suites for the RealTalk core. Unit tests live next to
//! their code.
//!
//! ## Test Categories
//! - `risk_tests`: Analyzer properties, determinism and serialization
//! - `service_tests`: Rewrite and smooth request flow end to end
//! - `database_tests`: SQLite usage ledger

pub mod database_tests;
