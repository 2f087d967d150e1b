//! Test Module
//!
//! Cross-module test suite for Amanda.
//!
//! ## Test Categories
//! - `pipeline_tests`: resolution outcomes of `ChatbotCore` with mock collaborators
//! - `profile_tests`: fact projection from profile documents
//! - `matcher_tests`: category files, directories and the brain snapshot
//! - `integration_tests`: the bundled category files and profile end to end


pub mod profile_tests;
