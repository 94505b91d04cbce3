//! `httpobs`: an HTTP response-header security scanner and grading engine.
//!
//! Data flows one way through four layers (spec §2): a user-supplied string
//! becomes a canonical [`site::Site`]; the [`retriever`] turns a `Site` into
//! a [`retriever::Requests`] snapshot; the [`battery`] reduces that snapshot
//! to a set of `TestResult`s; the [`grader`] reduces those to a
//! [`report::ScanReport`]. The retriever is the only layer that performs I/O.

pub mod api;
pub mod args;
pub mod battery;
pub mod cache;
pub mod config;
pub mod cookies;
pub mod csp;
pub mod error;
pub mod grader;
pub mod preload;
pub mod report;
pub mod retriever;
pub mod site;
