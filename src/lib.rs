//! Annual program adjustment overlay engine.
//!
//! Records per-grouping additions, removals and block changes of teaching
//! units on top of a read-only catalog, and merges them into adjusted views.

pub mod application;
pub mod cli;
pub mod config;
pub mod domain;
pub mod exitcode;
pub mod infrastructure;
pub mod util;
