//! Meal Cart Library
//!
//! Saved recipes, weekly meal plans, and consolidated shopping lists.

pub mod build_info;
pub mod config;
pub mod db;
pub mod mcp;
pub mod models;
pub mod shopping;
pub mod tools;
