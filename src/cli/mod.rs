//! Storefront command line interface

pub mod commands;
pub mod config;
pub mod logging;
