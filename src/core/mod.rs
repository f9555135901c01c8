//! Core application modules
//!
//! This module contains configuration, constants, logging, the provider
//! layer, the generation client and the tool pipeline.

pub mod config;
pub mod constants;
pub mod generation;
pub mod logging;
pub mod pipeline;
pub mod provider;
pub mod providers;
