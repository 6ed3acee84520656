//! Main module for regen library functionality

pub mod config;
pub mod error;
pub mod extraction;
pub mod logging;
pub mod merging;
pub mod model;
pub mod scanning;
pub mod tags;
