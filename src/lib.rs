pub mod catalog;
pub mod config;
pub mod config_processors;
pub mod dataframeutils;
pub mod endpoints;
pub mod error;
pub mod holdout;
pub mod io;
pub mod logging;
pub mod metrics;
pub mod stopwatch;
pub mod userknn;
