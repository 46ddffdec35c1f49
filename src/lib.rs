pub mod batch;
pub mod commands;
pub mod config;
pub mod consts;
pub mod database;
pub mod dataverse;
pub mod error;
pub mod logging;
pub mod params;
pub mod targets;
