#![forbid(unsafe_code)]

pub mod areas;
pub mod browse;
pub mod cli;
pub mod commands;
pub mod config;
pub mod controller;
pub mod detail;
pub mod finder;
pub mod formats;
pub mod lister;
pub mod logging;
pub mod render;
pub mod session;
pub mod storage;
pub mod store;
pub mod text;
