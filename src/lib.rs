//! HTTP API for video metadata records and their uploaded files.

pub mod config;
pub mod db;
pub mod error;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod storage;
pub mod system_info;
