pub mod api;
pub mod config;
pub mod db;
pub mod export;
pub mod grouping;
pub mod report;
pub mod security;
