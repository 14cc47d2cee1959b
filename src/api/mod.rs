pub mod auth;
pub mod error;
pub mod export;
pub mod extract;
pub mod items;
pub mod sales;
pub mod server;
pub mod users;
