pub mod api_utils;
pub mod config;
pub mod dom;
pub mod notice;
pub mod transport;
