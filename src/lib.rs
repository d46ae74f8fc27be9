//! seo-research: terminal and browser client for an SEO analysis backend.

pub mod cli;
pub mod client;
pub mod config;
pub mod context;
pub mod export;
pub mod history;
pub mod model;
pub mod render;
pub mod session;
pub mod validate;
pub mod web;
