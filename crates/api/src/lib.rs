//! HTTP API: configuration, request gating and route wiring.

pub mod app;
pub mod config;
pub mod context;
pub mod credentials;
pub mod middleware;
