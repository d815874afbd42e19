//! HTTP API: routing, request/response mapping, and store wiring.

pub mod app;
