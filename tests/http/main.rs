//! HTTP integration tests.
//!
//! Starts the reference axum server and exercises it with `HttpGateway`
//! and raw reqwest calls.

#![cfg(feature = "server")]

mod gateway;
mod editor;
