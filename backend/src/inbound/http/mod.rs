//! HTTP inbound adapter exposing REST endpoints.

pub mod cors;
pub mod error;
pub mod health;
pub mod routes;
pub mod schemas;
pub mod state;
pub mod stock;
pub mod stock_form;

pub use error::ApiResult;
