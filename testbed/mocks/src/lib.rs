//! Test doubles for the Odoo timer client
//!
//! `MockOdooServer` binds a random local port and answers JSON-RPC calls on
//! `/jsonrpc` from an `OdooFixture`, recording every request body it sees.

pub mod fixtures;
pub mod handlers;
pub mod server;

pub use fixtures::OdooFixture;
pub use server::MockOdooServer;
