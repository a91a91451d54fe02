//! JSON-RPC session client for an Odoo server
//!
//! `SessionClient` performs the login handshake and the task listing query;
//! `ClientHandle` runs one client on its own task so front ends can fire
//! requests from anywhere and get each outcome back exactly once. The wire
//! format lives in `rpc` and `tasks`, the HTTP plumbing behind the
//! `RpcTransport` trait.

pub mod handle;
pub mod rpc;
pub mod session;
pub mod tasks;
pub mod transport;

pub use handle::ClientHandle;
pub use otimer_core::{
    ClientSettings, ConnectionConfig, SessionError, SessionIdentity, WorkItem,
};
pub use session::SessionClient;
pub use transport::{HttpTransport, RpcTransport};

#[cfg(test)]
pub mod test_utils;
