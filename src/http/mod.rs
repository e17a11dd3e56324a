//! HTTP request/response helpers.
//!
//! # Data Flow
//! ```text
//! Inbound request
//!     → remote.rs (client address, forwarding header trust)
//!     → body.rs (decode body by Content-Type)
//!     → handler
//!     → response.rs (JSON body or plain-text 500)
//!     → Send to client
//! ```
//!
//! Each helper stands alone; `server.rs` only wires them together.

pub mod body;
pub mod remote;
pub mod response;
pub mod server;

pub use body::{parse_body, BodyError, BodyParser, ContentTypeMatch};
pub use remote::{
    get_remote_addr, get_remote_addr_with, split_host_port, AddrError, ClientAddr,
    ForwardedPolicy, PeerAddr, X_FORWARDED_FOR,
};
pub use response::{jsonify, Jsonify};
pub use server::HttpServer;
