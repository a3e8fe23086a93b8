//! Line-oriented admin protocol client for gearmand servers.
//!
//! gearmand exposes a plain-text admin dialect on its job port: the client
//! writes a single command word terminated by a newline and the server
//! answers with zero or more record lines followed by a line consisting of
//! exactly `.`. [`AdminConnection`] reproduces that framing and nothing
//! else; turning the raw record text into structured counts is the job of
//! the `gearmon-report` crate.

pub mod connection;
pub mod error;

pub use connection::AdminConnection;
pub use error::NetError;
