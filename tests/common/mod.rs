#![allow(dead_code)]

pub mod test_server;

pub use test_server::{TestServer, lead};
