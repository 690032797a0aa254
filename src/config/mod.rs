mod server;

pub use server::{DEFAULT_DATABASE_URL, ServerConfig};
