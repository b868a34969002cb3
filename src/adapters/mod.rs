pub mod api_server;
pub mod memory;
pub mod postgres;

pub use api_server::{shutdown_signal, start_api_server};
pub use memory::InMemoryStore;
pub use postgres::PostgresStore;
