pub mod connection;
pub mod memory;
pub mod post_repository;
pub mod user_repository;

pub use connection::Database;
pub use memory::{InMemoryPostRepository, InMemoryUserRepository};
pub use post_repository::PostgresPostRepository;
pub use user_repository::PostgresUserRepository;
