pub mod identity;

pub use identity::PostgresCredentialStore;
