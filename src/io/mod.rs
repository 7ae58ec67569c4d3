pub mod atomic;
pub mod config_io;
pub mod state;
pub mod vault_io;

pub use vault_io::{VaultError, discover_vault, load_vault};
