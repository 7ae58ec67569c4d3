pub mod config;
pub mod layout;
pub mod note;
pub mod task;
pub mod time;
pub mod vault;

pub use config::*;
pub use layout::*;
pub use note::*;
pub use task::*;
pub use time::*;
pub use vault::*;
