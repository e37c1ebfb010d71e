pub mod content;
pub mod error;
pub mod middleware;
pub mod notes;
pub mod protocol;
pub mod server;
pub mod storage;

pub use notes::NoteResolver;
pub use server::Server;
