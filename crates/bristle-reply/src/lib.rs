pub mod book;
pub mod config;
pub mod responder;

pub use book::ReplyBook;
pub use config::{CategoryConfig, ReplyConfig};
pub use responder::Responder;
