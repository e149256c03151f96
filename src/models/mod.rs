pub mod meeting;
pub mod message;

pub use meeting::Meeting;
pub use message::ChatMessage;
