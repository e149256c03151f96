//! Real-time meeting gateway: room membership, admission, and event fan-out.

pub mod coordinator;
pub mod events;
pub mod rooms;
pub mod server;
pub mod session;
