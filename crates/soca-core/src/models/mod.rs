pub mod chat;
pub mod chat_entry;
pub mod criteria;
pub mod record;
