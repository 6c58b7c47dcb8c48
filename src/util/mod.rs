pub mod slug;
pub mod text;
