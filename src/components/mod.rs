pub mod chat;
pub mod editor;
pub mod history;
pub mod layers;
pub mod properties;
