pub mod deck;
pub mod requests;
pub mod settings;
