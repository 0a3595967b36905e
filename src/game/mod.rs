pub mod actions;
pub mod arrow;
pub mod card;
pub mod counter;
pub mod events;
pub mod game;
pub mod game_state;
pub mod player;
pub mod transfer;
pub mod zone;
