//! Authoritative match state for a multiplayer card table.
//!
//! A [`GameInstance`](game::game::GameInstance) owns the zones, cards,
//! counters and arrows of every seated player, applies commands to them one
//! at a time and streams each command's outcome to the sessions watching the
//! match, redacted to what each of them may know.

pub mod game;
pub mod models;
pub mod server;
pub mod session;
pub mod utils;

pub use game::actions::CardTarget;
pub use game::events::{Audience, EventContext, EventSink, GameEvent, GameEventContainer, GameEventKind};
pub use game::game::GameInstance;
pub use game::game_state::GameState;
pub use game::player::PlayerId;
pub use models::settings::Settings;
pub use server::ServerInstance;
pub use session::client::{Session, SessionKind};
pub use utils::errors::{GameError, ResponseCode};
