//! Runtime game state: live instances, per-player state, the game view.

pub mod instance;
pub mod player;
pub mod view;

pub use instance::CardInstance;
pub use player::{ManaPool, PlayerState, BOARD_LIMIT, HAND_LIMIT};
pub use view::GameView;
