//! Game state definitions that control the overall flow of the game.
//!
//! The simulation only runs in `InGame`. There is no menu in the headless
//! build, so `Title` hands over to `InGame` on its first frame.

use bevy::prelude::*;

/// Main game states - controls overall game flow.
#[derive(States, Debug, Clone, Copy, Eq, PartialEq, Hash, Default)]
pub enum GameState {
    /// Before the encounter starts
    #[default]
    Title,
    /// Enemies spawn and attack
    InGame,
    /// A Danger hit landed or the caution limit was reached
    GameOver,
}

/// Order of the fixed-step simulation within one tick.
///
/// The player moves first, then the enemies act against that position, then
/// the session reacts to whatever landed.
#[derive(SystemSet, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SimSet {
    Player,
    Enemies,
    Session,
}
