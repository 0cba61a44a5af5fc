//! Run bookkeeping and the game-over policy.

use bevy::prelude::*;

/// Why a run ended.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RunEnd {
    /// A Danger hit ends the run on the spot.
    Danger { skill: &'static str },
    /// The caution limit was reached.
    Cautions { last_skill: &'static str },
}

/// State of the current run.
#[derive(Resource, Clone, Debug, Default, PartialEq)]
pub struct Session {
    /// Seconds survived so far
    pub survival: f32,
    pub cautions: u32,
    /// Cautions tolerated before the run ends. Zero means unlimited.
    pub caution_limit: u32,
    pub end: Option<RunEnd>,
}

impl Session {
    pub fn new(caution_limit: u32) -> Self {
        Self {
            caution_limit,
            ..Default::default()
        }
    }

    pub fn is_over(&self) -> bool {
        self.end.is_some()
    }

    pub fn danger_taken(&self) -> bool {
        matches!(self.end, Some(RunEnd::Danger { .. }))
    }

    /// Advance the survival clock. Frozen once the run is over.
    pub fn survive(&mut self, dt: f32) {
        if !self.is_over() {
            self.survival += dt;
        }
    }

    /// Returns `true` if this hit ended the run.
    pub fn record_danger(&mut self, skill: &'static str) -> bool {
        if self.is_over() {
            return false;
        }
        self.end = Some(RunEnd::Danger { skill });
        true
    }

    /// Returns `true` if this hit ended the run.
    pub fn record_caution(&mut self, skill: &'static str) -> bool {
        if self.is_over() {
            return false;
        }
        self.cautions += 1;
        if self.caution_limit > 0 && self.cautions >= self.caution_limit {
            self.end = Some(RunEnd::Cautions { last_skill: skill });
            return true;
        }
        false
    }
}
