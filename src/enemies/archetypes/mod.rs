//! Enemy archetypes - one state machine per enemy kind.
//!
//! Every archetype follows the same outline:
//! `SpawnIdle -> Move <-> Feint -> cast phases -> PostWait -> Move | Dead`,
//! with its own phases in between. The rotation only advances when a skill
//! has fully resolved, and an exhausted rotation is the only way to die.

mod abigail;
mod darko;
mod debi_marlene;
mod hisui;
mod isaac;
mod justyna;
mod katja;
mod luku;
mod haze;
mod vanya;

use std::fmt;
use std::str::FromStr;

use bevy::math::Vec2;
use rand::RngCore;

pub use abigail::Abigail;
pub use darko::Darko;
pub use debi_marlene::{DebiMarlene, Form};
pub use haze::Haze;
pub use hisui::Hisui;
pub use isaac::Isaac;
pub use justyna::Justyna;
pub use katja::Katja;
pub use luku::Luku;
pub use vanya::Vanya;

use super::components::Body;
use super::data::TuningRegistry;
use super::queue::RotationView;
use super::skills::{sample_feint, CastSnapshot, Outcome, Strike, Telegraph};
use crate::geometry::Circle;
use crate::world::{Arena, ConfigError};

/// Seconds an enemy stands still after spawning.
pub const SPAWN_IDLE: f32 = 1.0;

/// Every enemy kind the director can spawn.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ArchetypeKind {
    Hisui,
    Abigail,
    Luku,
    Katja,
    Darko,
    DebiMarlene,
    Justyna,
    Haze,
    Vanya,
    Isaac,
}

impl ArchetypeKind {
    pub const ALL: [ArchetypeKind; 10] = [
        ArchetypeKind::Hisui,
        ArchetypeKind::Abigail,
        ArchetypeKind::Luku,
        ArchetypeKind::Katja,
        ArchetypeKind::Darko,
        ArchetypeKind::DebiMarlene,
        ArchetypeKind::Justyna,
        ArchetypeKind::Haze,
        ArchetypeKind::Vanya,
        ArchetypeKind::Isaac,
    ];

    pub fn name(self) -> &'static str {
        match self {
            ArchetypeKind::Hisui => "Hisui",
            ArchetypeKind::Abigail => "Abigail",
            ArchetypeKind::Luku => "Luku",
            ArchetypeKind::Katja => "Katja",
            ArchetypeKind::Darko => "Darko",
            ArchetypeKind::DebiMarlene => "DebiMarlene",
            ArchetypeKind::Justyna => "Justyna",
            ArchetypeKind::Haze => "Haze",
            ArchetypeKind::Vanya => "Vanya",
            ArchetypeKind::Isaac => "Isaac",
        }
    }

    /// File name (without extension) of the tuning override.
    pub fn file_stem(self) -> &'static str {
        match self {
            ArchetypeKind::DebiMarlene => "debi_marlene",
            ArchetypeKind::Hisui => "hisui",
            ArchetypeKind::Abigail => "abigail",
            ArchetypeKind::Luku => "luku",
            ArchetypeKind::Katja => "katja",
            ArchetypeKind::Darko => "darko",
            ArchetypeKind::Justyna => "justyna",
            ArchetypeKind::Haze => "haze",
            ArchetypeKind::Vanya => "vanya",
            ArchetypeKind::Isaac => "isaac",
        }
    }

    /// Build a fresh enemy of this kind standing at `pos`. The rotation is
    /// drawn from `rng` here, once.
    pub fn build(
        self,
        pos: Vec2,
        tunings: &TuningRegistry,
        meter: f32,
        rng: &mut dyn RngCore,
    ) -> Box<dyn Enemy> {
        match self {
            ArchetypeKind::Hisui => Box::new(Hisui::new(pos, tunings.hisui.clone(), meter, rng)),
            ArchetypeKind::Abigail => Box::new(Abigail::new(pos, tunings.abigail.clone(), meter)),
            ArchetypeKind::Luku => Box::new(Luku::new(pos, tunings.luku.clone(), meter)),
            ArchetypeKind::Katja => Box::new(Katja::new(pos, tunings.katja.clone(), meter, rng)),
            ArchetypeKind::Darko => Box::new(Darko::new(pos, tunings.darko.clone(), meter)),
            ArchetypeKind::DebiMarlene => Box::new(DebiMarlene::new(
                pos,
                tunings.debi_marlene.clone(),
                meter,
                rng,
            )),
            ArchetypeKind::Justyna => Box::new(Justyna::new(pos, tunings.justyna.clone(), meter)),
            ArchetypeKind::Haze => Box::new(Haze::new(pos, tunings.haze.clone(), meter, rng)),
            ArchetypeKind::Vanya => Box::new(Vanya::new(pos, tunings.vanya.clone(), meter, rng)),
            ArchetypeKind::Isaac => Box::new(Isaac::new(pos, tunings.isaac.clone(), meter)),
        }
    }
}

impl fmt::Display for ArchetypeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ArchetypeKind {
    type Err = ConfigError;

    /// Case-insensitive; accepts both `DebiMarlene` and `debi_marlene`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        ArchetypeKind::ALL
            .into_iter()
            .find(|k| k.name().eq_ignore_ascii_case(wanted) || k.file_stem().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| ConfigError::UnknownArchetype(s.to_string()))
    }
}

/// Everything an enemy sees during one tick.
pub struct TickContext<'a> {
    pub player: Circle,
    pub arena: Arena,
    /// Pixels per meter.
    pub meter: f32,
    pub rng: &'a mut dyn RngCore,
}

impl<'a> TickContext<'a> {
    pub fn new(player: Circle, arena: Arena, meter: f32, rng: &'a mut dyn RngCore) -> Self {
        Self {
            player,
            arena,
            meter,
            rng,
        }
    }

    /// Meters to pixels.
    pub fn px(&self, meters: f32) -> f32 {
        meters * self.meter
    }

    /// Snapshot aimed from `origin` at the player.
    pub fn aim_from(&self, origin: Vec2) -> CastSnapshot {
        CastSnapshot::aim(origin, self.player.center)
    }

    pub fn feint(&mut self, max: f32) -> f32 {
        sample_feint(self.rng, max)
    }

    /// Whether the player's center lies inside `strike` placed at `origin`
    /// and aimed at the player.
    pub fn in_footprint(&self, strike: &Strike, origin: Vec2) -> bool {
        let snap = self.aim_from(origin);
        strike
            .shape
            .place(origin, snap.angle, self.meter)
            .hits(Circle::new(self.player.center, 0.0))
    }

    /// Like `in_footprint`, but any overlap with the player's circle counts.
    pub fn touches_footprint(&self, strike: &Strike, origin: Vec2) -> bool {
        let snap = self.aim_from(origin);
        strike.shape.place(origin, snap.angle, self.meter).hits(self.player)
    }

    /// Whether the player is within `meters` of `from`.
    pub fn within(&self, from: Vec2, meters: f32) -> bool {
        let reach = self.px(meters);
        from.distance_squared(self.player.center) <= reach * reach
    }
}

/// The interface the director drives.
pub trait Enemy: Send + Sync {
    fn kind(&self) -> ArchetypeKind;

    fn body(&self) -> &Body;

    /// Advance the state machine by `dt` seconds and return every hit that
    /// resolved during the tick.
    fn update(&mut self, dt: f32, ctx: &mut TickContext) -> Vec<Outcome>;

    fn is_dead(&self) -> bool;

    /// Name of the current state.
    fn state_name(&self) -> &'static str;

    /// Shapes currently on screen: telegraphs, live strikes, projectiles.
    fn telegraphs(&self) -> Vec<Telegraph>;

    fn rotation(&self) -> RotationView;
}

/// A state plus the seconds spent in it.
#[derive(Clone, Copy, Debug)]
pub(crate) struct Fsm<S> {
    pub state: S,
    pub clock: f32,
}

impl<S: Copy> Fsm<S> {
    pub fn new(state: S) -> Self {
        Self { state, clock: 0.0 }
    }

    /// Enter `state` with a fresh clock.
    pub fn set(&mut self, state: S) {
        self.state = state;
        self.clock = 0.0;
    }

    pub fn tick(&mut self, dt: f32) {
        self.clock += dt;
    }

    pub fn elapsed(&self, seconds: f32) -> bool {
        self.clock >= seconds
    }
}

#[cfg(test)]
pub(crate) mod harness {
    //! Drive a single enemy to completion against a scripted player.

    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;

    pub const DT: f32 = 1.0 / 120.0;
    pub const METER: f32 = 55.0;

    pub struct Run {
        pub outcomes: Vec<Outcome>,
        pub ticks: usize,
        pub rotation: RotationView,
    }

    /// Tick until dead. Panics if the enemy dies before its rotation is
    /// empty, or never dies.
    pub fn run_to_completion(
        enemy: &mut dyn Enemy,
        seed: u64,
        mut player: impl FnMut(usize) -> Circle,
    ) -> Run {
        let mut rng = StdRng::seed_from_u64(seed);
        let arena = Arena::default();
        let mut outcomes = Vec::new();
        for tick in 0..120 * 120 {
            let mut ctx = TickContext::new(player(tick), arena, METER, &mut rng);
            outcomes.extend(enemy.update(DT, &mut ctx));
            let rotation = enemy.rotation();
            if enemy.is_dead() {
                assert!(rotation.pending.is_empty(), "died with {:?} pending", rotation.pending);
                return Run {
                    outcomes,
                    ticks: tick,
                    rotation,
                };
            }
            assert!(
                arena.contains(enemy.body().pos),
                "{} left the arena at {:?}",
                enemy.kind(),
                enemy.body().pos
            );
        }
        panic!(
            "{} never finished, stuck in {} with {:?}",
            enemy.kind(),
            enemy.state_name(),
            enemy.rotation()
        );
    }

    /// A player who drifts around the middle of the arena.
    pub fn wandering(tick: usize) -> Circle {
        let t = tick as f32 * DT;
        let center = Arena::default().center();
        Circle::new(center + Vec2::new((t * 0.7).cos() * 180.0, (t * 1.1).sin() * 120.0), 18.0)
    }

    pub fn standing(at: Vec2) -> impl FnMut(usize) -> Circle {
        move |_| Circle::new(at, 18.0)
    }

    pub fn ctx<'a>(player: Circle, rng: &'a mut dyn RngCore) -> TickContext<'a> {
        TickContext::new(player, Arena::default(), METER, rng)
    }
}
