//! Enemy lifecycle - keeps exactly one enemy in the arena.
//!
//! A retired enemy is replaced on a later tick, never inside the update pass
//! that saw it die.

use bevy::prelude::*;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::archetypes::{ArchetypeKind, Enemy, TickContext};
use super::data::TuningRegistry;
use super::queue::RotationView;
use super::skills::Outcome;
use crate::geometry::Circle;
use crate::world::{Arena, ConfigError, EncounterSettings, SPAWN_PADDING};

/// Stable handle of one spawned enemy.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EnemyId(pub u64);

/// An enemy that entered the arena this tick.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Spawned {
    pub id: EnemyId,
    pub kind: ArchetypeKind,
    pub pos: Vec2,
}

/// An enemy that finished its rotation this tick.
#[derive(Clone, Debug, PartialEq)]
pub struct Retired {
    pub id: EnemyId,
    pub kind: ArchetypeKind,
    pub rotation: RotationView,
}

/// Everything that happened during one director tick.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TickReport {
    pub outcomes: Vec<Outcome>,
    pub spawned: Vec<Spawned>,
    pub retired: Vec<Retired>,
}

struct Live {
    id: EnemyId,
    enemy: Box<dyn Enemy>,
}

/// Owns the live enemy, the roster and the random source.
pub struct EnemyDirector {
    meter: f32,
    arena: Arena,
    respawn_delay: f32,
    roster: Vec<ArchetypeKind>,
    tunings: TuningRegistry,
    rng: StdRng,
    live: Vec<Live>,
    /// Seconds until the scheduled replacement, if one is scheduled.
    replacement: Option<f32>,
    next_id: u64,
}

impl EnemyDirector {
    /// Validate `settings` and build an empty director. Nothing spawns until
    /// the first tick.
    pub fn new(
        settings: &EncounterSettings,
        tunings: TuningRegistry,
        rng: StdRng,
    ) -> Result<Self, ConfigError> {
        let roster = settings.validate()?;
        Ok(Self {
            meter: settings.meter,
            arena: settings.arena,
            respawn_delay: settings.respawn_delay,
            roster,
            tunings,
            rng,
            live: Vec::new(),
            replacement: None,
            next_id: 0,
        })
    }

    /// Like `new`, seeding from `settings.seed` or from entropy.
    pub fn from_settings(settings: &EncounterSettings, tunings: TuningRegistry) -> Result<Self, ConfigError> {
        let rng = match settings.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self::new(settings, tunings, rng)
    }

    pub fn arena(&self) -> Arena {
        self.arena
    }

    pub fn meter(&self) -> f32 {
        self.meter
    }

    pub fn roster(&self) -> &[ArchetypeKind] {
        &self.roster
    }

    pub fn live_count(&self) -> usize {
        self.live.len()
    }

    pub fn replacement_scheduled(&self) -> bool {
        self.replacement.is_some()
    }

    /// Live enemies with their ids.
    pub fn enemies(&self) -> impl Iterator<Item = (EnemyId, &dyn Enemy)> + '_ {
        self.live.iter().map(|l| (l.id, l.enemy.as_ref()))
    }

    pub fn get(&self, id: EnemyId) -> Option<&dyn Enemy> {
        self.live.iter().find(|l| l.id == id).map(|l| l.enemy.as_ref())
    }

    /// Spawn a uniformly random allowed archetype on a random padded edge.
    pub fn spawn_random_allowed(&mut self) -> Spawned {
        // the roster is never empty once validated
        let kind = self.roster[self.rng.gen_range(0..self.roster.len())];
        self.spawn(kind)
    }

    /// Spawn `kind` on a random padded edge.
    pub fn spawn(&mut self, kind: ArchetypeKind) -> Spawned {
        let pos = self.arena.random_edge_point(&mut self.rng, SPAWN_PADDING);
        let enemy = kind.build(pos, &self.tunings, self.meter, &mut self.rng);
        let id = EnemyId(self.next_id);
        self.next_id += 1;
        info!("Spawned {} #{} at ({:.0}, {:.0})", kind, id.0, pos.x, pos.y);
        debug!("{} rotation: {:?}", kind, enemy.rotation().pending);
        self.live.push(Live { id, enemy });
        Spawned { id, kind, pos }
    }

    /// One simulation step.
    ///
    /// `running` gates spawning only; live enemies always update.
    pub fn tick(&mut self, dt: f32, player: Circle, running: bool) -> TickReport {
        let mut report = TickReport::default();

        // a replacement scheduled on an earlier tick
        if let Some(remaining) = self.replacement.as_mut() {
            *remaining -= dt;
            if *remaining <= 0.0 && running {
                self.replacement = None;
                report.spawned.push(self.spawn_random_allowed());
            }
        }

        for live in self.live.iter_mut() {
            let mut ctx = TickContext::new(player, self.arena, self.meter, &mut self.rng);
            report.outcomes.extend(live.enemy.update(dt, &mut ctx));
        }

        let died = self.live.iter().any(|l| l.enemy.is_dead());
        if died && self.replacement.is_none() {
            self.replacement = Some(self.respawn_delay);
        }

        let (dead, alive): (Vec<Live>, Vec<Live>) =
            std::mem::take(&mut self.live).into_iter().partition(|l| l.enemy.is_dead());
        self.live = alive;
        for l in dead {
            let kind = l.enemy.kind();
            info!("{} #{} retired", kind, l.id.0);
            report.retired.push(Retired {
                id: l.id,
                kind,
                rotation: l.enemy.rotation(),
            });
        }

        if self.live.is_empty() && running && self.replacement.is_none() {
            warn!("No enemy alive and none scheduled, spawning now");
            report.spawned.push(self.spawn_random_allowed());
        }

        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::enemies::archetypes::harness::{wandering, DT};

    fn settings(allowed: &[&str]) -> EncounterSettings {
        EncounterSettings {
            allowed: allowed.iter().map(|s| s.to_string()).collect(),
            ..Default::default()
        }
    }

    fn director(settings: &EncounterSettings, seed: u64) -> EnemyDirector {
        EnemyDirector::new(settings, TuningRegistry::default(), StdRng::seed_from_u64(seed)).unwrap()
    }

    #[test]
    fn rejects_bad_configuration() {
        let bad = EncounterSettings {
            meter: -1.0,
            ..Default::default()
        };
        let err = EnemyDirector::new(&bad, TuningRegistry::default(), StdRng::seed_from_u64(0));
        assert_eq!(err.err(), Some(ConfigError::InvalidMeter(-1.0)));

        let err = EnemyDirector::new(&settings(&[]), TuningRegistry::default(), StdRng::seed_from_u64(0));
        assert_eq!(err.err(), Some(ConfigError::EmptyRoster));
    }

    #[test]
    fn first_tick_spawns_through_the_safety_net() {
        let mut director = director(&settings(&["luku"]), 1);
        assert_eq!(director.live_count(), 0);
        let report = director.tick(DT, wandering(0), true);
        assert_eq!(report.spawned.len(), 1);
        assert_eq!(report.spawned[0].kind, ArchetypeKind::Luku);
        assert_eq!(director.live_count(), 1);
    }

    #[test]
    fn nothing_spawns_while_stopped() {
        let mut director = director(&EncounterSettings::default(), 1);
        for tick in 0..100 {
            let report = director.tick(DT, wandering(tick), false);
            assert!(report.spawned.is_empty());
        }
        assert_eq!(director.live_count(), 0);
    }

    #[test]
    fn spawns_only_allowed_kinds_on_the_padded_edge() {
        let mut director = director(&settings(&["Hisui", "darko"]), 7);
        let arena = director.arena();
        for _ in 0..200 {
            let spawned = director.spawn_random_allowed();
            assert!(matches!(spawned.kind, ArchetypeKind::Hisui | ArchetypeKind::Darko));
            let p = spawned.pos;
            let on_edge = [p.x, arena.width - p.x, p.y, arena.height - p.y]
                .iter()
                .any(|d| (d - SPAWN_PADDING).abs() < 1e-3);
            assert!(on_edge, "{p:?}");
        }
    }

    #[test]
    fn exactly_one_enemy_and_replacements_come_a_tick_later() {
        let mut director = director(&EncounterSettings::default(), 11);
        let mut retirements = 0;
        let mut retired_last_tick = false;
        for tick in 0..120 * 180 {
            let report = director.tick(DT, wandering(tick), true);
            if retired_last_tick {
                assert_eq!(report.spawned.len(), 1, "replacement missing at tick {tick}");
            }
            if !report.retired.is_empty() {
                assert!(report.spawned.is_empty(), "spawned in the tick of a death");
                retirements += report.retired.len();
                for r in &report.retired {
                    assert!(r.rotation.pending.is_empty());
                }
            }
            retired_last_tick = !report.retired.is_empty();
            if retired_last_tick {
                assert_eq!(director.live_count(), 0);
            } else {
                assert_eq!(director.live_count(), 1, "tick {tick}");
            }
        }
        assert!(retirements >= 3, "only {retirements} enemies retired");
    }

    #[test]
    fn respawn_waits_for_the_delay() {
        let settings = EncounterSettings {
            respawn_delay: 0.5,
            allowed: vec!["Darko".into()],
            ..Default::default()
        };
        let mut director = director(&settings, 3);
        let mut died_at = None;
        for tick in 0..120 * 60 {
            let report = director.tick(DT, wandering(tick), true);
            if !report.retired.is_empty() {
                died_at = Some(tick);
            }
            if let (Some(died), false) = (died_at, report.spawned.is_empty()) {
                let waited = (tick - died) as f32 * DT;
                assert!((0.5 - DT * 0.5..0.5 + 3.0 * DT).contains(&waited), "waited {waited}");
                return;
            }
        }
        panic!("Darko never retired");
    }

    #[test]
    fn same_seed_same_encounter() {
        let kinds = |seed| {
            let mut director = director(&EncounterSettings::default(), seed);
            (0..20).map(|_| director.spawn_random_allowed().kind).collect::<Vec<_>>()
        };
        assert_eq!(kinds(5), kinds(5));
        assert_ne!(kinds(5), kinds(6));
    }
}
