//! Haze - keeps her distance. A delayed orb, a close cleave and a slowing
//! volley, in random order.

use bevy::prelude::*;
use rand::RngCore;

use super::{ArchetypeKind, Enemy, Fsm, TickContext, SPAWN_IDLE};
use crate::enemies::components::{Body, Facing};
use crate::enemies::data::HazeTuning;
use crate::enemies::projectile::{step_all, Projectile};
use crate::enemies::queue::{Advance, RotationPlan, RotationView, SkillKey, SkillQueue};
use crate::enemies::skills::{CastSnapshot, Outcome, Telegraph};
use crate::enemies::steering::{displace, steer_away, steer_toward};

/// A retreat step shorter than this means she is pinned.
const PINNED: f32 = 1e-4;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HazeSkill {
    Orb,
    Cleave,
    Volley,
}

impl SkillKey for HazeSkill {
    fn name(self) -> &'static str {
        match self {
            HazeSkill::Orb => "Orb",
            HazeSkill::Cleave => "Cleave",
            HazeSkill::Volley => "Volley",
        }
    }
}

#[derive(Clone, Copy, Debug)]
enum State {
    SpawnIdle,
    Move,
    /// Backing off until the orb has room.
    Retreat,
    Feint { skill: HazeSkill, duration: f32 },
    OrbCast(CastSnapshot),
    OrbTelegraph(CastSnapshot),
    CleaveCast(CastSnapshot),
    VolleyCast { snap: CastSnapshot, left: u32 },
    VolleyCooldown { left: u32 },
    PostWait(f32),
    Drain,
    Dead,
}

pub struct Haze {
    tuning: HazeTuning,
    meter: f32,
    body: Body,
    fsm: Fsm<State>,
    queue: SkillQueue<HazeSkill>,
    projectiles: Vec<Projectile>,
}

impl Haze {
    pub fn new(pos: Vec2, tuning: HazeTuning, meter: f32, rng: &mut dyn RngCore) -> Self {
        let plan = RotationPlan::shuffled(vec![HazeSkill::Orb, HazeSkill::Cleave, HazeSkill::Volley]);
        Self::with_queue(pos, tuning, meter, plan.build(rng))
    }

    pub fn with_queue(pos: Vec2, tuning: HazeTuning, meter: f32, queue: SkillQueue<HazeSkill>) -> Self {
        Self {
            tuning,
            meter,
            body: Body::new(pos),
            fsm: Fsm::new(State::SpawnIdle),
            queue,
            projectiles: Vec::new(),
        }
    }

    fn orb(&self, snap: CastSnapshot) -> Telegraph {
        let center = snap.ahead(self.tuning.orb_distance * self.meter);
        self.tuning.orb_strike.place("Orb", center, 0.0, self.meter)
    }

    fn cleave(&self, snap: CastSnapshot) -> Telegraph {
        self.tuning.cleave_strike.place("Cleave", snap.origin, snap.angle, self.meter)
    }

    fn post_wait(&self, skill: HazeSkill) -> f32 {
        match skill {
            HazeSkill::Orb => self.tuning.orb.post_wait,
            HazeSkill::Cleave => self.tuning.cleave.post_wait,
            HazeSkill::Volley => self.tuning.volley.post_wait,
        }
    }

    fn feint(&mut self, skill: HazeSkill, ctx: &mut TickContext) {
        let max = match skill {
            HazeSkill::Orb => self.tuning.orb.feint_max,
            HazeSkill::Cleave => self.tuning.cleave.feint_max,
            HazeSkill::Volley => self.tuning.volley.feint_max,
        };
        let duration = ctx.feint(max);
        self.fsm.set(State::Feint { skill, duration });
    }

    fn start(&mut self, skill: HazeSkill, ctx: &TickContext) {
        debug!("Haze starts {}", skill.name());
        self.body.face(ctx.player.center);
        let snap = ctx.aim_from(self.body.pos);
        let state = match skill {
            HazeSkill::Orb => State::OrbCast(snap),
            HazeSkill::Cleave => {
                // step back first, the cone keeps the first aim
                let back = displace(
                    &mut self.body,
                    -snap.direction(),
                    self.tuning.cleave_backstep * self.meter,
                    &ctx.arena,
                );
                trace!("Haze stepped back {back:.1}px");
                State::CleaveCast(CastSnapshot {
                    origin: self.body.pos,
                    angle: snap.angle,
                })
            }
            HazeSkill::Volley => State::VolleyCast {
                snap,
                left: self.tuning.volley_shots,
            },
        };
        self.fsm.set(state);
    }

    fn finish(&mut self) {
        if self.queue.is_final() && !self.projectiles.is_empty() {
            self.fsm.set(State::Drain);
            return;
        }
        match self.queue.advance() {
            Advance::Continue => self.fsm.set(State::Move),
            Advance::Exhausted => self.fsm.set(State::Dead),
        }
    }
}

impl Enemy for Haze {
    fn kind(&self) -> ArchetypeKind {
        ArchetypeKind::Haze
    }

    fn body(&self) -> &Body {
        &self.body
    }

    fn update(&mut self, dt: f32, ctx: &mut TickContext) -> Vec<Outcome> {
        let mut outcomes = Vec::new();
        if self.is_dead() {
            return outcomes;
        }
        self.fsm.tick(dt);
        step_all(&mut self.projectiles, dt, ctx.player, self.body.pos, &mut outcomes);
        let speed = self.tuning.speed * self.meter;

        let state = self.fsm.state;
        match state {
            State::SpawnIdle => {
                if self.fsm.elapsed(SPAWN_IDLE) {
                    self.fsm.set(State::Move);
                }
            }
            State::Move => {
                steer_toward(&mut self.body, ctx.player.center, speed, dt, &ctx.arena);
                let t = &self.tuning;
                match self.queue.peek_next() {
                    Some(HazeSkill::Orb) if ctx.within(self.body.pos, t.orb.trigger) => {
                        self.fsm.set(State::Retreat);
                    }
                    Some(HazeSkill::Cleave) if t.cleave.in_range(self.body.pos, ctx.player.center, self.meter) => {
                        self.feint(HazeSkill::Cleave, ctx);
                    }
                    Some(HazeSkill::Volley) if t.volley.in_range(self.body.pos, ctx.player.center, self.meter) => {
                        self.start(HazeSkill::Volley, ctx);
                    }
                    _ => {}
                }
            }
            State::Retreat => {
                let before = self.body.pos;
                steer_away(&mut self.body, ctx.player.center, speed, dt, &ctx.arena);
                let pinned = before.distance(self.body.pos) <= PINNED;
                if pinned || !ctx.within(self.body.pos, self.tuning.orb.trigger) {
                    if pinned {
                        debug!("Haze is pinned, casting Orb from here");
                    }
                    self.feint(HazeSkill::Orb, ctx);
                }
            }
            State::Feint { skill, duration } => {
                steer_toward(&mut self.body, ctx.player.center, speed, dt, &ctx.arena);
                if self.fsm.elapsed(duration) {
                    self.start(skill, ctx);
                }
            }
            State::OrbCast(snap) => {
                if self.fsm.elapsed(self.tuning.orb.cast) {
                    self.fsm.set(State::OrbTelegraph(snap));
                }
            }
            State::OrbTelegraph(snap) => {
                if self.fsm.elapsed(self.tuning.orb_telegraph) {
                    outcomes.extend(self.orb(snap).resolve(ctx.player));
                    self.fsm.set(State::PostWait(self.post_wait(HazeSkill::Orb)));
                }
            }
            State::CleaveCast(snap) => {
                if self.fsm.elapsed(self.tuning.cleave.cast) {
                    outcomes.extend(self.cleave(snap).resolve(ctx.player));
                    self.fsm.set(State::PostWait(self.post_wait(HazeSkill::Cleave)));
                }
            }
            State::VolleyCast { snap, left } => {
                if self.fsm.elapsed(self.tuning.volley.cast) {
                    let t = &self.tuning;
                    let shot = t
                        .volley_shot
                        .fire("Volley", snap.origin, snap.angle, self.meter)
                        .with_slow(t.volley_slow_factor, t.volley_slow_seconds);
                    self.projectiles.push(shot);
                    self.body.facing = Facing::along(snap.angle);
                    self.fsm.set(State::VolleyCooldown { left: left.saturating_sub(1) });
                }
            }
            State::VolleyCooldown { left } => {
                if self.fsm.elapsed(self.tuning.volley_cooldown) {
                    if left > 0 {
                        // every shot is aimed anew
                        self.body.face(ctx.player.center);
                        let snap = ctx.aim_from(self.body.pos);
                        self.fsm.set(State::VolleyCast { snap, left });
                    } else {
                        self.fsm.set(State::PostWait(self.post_wait(HazeSkill::Volley)));
                    }
                }
            }
            State::PostWait(duration) => {
                if self.fsm.elapsed(duration) {
                    self.finish();
                }
            }
            State::Drain => {
                if self.projectiles.is_empty() {
                    self.finish();
                }
            }
            State::Dead => {}
        }
        outcomes
    }

    fn is_dead(&self) -> bool {
        matches!(self.fsm.state, State::Dead)
    }

    fn state_name(&self) -> &'static str {
        match self.fsm.state {
            State::SpawnIdle => "SpawnIdle",
            State::Move => "Move",
            State::Retreat => "Retreat",
            State::Feint { .. } => "Feint",
            State::OrbCast(_) => "OrbCast",
            State::OrbTelegraph(_) => "OrbTelegraph",
            State::CleaveCast(_) => "CleaveCast",
            State::VolleyCast { .. } => "VolleyCast",
            State::VolleyCooldown { .. } => "VolleyCooldown",
            State::PostWait(_) => "PostWait",
            State::Drain => "Drain",
            State::Dead => "Dead",
        }
    }

    fn telegraphs(&self) -> Vec<Telegraph> {
        let mut shapes: Vec<Telegraph> = self.projectiles.iter().map(Projectile::telegraph).collect();
        match self.fsm.state {
            State::OrbCast(snap) | State::OrbTelegraph(snap) => shapes.push(self.orb(snap)),
            State::CleaveCast(snap) => shapes.push(self.cleave(snap)),
            State::VolleyCast { snap, .. } => {
                shapes.push(self.tuning.volley_shot.lane("Volley", snap.origin, snap.angle, self.meter));
            }
            _ => {}
        }
        shapes
    }

    fn rotation(&self) -> RotationView {
        self.queue.view()
    }
}

#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::super::harness::{self, ctx, DT, METER};
    use super::*;
    use crate::enemies::skills::{Severity, SkillTiming};
    use crate::geometry::Circle;

    fn no_feint_orb() -> HazeTuning {
        let base = HazeTuning::default();
        HazeTuning {
            orb: SkillTiming {
                feint_max: 0.0,
                ..base.orb
            },
            ..base
        }
    }

    #[test]
    fn finishes_every_order() {
        let mut orders = std::collections::HashSet::new();
        for seed in 0..40 {
            let mut rng = StdRng::seed_from_u64(seed);
            let mut haze = Haze::new(Vec2::new(40.0, 500.0), HazeTuning::default(), METER, &mut rng);
            let run = harness::run_to_completion(&mut haze, seed, harness::wandering);
            assert_eq!(run.rotation.spent.len(), 3);
            assert!(haze.projectiles.is_empty());
            orders.insert(run.rotation.spent);
        }
        assert!(orders.len() >= 4, "{orders:?}");
    }

    #[test]
    fn volley_hits_slow_a_standing_player() {
        let tuning = HazeTuning {
            speed: 0.0,
            ..Default::default()
        };
        let origin = Vec2::new(100.0, 270.0);
        let mut haze = Haze::with_queue(origin, tuning, METER, SkillQueue::new(vec![HazeSkill::Volley]));
        let run = harness::run_to_completion(
            &mut haze,
            1,
            harness::standing(origin + Vec2::new(8.0 * METER, 0.0)),
        );
        let hits = run.outcomes.iter().filter(|o| o.is_caution()).count();
        let slows = run
            .outcomes
            .iter()
            .filter(|o| matches!(o, Outcome::Slow { factor, .. } if *factor == 0.7))
            .count();
        assert_eq!((hits, slows), (4, 4));
    }

    #[test]
    fn backs_off_before_the_orb() {
        let origin = Vec2::new(400.0, 270.0);
        let mut haze = Haze::with_queue(origin, no_feint_orb(), METER, SkillQueue::new(vec![HazeSkill::Orb]));
        let player = origin + Vec2::new(3.0 * METER, 0.0);
        let mut retreated = false;
        let mut rng = StdRng::seed_from_u64(3);
        let mut outcomes = Vec::new();
        for _ in 0..1200 {
            let mut c = ctx(Circle::new(player, 18.0), &mut rng);
            outcomes.extend(haze.update(DT, &mut c));
            retreated |= haze.state_name() == "Retreat";
            if haze.state_name() == "OrbCast" {
                assert!(haze.body().distance_to(player) >= 7.0 * METER - 3.0);
            }
            if haze.is_dead() {
                break;
            }
        }
        assert!(retreated);
        assert_eq!(outcomes, vec![Outcome::hit(Severity::Caution, "Orb")]);
    }

    #[test]
    fn pinned_against_a_wall_she_casts_anyway() {
        let origin = Vec2::new(0.0, 270.0);
        let mut haze = Haze::with_queue(origin, no_feint_orb(), METER, SkillQueue::new(vec![HazeSkill::Orb]));
        haze.fsm.set(State::Move);
        let mut rng = StdRng::seed_from_u64(3);
        let player = Circle::new(Vec2::new(2.0 * METER, 270.0), 18.0);
        let mut cast = false;
        for _ in 0..240 {
            let mut c = ctx(player, &mut rng);
            haze.update(DT, &mut c);
            cast |= haze.state_name() == "OrbCast";
            if haze.is_dead() {
                break;
            }
        }
        assert!(cast);
        assert!(haze.body().pos.x < 2.0 * METER);
    }
}
