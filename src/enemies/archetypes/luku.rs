//! Luku - throws one boomerang and leaves once it is gone.

use bevy::prelude::*;

use super::{ArchetypeKind, Enemy, Fsm, TickContext, SPAWN_IDLE};
use crate::enemies::components::{Body, Facing};
use crate::enemies::data::LukuTuning;
use crate::enemies::projectile::{step_all, Projectile};
use crate::enemies::queue::{Advance, RotationView, SkillKey, SkillQueue};
use crate::enemies::skills::{CastSnapshot, Outcome, Telegraph};
use crate::enemies::steering::steer_toward;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LukuSkill {
    Boomerang,
}

impl SkillKey for LukuSkill {
    fn name(self) -> &'static str {
        "Boomerang"
    }
}

#[derive(Clone, Copy, Debug)]
enum State {
    SpawnIdle,
    Move,
    Feint(f32),
    Cast(CastSnapshot),
    /// Waits for the boomerang to hit or come back.
    Flight,
    PostWait,
    Dead,
}

pub struct Luku {
    tuning: LukuTuning,
    meter: f32,
    body: Body,
    fsm: Fsm<State>,
    queue: SkillQueue<LukuSkill>,
    projectiles: Vec<Projectile>,
}

impl Luku {
    pub fn new(pos: Vec2, tuning: LukuTuning, meter: f32) -> Self {
        Self {
            tuning,
            meter,
            body: Body::new(pos),
            fsm: Fsm::new(State::SpawnIdle),
            queue: SkillQueue::new(vec![LukuSkill::Boomerang]),
            projectiles: Vec::new(),
        }
    }
}

impl Enemy for Luku {
    fn kind(&self) -> ArchetypeKind {
        ArchetypeKind::Luku
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
                if self.tuning.timing.in_range(self.body.pos, ctx.player.center, self.meter) {
                    let feint = ctx.feint(self.tuning.timing.feint_max);
                    self.fsm.set(State::Feint(feint));
                }
            }
            State::Feint(duration) => {
                steer_toward(&mut self.body, ctx.player.center, speed, dt, &ctx.arena);
                if self.fsm.elapsed(duration) {
                    debug!("Luku starts Boomerang");
                    self.body.face(ctx.player.center);
                    self.fsm.set(State::Cast(ctx.aim_from(self.body.pos)));
                }
            }
            State::Cast(snap) => {
                if self.fsm.elapsed(self.tuning.timing.cast) {
                    let boomerang = self
                        .tuning
                        .shot
                        .fire("Boomerang", snap.origin, snap.angle, self.meter)
                        .returning(self.tuning.return_speed * self.meter);
                    self.projectiles.push(boomerang);
                    self.body.facing = Facing::along(snap.angle);
                    self.fsm.set(State::Flight);
                }
            }
            State::Flight => {
                step_all(&mut self.projectiles, dt, ctx.player, self.body.pos, &mut outcomes);
                if self.projectiles.is_empty() {
                    self.fsm.set(State::PostWait);
                }
            }
            State::PostWait => {
                if self.fsm.elapsed(self.tuning.timing.post_wait) {
                    match self.queue.advance() {
                        Advance::Continue => self.fsm.set(State::Move),
                        Advance::Exhausted => self.fsm.set(State::Dead),
                    }
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
            State::Feint(_) => "Feint",
            State::Cast(_) => "Cast",
            State::Flight => "Flight",
            State::PostWait => "PostWait",
            State::Dead => "Dead",
        }
    }

    fn telegraphs(&self) -> Vec<Telegraph> {
        let mut shapes: Vec<Telegraph> = self.projectiles.iter().map(Projectile::telegraph).collect();
        if let State::Cast(snap) = self.fsm.state {
            shapes.push(self.tuning.shot.lane("Boomerang", snap.origin, snap.angle, self.meter));
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
    use crate::enemies::projectile::Leg;
    use crate::enemies::skills::Severity;
    use crate::geometry::Circle;

    #[test]
    fn throws_once_and_leaves() {
        for seed in 0..20 {
            let mut luku = Luku::new(Vec2::new(40.0, 40.0), LukuTuning::default(), METER);
            let run = harness::run_to_completion(&mut luku, seed, harness::wandering);
            assert_eq!(run.rotation.spent, vec!["Boomerang"]);
            assert!(luku.projectiles.is_empty());
        }
    }

    #[test]
    fn boomerang_can_hit_on_the_way_back() {
        let tuning = LukuTuning {
            speed: 0.0,
            timing: crate::enemies::skills::SkillTiming {
                feint_max: 0.0,
                ..LukuTuning::default().timing
            },
            ..Default::default()
        };
        let origin = Vec2::new(200.0, 270.0);
        let mut luku = Luku::new(origin, tuning, METER);
        let mut rng = StdRng::seed_from_u64(1);
        let target = origin + Vec2::new(300.0, 0.0);
        let mut outcomes = Vec::new();
        let mut saw_return = false;
        for _ in 0..600 {
            // dodge the outbound leg, then step back into the lane
            let outbound = luku.projectiles.first().map(|p| p.leg()) == Some(Some(Leg::Outbound));
            let at = if outbound { target + Vec2::new(0.0, 120.0) } else { target };
            let mut c = ctx(Circle::new(at, 18.0), &mut rng);
            outcomes.extend(luku.update(DT, &mut c));
            saw_return |= luku.projectiles.first().map(|p| p.leg()) == Some(Some(Leg::Return));
            if luku.is_dead() {
                break;
            }
        }
        assert!(saw_return);
        assert_eq!(outcomes, vec![Outcome::hit(Severity::Danger, "Boomerang")]);
    }
}
