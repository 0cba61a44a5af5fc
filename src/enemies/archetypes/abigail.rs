//! Abigail - a single cone swing, then she leaves.

use bevy::prelude::*;

use super::{ArchetypeKind, Enemy, Fsm, TickContext, SPAWN_IDLE};
use crate::enemies::components::Body;
use crate::enemies::data::AbigailTuning;
use crate::enemies::queue::{Advance, RotationPlan, RotationView, SkillKey, SkillQueue};
use crate::enemies::skills::{CastSnapshot, Outcome, Telegraph};
use crate::enemies::steering::steer_toward;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AbigailSkill {
    Cone,
}

impl SkillKey for AbigailSkill {
    fn name(self) -> &'static str {
        "Cone"
    }
}

#[derive(Clone, Copy, Debug)]
enum State {
    SpawnIdle,
    Move,
    Feint(f32),
    Cast(CastSnapshot),
    PostWait,
    Dead,
}

pub struct Abigail {
    tuning: AbigailTuning,
    meter: f32,
    body: Body,
    fsm: Fsm<State>,
    queue: SkillQueue<AbigailSkill>,
}

impl Abigail {
    pub fn new(pos: Vec2, tuning: AbigailTuning, meter: f32) -> Self {
        Self {
            tuning,
            meter,
            body: Body::new(pos),
            fsm: Fsm::new(State::SpawnIdle),
            queue: SkillQueue::new(vec![AbigailSkill::Cone]),
        }
    }

    fn cone(&self, snap: CastSnapshot) -> Telegraph {
        self.tuning.cone.place("Cone", snap.origin, snap.angle, self.meter)
    }
}

impl Enemy for Abigail {
    fn kind(&self) -> ArchetypeKind {
        ArchetypeKind::Abigail
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
                // the trigger is the cone itself, padded by the player radius
                if ctx.touches_footprint(&self.tuning.cone, self.body.pos) {
                    let feint = ctx.feint(self.tuning.timing.feint_max);
                    self.fsm.set(State::Feint(feint));
                }
            }
            State::Feint(duration) => {
                steer_toward(&mut self.body, ctx.player.center, speed, dt, &ctx.arena);
                if self.fsm.elapsed(duration) {
                    debug!("Abigail starts Cone");
                    self.body.face(ctx.player.center);
                    self.fsm.set(State::Cast(ctx.aim_from(self.body.pos)));
                }
            }
            State::Cast(snap) => {
                if self.fsm.elapsed(self.tuning.timing.cast) {
                    outcomes.extend(self.cone(snap).resolve(ctx.player));
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
            State::PostWait => "PostWait",
            State::Dead => "Dead",
        }
    }

    fn telegraphs(&self) -> Vec<Telegraph> {
        match self.fsm.state {
            State::Cast(snap) => vec![self.cone(snap)],
            _ => Vec::new(),
        }
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
    use crate::enemies::skills::Severity;
    use crate::geometry::Circle;

    #[test]
    fn swings_once_and_leaves() {
        for seed in 0..20 {
            let mut abigail = Abigail::new(Vec2::new(920.0, 300.0), AbigailTuning::default(), METER);
            let run = harness::run_to_completion(&mut abigail, seed, harness::wandering);
            assert_eq!(run.rotation.spent, vec!["Cone"]);
        }
    }

    #[test]
    fn cone_is_aimed_when_the_cast_starts() {
        let tuning = AbigailTuning {
            speed: 0.0,
            ..Default::default()
        };
        let origin = Vec2::new(300.0, 270.0);
        let mut abigail = Abigail::new(origin, tuning, METER);
        let mut rng = StdRng::seed_from_u64(9);
        let near = origin + Vec2::new(150.0, 0.0);
        let mut outcomes = Vec::new();
        let mut dodged = false;
        for _ in 0..300 {
            // sidestep behind her once the swing is committed
            let at = if dodged { origin - Vec2::new(150.0, 0.0) } else { near };
            let mut c = ctx(Circle::new(at, 18.0), &mut rng);
            outcomes.extend(abigail.update(DT, &mut c));
            dodged |= abigail.state_name() == "Cast";
            if abigail.is_dead() {
                break;
            }
        }
        assert!(abigail.is_dead());
        assert!(outcomes.is_empty());

        // standing still inside the cone gets hit
        let mut abigail = Abigail::new(origin, AbigailTuning { speed: 0.0, ..Default::default() }, METER);
        let mut outcomes = Vec::new();
        for _ in 0..300 {
            let mut c = ctx(Circle::new(near, 18.0), &mut rng);
            outcomes.extend(abigail.update(DT, &mut c));
        }
        assert_eq!(outcomes, vec![Outcome::hit(Severity::Danger, "Cone")]);
    }
}
