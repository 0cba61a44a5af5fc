//! Darko - telegraphs a landing spot, teleports onto it and strikes.

use bevy::prelude::*;

use super::{ArchetypeKind, Enemy, Fsm, TickContext, SPAWN_IDLE};
use crate::enemies::components::Body;
use crate::enemies::data::DarkoTuning;
use crate::enemies::queue::{Advance, RotationView, SkillKey, SkillQueue};
use crate::enemies::skills::{Outcome, Telegraph};
use crate::enemies::steering::steer_toward;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DarkoSkill {
    Blink,
}

impl SkillKey for DarkoSkill {
    fn name(self) -> &'static str {
        "Blink"
    }
}

#[derive(Clone, Copy, Debug)]
enum State {
    SpawnIdle,
    Move,
    Feint(f32),
    /// Landing spot fixed at cast start.
    Cast { destination: Vec2 },
    PostWait,
    Dead,
}

pub struct Darko {
    tuning: DarkoTuning,
    meter: f32,
    body: Body,
    fsm: Fsm<State>,
    queue: SkillQueue<DarkoSkill>,
}

impl Darko {
    pub fn new(pos: Vec2, tuning: DarkoTuning, meter: f32) -> Self {
        Self {
            tuning,
            meter,
            body: Body::new(pos),
            fsm: Fsm::new(State::SpawnIdle),
            queue: SkillQueue::new(vec![DarkoSkill::Blink]),
        }
    }

    fn strike(&self, destination: Vec2) -> Telegraph {
        self.tuning.strike.place("Blink", destination, 0.0, self.meter)
    }
}

impl Enemy for Darko {
    fn kind(&self) -> ArchetypeKind {
        ArchetypeKind::Darko
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
                    let snap = ctx.aim_from(self.body.pos);
                    let destination = ctx
                        .arena
                        .clamp_inset(snap.ahead(self.tuning.jump * self.meter), self.tuning.edge_margin_px);
                    debug!("Darko blinks to {:?}", destination);
                    self.body.face(ctx.player.center);
                    self.fsm.set(State::Cast { destination });
                }
            }
            State::Cast { destination } => {
                if self.fsm.elapsed(self.tuning.timing.cast) {
                    self.body.pos = destination;
                    outcomes.extend(self.strike(destination).resolve(ctx.player));
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
            State::Cast { .. } => "Cast",
            State::PostWait => "PostWait",
            State::Dead => "Dead",
        }
    }

    fn telegraphs(&self) -> Vec<Telegraph> {
        match self.fsm.state {
            State::Cast { destination } => vec![self.strike(destination)],
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
    use crate::geometry::{Circle, Shape};

    #[test]
    fn blinks_once_and_leaves() {
        for seed in 0..20 {
            let mut darko = Darko::new(Vec2::new(500.0, 40.0), DarkoTuning::default(), METER);
            let run = harness::run_to_completion(&mut darko, seed, harness::wandering);
            assert_eq!(run.rotation.spent, vec!["Blink"]);
        }
    }

    #[test]
    fn landing_spot_is_clamped_with_margin() {
        let tuning = DarkoTuning {
            speed: 0.0,
            ..Default::default()
        };
        let mut darko = Darko::new(Vec2::new(60.0, 270.0), tuning, METER);
        let mut rng = StdRng::seed_from_u64(2);
        // player hugging the left wall, so the jump overshoots it
        let player = Circle::new(Vec2::new(10.0, 270.0), 18.0);
        let mut landing = None;
        for _ in 0..400 {
            let mut c = ctx(player, &mut rng);
            darko.update(DT, &mut c);
            if let Some(Telegraph {
                shape: Shape::Disk { center, .. },
                ..
            }) = darko.telegraphs().first()
            {
                landing = Some(*center);
            }
            if darko.is_dead() {
                break;
            }
        }
        let landing = landing.expect("never telegraphed");
        assert_eq!(landing.x, 4.0);
        assert_eq!(darko.body().pos, landing);
    }
}
