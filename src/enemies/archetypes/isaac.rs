//! Isaac - dashes in for a slash, then leaps. Loses patience after a couple
//! of seconds and starts the next skill from wherever he is.

use bevy::prelude::*;

use super::{ArchetypeKind, Enemy, Fsm, TickContext, SPAWN_IDLE};
use crate::enemies::components::Body;
use crate::enemies::data::IsaacTuning;
use crate::enemies::queue::{Advance, RotationView, SkillKey, SkillQueue};
use crate::enemies::skills::{CastSnapshot, Outcome, Telegraph};
use crate::enemies::steering::{steer_toward, Dash, DashStep};
use crate::geometry::angle_to;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum IsaacSkill {
    Combo,
    Leap,
}

impl SkillKey for IsaacSkill {
    fn name(self) -> &'static str {
        match self {
            IsaacSkill::Combo => "Combo",
            IsaacSkill::Leap => "Leap",
        }
    }
}

#[derive(Clone, Copy, Debug)]
enum State {
    SpawnIdle,
    Move,
    ComboDash(Dash),
    /// Stands still, facing the player.
    ComboFeint(f32),
    ComboCast(CastSnapshot),
    LeapCast { target: Vec2 },
    PostWait(f32),
    Dead,
}

pub struct Isaac {
    tuning: IsaacTuning,
    meter: f32,
    body: Body,
    fsm: Fsm<State>,
    queue: SkillQueue<IsaacSkill>,
}

impl Isaac {
    pub fn new(pos: Vec2, tuning: IsaacTuning, meter: f32) -> Self {
        Self {
            tuning,
            meter,
            body: Body::new(pos),
            fsm: Fsm::new(State::SpawnIdle),
            queue: SkillQueue::new(vec![IsaacSkill::Combo, IsaacSkill::Leap]),
        }
    }

    fn combo(&self, snap: CastSnapshot) -> Telegraph {
        self.tuning.combo_strike.place("Combo", snap.origin, snap.angle, self.meter)
    }

    fn leap(&self, target: Vec2) -> Telegraph {
        self.tuning.leap_strike.place("Leap", target, 0.0, self.meter)
    }

    /// The player if close enough, otherwise as far as the leap goes toward them.
    fn leap_target(&self, ctx: &TickContext) -> Vec2 {
        let range = self.tuning.leap_range * self.meter;
        let to_player = ctx.player.center - self.body.pos;
        let distance = to_player.length();
        let raw = if distance <= 1e-4 {
            self.body.pos + Vec2::X * range
        } else if distance <= range {
            ctx.player.center
        } else {
            self.body.pos + to_player / distance * range
        };
        ctx.arena.clamp_inset(raw, self.tuning.leap_margin_px)
    }

    fn start(&mut self, skill: IsaacSkill, ctx: &TickContext) {
        debug!("Isaac starts {}", skill.name());
        self.body.face(ctx.player.center);
        let t = &self.tuning;
        let state = match skill {
            IsaacSkill::Combo => State::ComboDash(Dash::new(
                angle_to(self.body.pos, ctx.player.center),
                t.combo_dash * self.meter,
                t.combo_dash_time,
            )),
            IsaacSkill::Leap => State::LeapCast {
                target: self.leap_target(ctx),
            },
        };
        self.fsm.set(state);
    }

    fn finish(&mut self) {
        match self.queue.advance() {
            Advance::Continue => self.fsm.set(State::Move),
            Advance::Exhausted => self.fsm.set(State::Dead),
        }
    }
}

impl Enemy for Isaac {
    fn kind(&self) -> ArchetypeKind {
        ArchetypeKind::Isaac
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
                let Some(next) = self.queue.peek_next() else {
                    self.fsm.set(State::Dead);
                    return outcomes;
                };
                let trigger = match next {
                    IsaacSkill::Combo => self.tuning.combo_trigger,
                    IsaacSkill::Leap => self.tuning.leap.trigger,
                };
                let impatient = self.fsm.elapsed(self.tuning.force_after);
                if ctx.within(self.body.pos, trigger) || impatient {
                    if impatient {
                        debug!("Isaac forces {}", next.name());
                    }
                    self.start(next, ctx);
                }
            }
            State::ComboDash(mut dash) => {
                let step = dash.step(&mut self.body, dt, &ctx.arena);
                if step == DashStep::Finished || self.fsm.elapsed(self.tuning.combo_dash_time) {
                    let feint = ctx.feint(self.tuning.combo_feint_max);
                    self.fsm.set(State::ComboFeint(feint));
                } else {
                    self.fsm.state = State::ComboDash(dash);
                }
            }
            State::ComboFeint(duration) => {
                self.body.face(ctx.player.center);
                if self.fsm.elapsed(duration) {
                    self.fsm.set(State::ComboCast(ctx.aim_from(self.body.pos)));
                }
            }
            State::ComboCast(snap) => {
                if self.fsm.elapsed(self.tuning.combo_cast) {
                    outcomes.extend(self.combo(snap).resolve(ctx.player));
                    self.fsm.set(State::PostWait(self.tuning.combo_post));
                }
            }
            State::LeapCast { target } => {
                if self.fsm.elapsed(self.tuning.leap.cast) {
                    outcomes.extend(self.leap(target).resolve(ctx.player));
                    self.body.pos = target;
                    self.body.face(ctx.player.center);
                    self.fsm.set(State::PostWait(self.tuning.leap.post_wait));
                }
            }
            State::PostWait(duration) => {
                if self.fsm.elapsed(duration) {
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
            State::ComboDash(_) => "ComboDash",
            State::ComboFeint(_) => "ComboFeint",
            State::ComboCast(_) => "ComboCast",
            State::LeapCast { .. } => "LeapCast",
            State::PostWait(_) => "PostWait",
            State::Dead => "Dead",
        }
    }

    fn telegraphs(&self) -> Vec<Telegraph> {
        match self.fsm.state {
            State::ComboCast(snap) => vec![self.combo(snap)],
            State::LeapCast { target } => vec![self.leap(target)],
            _ => Vec::new(),
        }
    }

    fn rotation(&self) -> RotationView {
        self.queue.view()
    }
}
