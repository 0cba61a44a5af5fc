//! Hisui - melee beam fighter with a lunge and a two-phase combo.

use std::f32::consts::PI;

use bevy::prelude::*;
use rand::RngCore;

use super::{ArchetypeKind, Enemy, Fsm, TickContext, SPAWN_IDLE};
use crate::enemies::components::{Body, Facing};
use crate::enemies::data::HisuiTuning;
use crate::enemies::queue::{Advance, RotationPlan, RotationView, SkillKey, SkillQueue};
use crate::enemies::skills::{CastSnapshot, Outcome, Telegraph};
use crate::enemies::steering::{steer_toward, Dash};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum HisuiSkill {
    /// Long rectangle after a stationary telegraph.
    Beam,
    /// Backstep, then a forward dash with a damaging aura.
    Lunge,
    /// Front semicircle, then a rectangle slash.
    Combo,
}

impl SkillKey for HisuiSkill {
    fn name(self) -> &'static str {
        match self {
            HisuiSkill::Beam => "Beam",
            HisuiSkill::Lunge => "Lunge",
            HisuiSkill::Combo => "Combo",
        }
    }
}

#[derive(Clone, Copy, Debug)]
enum State {
    SpawnIdle,
    Move,
    Feint { skill: HisuiSkill, duration: f32 },
    BeamTelegraph(CastSnapshot),
    LungeBack { angle: f32, dash: Dash },
    LungePause { angle: f32 },
    LungeForward { angle: f32, dash: Dash, landed: bool },
    LungeRecover,
    ComboSweep(CastSnapshot),
    ComboSlash(CastSnapshot),
    ComboRecover,
    Dead,
}

pub struct Hisui {
    tuning: HisuiTuning,
    meter: f32,
    body: Body,
    fsm: Fsm<State>,
    queue: SkillQueue<HisuiSkill>,
    last_skill: Option<HisuiSkill>,
}

impl Hisui {
    /// Every order is allowed except ending on the lunge.
    pub fn plan() -> RotationPlan<HisuiSkill> {
        RotationPlan::Shuffled {
            skills: vec![HisuiSkill::Beam, HisuiSkill::Lunge, HisuiSkill::Combo],
            never_last: vec![HisuiSkill::Lunge],
        }
    }

    pub fn new(pos: Vec2, tuning: HisuiTuning, meter: f32, rng: &mut dyn RngCore) -> Self {
        Self::with_queue(pos, tuning, meter, Self::plan().build(rng))
    }

    pub fn with_queue(pos: Vec2, tuning: HisuiTuning, meter: f32, queue: SkillQueue<HisuiSkill>) -> Self {
        Self {
            tuning,
            meter,
            body: Body::new(pos),
            fsm: Fsm::new(State::SpawnIdle),
            queue,
            last_skill: None,
        }
    }

    fn triggered(&self, skill: HisuiSkill, ctx: &TickContext) -> bool {
        let pos = self.body.pos;
        match skill {
            HisuiSkill::Beam => ctx.in_footprint(&self.tuning.beam, pos),
            HisuiSkill::Lunge => ctx.within(pos, self.tuning.lunge_trigger),
            HisuiSkill::Combo => {
                ctx.in_footprint(&self.tuning.combo_sweep, pos)
                    || ctx.in_footprint(&self.tuning.combo_slash, pos)
            }
        }
    }

    fn start(&mut self, skill: HisuiSkill, ctx: &TickContext) {
        debug!("Hisui starts {}", skill.name());
        let snap = ctx.aim_from(self.body.pos);
        self.body.face(ctx.player.center);
        let t = &self.tuning;
        let state = match skill {
            HisuiSkill::Beam => State::BeamTelegraph(snap),
            HisuiSkill::Lunge => State::LungeBack {
                angle: snap.angle,
                dash: Dash::new(snap.angle + PI, t.lunge_back * self.meter, t.lunge_back_time),
            },
            HisuiSkill::Combo => State::ComboSweep(snap),
        };
        self.fsm.set(state);
    }

    fn finish(&mut self) {
        self.last_skill = self.queue.peek_next();
        match self.queue.advance() {
            Advance::Continue => self.fsm.set(State::Move),
            Advance::Exhausted => {
                debug!("Hisui finished its rotation");
                self.fsm.set(State::Dead);
            }
        }
    }
}

impl Enemy for Hisui {
    fn kind(&self) -> ArchetypeKind {
        ArchetypeKind::Hisui
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
                if let Some(skill) = self.queue.peek_next() {
                    if self.triggered(skill, ctx) {
                        let max = if self.last_skill == Some(HisuiSkill::Lunge) {
                            self.tuning.feint_after_lunge
                        } else {
                            self.tuning.feint_max
                        };
                        let duration = ctx.feint(max);
                        self.fsm.set(State::Feint { skill, duration });
                    }
                }
            }
            State::Feint { skill, duration } => {
                steer_toward(&mut self.body, ctx.player.center, speed, dt, &ctx.arena);
                if self.fsm.elapsed(duration) {
                    self.start(skill, ctx);
                }
            }
            State::BeamTelegraph(snap) => {
                if self.fsm.elapsed(self.tuning.beam_telegraph) {
                    let tele = self.tuning.beam.place("Beam", snap.origin, snap.angle, self.meter);
                    outcomes.extend(tele.resolve(ctx.player));
                    self.finish();
                }
            }
            State::LungeBack { angle, mut dash } => {
                dash.step(&mut self.body, dt, &ctx.arena);
                self.body.facing = Facing::along(angle);
                if self.fsm.elapsed(self.tuning.lunge_back_time) {
                    self.fsm.set(State::LungePause { angle });
                } else {
                    self.fsm.state = State::LungeBack { angle, dash };
                }
            }
            State::LungePause { angle } => {
                if self.fsm.elapsed(self.tuning.lunge_pause) {
                    let t = &self.tuning;
                    let dash = Dash::new(angle, t.lunge_forward * self.meter, t.lunge_forward_time);
                    self.fsm.set(State::LungeForward {
                        angle,
                        dash,
                        landed: false,
                    });
                }
            }
            State::LungeForward {
                angle,
                mut dash,
                mut landed,
            } => {
                dash.step(&mut self.body, dt, &ctx.arena);
                if !landed {
                    let aura = self.tuning.lunge_strike.place("Lunge", self.body.pos, angle, self.meter);
                    if let Some(hit) = aura.resolve(ctx.player) {
                        outcomes.push(hit);
                        landed = true;
                    }
                }
                if self.fsm.elapsed(self.tuning.lunge_forward_time) {
                    self.fsm.set(State::LungeRecover);
                } else {
                    self.fsm.state = State::LungeForward {
                        angle,
                        dash,
                        landed,
                    };
                }
            }
            State::LungeRecover => {
                if self.fsm.elapsed(self.tuning.lunge_recovery) {
                    self.finish();
                }
            }
            State::ComboSweep(snap) => {
                if self.fsm.elapsed(self.tuning.combo_sweep_time) {
                    let sweep = self.tuning.combo_sweep.place("Combo", snap.origin, snap.angle, self.meter);
                    outcomes.extend(sweep.resolve(ctx.player));
                    self.fsm.set(State::ComboSlash(snap));
                }
            }
            State::ComboSlash(snap) => {
                if self.fsm.elapsed(self.tuning.combo_slash_time) {
                    let slash = self.tuning.combo_slash.place("Combo", snap.origin, snap.angle, self.meter);
                    outcomes.extend(slash.resolve(ctx.player));
                    self.fsm.set(State::ComboRecover);
                }
            }
            State::ComboRecover => {
                if self.fsm.elapsed(self.tuning.combo_recovery) {
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
            State::Feint { .. } => "Feint",
            State::BeamTelegraph(_) => "BeamTelegraph",
            State::LungeBack { .. } => "LungeBack",
            State::LungePause { .. } => "LungePause",
            State::LungeForward { .. } => "LungeForward",
            State::LungeRecover => "LungeRecover",
            State::ComboSweep(_) => "ComboSweep",
            State::ComboSlash(_) => "ComboSlash",
            State::ComboRecover => "ComboRecover",
            State::Dead => "Dead",
        }
    }

    fn telegraphs(&self) -> Vec<Telegraph> {
        let t = &self.tuning;
        match self.fsm.state {
            State::BeamTelegraph(snap) => vec![t.beam.place("Beam", snap.origin, snap.angle, self.meter)],
            State::LungeForward { angle, .. } => {
                vec![t.lunge_strike.place("Lunge", self.body.pos, angle, self.meter)]
            }
            State::ComboSweep(snap) => vec![t.combo_sweep.place("Combo", snap.origin, snap.angle, self.meter)],
            State::ComboSlash(snap) => vec![t.combo_slash.place("Combo", snap.origin, snap.angle, self.meter)],
            _ => Vec::new(),
        }
    }

    fn rotation(&self) -> RotationView {
        self.queue.view()
    }
}
