//! Vanya - stacks hazards. The boomerang and the quake keep going while she
//! moves on to the next skill, unless they are her last.

use bevy::prelude::*;
use rand::RngCore;

use super::{ArchetypeKind, Enemy, Fsm, TickContext, SPAWN_IDLE};
use crate::enemies::components::{Body, Facing};
use crate::enemies::data::VanyaTuning;
use crate::enemies::projectile::{step_all, Projectile};
use crate::enemies::queue::{Advance, RotationPlan, RotationView, SkillKey, SkillQueue};
use crate::enemies::skills::{CastSnapshot, Outcome, SkillTiming, Telegraph};
use crate::enemies::steering::{steer_toward, Dash, DashStep};
use crate::geometry::Shape;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum VanyaSkill {
    Boomerang,
    Charge,
    Quake,
}

impl SkillKey for VanyaSkill {
    fn name(self) -> &'static str {
        match self {
            VanyaSkill::Boomerang => "Boomerang",
            VanyaSkill::Charge => "Charge",
            VanyaSkill::Quake => "Quake",
        }
    }
}

#[derive(Clone, Copy, Debug)]
enum State {
    SpawnIdle,
    Move,
    Feint { skill: VanyaSkill, duration: f32 },
    BoomerangCast(CastSnapshot),
    ChargeCast(CastSnapshot),
    Charge {
        start: Vec2,
        end: Vec2,
        dash: Dash,
        landed: bool,
    },
    QuakeCast(CastSnapshot),
    PostWait(f32),
    /// Last skill cast, waiting on what it left behind.
    Drain,
    Dead,
}

/// A quake waiting to land.
#[derive(Clone, Copy, Debug)]
struct Quake {
    snap: CastSnapshot,
    age: f32,
}

pub struct Vanya {
    tuning: VanyaTuning,
    meter: f32,
    body: Body,
    fsm: Fsm<State>,
    queue: SkillQueue<VanyaSkill>,
    projectiles: Vec<Projectile>,
    quakes: Vec<Quake>,
}

impl Vanya {
    pub fn plan() -> RotationPlan<VanyaSkill> {
        use VanyaSkill::*;
        RotationPlan::OneOf(vec![vec![Boomerang, Charge, Quake], vec![Charge, Quake, Boomerang]])
    }

    pub fn new(pos: Vec2, tuning: VanyaTuning, meter: f32, rng: &mut dyn RngCore) -> Self {
        Self::with_queue(pos, tuning, meter, Self::plan().build(rng))
    }

    pub fn with_queue(pos: Vec2, tuning: VanyaTuning, meter: f32, queue: SkillQueue<VanyaSkill>) -> Self {
        Self {
            tuning,
            meter,
            body: Body::new(pos),
            fsm: Fsm::new(State::SpawnIdle),
            queue,
            projectiles: Vec::new(),
            quakes: Vec::new(),
        }
    }

    fn hazards_active(&self) -> bool {
        !self.projectiles.is_empty() || !self.quakes.is_empty()
    }

    fn quake_shapes(&self, snap: CastSnapshot) -> [Telegraph; 2] {
        let t = &self.tuning;
        [
            t.quake_front.place("Quake", snap.origin, snap.angle, self.meter),
            t.quake_back
                .place("Quake", snap.origin, snap.angle + std::f32::consts::PI, self.meter),
        ]
    }

    fn charge_path(&self, start: Vec2, end: Vec2) -> Telegraph {
        Telegraph {
            skill: "Charge",
            shape: Shape::swept(start, end, self.tuning.charge_width * self.meter),
            severity: self.tuning.charge_severity,
        }
    }

    /// Resolve every quake whose delay ran out.
    fn step_quakes(&mut self, dt: f32, ctx: &TickContext, outcomes: &mut Vec<Outcome>) {
        let delay = self.tuning.quake_delay;
        let mut pending = std::mem::take(&mut self.quakes);
        for quake in pending.iter_mut() {
            quake.age += dt;
            if quake.age >= delay {
                // front and back land together, as one hit
                if let Some(hit) = self.quake_shapes(quake.snap).iter().find_map(|s| s.resolve(ctx.player)) {
                    outcomes.push(hit);
                }
            }
        }
        pending.retain(|q| q.age < delay);
        self.quakes = pending;
    }

    fn finish(&mut self) {
        if self.queue.is_final() && self.hazards_active() {
            self.fsm.set(State::Drain);
            return;
        }
        match self.queue.advance() {
            Advance::Continue => self.fsm.set(State::Move),
            Advance::Exhausted => self.fsm.set(State::Dead),
        }
    }

    fn timing(&self, skill: VanyaSkill) -> SkillTiming {
        match skill {
            VanyaSkill::Boomerang => self.tuning.boomerang,
            VanyaSkill::Charge => self.tuning.charge,
            VanyaSkill::Quake => self.tuning.quake,
        }
    }

    fn start(&mut self, skill: VanyaSkill, ctx: &TickContext) {
        debug!("Vanya starts {}", skill.name());
        self.body.face(ctx.player.center);
        let snap = ctx.aim_from(self.body.pos);
        self.fsm.set(match skill {
            VanyaSkill::Boomerang => State::BoomerangCast(snap),
            VanyaSkill::Charge => State::ChargeCast(snap),
            VanyaSkill::Quake => State::QuakeCast(snap),
        });
    }
}

impl Enemy for Vanya {
    fn kind(&self) -> ArchetypeKind {
        ArchetypeKind::Vanya
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
        self.step_quakes(dt, ctx, &mut outcomes);
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
                    let timing = self.timing(skill);
                    if timing.in_range(self.body.pos, ctx.player.center, self.meter) {
                        let duration = ctx.feint(timing.feint_max);
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
            State::BoomerangCast(snap) => {
                if self.fsm.elapsed(self.tuning.boomerang.cast) {
                    let t = &self.tuning;
                    let boomerang = t
                        .boomerang_shot
                        .fire("Boomerang", snap.origin, snap.angle, self.meter)
                        .returning(t.boomerang_return_speed * self.meter);
                    self.projectiles.push(boomerang);
                    self.body.facing = Facing::along(snap.angle);
                    self.finish();
                }
            }
            State::ChargeCast(snap) => {
                if self.fsm.elapsed(self.tuning.charge.cast) {
                    let t = &self.tuning;
                    let distance = t.charge_distance * self.meter;
                    self.fsm.set(State::Charge {
                        start: snap.origin,
                        end: ctx.arena.clamp(snap.ahead(distance)),
                        dash: Dash::with_speed(snap.angle, distance, t.charge_speed * self.meter),
                        landed: false,
                    });
                }
            }
            State::Charge {
                start,
                end,
                mut dash,
                mut landed,
            } => {
                let step = dash.step(&mut self.body, dt, &ctx.arena);
                if !landed {
                    if let Some(hit) = self.charge_path(start, self.body.pos).resolve(ctx.player) {
                        outcomes.push(hit);
                        landed = true;
                    }
                }
                match step {
                    DashStep::Moving => {
                        self.fsm.state = State::Charge {
                            start,
                            end,
                            dash,
                            landed,
                        }
                    }
                    DashStep::Finished => self.fsm.set(State::PostWait(self.tuning.charge.post_wait)),
                }
            }
            State::QuakeCast(snap) => {
                if self.fsm.elapsed(self.tuning.quake.cast) {
                    self.quakes.push(Quake { snap, age: 0.0 });
                    self.finish();
                }
            }
            State::PostWait(duration) => {
                if self.fsm.elapsed(duration) {
                    self.finish();
                }
            }
            State::Drain => {
                steer_toward(&mut self.body, ctx.player.center, speed, dt, &ctx.arena);
                if !self.hazards_active() {
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
            State::BoomerangCast(_) => "BoomerangCast",
            State::ChargeCast(_) => "ChargeCast",
            State::Charge { .. } => "Charge",
            State::QuakeCast(_) => "QuakeCast",
            State::PostWait(_) => "PostWait",
            State::Drain => "Drain",
            State::Dead => "Dead",
        }
    }

    fn telegraphs(&self) -> Vec<Telegraph> {
        let mut shapes: Vec<Telegraph> = self.projectiles.iter().map(Projectile::telegraph).collect();
        for quake in &self.quakes {
            shapes.extend(self.quake_shapes(quake.snap));
        }
        match self.fsm.state {
            State::BoomerangCast(snap) => {
                let t = &self.tuning;
                shapes.push(t.boomerang_shot.lane("Boomerang", snap.origin, snap.angle, self.meter));
            }
            State::ChargeCast(snap) => {
                let end = snap.ahead(self.tuning.charge_distance * self.meter);
                shapes.push(self.charge_path(snap.origin, end));
            }
            State::Charge { start, end, .. } => shapes.push(self.charge_path(start, end)),
            State::QuakeCast(snap) => shapes.extend(self.quake_shapes(snap)),
            _ => {}
        }
        shapes
    }

    fn rotation(&self) -> RotationView {
        self.queue.view()
    }
}
