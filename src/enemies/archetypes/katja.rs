//! Katja - a fast bolt and a far-reaching trapezoid, in random order.

use bevy::prelude::*;
use rand::{Rng, RngCore};

use super::{ArchetypeKind, Enemy, Fsm, TickContext, SPAWN_IDLE};
use crate::enemies::components::{Body, Facing};
use crate::enemies::data::KatjaTuning;
use crate::enemies::projectile::{step_all, Projectile};
use crate::enemies::queue::{Advance, RotationPlan, RotationView, SkillKey, SkillQueue};
use crate::enemies::skills::{CastSnapshot, Outcome, Telegraph};
use crate::enemies::steering::steer_toward;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum KatjaSkill {
    Bolt,
    Field,
}

impl SkillKey for KatjaSkill {
    fn name(self) -> &'static str {
        match self {
            KatjaSkill::Bolt => "Bolt",
            KatjaSkill::Field => "Field",
        }
    }
}

#[derive(Clone, Copy, Debug)]
enum State {
    SpawnIdle,
    Move,
    Feint(f32),
    BoltCast(CastSnapshot),
    BoltFlight,
    /// Trapezoid placed at `center`, axis along `angle`.
    FieldCast { center: Vec2, angle: f32 },
    PostWait(f32),
    Dead,
}

pub struct Katja {
    tuning: KatjaTuning,
    meter: f32,
    body: Body,
    fsm: Fsm<State>,
    queue: SkillQueue<KatjaSkill>,
    projectiles: Vec<Projectile>,
}

impl Katja {
    pub fn new(pos: Vec2, tuning: KatjaTuning, meter: f32, rng: &mut dyn RngCore) -> Self {
        let queue = RotationPlan::shuffled(vec![KatjaSkill::Bolt, KatjaSkill::Field]).build(rng);
        Self::with_queue(pos, tuning, meter, queue)
    }

    pub fn with_queue(pos: Vec2, tuning: KatjaTuning, meter: f32, queue: SkillQueue<KatjaSkill>) -> Self {
        Self {
            tuning,
            meter,
            body: Body::new(pos),
            fsm: Fsm::new(State::SpawnIdle),
            queue,
            projectiles: Vec::new(),
        }
    }

    /// Center the trapezoid on the player's projection along the aim,
    /// keeping it between the caster and the far limit, then jitter it.
    fn place_field(&self, ctx: &mut TickContext) -> State {
        let t = &self.tuning;
        let snap = ctx.aim_from(self.body.pos);
        let depth = t.field_strike.shape.reach();
        let projection = (ctx.player.center - snap.origin).dot(snap.direction()) / self.meter;
        let along = projection.clamp(depth * 0.5, (t.field_range - depth * 0.5).max(depth * 0.5));
        let jitter = Vec2::new(
            ctx.rng.gen_range(-1.0..=1.0),
            ctx.rng.gen_range(-1.0..=1.0),
        ) * t.field_jitter;
        State::FieldCast {
            center: snap.ahead(along * self.meter) + jitter * self.meter,
            angle: snap.angle,
        }
    }

    fn field(&self, center: Vec2, angle: f32) -> Telegraph {
        self.tuning.field_strike.place("Field", center, angle, self.meter)
    }

    fn finish(&mut self) {
        match self.queue.advance() {
            Advance::Continue => self.fsm.set(State::Move),
            Advance::Exhausted => self.fsm.set(State::Dead),
        }
    }
}

impl Enemy for Katja {
    fn kind(&self) -> ArchetypeKind {
        ArchetypeKind::Katja
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
                match self.queue.peek_next() {
                    Some(KatjaSkill::Bolt) if self.tuning.bolt.in_range(self.body.pos, ctx.player.center, self.meter) => {
                        let feint = ctx.feint(self.tuning.bolt.feint_max);
                        self.fsm.set(State::Feint(feint));
                    }
                    Some(KatjaSkill::Field) if self.tuning.field.in_range(self.body.pos, ctx.player.center, self.meter) => {
                        debug!("Katja starts Field");
                        self.body.face(ctx.player.center);
                        let cast = self.place_field(ctx);
                        self.fsm.set(cast);
                    }
                    _ => {}
                }
            }
            State::Feint(duration) => {
                steer_toward(&mut self.body, ctx.player.center, speed, dt, &ctx.arena);
                if self.fsm.elapsed(duration) {
                    debug!("Katja starts Bolt");
                    self.body.face(ctx.player.center);
                    self.fsm.set(State::BoltCast(ctx.aim_from(self.body.pos)));
                }
            }
            State::BoltCast(snap) => {
                if self.fsm.elapsed(self.tuning.bolt.cast) {
                    let bolt = self.tuning.bolt_shot.fire("Bolt", snap.origin, snap.angle, self.meter);
                    self.projectiles.push(bolt);
                    self.body.facing = Facing::along(snap.angle);
                    self.fsm.set(State::BoltFlight);
                }
            }
            State::BoltFlight => {
                step_all(&mut self.projectiles, dt, ctx.player, self.body.pos, &mut outcomes);
                if self.projectiles.is_empty() {
                    self.fsm.set(State::PostWait(self.tuning.bolt.post_wait));
                }
            }
            State::FieldCast { center, angle } => {
                if self.fsm.elapsed(self.tuning.field.cast) {
                    outcomes.extend(self.field(center, angle).resolve(ctx.player));
                    self.fsm.set(State::PostWait(self.tuning.field.post_wait));
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
            State::Feint(_) => "Feint",
            State::BoltCast(_) => "BoltCast",
            State::BoltFlight => "BoltFlight",
            State::FieldCast { .. } => "FieldCast",
            State::PostWait(_) => "PostWait",
            State::Dead => "Dead",
        }
    }

    fn telegraphs(&self) -> Vec<Telegraph> {
        let mut shapes: Vec<Telegraph> = self.projectiles.iter().map(Projectile::telegraph).collect();
        match self.fsm.state {
            State::BoltCast(snap) => {
                shapes.push(self.tuning.bolt_shot.lane("Bolt", snap.origin, snap.angle, self.meter));
            }
            State::FieldCast { center, angle } => shapes.push(self.field(center, angle)),
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
    use crate::geometry::{Circle, Shape};

    #[test]
    fn uses_both_skills_in_either_order() {
        let mut orders = std::collections::HashSet::new();
        for seed in 0..30 {
            let mut rng = StdRng::seed_from_u64(seed);
            let mut katja = Katja::new(Vec2::new(920.0, 500.0), KatjaTuning::default(), METER, &mut rng);
            let run = harness::run_to_completion(&mut katja, seed, harness::wandering);
            assert_eq!(run.rotation.spent.len(), 2);
            orders.insert(run.rotation.spent);
        }
        assert_eq!(orders.len(), 2);
    }

    #[test]
    fn field_stays_between_its_limits() {
        let t = KatjaTuning::default();
        let origin = Vec2::new(40.0, 270.0);
        for (i, distance) in [10.0, 300.0, 900.0].into_iter().enumerate() {
            let mut rng = StdRng::seed_from_u64(i as u64);
            let katja = Katja::with_queue(origin, t.clone(), METER, SkillQueue::new(vec![KatjaSkill::Field]));
            let player = Circle::new(origin + Vec2::new(distance, 0.0), 18.0);
            let mut c = ctx(player, &mut rng);
            let State::FieldCast { center, angle } = katja.place_field(&mut c) else {
                panic!("expected a field cast");
            };
            assert_eq!(angle, 0.0);
            let along = (center.x - origin.x) / METER;
            let half = t.field_strike.shape.reach() * 0.5;
            assert!(along >= half - t.field_jitter - 1e-3, "{along}");
            assert!(along <= t.field_range - half + t.field_jitter + 1e-3, "{along}");
            assert!((center.y - origin.y).abs() <= t.field_jitter * METER + 1e-3);
            assert!(matches!(katja.field(center, angle).shape, Shape::Polygon { .. }));
        }
    }

    #[test]
    fn field_keeps_its_placement_while_casting() {
        let mut rng = StdRng::seed_from_u64(8);
        let tuning = KatjaTuning {
            speed: 0.0,
            ..Default::default()
        };
        let mut katja = Katja::with_queue(
            Vec2::new(100.0, 270.0),
            tuning,
            METER,
            SkillQueue::new(vec![KatjaSkill::Field, KatjaSkill::Bolt]),
        );
        let mut first = None;
        for i in 0..300 {
            let player = Circle::new(Vec2::new(500.0, 100.0 + i as f32), 18.0);
            let mut c = ctx(player, &mut rng);
            katja.update(DT, &mut c);
            if katja.state_name() == "FieldCast" {
                let shapes = katja.telegraphs();
                match &first {
                    None => first = Some(shapes),
                    Some(f) => assert_eq!(f, &shapes),
                }
            }
        }
        assert!(first.is_some());
    }
}
