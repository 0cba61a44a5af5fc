//! Debi & Marlene - twin fighter that swaps forms and leaves markers behind.
//!
//! Each form has a Q and an E. The E of one form drops a marker of that
//! form and switches to the other one; the other form's Q then uses the
//! marker (Marlene's Q sends the Debi marker dashing at the player, Debi's
//! Q fires a shot from the Marlene marker). The finale is a long slash that
//! carries her to its far end.

use bevy::prelude::*;
use rand::{Rng, RngCore};

use super::{ArchetypeKind, Enemy, Fsm, TickContext, SPAWN_IDLE};
use crate::enemies::components::{Body, Facing};
use crate::enemies::data::DebiMarleneTuning;
use crate::enemies::projectile::{step_all, Projectile};
use crate::enemies::queue::{Advance, RotationPlan, RotationView, SkillKey, SkillQueue};
use crate::enemies::skills::{CastSnapshot, Outcome, Telegraph};
use crate::enemies::steering::{displace, steer_toward};
use crate::geometry::{angle_to, direction};

/// Which twin is fighting.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Form {
    Debi,
    Marlene,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DebiMarleneSkill {
    DebiQ,
    DebiE,
    MarleneQ,
    MarleneE,
    Finale,
}

impl SkillKey for DebiMarleneSkill {
    fn name(self) -> &'static str {
        match self {
            DebiMarleneSkill::DebiQ => "DebiQ",
            DebiMarleneSkill::DebiE => "DebiE",
            DebiMarleneSkill::MarleneQ => "MarleneQ",
            DebiMarleneSkill::MarleneE => "MarleneE",
            DebiMarleneSkill::Finale => "Finale",
        }
    }
}

/// A dash that sweeps a short rectangle ahead of its moving center.
#[derive(Clone, Copy, Debug)]
struct Sweep {
    skill: &'static str,
    origin: Vec2,
    angle: f32,
    elapsed: f32,
    /// Drags the body along.
    follow: bool,
    /// Drags the Debi marker along and removes it at the end.
    carries_marker: bool,
    landed: bool,
}

#[derive(Clone, Copy, Debug)]
enum State {
    SpawnIdle,
    Move,
    Feint { skill: DebiMarleneSkill, duration: f32 },
    DebiQCast(CastSnapshot),
    DebiECast,
    MarleneQCast,
    MarleneECast,
    FinaleCast(CastSnapshot),
    PostWait(f32),
    /// Last skill done, waiting for shots and dashes to clear.
    Drain,
    Dead,
}

pub struct DebiMarlene {
    tuning: DebiMarleneTuning,
    meter: f32,
    body: Body,
    fsm: Fsm<State>,
    queue: SkillQueue<DebiMarleneSkill>,
    form: Form,
    debi_marker: Option<Vec2>,
    marlene_marker: Option<Vec2>,
    projectiles: Vec<Projectile>,
    sweeps: Vec<Sweep>,
    /// Move-only time left after an E.
    settle: f32,
}

impl DebiMarlene {
    /// The starting form's two skills, then the other form's, with the
    /// finale anywhere in between.
    pub fn plan(form: Form) -> RotationPlan<DebiMarleneSkill> {
        use DebiMarleneSkill::*;
        let base = match form {
            Form::Debi => vec![DebiQ, DebiE, MarleneQ, MarleneE],
            Form::Marlene => vec![MarleneQ, MarleneE, DebiQ, DebiE],
        };
        RotationPlan::WithWildcard {
            base,
            wildcard: Finale,
        }
    }

    pub fn new(pos: Vec2, tuning: DebiMarleneTuning, meter: f32, rng: &mut dyn RngCore) -> Self {
        let form = if rng.gen_bool(0.5) { Form::Debi } else { Form::Marlene };
        let queue = Self::plan(form).build(rng);
        Self::with_queue(pos, tuning, meter, form, queue)
    }

    pub fn with_queue(
        pos: Vec2,
        tuning: DebiMarleneTuning,
        meter: f32,
        form: Form,
        queue: SkillQueue<DebiMarleneSkill>,
    ) -> Self {
        Self {
            tuning,
            meter,
            body: Body::new(pos),
            fsm: Fsm::new(State::SpawnIdle),
            queue,
            form,
            debi_marker: None,
            marlene_marker: None,
            projectiles: Vec::new(),
            sweeps: Vec::new(),
            settle: 0.0,
        }
    }

    pub fn form(&self) -> Form {
        self.form
    }

    /// Placed markers, Debi's first.
    pub fn markers(&self) -> (Option<Vec2>, Option<Vec2>) {
        (self.debi_marker, self.marlene_marker)
    }

    fn hazards_active(&self) -> bool {
        !self.projectiles.is_empty() || !self.sweeps.is_empty()
    }

    fn self_dashing(&self) -> bool {
        self.sweeps.iter().any(|s| s.follow)
    }

    fn triggered(&self, skill: DebiMarleneSkill, ctx: &TickContext) -> bool {
        let t = &self.tuning;
        let pos = self.body.pos;
        let near = |marker: Option<Vec2>, meters: f32| marker.is_some_and(|m| ctx.within(m, meters));
        match skill {
            DebiMarleneSkill::DebiQ => {
                ctx.within(pos, t.debi_q_trigger) || near(self.marlene_marker, t.debi_q_marker_trigger)
            }
            DebiMarleneSkill::DebiE => ctx.within(pos, t.debi_e_trigger),
            DebiMarleneSkill::MarleneQ => {
                ctx.within(pos, t.marlene_q_trigger) || near(self.debi_marker, t.marlene_q_trigger)
            }
            DebiMarleneSkill::MarleneE => ctx.within(pos, t.marlene_e_trigger),
            DebiMarleneSkill::Finale => ctx.within(pos, t.finale_trigger),
        }
    }

    fn start(&mut self, skill: DebiMarleneSkill, ctx: &TickContext) {
        debug!("DebiMarlene starts {} as {:?}", skill.name(), self.form);
        self.body.face(ctx.player.center);
        let state = match skill {
            DebiMarleneSkill::DebiQ => State::DebiQCast(ctx.aim_from(self.body.pos)),
            DebiMarleneSkill::DebiE => State::DebiECast,
            DebiMarleneSkill::MarleneQ => State::MarleneQCast,
            DebiMarleneSkill::MarleneE => State::MarleneECast,
            DebiMarleneSkill::Finale => State::FinaleCast(ctx.aim_from(self.body.pos)),
        };
        self.fsm.set(state);
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

    fn sweep_center(&self, sweep: &Sweep) -> Vec2 {
        let t = &self.tuning;
        let progress = (sweep.elapsed / t.dash_time.max(1e-4)).min(1.0);
        sweep.origin + direction(sweep.angle) * t.dash_distance * self.meter * progress
    }

    fn sweep_rect(&self, sweep: &Sweep, center: Vec2) -> Telegraph {
        self.tuning.dash_sweep.place(sweep.skill, center, sweep.angle, self.meter)
    }

    fn step_sweeps(&mut self, dt: f32, ctx: &TickContext, outcomes: &mut Vec<Outcome>) {
        let dash_time = self.tuning.dash_time;
        let mut sweeps = std::mem::take(&mut self.sweeps);
        for sweep in sweeps.iter_mut() {
            sweep.elapsed += dt;
            let center = ctx.arena.clamp(self.sweep_center(sweep));
            if !sweep.landed {
                if let Some(hit) = self.sweep_rect(sweep, center).resolve(ctx.player) {
                    outcomes.push(hit);
                    sweep.landed = true;
                }
            }
            if sweep.follow {
                self.body.pos = center;
                self.body.facing = Facing::along(sweep.angle);
            }
            if sweep.carries_marker {
                self.debi_marker = (sweep.elapsed < dash_time).then_some(center);
            }
        }
        sweeps.retain(|sweep| sweep.elapsed < dash_time);
        self.sweeps = sweeps;
    }

    fn dash_at_player(
        &mut self,
        skill: &'static str,
        from: Vec2,
        target: Vec2,
        follow: bool,
        carries_marker: bool,
    ) {
        self.sweeps.push(Sweep {
            skill,
            origin: from,
            angle: angle_to(from, target),
            elapsed: 0.0,
            follow,
            carries_marker,
            landed: false,
        });
    }

    fn cast_debi_q(&mut self, snap: CastSnapshot, ctx: &TickContext, outcomes: &mut Vec<Outcome>) {
        let t = &self.tuning;
        outcomes.extend(t.debi_q_slash.place("DebiQ", snap.origin, snap.angle, self.meter).resolve(ctx.player));
        if let Some(marker) = self.marlene_marker.take() {
            let aim = angle_to(marker, ctx.player.center);
            self.projectiles.push(t.debi_orb.fire("DebiQ", marker, aim, self.meter));
        }
    }

    fn cast_debi_e(&mut self, ctx: &TickContext) {
        let t = &self.tuning;
        let aim = angle_to(self.body.pos, ctx.player.center);
        self.projectiles.push(t.debi_orb.fire("DebiE", self.body.pos, aim, self.meter));
        self.debi_marker = Some(self.body.pos);
        self.form = Form::Marlene;
        let back = t.debi_e_retreat * self.meter;
        displace(&mut self.body, -direction(aim), back, &ctx.arena);
        self.body.face(ctx.player.center);
        self.settle = t.settle;
    }

    fn cast_marlene_q(&mut self, ctx: &TickContext) {
        let aim = angle_to(self.body.pos, ctx.player.center);
        let shot = self.tuning.marlene_shot.fire("MarleneQ", self.body.pos, aim, self.meter);
        self.projectiles.push(shot);
        if let Some(marker) = self.debi_marker {
            self.dash_at_player("MarleneQ", marker, ctx.player.center, false, true);
        }
    }

    fn cast_marlene_e(&mut self, ctx: &TickContext) {
        self.marlene_marker = Some(self.body.pos);
        self.dash_at_player("MarleneE", self.body.pos, ctx.player.center, true, false);
        self.form = Form::Debi;
        self.settle = self.tuning.settle;
    }

    fn cast_finale(&mut self, snap: CastSnapshot, ctx: &TickContext, outcomes: &mut Vec<Outcome>) {
        let slash = self.tuning.finale_strike.place("Finale", snap.origin, snap.angle, self.meter);
        outcomes.extend(slash.resolve(ctx.player));
        let far = snap.ahead(self.tuning.finale_strike.shape.reach() * self.meter);
        self.body.pos = ctx.arena.clamp(far);
        self.body.facing = Facing::along(snap.angle);
    }
}

impl Enemy for DebiMarlene {
    fn kind(&self) -> ArchetypeKind {
        ArchetypeKind::DebiMarlene
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
        self.step_sweeps(dt, ctx, &mut outcomes);
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
                if self.self_dashing() {
                    self.settle = (self.settle - dt).max(0.0);
                } else if self.settle > 0.0 {
                    self.settle = (self.settle - dt).max(0.0);
                    steer_toward(&mut self.body, ctx.player.center, speed, dt, &ctx.arena);
                } else {
                    steer_toward(&mut self.body, ctx.player.center, speed, dt, &ctx.arena);
                    if let Some(skill) = self.queue.peek_next() {
                        if self.triggered(skill, ctx) {
                            let max = if skill == DebiMarleneSkill::Finale {
                                self.tuning.finale_feint_max
                            } else {
                                self.tuning.feint_max
                            };
                            let duration = ctx.feint(max);
                            self.fsm.set(State::Feint { skill, duration });
                        }
                    }
                }
            }
            State::Feint { skill, duration } => {
                steer_toward(&mut self.body, ctx.player.center, speed, dt, &ctx.arena);
                if self.fsm.elapsed(duration) {
                    self.start(skill, ctx);
                }
            }
            State::DebiQCast(snap) => {
                if self.fsm.elapsed(self.tuning.debi_q_cast) {
                    self.cast_debi_q(snap, ctx, &mut outcomes);
                    self.fsm.set(State::PostWait(self.tuning.q_wait));
                }
            }
            State::DebiECast => {
                if self.fsm.elapsed(self.tuning.debi_e_cast) {
                    self.cast_debi_e(ctx);
                    self.finish();
                }
            }
            State::MarleneQCast => {
                if self.fsm.elapsed(self.tuning.marlene_q_cast) {
                    self.cast_marlene_q(ctx);
                    self.fsm.set(State::PostWait(self.tuning.q_wait));
                }
            }
            State::MarleneECast => {
                if self.fsm.elapsed(self.tuning.marlene_e_cast) {
                    self.cast_marlene_e(ctx);
                    self.finish();
                }
            }
            State::FinaleCast(snap) => {
                if self.fsm.elapsed(self.tuning.finale_cast) {
                    self.cast_finale(snap, ctx, &mut outcomes);
                    self.fsm.set(State::PostWait(self.tuning.finale_wait));
                }
            }
            State::PostWait(duration) => {
                if self.fsm.elapsed(duration) {
                    self.finish();
                }
            }
            State::Drain => {
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
            State::DebiQCast(_) => "DebiQCast",
            State::DebiECast => "DebiECast",
            State::MarleneQCast => "MarleneQCast",
            State::MarleneECast => "MarleneECast",
            State::FinaleCast(_) => "FinaleCast",
            State::PostWait(_) => "PostWait",
            State::Drain => "Drain",
            State::Dead => "Dead",
        }
    }

    fn telegraphs(&self) -> Vec<Telegraph> {
        let t = &self.tuning;
        let mut shapes: Vec<Telegraph> = self.projectiles.iter().map(Projectile::telegraph).collect();
        for sweep in &self.sweeps {
            shapes.push(self.sweep_rect(sweep, self.sweep_center(sweep)));
        }
        match self.fsm.state {
            State::DebiQCast(snap) => {
                shapes.push(t.debi_q_slash.place("DebiQ", snap.origin, snap.angle, self.meter));
            }
            State::FinaleCast(snap) => {
                shapes.push(t.finale_strike.place("Finale", snap.origin, snap.angle, self.meter));
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
    use crate::enemies::skills::Severity;
    use crate::geometry::Circle;

    #[test]
    fn plan_starts_with_the_starting_form() {
        let mut rng = StdRng::seed_from_u64(3);
        for _ in 0..200 {
            let order: Vec<_> = DebiMarlene::plan(Form::Marlene).build(&mut rng).pending().collect();
            let base: Vec<_> = order
                .iter()
                .copied()
                .filter(|s| *s != DebiMarleneSkill::Finale)
                .collect();
            assert_eq!(
                base,
                vec![
                    DebiMarleneSkill::MarleneQ,
                    DebiMarleneSkill::MarleneE,
                    DebiMarleneSkill::DebiQ,
                    DebiMarleneSkill::DebiE
                ]
            );
            assert_eq!(order.len(), 5);
        }
    }

    #[test]
    fn runs_all_five_skills_and_clears_hazards() {
        for seed in 0..30 {
            let mut rng = StdRng::seed_from_u64(seed);
            let mut dm = DebiMarlene::new(Vec2::new(40.0, 270.0), DebiMarleneTuning::default(), METER, &mut rng);
            let run = harness::run_to_completion(&mut dm, seed, harness::wandering);
            assert_eq!(run.rotation.spent.len(), 5);
            assert!(run.rotation.spent.contains(&"Finale"));
            assert!(!dm.hazards_active());
        }
    }

    #[test]
    fn marlene_marker_is_spent_by_debi_q() {
        let mut dm = DebiMarlene::with_queue(
            Vec2::new(300.0, 270.0),
            DebiMarleneTuning::default(),
            METER,
            Form::Marlene,
            SkillQueue::new(vec![DebiMarleneSkill::MarleneE, DebiMarleneSkill::DebiQ]),
        );
        let mut rng = StdRng::seed_from_u64(6);
        let mut placed = false;
        for tick in 0..2000 {
            let mut c = ctx(harness::wandering(tick), &mut rng);
            dm.update(DT, &mut c);
            placed |= dm.markers().1.is_some();
            if dm.is_dead() {
                break;
            }
        }
        assert!(dm.is_dead());
        assert!(placed);
        assert_eq!(dm.markers().1, None);
        assert_eq!(dm.form(), Form::Debi);
    }

    #[test]
    fn debi_marker_dashes_at_the_player_on_marlene_q() {
        let mut dm = DebiMarlene::with_queue(
            Vec2::new(200.0, 270.0),
            DebiMarleneTuning::default(),
            METER,
            Form::Marlene,
            SkillQueue::new(vec![DebiMarleneSkill::MarleneQ]),
        );
        let marker = Vec2::new(400.0, 270.0);
        dm.debi_marker = Some(marker);
        dm.fsm.set(State::Move);
        // out of Marlene's own reach, but close to the marker
        let player = Circle::new(marker + Vec2::new(3.0 * METER, 0.0), 18.0);
        let mut rng = StdRng::seed_from_u64(8);
        let mut outcomes = Vec::new();
        let mut furthest = marker.x;
        for _ in 0..600 {
            let mut c = ctx(player, &mut rng);
            outcomes.extend(dm.update(DT, &mut c));
            if let Some(m) = dm.markers().0 {
                furthest = furthest.max(m.x);
            }
            if dm.is_dead() {
                break;
            }
        }
        assert!(dm.is_dead());
        assert!(outcomes.contains(&Outcome::Hit {
            severity: Severity::Danger,
            skill: "MarleneQ",
        }));
        assert!(furthest > marker.x + 2.0 * METER, "{furthest}");
        assert_eq!(dm.markers().0, None);
        // the marker dashes, Marlene stays back
        assert!(dm.body().pos.x < 300.0, "{:?}", dm.body().pos);
        assert_eq!(dm.form(), Form::Marlene);
    }
}
