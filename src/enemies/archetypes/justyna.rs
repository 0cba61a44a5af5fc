//! Justyna - burst, a two-pulse lance with a timed follow-up, and a
//! channeled storm. A short reposition dash keeps her lined up for the lances.

use bevy::prelude::*;

use super::{ArchetypeKind, Enemy, Fsm, TickContext, SPAWN_IDLE};
use crate::enemies::components::{Body, Facing};
use crate::enemies::data::{DashWeights, JustynaTuning};
use crate::enemies::queue::{Advance, RotationView, SkillKey, SkillQueue};
use crate::enemies::skills::{CastSnapshot, Outcome, ShapeSpec, Telegraph};
use crate::enemies::steering::{steer_toward, Dash, DashStep};
use crate::geometry::{angle_to, direction, to_local, Circle};
use crate::world::Arena;

/// Movements and vectors shorter than this are ignored.
const EPSILON: f32 = 1e-4;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum JustynaSkill {
    Burst,
    Lance,
    Pierce,
    Storm,
}

impl SkillKey for JustynaSkill {
    fn name(self) -> &'static str {
        match self {
            JustynaSkill::Burst => "Burst",
            JustynaSkill::Lance => "Lance",
            JustynaSkill::Pierce => "Pierce",
            JustynaSkill::Storm => "Storm",
        }
    }
}

#[derive(Clone, Copy, Debug)]
enum State {
    SpawnIdle,
    Move,
    BurstCast { center: Vec2 },
    /// `pulse` counts the pulses already resolved.
    LanceCast { snap: CastSnapshot, pulse: u32 },
    PierceCast(CastSnapshot),
    StormCast { center: Vec2 },
    StormChannel { center: Vec2, fired: u32 },
    Dead,
}

pub struct Justyna {
    tuning: JustynaTuning,
    meter: f32,
    body: Body,
    fsm: Fsm<State>,
    queue: SkillQueue<JustynaSkill>,
    dash: Option<Dash>,
    dash_cooldown: f32,
    /// Seconds left for Pierce to start.
    pierce_window: f32,
    pierce_lock: f32,
}

impl Justyna {
    pub fn new(pos: Vec2, tuning: JustynaTuning, meter: f32) -> Self {
        Self {
            tuning,
            meter,
            body: Body::new(pos),
            fsm: Fsm::new(State::SpawnIdle),
            queue: SkillQueue::new(vec![
                JustynaSkill::Burst,
                JustynaSkill::Lance,
                JustynaSkill::Pierce,
                JustynaSkill::Storm,
            ]),
            dash: None,
            dash_cooldown: 0.0,
            pierce_window: 0.0,
            pierce_lock: 0.0,
        }
    }

    fn storm_active(&self) -> bool {
        matches!(self.fsm.state, State::StormCast { .. } | State::StormChannel { .. })
    }

    fn pierce_ready(&self) -> bool {
        self.pierce_lock <= 0.0 && self.pierce_window > 0.0
    }

    /// Steering is suspended while dashing and slowed during the storm.
    fn steer(&mut self, ctx: &TickContext, dt: f32) {
        if self.dash.is_some() {
            return;
        }
        let factor = if self.storm_active() {
            self.tuning.storm_speed_factor
        } else {
            1.0
        };
        let speed = self.tuning.speed * self.meter * factor;
        steer_toward(&mut self.body, ctx.player.center, speed, dt, &ctx.arena);
    }

    /// Point toward the player at most `reach` meters away, inside the arena.
    fn reach_toward(&self, ctx: &TickContext, reach: f32) -> Vec2 {
        let snap = ctx.aim_from(self.body.pos);
        let distance = self.body.distance_to(ctx.player.center).min(reach * self.meter);
        ctx.arena.clamp(snap.ahead(distance))
    }

    /// Dash to line the player up with a `shape` rectangle cast along `angle`.
    fn maybe_dash(&mut self, ctx: &TickContext, shape: ShapeSpec, angle: f32) {
        if self.storm_active() || self.dash.is_some() || self.dash_cooldown > 0.0 {
            return;
        }
        let t = &self.tuning;
        let reposition = DashPlanner {
            weights: &t.dash,
            arena: &ctx.arena,
            meter: self.meter,
            distance: t.dash_distance * self.meter,
        };
        if let Some(dash_angle) = reposition.choose(self.body.pos, ctx.player, shape, angle) {
            debug!("Justyna repositions along {dash_angle:.2}");
            self.dash = Some(Dash::new(dash_angle, t.dash_distance * self.meter, t.dash_time));
            self.dash_cooldown = t.dash_cooldown;
            self.body.facing = Facing::along(dash_angle);
        }
    }

    fn finish(&mut self) {
        match self.queue.advance() {
            Advance::Continue => self.fsm.set(State::Move),
            Advance::Exhausted => self.fsm.set(State::Dead),
        }
    }

    fn burst(&self, center: Vec2) -> Telegraph {
        self.tuning.burst_strike.place("Burst", center, 0.0, self.meter)
    }

    fn lance(&self, snap: CastSnapshot) -> Telegraph {
        self.tuning.lance_strike.place("Lance", snap.origin, snap.angle, self.meter)
    }

    fn pierce(&self, snap: CastSnapshot) -> Telegraph {
        self.tuning.pierce_strike.place("Pierce", snap.origin, snap.angle, self.meter)
    }

    /// A reposition dash that lands mid-cast moves the rectangle to her new
    /// position. The angle stays locked.
    fn land_dash(&mut self) {
        let origin = self.body.pos;
        if let State::LanceCast { snap, .. } | State::PierceCast(snap) = &mut self.fsm.state {
            snap.origin = origin;
        }
    }

    fn storm(&self, center: Vec2) -> Telegraph {
        self.tuning.storm_strike.place("Storm", center, 0.0, self.meter)
    }

    fn start(&mut self, skill: JustynaSkill, ctx: &TickContext) {
        debug!("Justyna starts {}", skill.name());
        self.body.face(ctx.player.center);
        let state = match skill {
            JustynaSkill::Burst => State::BurstCast {
                center: self.reach_toward(ctx, self.tuning.burst_reach),
            },
            JustynaSkill::Lance => State::LanceCast {
                snap: ctx.aim_from(self.body.pos),
                pulse: 0,
            },
            JustynaSkill::Pierce => State::PierceCast(ctx.aim_from(self.body.pos)),
            JustynaSkill::Storm => State::StormCast {
                center: self.reach_toward(ctx, self.tuning.storm_reach),
            },
        };
        self.fsm.set(state);
    }

    fn update_move(&mut self, dt: f32, ctx: &TickContext) {
        if self.queue.peek_next() == Some(JustynaSkill::Pierce) && self.pierce_window <= 0.0 {
            debug!("Justyna let the Pierce window close");
            if self.queue.discard_next() == Advance::Exhausted {
                self.fsm.set(State::Dead);
                return;
            }
        }
        let Some(next) = self.queue.peek_next() else {
            self.fsm.set(State::Dead);
            return;
        };

        let aim = angle_to(self.body.pos, ctx.player.center);
        match next {
            JustynaSkill::Lance => self.maybe_dash(ctx, self.tuning.lance_strike.shape, aim),
            JustynaSkill::Pierce if self.pierce_ready() => {
                self.maybe_dash(ctx, self.tuning.pierce_strike.shape, aim)
            }
            _ => {}
        }
        self.steer(ctx, dt);
        if self.dash.is_some() {
            return;
        }

        let t = &self.tuning;
        let in_reach = match next {
            JustynaSkill::Burst => {
                self.body.distance_to(ctx.player.center) <= t.burst_trigger * self.meter + t.burst_slack_px
            }
            JustynaSkill::Lance => ctx.within(self.body.pos, t.lance_trigger),
            JustynaSkill::Pierce => self.pierce_ready() && ctx.within(self.body.pos, t.pierce_trigger),
            JustynaSkill::Storm => ctx.within(self.body.pos, t.storm_trigger),
        };
        if in_reach {
            self.start(next, ctx);
        }
    }
}

impl Enemy for Justyna {
    fn kind(&self) -> ArchetypeKind {
        ArchetypeKind::Justyna
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
        self.dash_cooldown = (self.dash_cooldown - dt).max(0.0);
        self.pierce_lock = (self.pierce_lock - dt).max(0.0);
        self.pierce_window = (self.pierce_window - dt).max(0.0);
        if let Some(dash) = self.dash.as_mut() {
            if dash.step(&mut self.body, dt, &ctx.arena) == DashStep::Finished {
                self.dash = None;
                self.land_dash();
            }
        }

        let state = self.fsm.state;
        match state {
            State::SpawnIdle => {
                if self.fsm.elapsed(SPAWN_IDLE) {
                    self.fsm.set(State::Move);
                }
            }
            State::Move => self.update_move(dt, ctx),
            State::BurstCast { center } => {
                self.steer(ctx, dt);
                if self.fsm.elapsed(self.tuning.burst_cast) {
                    outcomes.extend(self.burst(center).resolve(ctx.player));
                    self.finish();
                }
            }
            // rooted while a rectangle is up, only the reposition dash moves her
            State::LanceCast { snap, pulse } => {
                self.maybe_dash(ctx, self.tuning.lance_strike.shape, snap.angle);
                if self.fsm.elapsed(self.tuning.lance_pulse) {
                    outcomes.extend(self.lance(snap).resolve(ctx.player));
                    if pulse + 1 < self.tuning.lance_pulses {
                        self.fsm.set(State::LanceCast { snap, pulse: pulse + 1 });
                    } else {
                        self.pierce_window = self.tuning.pierce_window;
                        self.pierce_lock = self.tuning.pierce_lock;
                        self.finish();
                    }
                }
            }
            State::PierceCast(snap) => {
                self.maybe_dash(ctx, self.tuning.pierce_strike.shape, snap.angle);
                if self.fsm.elapsed(self.tuning.pierce_cast) {
                    outcomes.extend(self.pierce(snap).resolve(ctx.player));
                    self.pierce_window = 0.0;
                    self.finish();
                }
            }
            State::StormCast { center } => {
                self.steer(ctx, dt);
                if self.fsm.elapsed(self.tuning.storm_cast) {
                    self.fsm.set(State::StormChannel { center, fired: 0 });
                }
            }
            State::StormChannel { center, fired } => {
                self.steer(ctx, dt);
                if self.fsm.elapsed(self.tuning.storm_interval * (fired + 1) as f32) {
                    outcomes.extend(self.storm(center).resolve(ctx.player));
                    let fired = fired + 1;
                    if fired >= self.tuning.storm_pulses {
                        self.finish();
                    } else {
                        // keep the channel clock running
                        self.fsm.state = State::StormChannel { center, fired };
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
            State::BurstCast { .. } => "BurstCast",
            State::LanceCast { .. } => "LanceCast",
            State::PierceCast(_) => "PierceCast",
            State::StormCast { .. } => "StormCast",
            State::StormChannel { .. } => "StormChannel",
            State::Dead => "Dead",
        }
    }

    fn telegraphs(&self) -> Vec<Telegraph> {
        match self.fsm.state {
            State::BurstCast { center } => vec![self.burst(center)],
            State::LanceCast { snap, .. } => vec![self.lance(snap)],
            State::PierceCast(snap) => vec![self.pierce(snap)],
            State::StormCast { center } | State::StormChannel { center, .. } => vec![self.storm(center)],
            _ => Vec::new(),
        }
    }

    fn rotation(&self) -> RotationView {
        self.queue.view()
    }
}

/// How the player sits relative to an upcoming rectangle, in its local frame.
#[derive(Clone, Copy, Debug)]
struct Alignment {
    /// Where the player should be, local coordinates.
    target: Vec2,
    behind: bool,
    far_ahead: bool,
    lateral: bool,
    too_far: bool,
}

impl Alignment {
    fn flags(&self) -> [bool; 4] {
        [self.behind, self.far_ahead, self.lateral, self.too_far]
    }
}

/// A dash direction under consideration.
#[derive(Clone, Copy, Debug)]
struct Candidate {
    angle: f32,
    shift: f32,
    improvement: f32,
    score: f32,
}

/// Picks the reposition dash that best puts the player back inside a
/// rectangle about to be cast.
struct DashPlanner<'a> {
    weights: &'a DashWeights,
    arena: &'a Arena,
    meter: f32,
    /// Dash length in pixels.
    distance: f32,
}

impl DashPlanner<'_> {
    fn m(&self, meters: f32) -> f32 {
        meters * self.meter
    }

    fn align(&self, local: Vec2, distance: f32, length: f32, width: f32, player_radius: f32) -> Alignment {
        let w = self.weights;
        let margin = width * 0.5 + player_radius + w.lateral_pad_px;
        let behind = local.x < -self.m(w.behind);
        let far_ahead = local.x > length + self.m(w.far_ahead);
        let lateral = local.y.abs() > margin;
        let too_far = distance > length + self.distance * w.too_far;

        let mut min = self.m(w.inset);
        let mut max = (length - self.m(w.inset)).max(min);
        if behind {
            min = 0.0;
        }
        if far_ahead || too_far {
            max = length;
        }
        let soft = (margin * 0.6).min((player_radius + self.m(w.soft_perp)).max(width * w.soft_perp));
        let limit = if lateral {
            soft.max(margin - self.m(w.hard_perp_inset))
        } else {
            soft
        };
        Alignment {
            target: Vec2::new(local.x.clamp(min, max), local.y.clamp(-limit, limit)),
            behind,
            far_ahead,
            lateral,
            too_far,
        }
    }

    /// Dash angle, or `None` when the player is already lined up or no
    /// direction helps.
    fn choose(&self, from: Vec2, player: Circle, shape: ShapeSpec, angle: f32) -> Option<f32> {
        let w = self.weights;
        let to_player = player.center - from;
        let distance = to_player.length();
        if distance < self.m(w.min_distance) {
            return None;
        }
        let (length, width) = match shape {
            ShapeSpec::Rect { length, width } => (self.m(length), self.m(width)),
            other => (self.m(other.reach()), self.m(other.reach() * 2.0)),
        };

        let local = to_local(player.center, from, angle);
        let now = self.align(local, distance, length, width, player.radius);
        let shift_local = local - now.target;
        let shift = shift_local.length();
        let by_shift = shift > self.m(w.shift_trigger);
        if !by_shift && !now.flags().contains(&true) {
            return None;
        }

        let axis = direction(angle);
        let shift_world = axis.rotate(shift_local);
        let mut candidates = Vec::with_capacity(5);
        if shift_world.length() > EPSILON {
            candidates.push(shift_world);
        }
        candidates.push(to_player);
        if now.behind || now.far_ahead || by_shift {
            candidates.push(axis);
        }
        if now.lateral {
            let side = if local.y >= 0.0 { 1.0 } else { -1.0 };
            candidates.push(axis.perp() * side);
        }
        candidates.push(shift_world * 0.7 + to_player * 0.3);

        let evaluate = |vector: Vec2| -> Option<Candidate> {
            let dir = vector.try_normalize()?;
            let landing = self.arena.clamp(from + dir * self.distance);
            if landing.distance(from) <= EPSILON {
                return None;
            }
            let local_after = to_local(player.center, landing, angle);
            let after = self.align(
                local_after,
                player.center.distance(landing),
                length,
                width,
                player.radius,
            );
            let new_shift = (local_after - after.target).length();
            let improvement = shift - new_shift;
            let resolved = now
                .flags()
                .iter()
                .zip(after.flags())
                .filter(|(before, after)| **before && !*after)
                .count()
                + usize::from(by_shift && improvement > 0.0);
            let improved = improvement > self.m(w.improve_min)
                || (shift > 0.0 && new_shift < shift * w.improve_ratio)
                || new_shift < self.m(w.close_enough);
            if resolved == 0 && !improved {
                return None;
            }
            let penalties = [w.penalty_behind, w.penalty_far_ahead, w.penalty_lateral, w.penalty_too_far];
            let penalty: f32 = after
                .flags()
                .iter()
                .zip(penalties)
                .filter(|(flag, _)| **flag)
                .map(|(_, p)| self.m(p))
                .sum();
            let reward = resolved as f32 * self.m(w.reward_resolved) + improvement.max(0.0) * w.reward_improvement;
            Some(Candidate {
                angle: dir.y.atan2(dir.x),
                shift: new_shift,
                improvement,
                score: new_shift + penalty - reward,
            })
        };

        let tie_score = self.m(w.tie_score);
        let tie_shift = self.m(w.tie_shift);
        let mut best: Option<Candidate> = None;
        for c in candidates.into_iter().filter_map(evaluate) {
            let better = match best {
                None => true,
                Some(b) => {
                    c.score < b.score - tie_score
                        || ((c.score - b.score).abs() <= tie_score
                            && (c.shift < b.shift - tie_shift
                                || ((c.shift - b.shift).abs() <= tie_shift && c.improvement > b.improvement)))
                }
            };
            if better {
                best = Some(c);
            }
        }
        best.map(|c| c.angle)
    }
}

#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::super::harness::{self, METER};
    use super::*;
    use crate::enemies::skills::Severity;
    use crate::geometry::Shape;

    fn planner<'a>(weights: &'a DashWeights, arena: &'a Arena) -> DashPlanner<'a> {
        DashPlanner {
            weights,
            arena,
            meter: METER,
            distance: 2.5 * METER,
        }
    }

    fn lance() -> ShapeSpec {
        JustynaTuning::default().lance_strike.shape
    }

    #[test]
    fn runs_its_rotation_in_order() {
        for seed in 0..20 {
            let mut justyna = Justyna::new(Vec2::new(40.0, 270.0), JustynaTuning::default(), METER);
            let run = harness::run_to_completion(&mut justyna, seed, harness::wandering);
            let mut used = run.rotation.spent.clone();
            used.extend(run.rotation.discarded.iter());
            assert_eq!(used.len(), 4);
            assert_eq!(&run.rotation.spent[..2], &["Burst", "Lance"]);
            assert_eq!(run.rotation.spent.last(), Some(&"Storm"));
            assert!(run.outcomes.iter().all(|o| !o.is_danger()));
        }
    }

    #[test]
    fn standing_still_takes_every_pulse() {
        let tuning = JustynaTuning {
            speed: 0.0,
            ..Default::default()
        };
        let origin = Vec2::new(300.0, 270.0);
        let mut justyna = Justyna::new(origin, tuning, METER);
        let run = harness::run_to_completion(
            &mut justyna,
            3,
            harness::standing(origin + Vec2::new(3.0 * METER, 0.0)),
        );
        let count = |name: &str| {
            run.outcomes
                .iter()
                .filter(|o| matches!(o, Outcome::Hit { severity: Severity::Caution, skill } if *skill == name))
                .count()
        };
        assert_eq!(count("Burst"), 1);
        assert_eq!(count("Lance"), 2);
        assert_eq!(count("Pierce"), 1);
        assert_eq!(count("Storm"), 8);
        assert_eq!(run.outcomes.len(), 12);
    }

    #[test]
    fn pierce_is_dropped_when_its_window_closes() {
        let tuning = JustynaTuning {
            speed: 0.0,
            pierce_window: 0.05,
            ..Default::default()
        };
        let origin = Vec2::new(300.0, 270.0);
        let mut justyna = Justyna::new(origin, tuning, METER);
        let run = harness::run_to_completion(
            &mut justyna,
            5,
            harness::standing(origin + Vec2::new(3.0 * METER, 0.0)),
        );
        assert_eq!(run.rotation.spent, vec!["Burst", "Lance", "Storm"]);
        assert_eq!(run.rotation.discarded, vec!["Pierce"]);
    }

    #[test]
    fn lined_up_player_needs_no_dash() {
        let (w, arena) = (DashWeights::default(), Arena::default());
        let from = Vec2::new(300.0, 270.0);
        let player = Circle::new(from + Vec2::new(3.0 * METER, 0.0), 18.0);
        assert_eq!(planner(&w, &arena).choose(from, player, lance(), 0.0), None);
    }

    #[test]
    fn dashes_back_when_the_player_is_behind() {
        let (w, arena) = (DashWeights::default(), Arena::default());
        let from = Vec2::new(500.0, 270.0);
        let player = Circle::new(from - Vec2::new(2.0 * METER, 0.0), 18.0);
        let angle = planner(&w, &arena).choose(from, player, lance(), 0.0).expect("no dash");
        assert!(angle.cos() < 0.0, "{angle}");
    }

    #[test]
    fn dashes_sideways_toward_a_lateral_player() {
        let (w, arena) = (DashWeights::default(), Arena::default());
        let from = Vec2::new(300.0, 200.0);
        let player = Circle::new(from + Vec2::new(3.0, 3.0) * METER, 18.0);
        let angle = planner(&w, &arena).choose(from, player, lance(), 0.0).expect("no dash");
        assert!(angle.sin() > 0.0, "{angle}");
    }

    #[test]
    fn no_dash_when_the_player_is_on_top() {
        let (w, arena) = (DashWeights::default(), Arena::default());
        let from = Vec2::new(300.0, 200.0);
        let player = Circle::new(from + Vec2::new(5.0, 0.0), 18.0);
        assert_eq!(planner(&w, &arena).choose(from, player, lance(), 2.0), None);
    }

    #[test]
    fn reposition_dash_respects_its_cooldown() {
        // she only moves by dashing, so the player stays out of reach
        let tuning = JustynaTuning {
            speed: 0.0,
            ..Default::default()
        };
        let mut justyna = Justyna::new(Vec2::new(100.0, 270.0), tuning, METER);
        justyna.queue.advance();
        justyna.fsm.set(State::Move);
        let mut rng = StdRng::seed_from_u64(4);
        let far = Circle::new(Vec2::new(900.0, 270.0), 18.0);
        let mut dashes = 0;
        let mut was_dashing = false;
        for _ in 0..300 {
            let mut c = harness::ctx(far, &mut rng);
            justyna.update(harness::DT, &mut c);
            let dashing = justyna.dash.is_some();
            if dashing && !was_dashing {
                dashes += 1;
            }
            was_dashing = dashing;
        }
        assert_eq!(justyna.state_name(), "Move");
        assert_eq!(dashes, 2);
        assert!(justyna.body().pos.x > 100.0 + 4.9 * METER);
    }

    /// Justyna with Lance up next and no walking speed.
    fn lance_ready(pos: Vec2) -> Justyna {
        let tuning = JustynaTuning {
            speed: 0.0,
            ..Default::default()
        };
        let mut justyna = Justyna::new(pos, tuning, METER);
        justyna.queue.advance();
        justyna.fsm.set(State::Move);
        justyna
    }

    fn lance_hits(outcomes: &[Outcome]) -> usize {
        outcomes
            .iter()
            .filter(|o| matches!(o, Outcome::Hit { skill: "Lance", .. }))
            .count()
    }

    #[test]
    fn lance_waits_for_the_dash_and_fires_from_where_it_lands() {
        let start = Vec2::new(200.0, 270.0);
        let mut justyna = lance_ready(start);
        let player = Circle::new(start + Vec2::new(8.0 * METER, 0.0), 2.0);
        let mut rng = StdRng::seed_from_u64(9);
        let mut outcomes = Vec::new();
        let mut dashed = false;
        let mut cast_from = None;
        for _ in 0..240 {
            let mut c = harness::ctx(player, &mut rng);
            outcomes.extend(justyna.update(harness::DT, &mut c));
            dashed |= justyna.dash.is_some();
            if cast_from.is_none() && justyna.state_name() == "LanceCast" {
                assert!(justyna.dash.is_none(), "cast started mid-dash");
                cast_from = Some(justyna.body().pos);
            }
            if justyna.rotation().spent.contains(&"Lance") {
                break;
            }
        }
        assert!(dashed);
        let cast_from = cast_from.expect("Lance never started");
        assert!((cast_from.distance(player.center) - 5.5 * METER).abs() < 1.0, "{cast_from:?}");
        assert_eq!(lance_hits(&outcomes), 2);
    }

    #[test]
    fn dashes_sideways_mid_lance_to_keep_the_player_in_the_rectangle() {
        let start = Vec2::new(300.0, 200.0);
        let mut justyna = lance_ready(start);
        let mut rng = StdRng::seed_from_u64(2);
        let ahead = Circle::new(start + Vec2::new(3.0 * METER, 0.0), 18.0);
        let mut c = harness::ctx(ahead, &mut rng);
        justyna.update(harness::DT, &mut c);
        assert_eq!(justyna.state_name(), "LanceCast");
        assert!(justyna.dash.is_none());

        // the player steps off the locked lance line
        let aside = Circle::new(start + Vec2::new(3.0, 3.0) * METER, 18.0);
        let mut outcomes = Vec::new();
        let mut dashed = false;
        for _ in 0..240 {
            let mut c = harness::ctx(aside, &mut rng);
            outcomes.extend(justyna.update(harness::DT, &mut c));
            dashed |= justyna.dash.is_some();
            if dashed && justyna.dash.is_none() && justyna.state_name() == "LanceCast" {
                // the landed dash carries the rectangle, the angle stays put
                let Some(Telegraph {
                    shape: Shape::RotatedRect { origin, angle, .. },
                    ..
                }) = justyna.telegraphs().pop()
                else {
                    panic!("lance telegraph missing");
                };
                assert_eq!(origin, justyna.body().pos);
                assert_eq!(angle, 0.0);
            }
            if justyna.rotation().spent.contains(&"Lance") {
                break;
            }
        }
        assert!(dashed);
        let pos = justyna.body().pos;
        assert!(pos.y > start.y + 2.0 * METER, "{pos:?}");
        assert!((pos.x - start.x).abs() < 0.5 * METER, "{pos:?}");
        assert_eq!(lance_hits(&outcomes), 2);
    }
}
