//! Skill rotations: the once-each order an enemy works through before it retires.

use std::collections::VecDeque;
use std::fmt::Debug;

use rand::seq::SliceRandom;
use rand::{Rng, RngCore};

/// Identifier of one skill in an archetype's kit.
pub trait SkillKey: Copy + Eq + Debug + Send + Sync + 'static {
    fn name(self) -> &'static str;
}

/// Result of consuming the front of the queue.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Advance {
    /// More skills remain.
    Continue,
    /// The rotation is over; the enemy should retire.
    Exhausted,
}

/// Read-only copy of a rotation, for tests and debug overlays.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RotationView {
    pub spent: Vec<&'static str>,
    pub pending: Vec<&'static str>,
    pub discarded: Vec<&'static str>,
}

/// Ordering constraints for a rotation, resolved once at spawn.
#[derive(Clone, Debug)]
pub enum RotationPlan<S> {
    /// Always this order.
    Fixed(Vec<S>),
    /// Uniform shuffle over orders that don't end with any of `never_last`.
    Shuffled { skills: Vec<S>, never_last: Vec<S> },
    /// One of several fixed orders, picked uniformly.
    OneOf(Vec<Vec<S>>),
    /// `base` in order, with `wildcard` inserted uniformly among `n + 1` slots.
    WithWildcard { base: Vec<S>, wildcard: S },
}

impl<S: SkillKey> RotationPlan<S> {
    pub fn shuffled(skills: Vec<S>) -> Self {
        RotationPlan::Shuffled {
            skills,
            never_last: Vec::new(),
        }
    }

    /// Resolve the plan into a concrete queue.
    pub fn build(&self, rng: &mut dyn RngCore) -> SkillQueue<S> {
        let order = match self {
            RotationPlan::Fixed(order) => order.clone(),
            RotationPlan::Shuffled { skills, never_last } => {
                let mut order = skills.clone();
                order.shuffle(rng);
                if let Some(&last) = order.last() {
                    if never_last.contains(&last) {
                        // Swap with a random earlier slot that may end the
                        // rotation. Keeps the valid orders equally likely.
                        let free: Vec<usize> = (0..order.len() - 1)
                            .filter(|&i| !never_last.contains(&order[i]))
                            .collect();
                        if let Some(&i) = free.choose(rng) {
                            let end = order.len() - 1;
                            order.swap(i, end);
                        }
                    }
                }
                order
            }
            RotationPlan::OneOf(orders) => orders.choose(rng).cloned().unwrap_or_default(),
            RotationPlan::WithWildcard { base, wildcard } => {
                let mut order = base.clone();
                let at = rng.gen_range(0..=order.len());
                order.insert(at, *wildcard);
                order
            }
        };
        SkillQueue::new(order)
    }
}

/// The live rotation of one enemy.
#[derive(Clone, Debug)]
pub struct SkillQueue<S> {
    pending: VecDeque<S>,
    spent: Vec<S>,
    discarded: Vec<S>,
}

impl<S: SkillKey> SkillQueue<S> {
    pub fn new(order: Vec<S>) -> Self {
        Self {
            pending: order.into(),
            spent: Vec::new(),
            discarded: Vec::new(),
        }
    }

    pub fn peek_next(&self) -> Option<S> {
        self.pending.front().copied()
    }

    /// Mark the front skill as used.
    pub fn advance(&mut self) -> Advance {
        if let Some(skill) = self.pending.pop_front() {
            self.spent.push(skill);
        }
        self.status()
    }

    /// Drop the front skill without using it (e.g. a follow-up whose window closed).
    pub fn discard_next(&mut self) -> Advance {
        if let Some(skill) = self.pending.pop_front() {
            self.discarded.push(skill);
        }
        self.status()
    }

    fn status(&self) -> Advance {
        if self.pending.is_empty() {
            Advance::Exhausted
        } else {
            Advance::Continue
        }
    }

    pub fn remaining(&self) -> usize {
        self.pending.len()
    }

    /// Whether the front skill is the last one left.
    pub fn is_final(&self) -> bool {
        self.pending.len() == 1
    }

    pub fn is_exhausted(&self) -> bool {
        self.pending.is_empty()
    }

    pub fn pending(&self) -> impl Iterator<Item = S> + '_ {
        self.pending.iter().copied()
    }

    pub fn spent(&self) -> &[S] {
        &self.spent
    }

    pub fn discarded(&self) -> &[S] {
        &self.discarded
    }

    /// Names of the spent skills, in order.
    pub fn spent_names(&self) -> Vec<&'static str> {
        self.spent.iter().map(|s| s.name()).collect()
    }

    pub fn pending_names(&self) -> Vec<&'static str> {
        self.pending.iter().map(|s| s.name()).collect()
    }

    pub fn view(&self) -> RotationView {
        RotationView {
            spent: self.spent_names(),
            pending: self.pending_names(),
            discarded: self.discarded.iter().map(|s| s.name()).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;

    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    enum K {
        A,
        B,
        C,
        D,
    }

    impl SkillKey for K {
        fn name(self) -> &'static str {
            match self {
                K::A => "A",
                K::B => "B",
                K::C => "C",
                K::D => "D",
            }
        }
    }

    #[test]
    fn advance_reports_exhaustion_on_last_pop() {
        let mut q = SkillQueue::new(vec![K::A, K::B]);
        assert_eq!(q.peek_next(), Some(K::A));
        assert!(!q.is_final());
        assert_eq!(q.advance(), Advance::Continue);
        assert!(q.is_final());
        assert_eq!(q.advance(), Advance::Exhausted);
        assert_eq!(q.spent(), &[K::A, K::B]);
        assert_eq!(q.peek_next(), None);
    }

    #[test]
    fn discard_is_tracked_separately() {
        let mut q = SkillQueue::new(vec![K::A, K::B, K::C]);
        q.advance();
        q.discard_next();
        assert_eq!(q.spent(), &[K::A]);
        assert_eq!(q.discarded(), &[K::B]);
        assert_eq!(q.pending_names(), vec!["C"]);
    }

    #[test]
    fn never_last_holds_and_stays_uniform() {
        let plan = RotationPlan::Shuffled {
            skills: vec![K::A, K::B, K::C],
            never_last: vec![K::B],
        };
        let mut rng = StdRng::seed_from_u64(11);
        let mut counts: HashMap<Vec<K>, u32> = HashMap::new();
        for _ in 0..10_000 {
            let q = plan.build(&mut rng);
            let order: Vec<K> = q.pending().collect();
            assert_eq!(order.len(), 3);
            assert_ne!(order.last(), Some(&K::B));
            *counts.entry(order).or_default() += 1;
        }
        assert_eq!(counts.len(), 4);
        for (order, n) in counts {
            assert!((2200..2800).contains(&n), "{order:?} appeared {n} times");
        }
    }

    #[test]
    fn wildcard_lands_in_every_slot() {
        let plan = RotationPlan::WithWildcard {
            base: vec![K::A, K::B, K::C],
            wildcard: K::D,
        };
        let mut rng = StdRng::seed_from_u64(5);
        let mut seen = [false; 4];
        for _ in 0..500 {
            let order: Vec<K> = plan.build(&mut rng).pending().collect();
            let at = order.iter().position(|&k| k == K::D).unwrap();
            seen[at] = true;
            let rest: Vec<K> = order.into_iter().filter(|&k| k != K::D).collect();
            assert_eq!(rest, vec![K::A, K::B, K::C]);
        }
        assert!(seen.iter().all(|&s| s));
    }

    #[test]
    fn one_of_picks_a_listed_order() {
        let plan = RotationPlan::OneOf(vec![vec![K::A, K::B], vec![K::B, K::A]]);
        let mut rng = StdRng::seed_from_u64(2);
        for _ in 0..100 {
            let order: Vec<K> = plan.build(&mut rng).pending().collect();
            assert!(order == vec![K::A, K::B] || order == vec![K::B, K::A]);
        }
    }
}
