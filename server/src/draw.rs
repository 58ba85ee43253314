//! Draw pool and draw history.
//!
//! Within a round the two are complementary: every number in 1..=75 sits in
//! exactly one of them. Only the session moves numbers from one to the other.

use crate::error::GameError;
use rand::Rng;
use shared::{Number, MAX_NUMBER};
use std::collections::HashSet;

/// Numbers not yet drawn this round.
#[derive(Debug, Clone)]
pub struct DrawPool {
    remaining: Vec<Number>,
}

impl DrawPool {
    /// Creates a full pool.
    pub fn new() -> Self {
        let mut pool = Self {
            remaining: Vec::with_capacity(MAX_NUMBER as usize),
        };
        pool.initialize();
        pool
    }

    /// Refills the pool with the whole number space.
    pub fn initialize(&mut self) {
        self.remaining.clear();
        self.remaining.extend(1..=MAX_NUMBER);
    }

    /// Removes and returns a uniformly chosen number.
    pub fn draw_random<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Result<Number, GameError> {
        if self.remaining.is_empty() {
            return Err(GameError::EmptyPool);
        }
        let index = rng.gen_range(0..self.remaining.len());
        Ok(self.remaining.swap_remove(index))
    }

    pub fn contains(&self, number: Number) -> bool {
        self.remaining.contains(&number)
    }

    pub fn remaining(&self) -> &[Number] {
        &self.remaining
    }

    pub fn len(&self) -> usize {
        self.remaining.len()
    }

    pub fn is_empty(&self) -> bool {
        self.remaining.is_empty()
    }
}

impl Default for DrawPool {
    fn default() -> Self {
        Self::new()
    }
}

/// Ordered record of this round's draws.
#[derive(Debug, Clone, Default)]
pub struct DrawHistory {
    order: Vec<Number>,
    drawn: HashSet<Number>,
}

impl DrawHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a draw. The pool guarantees `number` is fresh.
    pub fn append(&mut self, number: Number) {
        let fresh = self.drawn.insert(number);
        debug_assert!(fresh, "number {} drawn twice", number);
        self.order.push(number);
    }

    pub fn contains(&self, number: Number) -> bool {
        self.drawn.contains(&number)
    }

    /// Draws so far, oldest first.
    pub fn snapshot(&self) -> Vec<Number> {
        self.order.clone()
    }

    pub fn as_slice(&self) -> &[Number] {
        &self.order
    }

    pub fn last(&self) -> Option<Number> {
        self.order.last().copied()
    }

    /// Set view for win checks.
    pub fn drawn_set(&self) -> &HashSet<Number> {
        &self.drawn
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn clear(&mut self) {
        self.order.clear();
        self.drawn.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_new_pool_is_full() {
        let pool = DrawPool::new();
        assert_eq!(pool.len(), MAX_NUMBER as usize);
        assert!(pool.contains(1));
        assert!(pool.contains(75));
        assert!(!pool.contains(0));
        assert!(!pool.contains(76));
    }

    #[test]
    fn test_draw_until_empty() {
        let mut rng = StdRng::seed_from_u64(42);
        let mut pool = DrawPool::new();
        let mut seen = HashSet::new();

        while !pool.is_empty() {
            let number = pool.draw_random(&mut rng).unwrap();
            assert!((1..=MAX_NUMBER).contains(&number));
            assert!(seen.insert(number), "{} drawn twice", number);
            assert!(!pool.contains(number));
        }

        assert_eq!(seen.len(), MAX_NUMBER as usize);
        assert_eq!(pool.draw_random(&mut rng), Err(GameError::EmptyPool));
    }

    #[test]
    fn test_initialize_refills() {
        let mut rng = StdRng::seed_from_u64(5);
        let mut pool = DrawPool::new();
        for _ in 0..10 {
            pool.draw_random(&mut rng).unwrap();
        }
        assert_eq!(pool.len(), 65);

        pool.initialize();
        assert_eq!(pool.len(), 75);
        let mut numbers = pool.remaining().to_vec();
        numbers.sort_unstable();
        assert_eq!(numbers, (1..=MAX_NUMBER).collect::<Vec<_>>());
    }

    #[test]
    fn test_any_number_can_come_first() {
        // Over many fresh pools every number shows up as a first draw.
        let mut rng = StdRng::seed_from_u64(9);
        let mut firsts = HashSet::new();
        for _ in 0..2000 {
            let mut pool = DrawPool::new();
            firsts.insert(pool.draw_random(&mut rng).unwrap());
        }
        assert_eq!(firsts.len(), MAX_NUMBER as usize);
    }

    #[test]
    fn test_history_order_and_lookup() {
        let mut history = DrawHistory::new();
        assert!(history.is_empty());
        assert_eq!(history.last(), None);

        history.append(7);
        history.append(42);
        history.append(63);

        assert_eq!(history.snapshot(), vec![7, 42, 63]);
        assert_eq!(history.last(), Some(63));
        assert!(history.contains(42));
        assert!(!history.contains(41));
        assert_eq!(history.drawn_set().len(), 3);
    }

    #[test]
    fn test_history_clear() {
        let mut history = DrawHistory::new();
        history.append(1);
        history.append(2);
        history.clear();

        assert!(history.is_empty());
        assert!(!history.contains(1));
        assert!(history.drawn_set().is_empty());
    }
}
