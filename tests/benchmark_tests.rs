//! Performance benchmarks for critical game systems

use rand::rngs::StdRng;
use rand::SeedableRng;
use server::draw::{DrawHistory, DrawPool};
use server::session::Session;
use shared::{has_win, Card, MAX_NUMBER};
use std::collections::HashSet;
use std::time::Instant;

/// Benchmarks win detection against a half-drawn round
#[test]
fn benchmark_win_detection() {
    let mut rng = StdRng::seed_from_u64(9);
    let cards: Vec<Card> = (0..100).map(|_| Card::generate(&mut rng)).collect();
    let drawn: HashSet<_> = (1..=MAX_NUMBER).step_by(2).collect();

    let iterations = 1_000;
    let start = Instant::now();

    let mut wins = 0;
    for _ in 0..iterations {
        for card in &cards {
            if has_win(card, &drawn) {
                wins += 1;
            }
        }
    }

    let duration = start.elapsed();
    println!(
        "Win detection: {} checks in {:?} ({:.2} ns/check, {} wins)",
        iterations * cards.len(),
        duration,
        duration.as_nanos() as f64 / (iterations * cards.len()) as f64,
        wins
    );

    // 100k checks should complete in under 2 seconds
    assert!(duration.as_millis() < 2000);
}

/// Benchmarks draining the pool into the history
#[test]
fn benchmark_full_pool_draw() {
    let mut rng = StdRng::seed_from_u64(1);
    let mut pool = DrawPool::new();
    let mut history = DrawHistory::new();

    let iterations = 1_000;
    let start = Instant::now();

    for _ in 0..iterations {
        pool.initialize();
        history.clear();
        while let Ok(number) = pool.draw_random(&mut rng) {
            history.append(number);
        }
        assert_eq!(history.len(), MAX_NUMBER as usize);
    }

    let duration = start.elapsed();
    println!(
        "Full pool draw: {} rounds in {:?} ({:.2} μs/round)",
        iterations,
        duration,
        duration.as_micros() as f64 / iterations as f64
    );

    // Should complete in under 1 second
    assert!(duration.as_millis() < 1000);
}

/// Benchmarks card generation and validation
#[test]
fn benchmark_card_generation() {
    let mut rng = StdRng::seed_from_u64(5);

    let iterations = 10_000;
    let start = Instant::now();

    for _ in 0..iterations {
        let card = Card::generate(&mut rng);
        assert!(card.validate().is_ok());
    }

    let duration = start.elapsed();
    println!(
        "Card generation: {} cards in {:?} ({:.2} μs/card)",
        iterations,
        duration,
        duration.as_micros() as f64 / iterations as f64
    );

    // Should complete in under 2 seconds
    assert!(duration.as_millis() < 2000);
}

/// Stress tests reconciliation snapshots with many players
#[test]
fn stress_test_initial_state() {
    let mut session = Session::with_seed(3);
    let mut rng = StdRng::seed_from_u64(3);
    for id in 0..64 {
        session.join(id, None, Some(Card::generate(&mut rng)));
    }
    session.start();
    for _ in 0..40 {
        session.tick();
    }

    let iterations = 1_000;
    let start = Instant::now();

    for id in 0..iterations {
        let messages = session.connect(1_000 + id);
        assert_eq!(messages.len(), 1);
    }

    let duration = start.elapsed();
    println!(
        "Initial state: {} snapshots in {:?}",
        iterations, duration
    );

    // Should complete in under 1 second
    assert!(duration.as_millis() < 1000);
}
