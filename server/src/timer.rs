//! Automatic draw timer.
//!
//! The timer lives inside the server loop next to the session. After every
//! handled event the loop calls [`DrawTimer::sync`], which arms the interval
//! when a round starts and drops it as soon as the phase leaves `Running`.
//! A dropped interval can never fire, so no draw lands in a reset or
//! finished round.

use log::{debug, info};
use shared::GamePhase;
use std::time::Duration;
use tokio::time::{interval_at, Instant, Interval, MissedTickBehavior};

pub struct DrawTimer {
    period: Duration,
    interval: Option<Interval>,
    round: u64,
}

impl DrawTimer {
    pub fn new(period: Duration) -> Self {
        Self {
            period,
            interval: None,
            round: 0,
        }
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    pub fn is_armed(&self) -> bool {
        self.interval.is_some()
    }

    /// Arms or cancels the timer to match the session.
    pub fn sync(&mut self, phase: GamePhase, round: u64) {
        if phase.is_running() {
            if self.interval.is_none() || self.round != round {
                // First draw one full period after the start.
                let mut interval = interval_at(Instant::now() + self.period, self.period);
                interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
                self.interval = Some(interval);
                self.round = round;
                info!(
                    "Draw timer armed for round {} every {:?}",
                    round, self.period
                );
            }
        } else if self.interval.take().is_some() {
            debug!("Draw timer for round {} cancelled ({})", self.round, phase);
        }
    }

    /// Resolves on the next draw, or never while disarmed.
    pub async fn tick(&mut self) {
        match self.interval.as_mut() {
            Some(interval) => {
                interval.tick().await;
            }
            None => std::future::pending::<()>().await,
        }
    }
}
