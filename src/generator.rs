//! Synthetic event source
//!
//! Emits events with a uniformly drawn user id and a normally distributed
//! value, pausing a uniform random fraction of `max_interarrival` between
//! events (roughly Poisson-like arrivals, about 100 events/s by default).
//! `put` suspends while the queue is full, so the consumer sets the pace.

use crate::config::GeneratorConfig;
use crate::event::{Clock, Event, SystemClock, UserId};
use crate::queue::QueueProducer;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::f64::consts::TAU;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tracing::{debug, info};

/// Produces synthetic events into the pipeline queue
#[derive(Debug)]
pub struct EventGenerator {
    config: GeneratorConfig,
    clock: Arc<dyn Clock>,
    rng: StdRng,
    limit: Option<u64>,
}

impl EventGenerator {
    #[must_use]
    pub fn new(config: &GeneratorConfig) -> Self {
        Self::with_clock(config, Arc::new(SystemClock))
    }

    /// Create a generator stamping events with the given clock
    ///
    /// Seeded from `config.seed` when present, otherwise from OS entropy.
    #[must_use]
    pub fn with_clock(config: &GeneratorConfig, clock: Arc<dyn Clock>) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self {
            config: *config,
            clock,
            rng,
            limit: None,
        }
    }

    /// Stop after producing `limit` events
    #[must_use]
    pub fn with_limit(mut self, limit: u64) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Draw the next event, stamped now
    pub fn next_event(&mut self) -> Event {
        let user = self.rng.gen_range(1..=self.config.max_user_id.max(1));
        let value = self.config.value_mean + self.config.value_std_dev * self.standard_normal();
        Event::stamped(UserId::new(user), value, self.clock.as_ref())
    }

    /// Box-Muller transform over two uniform draws
    fn standard_normal(&mut self) -> f64 {
        // 1 - [0, 1) keeps u1 away from zero
        let u1 = 1.0 - self.rng.gen_range(0.0..1.0_f64);
        let u2 = self.rng.gen_range(0.0..1.0_f64);
        (-2.0 * u1.ln()).sqrt() * (TAU * u2).cos()
    }

    /// Draw the pause before the next event
    pub fn next_pause(&mut self) -> Duration {
        self.config
            .max_interarrival
            .mul_f64(self.rng.gen_range(0.0..1.0))
    }

    /// Produce events until shutdown, the limit, or the consumer going away
    ///
    /// `shutdown` fires when it changes to `true` or its sender is dropped.
    /// The producer half is dropped on return so the consumer can drain.
    /// Returns the number of events enqueued.
    pub async fn run(
        mut self,
        producer: QueueProducer<Event>,
        mut shutdown: watch::Receiver<bool>,
    ) -> u64 {
        let mut produced = 0u64;
        info!(
            max_user_id = self.config.max_user_id,
            max_interarrival_ms = self.config.max_interarrival.as_millis() as u64,
            "Generator started"
        );

        loop {
            if *shutdown.borrow_and_update() || self.limit.is_some_and(|limit| produced >= limit) {
                break;
            }

            let event = self.next_event();
            tokio::select! {
                biased;
                _ = shutdown.changed() => break,
                result = producer.put(event) => {
                    if result.is_err() {
                        debug!("Consumer gone, generator stopping");
                        break;
                    }
                }
            }
            produced += 1;

            let pause = self.next_pause();
            if !pause.is_zero() {
                tokio::select! {
                    biased;
                    _ = shutdown.changed() => break,
                    _ = tokio::time::sleep(pause) => {}
                }
            }
        }

        drop(producer);
        info!(produced, "Generator stopped");
        produced
    }
}
