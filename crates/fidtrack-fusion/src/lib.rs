//! Orientation sensor fusion for marker position tracking.
//!
//! Raw accelerometer, magnetometer and gyroscope samples arrive
//! asynchronously on whatever cadence their sources provide; a fixed-rate
//! fusion tick blends the tilt-compass and gyro-integrated estimates into a
//! single orientation and publishes it over a watch channel.

pub mod calibration;
pub mod compass;
pub mod filter;
pub mod gyro;
pub mod rotation;
pub mod types;

pub use filter::{FusionEngine, FusionSettings};
pub use types::{FusedOrientation, Orientation, SensorSample};

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use tokio::sync::watch;
use tokio::time::MissedTickBehavior;

/// Writer handle for sensor callbacks.
///
/// Each push writes only its own stream's latest-sample slot under a brief
/// lock; nothing blocks waiting for another stream. Pushes after the
/// session has stopped are dropped.
#[derive(Clone)]
pub struct SensorFeed {
    engine: Arc<Mutex<FusionEngine>>,
    active: Arc<AtomicBool>,
}

impl SensorFeed {
    pub fn push_accel(&self, sample: SensorSample) {
        if self.active.load(Ordering::Relaxed) {
            self.lock().push_accel(sample.values);
        }
    }

    pub fn push_mag(&self, sample: SensorSample) {
        if self.active.load(Ordering::Relaxed) {
            self.lock().push_mag(sample.values);
        }
    }

    pub fn push_gyro(&self, sample: SensorSample) {
        if self.active.load(Ordering::Relaxed) {
            self.lock().push_gyro(sample.values, sample.timestamp_ns);
        }
    }

    fn lock(&self) -> MutexGuard<'_, FusionEngine> {
        self.engine.lock().unwrap_or_else(|e| e.into_inner())
    }
}

/// A running fusion session.
///
/// Owns the engine and the periodic tick task. Dropping the session (or
/// calling [`stop`](Self::stop)) halts the tick; in-flight blends are never
/// partially visible because each tick commits a complete snapshot.
pub struct TrackerSession {
    engine: Arc<Mutex<FusionEngine>>,
    active: Arc<AtomicBool>,
    orientation_rx: watch::Receiver<FusedOrientation>,
    task: tokio::task::JoinHandle<()>,
}

impl TrackerSession {
    /// Create the engine and start the periodic fusion tick.
    ///
    /// Must be called from within a tokio runtime.
    pub fn start(settings: FusionSettings) -> Self {
        let tick_interval = settings.tick_interval;
        let engine = Arc::new(Mutex::new(FusionEngine::new(settings)));
        let active = Arc::new(AtomicBool::new(true));
        let (orientation_tx, orientation_rx) = watch::channel(FusedOrientation::default());

        tracing::info!(?tick_interval, "tracker session starting");
        let task = tokio::spawn(tick_loop(engine.clone(), orientation_tx, tick_interval));

        Self {
            engine,
            active,
            orientation_rx,
            task,
        }
    }

    /// Writer handle for the sensor sources.
    pub fn feed(&self) -> SensorFeed {
        SensorFeed {
            engine: self.engine.clone(),
            active: self.active.clone(),
        }
    }

    /// Latest fused snapshot (non-blocking).
    pub fn orientation(&self) -> FusedOrientation {
        *self.orientation_rx.borrow()
    }

    /// Subscribe to fused snapshots for display collaborators.
    pub fn subscribe(&self) -> watch::Receiver<FusedOrientation> {
        self.orientation_rx.clone()
    }

    /// Halt the periodic tick; subsequent sensor pushes become no-ops.
    pub fn stop(&self) {
        self.active.store(false, Ordering::Relaxed);
        self.task.abort();
        tracing::info!("tracker session stopped");
    }
}

impl Drop for TrackerSession {
    fn drop(&mut self) {
        self.active.store(false, Ordering::Relaxed);
        self.task.abort();
    }
}

/// Background task: run the fusion tick at a fixed rate and publish each
/// snapshot.
async fn tick_loop(
    engine: Arc<Mutex<FusionEngine>>,
    orientation_tx: watch::Sender<FusedOrientation>,
    tick_interval: std::time::Duration,
) {
    let mut ticker = tokio::time::interval(tick_interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        ticker.tick().await;
        let snapshot = {
            let mut engine = engine.lock().unwrap_or_else(|e| e.into_inner());
            engine.tick()
        };
        if let Some(snapshot) = snapshot {
            if orientation_tx.send(snapshot).is_err() {
                // All receivers gone: the session handle was dropped.
                break;
            }
            if snapshot.tick % 100 == 0 {
                tracing::debug!(tick = snapshot.tick, "fusion heartbeat");
            }
        }
    }
}
