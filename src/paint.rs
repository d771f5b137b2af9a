//! Paint-timing telemetry: the bus the host publishes on, the shared signal
//! cell, and the passive observer connecting the two.

use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::RwLock;
use tokio::sync::broadcast;
use tracing::debug;

use crate::errors::HudError;

/// One host notification: the paint candidates reported in a single callback,
/// as timestamps in milliseconds.
#[derive(Clone, Debug, Default)]
pub struct PaintBatch {
    pub candidates: Vec<f64>,
}

/// Bus carrying paint-timing batches from the host to subscribers.
#[async_trait]
pub trait TelemetryBus: Send + Sync {
    async fn publish(&self, batch: PaintBatch) -> Result<(), HudError>;
    fn subscribe(&self) -> broadcast::Receiver<PaintBatch>;
}

/// Simple in-memory bus; the CLI replays snapshot timelines through it.
pub struct InMemoryTelemetry {
    sender: broadcast::Sender<PaintBatch>,
}

impl InMemoryTelemetry {
    pub fn new(capacity: usize) -> Arc<Self> {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Arc::new(Self { sender })
    }
}

#[async_trait]
impl TelemetryBus for InMemoryTelemetry {
    async fn publish(&self, batch: PaintBatch) -> Result<(), HudError> {
        self.sender
            .send(batch)
            .map(|_| ())
            .map_err(|err| HudError::Telemetry(err.to_string()))
    }

    fn subscribe(&self) -> broadcast::Receiver<PaintBatch> {
        self.sender.subscribe()
    }
}

/// Latest observed largest-contentful-paint time, in whole milliseconds.
///
/// Single writer (the observer task), any number of readers. Starts unknown
/// and is never reset for the life of the page.
#[derive(Clone, Debug, Default)]
pub struct PaintSignal {
    cell: Arc<RwLock<Option<u64>>>,
}

impl PaintSignal {
    pub fn unknown() -> Self {
        Self::default()
    }

    /// Pre-seeded signal, for hosts that already measured the paint.
    pub fn with_value(ms: u64) -> Self {
        let signal = Self::default();
        signal.record(ms);
        signal
    }

    pub fn latest(&self) -> Option<u64> {
        *self.cell.read()
    }

    fn record(&self, ms: u64) {
        *self.cell.write() = Some(ms);
    }
}

/// Passive observer accumulating host paint telemetry into a [`PaintSignal`].
pub struct PaintObserver;

impl PaintObserver {
    /// Subscribe once, for the lifetime of the process.
    ///
    /// Returns the signal handle. Hosts without paint telemetry pass `None`;
    /// the signal then stays unknown forever and no task is spawned. Nothing
    /// here can fail past this boundary.
    pub fn subscribe(telemetry: Option<&dyn TelemetryBus>) -> PaintSignal {
        let signal = PaintSignal::unknown();
        let Some(bus) = telemetry else {
            debug!("paint telemetry unavailable; LCP stays unknown");
            return signal;
        };

        let mut rx = bus.subscribe();
        let writer = signal.clone();
        tokio::spawn(async move {
            loop {
                match rx.recv().await {
                    Ok(batch) => {
                        // Only the most recent candidate of a batch counts.
                        if let Some(candidate) = batch.candidates.last() {
                            writer.record(round_ms(*candidate));
                        }
                    }
                    Err(broadcast::error::RecvError::Lagged(skipped)) => {
                        debug!(skipped, "paint telemetry lagged");
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                }
            }
        });
        signal
    }
}

fn round_ms(candidate: f64) -> u64 {
    candidate.max(0.0).round() as u64
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use tokio::time::sleep;

    async fn settled(signal: &PaintSignal) -> Option<u64> {
        for _ in 0..100 {
            if let Some(value) = signal.latest() {
                return Some(value);
            }
            sleep(Duration::from_millis(2)).await;
        }
        signal.latest()
    }

    #[test]
    fn unsupported_host_stays_unknown() {
        let signal = PaintObserver::subscribe(None);
        assert_eq!(signal.latest(), None);
    }

    #[test]
    fn observer_keeps_last_candidate_of_a_batch() {
        tokio_test::block_on(async {
            let telemetry = InMemoryTelemetry::new(8);
            let signal = PaintObserver::subscribe(Some(telemetry.as_ref()));

            telemetry
                .publish(PaintBatch {
                    candidates: vec![620.4, 1210.2, 1810.6],
                })
                .await
                .unwrap();

            assert_eq!(settled(&signal).await, Some(1811));
        });
    }

    #[tokio::test]
    async fn later_batches_overwrite_earlier_ones() {
        let telemetry = InMemoryTelemetry::new(8);
        let signal = PaintObserver::subscribe(Some(telemetry.as_ref()));

        telemetry
            .publish(PaintBatch {
                candidates: vec![900.0],
            })
            .await
            .unwrap();
        telemetry
            .publish(PaintBatch {
                candidates: vec![1400.0, 2100.0],
            })
            .await
            .unwrap();

        // Drain both batches, then confirm the final candidate won.
        for _ in 0..100 {
            if signal.latest() == Some(2100) {
                break;
            }
            tokio::time::sleep(Duration::from_millis(2)).await;
        }
        assert_eq!(signal.latest(), Some(2100));
    }

    #[tokio::test]
    async fn empty_batches_leave_the_signal_untouched() {
        let telemetry = InMemoryTelemetry::new(8);
        let signal = PaintObserver::subscribe(Some(telemetry.as_ref()));

        telemetry.publish(PaintBatch::default()).await.unwrap();
        sleep(Duration::from_millis(20)).await;
        assert_eq!(signal.latest(), None);
    }

    #[test]
    fn candidates_round_to_nearest_millisecond() {
        assert_eq!(round_ms(1810.4), 1810);
        assert_eq!(round_ms(1810.5), 1811);
        assert_eq!(round_ms(-3.0), 0);
    }

    #[test]
    fn preseeded_signal_reports_its_value() {
        assert_eq!(PaintSignal::with_value(1800).latest(), Some(1800));
    }
}
