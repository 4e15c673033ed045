use haven_bridge::Port;
use haven_domain::PreviewMessage;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, trace, warn};

/// Repeats `threejs-ready` to the host until stopped.
///
/// The host may attach its listener after the frame is live, so a single
/// announcement can be lost; the beacon keeps retrying at a fixed interval.
/// The first beat goes out immediately.
#[derive(Debug)]
pub struct ReadinessBeacon {
    task: Option<JoinHandle<u64>>,
}

impl ReadinessBeacon {
    /// Starts beating on the current runtime.
    #[must_use]
    pub fn start(port: Port, interval: Duration) -> Self {
        let task = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval.max(Duration::from_millis(1)));
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            let mut beats = 0u64;
            loop {
                ticker.tick().await;
                match port.post(&PreviewMessage::Ready) {
                    Ok(listeners) => {
                        beats += 1;
                        trace!(beats, listeners, "Readiness announced");
                    },
                    Err(err) => {
                        warn!(error = %err, "Host window is gone; readiness beacon stopped");
                        return beats;
                    },
                }
            }
        });
        debug!(interval_ms = interval.as_millis(), "Readiness beacon started");
        Self { task: Some(task) }
    }

    #[must_use]
    pub fn is_running(&self) -> bool {
        self.task.as_ref().is_some_and(|task| !task.is_finished())
    }

    /// Stops the beacon. Idempotent.
    pub fn stop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
            debug!("Readiness beacon stopped");
        }
    }
}

impl Drop for ReadinessBeacon {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use haven_bridge::Bridge;

    #[tokio::test(start_paused = true)]
    async fn test_beats_until_stopped() {
        let (host, preview) = Bridge::new().embed("host", "preview").expect("embed");
        let mut inbox = host.listen::<PreviewMessage>().expect("listen");

        let mut beacon = ReadinessBeacon::start(preview, Duration::from_millis(500));
        tokio::time::sleep(Duration::from_millis(1_250)).await;
        beacon.stop();
        assert!(!beacon.is_running());

        let beats = inbox.drain();
        assert_eq!(beats.len(), 3);
        assert!(beats.iter().all(|message| *message == PreviewMessage::Ready));

        tokio::time::sleep(Duration::from_secs(5)).await;
        assert!(inbox.drain().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_stops_when_host_closes() {
        let (host, preview) = Bridge::new().embed("host", "preview").expect("embed");
        let beacon = ReadinessBeacon::start(preview, Duration::from_millis(500));
        tokio::time::sleep(Duration::from_millis(10)).await;
        host.close();
        tokio::time::sleep(Duration::from_millis(600)).await;
        assert!(!beacon.is_running());
    }
}
