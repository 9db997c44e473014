use std::io;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use super::spectrum::SpectrumAnalyser;
use super::spectrum_channel::{SnapshotPublisher, SpectrumSnapshot};

/// Work done on every refresh: pick up the peak hold toggle, run one analysis
/// tick and hand the result to the rendering layer
pub struct RefreshTask {
    analyser: SpectrumAnalyser,
    publisher: SnapshotPublisher,
    /// Set by the Peak Hold parameter
    peak_hold_enabled: Arc<AtomicBool>,
}

impl RefreshTask {
    pub fn new(
        analyser: SpectrumAnalyser,
        publisher: SnapshotPublisher,
        peak_hold_enabled: Arc<AtomicBool>,
    ) -> Self {
        Self {
            analyser,
            publisher,
            peak_hold_enabled,
        }
    }

    pub fn run_once(&mut self) {
        let enabled = self.peak_hold_enabled.load(Ordering::Relaxed);
        if enabled != self.analyser.is_peak_hold_enabled() {
            self.analyser.set_peak_hold_enabled(enabled);
        }

        self.analyser.tick();
        self.publisher.publish(SpectrumSnapshot::capture(&self.analyser));
    }

    pub fn analyser(&self) -> &SpectrumAnalyser {
        &self.analyser
    }

    /// Give the publisher back so a new task can be built around it
    pub fn into_publisher(self) -> SnapshotPublisher {
        self.publisher
    }
}

/// Drives a [`RefreshTask`] from a dedicated thread at a fixed rate
///
/// Each period runs one tick and then sleeps for whatever is left of it. A
/// slow tick is not made up for with extra ticks.
pub struct RefreshTimer {
    running: Arc<AtomicBool>,
    handle: Option<JoinHandle<RefreshTask>>,
}

impl RefreshTimer {
    pub fn start(mut task: RefreshTask, rate_hz: f32) -> io::Result<Self> {
        let running = Arc::new(AtomicBool::new(true));
        let period = Duration::from_secs_f32(1.0 / rate_hz.max(1.0));

        let thread_running = running.clone();
        let handle = thread::Builder::new()
            .name("spectrum-refresh".to_string())
            .spawn(move || {
                while thread_running.load(Ordering::Acquire) {
                    let started = Instant::now();
                    task.run_once();

                    if let Some(remaining) = period.checked_sub(started.elapsed()) {
                        thread::sleep(remaining);
                    }
                }
                task
            })?;

        nih_plug::nih_log!("Spectrum refresh started at {:.0} Hz", rate_hz);

        Ok(Self {
            running,
            handle: Some(handle),
        })
    }

    /// Stop ticking and hand the task back. No tick is interrupted midway
    pub fn stop(mut self) -> Option<RefreshTask> {
        self.shutdown()
    }

    fn shutdown(&mut self) -> Option<RefreshTask> {
        let handle = self.handle.take()?;
        self.running.store(false, Ordering::Release);

        match handle.join() {
            Ok(task) => {
                nih_plug::nih_log!("Spectrum refresh stopped");
                Some(task)
            }
            Err(_) => {
                nih_plug::nih_error!("Spectrum refresh thread panicked");
                None
            }
        }
    }
}

impl Drop for RefreshTimer {
    fn drop(&mut self) {
        self.shutdown();
    }
}
