pub mod audio;
pub mod ui;

use atomic_float::AtomicF32;
use audio::capture::FrameCapture;
use audio::constants::TICK_RATE_HZ;
use audio::refresh::{RefreshTask, RefreshTimer};
use audio::spectrum_channel::spectrum_channel;
use nih_plug::prelude::*;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

pub use audio::spectrum_channel::{SpectrumReader, SpectrumSnapshot};

/// Pass-through effect that analyses its input for a spectrum display
pub struct SpectrumHold {
    params: Arc<SpectrumHoldParams>,

    /// Mono mix-down and frame publication, audio thread only
    capture: FrameCapture,

    /// Host sample rate, read by the analyser on every new frame
    sample_rate: Arc<AtomicF32>,
    /// Mirrors the Peak Hold parameter for the refresh thread
    peak_hold_enabled: Arc<AtomicBool>,

    /// Running refresh thread, if the plugin is active
    refresh: Option<RefreshTimer>,
    /// Refresh task parked while the plugin is inactive
    idle_task: Option<RefreshTask>,

    reader: SpectrumReader,
}

#[derive(Params)]
pub struct SpectrumHoldParams {
    /// Keeps a decaying per-bin maximum next to the spectrum. Turning it off
    /// clears all held peaks.
    #[id = "peak_hold"]
    pub peak_hold: BoolParam,
}

impl SpectrumHoldParams {
    fn new(peak_hold_enabled: Arc<AtomicBool>) -> Self {
        Self {
            peak_hold: BoolParam::new("Peak Hold", true).with_callback(Arc::new(
                move |enabled| peak_hold_enabled.store(enabled, Ordering::Relaxed),
            )),
        }
    }
}

impl Default for SpectrumHold {
    fn default() -> Self {
        let sample_rate = Arc::new(AtomicF32::new(0.0));
        let peak_hold_enabled = Arc::new(AtomicBool::new(true));

        let (capture, analyser) = audio::analysis_pipeline(sample_rate.clone());
        let (publisher, reader) = spectrum_channel();
        let idle_task = RefreshTask::new(analyser, publisher, peak_hold_enabled.clone());

        Self {
            params: Arc::new(SpectrumHoldParams::new(peak_hold_enabled.clone())),
            capture,
            sample_rate,
            peak_hold_enabled,
            refresh: None,
            idle_task: Some(idle_task),
            reader,
        }
    }
}

impl SpectrumHold {
    /// Handle for the rendering layer. All clones see the same snapshots
    pub fn spectrum_reader(&self) -> SpectrumReader {
        self.reader.clone()
    }

    /// Stop the refresh thread (if running) and take back its task
    fn take_task(&mut self) -> Option<RefreshTask> {
        match self.refresh.take() {
            Some(timer) => timer.stop(),
            None => self.idle_task.take(),
        }
    }

    /// Start analysing from silence with a fresh capture/analyser pair
    fn restart_refresh(&mut self) -> bool {
        let publisher = match self.take_task() {
            Some(task) => task.into_publisher(),
            None => {
                nih_plug::nih_warn!("Spectrum snapshot channel lost, creating a new one");
                let (publisher, reader) = spectrum_channel();
                self.reader = reader;
                publisher
            }
        };

        let (capture, analyser) = audio::analysis_pipeline(self.sample_rate.clone());
        self.capture = capture;
        let task = RefreshTask::new(analyser, publisher, self.peak_hold_enabled.clone());

        match RefreshTimer::start(task, TICK_RATE_HZ) {
            Ok(timer) => {
                self.refresh = Some(timer);
                true
            }
            Err(err) => {
                nih_plug::nih_error!("Failed to start the spectrum refresh thread: {}", err);
                false
            }
        }
    }

    fn stop_refresh(&mut self) {
        if let Some(timer) = self.refresh.take() {
            self.idle_task = timer.stop();
        }
    }
}

impl Plugin for SpectrumHold {
    const NAME: &'static str = "Spectrum Hold";
    const VENDOR: &'static str = "Cmdv";
    const URL: &'static str = env!("CARGO_PKG_HOMEPAGE");
    const EMAIL: &'static str = "info@cmdv.me";

    const VERSION: &'static str = env!("CARGO_PKG_VERSION");

    // The first audio IO layout is used as the default. Both layouts pass audio through
    // untouched; every input channel is mixed into the single analysis channel.
    const AUDIO_IO_LAYOUTS: &'static [AudioIOLayout] = &[
        AudioIOLayout {
            main_input_channels: NonZeroU32::new(2),
            main_output_channels: NonZeroU32::new(2),

            aux_input_ports: &[],
            aux_output_ports: &[],

            names: PortNames::const_default(),
        },
        AudioIOLayout {
            main_input_channels: NonZeroU32::new(1),
            main_output_channels: NonZeroU32::new(1),

            aux_input_ports: &[],
            aux_output_ports: &[],

            names: PortNames::const_default(),
        },
    ];

    const MIDI_INPUT: MidiConfig = MidiConfig::None;
    const MIDI_OUTPUT: MidiConfig = MidiConfig::None;

    const SAMPLE_ACCURATE_AUTOMATION: bool = false;

    type SysExMessage = ();
    type BackgroundTask = ();

    fn params(&self) -> Arc<dyn Params> {
        self.params.clone()
    }

    fn initialize(
        &mut self,
        _audio_io_layout: &AudioIOLayout,
        buffer_config: &BufferConfig,
        _context: &mut impl InitContext<Self>,
    ) -> bool {
        nih_plug::nih_log!(
            "Plugin initialize called, sample_rate: {}, buffer_size: {}",
            buffer_config.sample_rate,
            buffer_config.max_buffer_size
        );

        self.sample_rate
            .store(buffer_config.sample_rate, Ordering::Relaxed);
        self.peak_hold_enabled
            .store(self.params.peak_hold.value(), Ordering::Relaxed);

        self.restart_refresh()
    }

    fn reset(&mut self) {
        // Can be called from the audio thread, so this only rewinds the FIFO
        self.capture.reset();
    }

    fn deactivate(&mut self) {
        self.stop_refresh();
    }

    fn process(
        &mut self,
        buffer: &mut Buffer,
        _aux: &mut AuxiliaryBuffers,
        _context: &mut impl ProcessContext<Self>,
    ) -> ProcessStatus {
        self.capture.push_channels(buffer.as_slice_immutable());
        ProcessStatus::Normal
    }
}

impl ClapPlugin for SpectrumHold {
    const CLAP_ID: &'static str = "me.cmdv.spectrum-hold";
    const CLAP_DESCRIPTION: Option<&'static str> =
        Some("Real-time spectrum analyser with per-bin peak hold");
    const CLAP_MANUAL_URL: Option<&'static str> = Some(Self::URL);
    const CLAP_SUPPORT_URL: Option<&'static str> = None;

    const CLAP_FEATURES: &'static [ClapFeature] = &[
        ClapFeature::AudioEffect,
        ClapFeature::Analyzer,
        ClapFeature::Stereo,
        ClapFeature::Mono,
    ];
}

impl Vst3Plugin for SpectrumHold {
    const VST3_CLASS_ID: [u8; 16] = *b"SpectrumHoldPlug";

    const VST3_SUBCATEGORIES: &'static [Vst3SubCategory] =
        &[Vst3SubCategory::Fx, Vst3SubCategory::Analyzer];
}

nih_export_clap!(SpectrumHold);
nih_export_vst3!(SpectrumHold);
