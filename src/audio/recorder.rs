//! Microphone recording.
//!
//! Captures audio from an input device via cpal and encodes it as a
//! 16-bit PCM WAV clip for upload. The recorder owns its state
//! explicitly; there are no module-level handles or re-entrant flags.

use anyhow::{anyhow, Context, Result};
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{Device, Sample, SampleFormat, Stream, StreamConfig};
use std::io::Cursor;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{mpsc, Arc, Mutex};
use std::time::Duration;
use tracing::{debug, info, warn};

/// Recorder lifecycle.
///
/// Transitions: Idle → Recording (`start`), Recording → Stopping
/// (`stop`), Stopping → Idle (`finish`). Anything else is rejected or
/// ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecorderState {
    Idle,
    Recording,
    Stopping,
}

/// Microphone recorder producing WAV clips.
pub struct Recorder {
    state: RecorderState,
    device_name: Option<String>,
    samples: Arc<Mutex<Vec<i16>>>,
    capturing: Arc<AtomicBool>,
    sample_rate: u32,
    channels: u16,
    stream: Option<Stream>,
}

impl Recorder {
    /// Creates an idle recorder. `device_name` selects an input device
    /// by name; `None` uses the system default.
    pub fn new(device_name: Option<String>) -> Self {
        Self {
            state: RecorderState::Idle,
            device_name,
            samples: Arc::new(Mutex::new(Vec::new())),
            capturing: Arc::new(AtomicBool::new(false)),
            sample_rate: 0,
            channels: 0,
            stream: None,
        }
    }

    /// Current lifecycle state.
    #[allow(dead_code)] // State inspection utility
    pub fn state(&self) -> RecorderState {
        self.state
    }

    /// Starts capturing. Only valid from the Idle state.
    pub fn start(&mut self) -> Result<()> {
        if self.state != RecorderState::Idle {
            return Err(anyhow!("recorder is already active"));
        }

        let device = self.find_device()?;
        info!(
            "Using input device: {}",
            device.name().unwrap_or_else(|_| "Unknown".to_string())
        );

        let supported = device
            .default_input_config()
            .context("No supported input configuration for this device")?;
        debug!("Input config: {:?}", supported);

        self.sample_rate = supported.sample_rate().0;
        self.channels = supported.channels();
        self.samples.lock().unwrap().clear();
        self.capturing.store(true, Ordering::SeqCst);

        let samples = Arc::clone(&self.samples);
        let capturing = Arc::clone(&self.capturing);

        let stream = match supported.sample_format() {
            SampleFormat::I16 => {
                build_stream::<i16>(&device, &supported.into(), samples, capturing)?
            }
            SampleFormat::U16 => {
                build_stream::<u16>(&device, &supported.into(), samples, capturing)?
            }
            SampleFormat::F32 => {
                build_stream::<f32>(&device, &supported.into(), samples, capturing)?
            }
            other => return Err(anyhow!("Unsupported sample format: {:?}", other)),
        };

        stream.play().context("Failed to start the input stream")?;
        self.stream = Some(stream);
        self.state = RecorderState::Recording;
        Ok(())
    }

    /// Requests the capture to stop. A no-op unless recording.
    pub fn stop(&mut self) {
        if self.state != RecorderState::Recording {
            debug!("Ignoring stop in state {:?}", self.state);
            return;
        }
        self.capturing.store(false, Ordering::SeqCst);
        self.state = RecorderState::Stopping;
    }

    /// Tears down the stream, returns the captured clip as WAV bytes,
    /// and resets to Idle.
    pub fn finish(&mut self) -> Result<Vec<u8>> {
        if self.state != RecorderState::Stopping {
            return Err(anyhow!("recorder has no stopped capture to finish"));
        }

        // Dropping the stream ends the capture callback
        self.stream = None;
        self.state = RecorderState::Idle;

        let samples: Vec<i16> = self.samples.lock().unwrap().drain(..).collect();
        if samples.is_empty() {
            return Err(anyhow!("no audio was captured"));
        }

        info!(
            "Captured {} samples at {} Hz ({} channel(s))",
            samples.len(),
            self.sample_rate,
            self.channels
        );

        encode_wav(&samples, self.channels, self.sample_rate)
    }

    /// Records until Enter is pressed on stdin or `max` elapses, then
    /// returns the clip as WAV bytes.
    ///
    /// When the duration limit fires first, the stdin reader thread
    /// stays parked on `read_line` until the process exits; nothing
    /// else reads stdin in this process.
    pub fn record_clip(&mut self, max: Duration) -> Result<Vec<u8>> {
        self.start()?;

        let (tx, rx) = mpsc::channel();
        std::thread::spawn(move || {
            let mut line = String::new();
            let _ = std::io::stdin().read_line(&mut line);
            let _ = tx.send(());
        });

        match rx.recv_timeout(max) {
            Ok(()) => info!("Recording stopped by user"),
            Err(_) => warn!("Recording stopped after reaching {}s limit", max.as_secs()),
        }

        self.stop();
        self.finish()
    }

    fn find_device(&self) -> Result<Device> {
        let host = cpal::default_host();

        match &self.device_name {
            Some(name) => host
                .input_devices()
                .context("Failed to enumerate input devices")?
                .find(|d| d.name().map(|n| &n == name).unwrap_or(false))
                .ok_or_else(|| anyhow!("Input device not found: {}", name)),
            None => host
                .default_input_device()
                .ok_or_else(|| anyhow!("No default input device available")),
        }
    }
}

fn build_stream<T>(
    device: &Device,
    config: &StreamConfig,
    samples: Arc<Mutex<Vec<i16>>>,
    capturing: Arc<AtomicBool>,
) -> Result<Stream>
where
    T: Sample + Send + 'static + cpal::SizedSample,
    i16: cpal::FromSample<T>,
{
    let err_fn = |err| tracing::error!("Input stream error: {}", err);

    let stream = device.build_input_stream(
        config,
        move |data: &[T], _: &cpal::InputCallbackInfo| {
            if !capturing.load(Ordering::SeqCst) {
                return;
            }
            let mut buf = samples.lock().unwrap();
            buf.extend(data.iter().map(|&s| i16::from_sample(s)));
        },
        err_fn,
        None,
    )?;

    Ok(stream)
}

/// Encodes i16 PCM samples as an in-memory WAV file.
fn encode_wav(samples: &[i16], channels: u16, sample_rate: u32) -> Result<Vec<u8>> {
    let spec = hound::WavSpec {
        channels,
        sample_rate,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };

    let mut cursor = Cursor::new(Vec::new());
    {
        let mut writer =
            hound::WavWriter::new(&mut cursor, spec).context("Failed to create WAV writer")?;
        for &sample in samples {
            writer.write_sample(sample)?;
        }
        writer.finalize().context("Failed to finalize WAV clip")?;
    }

    Ok(cursor.into_inner())
}
