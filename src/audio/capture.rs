//! Audio capture module using cpal

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{Device, Host, SampleRate, Stream, StreamConfig};
use crossbeam_channel::{bounded, Receiver, Sender};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::config::AudioConfig;
use crate::error::{AudioError, Result};

/// Audio sample type alias
pub type AudioSample = f32;

/// One message on the capture hand-off queue; `None` is the close sentinel
pub type CaptureFrame = Option<Vec<AudioSample>>;

/// Audio capture handle.
///
/// The cpal callback folds frames to mono and fire-and-forgets them into a
/// bounded channel; it never blocks on downstream processing. A full
/// channel is logged and dropped, not fatal.
pub struct AudioCapture {
    config: AudioConfig,
    host: Host,
    device: Option<Device>,
    stream: Option<Stream>,
    frame_sender: Sender<CaptureFrame>,
    frame_receiver: Receiver<CaptureFrame>,
    is_running: Arc<AtomicBool>,
}

impl AudioCapture {
    /// Create a new audio capture instance
    pub fn new(config: AudioConfig) -> Result<Self> {
        let (sender, receiver) = bounded(100); // Buffer up to 100 frames

        Ok(Self {
            config,
            host: cpal::default_host(),
            device: None,
            stream: None,
            frame_sender: sender,
            frame_receiver: receiver,
            is_running: Arc::new(AtomicBool::new(false)),
        })
    }

    /// Initialize the audio capture device.
    ///
    /// Fails when no device is available or the device cannot capture at
    /// the configured sample rate; there is no resampling fallback.
    pub fn init(&mut self) -> Result<()> {
        let device = if let Some(ref device_name) = self.config.device {
            self.find_device_by_name(device_name)?
        } else {
            self.host
                .default_input_device()
                .ok_or(AudioError::NoInputDevice)?
        };

        let device_name = device.name().unwrap_or_else(|_| "Unknown".to_string());
        info!("Using audio input device: {}", device_name);

        let supported_configs = device
            .supported_input_configs()
            .map_err(|e| AudioError::DeviceConfig(e.to_string()))?;

        let target_rate = SampleRate(self.config.sample_rate);
        let mut supported = false;
        for cfg in supported_configs {
            debug!(
                "Supported config: channels={}, sample_rate={:?}-{:?}",
                cfg.channels(),
                cfg.min_sample_rate(),
                cfg.max_sample_rate()
            );
            if cfg.channels() == self.config.channels
                && cfg.min_sample_rate() <= target_rate
                && target_rate <= cfg.max_sample_rate()
            {
                supported = true;
                break;
            }
        }

        if !supported {
            return Err(AudioError::UnsupportedRate {
                rate: self.config.sample_rate,
            }
            .into());
        }

        info!(
            "Audio config: {} channels @ {} Hz",
            self.config.channels, self.config.sample_rate
        );

        self.device = Some(device);
        Ok(())
    }

    /// Start capturing audio
    pub fn start(&mut self) -> Result<()> {
        let device = self
            .device
            .as_ref()
            .ok_or_else(|| AudioError::DeviceConfig("Device not initialized".to_string()))?;

        let config = StreamConfig {
            channels: self.config.channels,
            sample_rate: SampleRate(self.config.sample_rate),
            buffer_size: cpal::BufferSize::Default,
        };

        let sender = self.frame_sender.clone();
        let is_running = self.is_running.clone();
        let channels = self.config.channels as usize;

        let stream = device
            .build_input_stream(
                &config,
                move |data: &[f32], _: &cpal::InputCallbackInfo| {
                    if !is_running.load(Ordering::Relaxed) {
                        return;
                    }

                    // Convert to mono if stereo
                    let samples: Vec<f32> = if channels > 1 {
                        data.chunks(channels)
                            .map(|chunk| chunk.iter().sum::<f32>() / channels as f32)
                            .collect()
                    } else {
                        data.to_vec()
                    };

                    if sender.try_send(Some(samples)).is_err() {
                        warn!("Audio buffer overflow - dropping samples");
                    }
                },
                move |err| {
                    warn!("Audio stream warning: {}", err);
                },
                None,
            )
            .map_err(|e| AudioError::StreamBuild(e.to_string()))?;

        stream
            .play()
            .map_err(|e| AudioError::StreamPlay(e.to_string()))?;

        self.is_running.store(true, Ordering::Relaxed);
        self.stream = Some(stream);

        info!("Audio capture started");
        Ok(())
    }

    /// Stop capturing audio
    pub fn stop(&mut self) {
        self.is_running.store(false, Ordering::Relaxed);
        self.stream = None;
        info!("Audio capture stopped");
    }

    /// Check if capture is running
    pub fn is_running(&self) -> bool {
        self.is_running.load(Ordering::Relaxed)
    }

    /// Get the frame receiver side of the hand-off queue
    pub fn receiver(&self) -> Receiver<CaptureFrame> {
        self.frame_receiver.clone()
    }

    /// Shared running flag, cleared by `stop` and by the shutdown handle
    pub fn running_flag(&self) -> Arc<AtomicBool> {
        self.is_running.clone()
    }

    /// Handle for the shutdown path: stops intake and pushes the sentinel
    pub fn shutdown_handle(&self) -> ShutdownHandle {
        ShutdownHandle {
            is_running: self.is_running.clone(),
            frame_sender: self.frame_sender.clone(),
        }
    }

    fn find_device_by_name(&self, name: &str) -> Result<Device> {
        let devices = self
            .host
            .input_devices()
            .map_err(|e| AudioError::DeviceConfig(e.to_string()))?;

        for device in devices {
            if let Ok(device_name) = device.name() {
                if device_name.contains(name) {
                    return Ok(device);
                }
            }
        }

        Err(AudioError::DeviceNotFound(name.to_string()).into())
    }
}

impl Drop for AudioCapture {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Signals the capture to wind down from another thread (the interrupt
/// handler): flips the running flag so the callback stops producing, then
/// pushes the `None` sentinel so the chunk-forwarding loop terminates.
#[derive(Clone)]
pub struct ShutdownHandle {
    is_running: Arc<AtomicBool>,
    frame_sender: Sender<CaptureFrame>,
}

impl ShutdownHandle {
    pub fn signal(&self) {
        self.is_running.store(false, Ordering::Relaxed);
        let _ = self.frame_sender.try_send(None);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_audio_capture_creation() {
        let config = AudioConfig::default();
        let capture = AudioCapture::new(config);
        assert!(capture.is_ok());
    }

    #[test]
    fn test_shutdown_handle_pushes_sentinel() {
        let capture = AudioCapture::new(AudioConfig::default()).unwrap();
        let receiver = capture.receiver();

        capture.shutdown_handle().signal();

        assert!(!capture.is_running());
        assert_eq!(receiver.try_recv().unwrap(), None);
    }
}
