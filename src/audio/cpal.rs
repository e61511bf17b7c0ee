// Copyright (C) 2026 Michael Wilson <mike@mdwn.dev>
//
// This program is free software: you can redistribute it and/or modify it under
// the terms of the GNU General Public License as published by the Free Software
// Foundation, version 3.
//
// This program is distributed in the hope that it will be useful, but WITHOUT
// ANY WARRANTY; without even the implied warranty of MERCHANTABILITY or FITNESS
// FOR A PARTICULAR PURPOSE. See the GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License along with
// this program. If not, see <https://www.gnu.org/licenses/>.
//
use std::{error::Error, fmt, sync::Arc, thread};

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use parking_lot::Mutex;
use tracing::{error, info, span, Level};

use crate::{audio::Device as AudioDevice, playsync::CancelHandle};

/// The name that selects the default output device of the default host.
const DEFAULT_DEVICE: &str = "default";

/// A small wrapper around a cpal::Device that plays one mono buffer at a time.
pub struct Device {
    /// The name of the device.
    name: String,
    /// The maximum number of channels the device supports.
    max_channels: u16,
    /// The host ID of the device.
    host_id: cpal::HostId,
    /// The underlying cpal device.
    device: cpal::Device,
    /// The playback in progress, if any.
    playback: Mutex<Option<Playback>>,
}

/// A buffer being played by the output thread.
struct Playback {
    cancel_handle: CancelHandle,
    output_thread: thread::JoinHandle<Result<(), String>>,
}

impl fmt::Display for Device {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} (Channels={}) ({})",
            self.name,
            self.max_channels,
            self.host_id.name()
        )
    }
}

impl Device {
    /// Lists cpal devices and produces the Device trait.
    pub fn list() -> Result<Vec<Box<dyn AudioDevice>>, Box<dyn Error>> {
        Ok(Device::list_cpal_devices()?
            .into_iter()
            .map(|device| {
                let device: Box<dyn AudioDevice> = Box::new(device);
                device
            })
            .collect())
    }

    /// Lists cpal devices that have at least one output channel.
    fn list_cpal_devices() -> Result<Vec<Device>, Box<dyn Error>> {
        // Suppress noisy output here.
        let _shh_stdout = shh::stdout()?;
        let _shh_stderr = shh::stderr()?;

        let mut devices: Vec<Device> = Vec::new();
        for host_id in cpal::available_hosts() {
            let host_devices = match cpal::host_from_id(host_id)?.output_devices() {
                Ok(host_devices) => host_devices,
                Err(e) => {
                    error!(
                        err = e.to_string(),
                        host = host_id.name(),
                        "Unable to list devices for host"
                    );
                    continue;
                }
            };

            for device in host_devices {
                if let Some(device) = Device::from_cpal(host_id, device) {
                    devices.push(device);
                }
            }
        }

        devices.sort_by_key(|device| device.name.to_string());
        Ok(devices)
    }

    fn from_cpal(host_id: cpal::HostId, device: cpal::Device) -> Option<Device> {
        let max_channels = device
            .supported_output_configs()
            .ok()?
            .map(|config| config.channels())
            .max()
            .unwrap_or(0);
        if max_channels == 0 {
            return None;
        }

        Some(Device {
            name: device.name().ok()?,
            max_channels,
            host_id,
            device,
            playback: Mutex::new(None),
        })
    }

    /// Gets the given cpal device. "default" selects the default output device.
    pub fn get(name: &str) -> Result<Device, Box<dyn Error>> {
        if name == DEFAULT_DEVICE {
            let host = cpal::default_host();
            let device = host
                .default_output_device()
                .ok_or("no default output device found")?;
            return Device::from_cpal(host.id(), device)
                .ok_or_else(|| "default output device has no output channels".into());
        }

        match Device::list_cpal_devices()?
            .into_iter()
            .find(|device| device.name.trim() == name)
        {
            Some(device) => Ok(device),
            None => Err(format!("no device found with name {}", name).into()),
        }
    }
}

/// Builds a stream that copies the mono buffer into every channel of each output frame and
/// finishes the cancel handle one callback after the buffer is drained.
fn build_stream<T>(
    device: &cpal::Device,
    config: &cpal::StreamConfig,
    samples: Arc<[f32]>,
    cancel_handle: CancelHandle,
) -> Result<cpal::Stream, cpal::BuildStreamError>
where
    T: cpal::SizedSample + cpal::FromSample<f32>,
{
    let channels = config.channels as usize;
    let mut position = 0;
    let mut drained_callbacks = 0;
    device.build_output_stream(
        config,
        move |data: &mut [T], _: &cpal::OutputCallbackInfo| {
            for frame in data.chunks_mut(channels) {
                let sample = samples.get(position).copied().unwrap_or(0.0);
                position = (position + 1).min(samples.len());
                for out in frame.iter_mut() {
                    *out = T::from_sample(sample);
                }
            }

            if position >= samples.len() {
                drained_callbacks += 1;
                if drained_callbacks > 1 {
                    cancel_handle.finish();
                }
            }
        },
        |err| error!("CPAL output stream error: {}", err),
        None,
    )
}

impl AudioDevice for Device {
    fn play(&self, samples: Arc<[f32]>, sample_rate: u32) -> Result<(), Box<dyn Error>> {
        let span = span!(Level::INFO, "play buffer (cpal)");
        let _enter = span.enter();

        let mut playback = self.playback.lock();
        if playback.is_some() {
            return Err(format!("device {} is already playing", self.name).into());
        }

        let supported = self.device.default_output_config()?;
        let sample_format = supported.sample_format();
        let config = cpal::StreamConfig {
            channels: supported.channels(),
            sample_rate,
            buffer_size: cpal::BufferSize::Default,
        };

        info!(
            device = self.name,
            samples = samples.len(),
            sample_rate,
            format = sample_format.to_string(),
            "Playing buffer."
        );

        let cancel_handle = CancelHandle::new();
        let device = self.device.clone();
        let output_thread = {
            let cancel_handle = cancel_handle.clone();
            // The stream is created and dropped on its own thread.
            thread::spawn(move || {
                let stream = match sample_format {
                    cpal::SampleFormat::F32 => {
                        build_stream::<f32>(&device, &config, samples, cancel_handle.clone())
                    }
                    cpal::SampleFormat::I16 => {
                        build_stream::<i16>(&device, &config, samples, cancel_handle.clone())
                    }
                    cpal::SampleFormat::I32 => {
                        build_stream::<i32>(&device, &config, samples, cancel_handle.clone())
                    }
                    other => {
                        cancel_handle.cancel();
                        return Err(format!("unsupported sample format {}", other));
                    }
                };

                let result = stream
                    .map_err(|e| e.to_string())
                    .and_then(|stream| stream.play().map_err(|e| e.to_string()).map(|_| stream));
                match result {
                    Ok(_stream) => {
                        cancel_handle.wait();
                        Ok(())
                    }
                    Err(e) => {
                        cancel_handle.cancel();
                        Err(e)
                    }
                }
            })
        };

        *playback = Some(Playback {
            cancel_handle,
            output_thread,
        });
        Ok(())
    }

    fn wait_until_done(&self) -> Result<(), Box<dyn Error>> {
        let cancel_handle = match self.playback.lock().as_ref() {
            Some(playback) => playback.cancel_handle.clone(),
            None => return Ok(()),
        };
        cancel_handle.wait();

        let playback = self.playback.lock().take();
        match playback {
            Some(playback) => match playback.output_thread.join() {
                Ok(result) => Ok(result?),
                Err(_) => Err("Error while joining output thread!".into()),
            },
            None => Ok(()),
        }
    }

    fn stop(&self) -> Result<(), Box<dyn Error>> {
        let playback = self.playback.lock().take();
        if let Some(playback) = playback {
            playback.cancel_handle.cancel();
            if playback.output_thread.join().is_err() {
                return Err("Error while joining output thread!".into());
            }
        }
        Ok(())
    }

    #[cfg(test)]
    fn to_mock(&self) -> Result<Arc<super::mock::Device>, Box<dyn Error>> {
        Err("not a mock".into())
    }
}
