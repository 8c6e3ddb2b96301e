use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use anyhow::{Context, Result};

/// Device + queue pair shared by compute and render work.
///
/// Cloning is cheap (wgpu handles are reference counted). A device-lost
/// callback is installed on construction; [`is_lost`](Self::is_lost) reports
/// it so per-tick work can be skipped instead of submitted into a dead device.
#[derive(Clone)]
pub struct ComputeDevice {
    pub device: wgpu::Device,
    pub queue: wgpu::Queue,
    lost: Arc<AtomicBool>,
}

impl ComputeDevice {
    pub fn new(device: wgpu::Device, queue: wgpu::Queue) -> Self {
        let lost = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&lost);
        device.set_device_lost_callback(move |reason, message| {
            if matches!(reason, wgpu::DeviceLostReason::Destroyed) {
                log::debug!("device destroyed: {message}");
            } else {
                log::error!("device lost ({reason:?}): {message}");
            }
            flag.store(true, Ordering::Release);
        });

        Self {
            device,
            queue,
            lost,
        }
    }

    /// Returns true once the device has been lost or destroyed.
    pub fn is_lost(&self) -> bool {
        self.lost.load(Ordering::Acquire)
    }
}

/// Requests a surface-less device suitable for compute work.
///
/// Requests the adapter's own limits so acquisition succeeds on software
/// adapters. Fails when no adapter is available; callers that can run without a
/// GPU (tests) treat that as "skip".
pub async fn request_compute_device(label: &str) -> Result<ComputeDevice> {
    let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
        backends: wgpu::Backends::all(),
        ..Default::default()
    });

    let adapter = instance
        .request_adapter(&wgpu::RequestAdapterOptions {
            power_preference: wgpu::PowerPreference::HighPerformance,
            compatible_surface: None,
            force_fallback_adapter: false,
        })
        .await
        .context("failed to find a GPU adapter for compute")?;

    log::debug!("compute adapter: {:?}", adapter.get_info());

    let (device, queue) = adapter
        .request_device(&wgpu::DeviceDescriptor {
            label: Some(label),
            required_features: wgpu::Features::empty(),
            required_limits: adapter.limits(),
            experimental_features: wgpu::ExperimentalFeatures::disabled(),
            memory_hints: wgpu::MemoryHints::Performance,
            trace: wgpu::Trace::Off,
        })
        .await
        .context("failed to create compute device/queue")?;

    Ok(ComputeDevice::new(device, queue))
}
