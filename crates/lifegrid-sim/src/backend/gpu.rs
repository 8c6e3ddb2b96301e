use bytemuck::{Pod, Zeroable};
use lifegrid_engine::device::ComputeDevice;
use wgpu::util::DeviceExt;

use crate::error::{Result, SimError};
use crate::grid::{Generation, GridDims};

use super::GridBackend;

/// Edge of the square compute workgroup; must match `life_step.wgsl`.
pub const WORKGROUP_SIZE: u32 = 8;

#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
struct StepParams {
    rows: u32,
    cols: u32,
    _pad: [u32; 2],
}

const _: () = assert!(std::mem::size_of::<StepParams>() == 16);

/// Resources that exist only while a generation pair is allocated.
struct Bound {
    dims: GridDims,
    /// Handles to the arenas the bind groups were built over.
    arenas: [wgpu::Buffer; 2],
    params: wgpu::Buffer,
    /// `bind_groups[i]` reads arena `i` and writes arena `1 - i`.
    bind_groups: [wgpu::BindGroup; 2],
    workgroups: (u32, u32),
}

/// Compute-shader backend. Each arena is a storage buffer of one `u32` per
/// cell, usable as a vertex-stage storage binding by the grid renderer.
///
/// Steps are queued without waiting for the GPU; queue order guarantees that
/// a later render pass or read-back observes the completed generation.
pub struct GpuBackend {
    gpu: ComputeDevice,
    pipeline: wgpu::ComputePipeline,
    layout: wgpu::BindGroupLayout,
    bound: Option<Bound>,
    last_submission: Option<wgpu::SubmissionIndex>,
}

impl GpuBackend {
    pub fn new(gpu: ComputeDevice) -> Result<Self> {
        if gpu.is_lost() {
            return Err(SimError::InitializationFailure("device is lost".into()));
        }

        let device = &gpu.device;
        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("lifegrid step shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("../shaders/life_step.wgsl").into()),
        });

        let storage = |binding, read_only| wgpu::BindGroupLayoutEntry {
            binding,
            visibility: wgpu::ShaderStages::COMPUTE,
            ty: wgpu::BindingType::Buffer {
                ty: wgpu::BufferBindingType::Storage { read_only },
                has_dynamic_offset: false,
                min_binding_size: None,
            },
            count: None,
        };

        let layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("lifegrid step bgl"),
            entries: &[
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::COMPUTE,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: wgpu::BufferSize::new(
                            std::mem::size_of::<StepParams>() as u64,
                        ),
                    },
                    count: None,
                },
                storage(1, true),
                storage(2, false),
            ],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("lifegrid step pipeline layout"),
            bind_group_layouts: &[&layout],
            immediate_size: 0,
        });

        let pipeline = device.create_compute_pipeline(&wgpu::ComputePipelineDescriptor {
            label: Some("lifegrid step pipeline"),
            layout: Some(&pipeline_layout),
            module: &shader,
            entry_point: Some("step_generation"),
            compilation_options: Default::default(),
            cache: None,
        });

        Ok(Self {
            gpu,
            pipeline,
            layout,
            bound: None,
            last_submission: None,
        })
    }

    pub fn device(&self) -> &ComputeDevice {
        &self.gpu
    }

    /// Rejects grids the device cannot hold or dispatch in one pass.
    fn check_limits(&self, dims: GridDims) -> Result<(u32, u32)> {
        let limits = self.gpu.device.limits();
        let workgroups = (
            dims.cols().div_ceil(WORKGROUP_SIZE),
            dims.rows().div_ceil(WORKGROUP_SIZE),
        );
        let max_binding =
            u64::from(limits.max_storage_buffer_binding_size).min(limits.max_buffer_size);

        if dims.byte_size() > max_binding
            || workgroups.0 > limits.max_compute_workgroups_per_dimension
            || workgroups.1 > limits.max_compute_workgroups_per_dimension
        {
            return Err(SimError::InvalidDimensions {
                rows: dims.rows(),
                cols: dims.cols(),
            });
        }
        Ok(workgroups)
    }

    fn wait(&self, submission: Option<wgpu::SubmissionIndex>) -> Result<()> {
        self.gpu
            .device
            .poll(wgpu::PollType::Wait {
                submission_index: submission,
                timeout: None,
            })
            .map(|_| ())
            .map_err(|e| SimError::DeviceLost(e.to_string()))
    }
}

impl GridBackend for GpuBackend {
    type Arena = wgpu::Buffer;

    fn name(&self) -> &'static str {
        "gpu"
    }

    fn allocate(&mut self, initial: &Generation) -> Result<[wgpu::Buffer; 2]> {
        let dims = initial.dims();
        let workgroups = self.check_limits(dims)?;
        if self.gpu.is_lost() {
            return Err(SimError::InitializationFailure("device is lost".into()));
        }

        let device = &self.gpu.device;
        let usage = wgpu::BufferUsages::STORAGE
            | wgpu::BufferUsages::COPY_SRC
            | wgpu::BufferUsages::COPY_DST;

        let first = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("lifegrid cells 0"),
            contents: bytemuck::cast_slice(initial.cells()),
            usage,
        });
        // wgpu zero-initializes buffers created without contents.
        let second = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("lifegrid cells 1"),
            size: dims.byte_size(),
            usage,
            mapped_at_creation: false,
        });

        let params = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("lifegrid step params"),
            contents: bytemuck::bytes_of(&StepParams {
                rows: dims.rows(),
                cols: dims.cols(),
                _pad: [0; 2],
            }),
            usage: wgpu::BufferUsages::UNIFORM,
        });

        let bind = |label, src: &wgpu::Buffer, dst: &wgpu::Buffer| {
            device.create_bind_group(&wgpu::BindGroupDescriptor {
                label: Some(label),
                layout: &self.layout,
                entries: &[
                    wgpu::BindGroupEntry {
                        binding: 0,
                        resource: params.as_entire_binding(),
                    },
                    wgpu::BindGroupEntry {
                        binding: 1,
                        resource: src.as_entire_binding(),
                    },
                    wgpu::BindGroupEntry {
                        binding: 2,
                        resource: dst.as_entire_binding(),
                    },
                ],
            })
        };
        let bind_groups = [
            bind("lifegrid step 0->1", &first, &second),
            bind("lifegrid step 1->0", &second, &first),
        ];

        self.bound = Some(Bound {
            dims,
            arenas: [first.clone(), second.clone()],
            params,
            bind_groups,
            workgroups,
        });
        log::debug!(
            "gpu arenas allocated: {}x{} ({} bytes each), {}x{} workgroups",
            dims.rows(),
            dims.cols(),
            dims.byte_size(),
            workgroups.0,
            workgroups.1
        );

        Ok([first, second])
    }

    /// Queues one step over the arenas returned by the last `allocate`.
    ///
    /// The bind groups are fixed at allocation, so `arenas` must be that
    /// pair. Validation and out-of-memory errors raised while encoding or
    /// submitting are captured and returned as `DispatchFailure`.
    fn dispatch(
        &mut self,
        dims: GridDims,
        current: usize,
        arenas: &mut [wgpu::Buffer; 2],
    ) -> Result<()> {
        if self.gpu.is_lost() {
            return Err(SimError::DispatchFailure("device is lost".into()));
        }
        let Some(bound) = self.bound.as_ref() else {
            return Err(SimError::DispatchFailure("no arenas allocated".into()));
        };
        debug_assert_eq!(dims, bound.dims);
        if *arenas != bound.arenas {
            return Err(SimError::DispatchFailure(
                "arenas were not allocated by this backend".into(),
            ));
        }

        let device = &self.gpu.device;
        let oom = device.push_error_scope(wgpu::ErrorFilter::OutOfMemory);
        let validation = device.push_error_scope(wgpu::ErrorFilter::Validation);

        let mut encoder = device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("lifegrid step encoder"),
        });
        {
            let mut pass = encoder.begin_compute_pass(&wgpu::ComputePassDescriptor {
                label: Some("lifegrid step pass"),
                timestamp_writes: None,
            });
            pass.set_pipeline(&self.pipeline);
            pass.set_bind_group(0, &bound.bind_groups[current], &[]);
            pass.dispatch_workgroups(bound.workgroups.0, bound.workgroups.1, 1);
        }
        let submission = self.gpu.queue.submit(std::iter::once(encoder.finish()));

        // Scopes pop innermost first.
        let invalid = pollster::block_on(validation.pop());
        let exhausted = pollster::block_on(oom.pop());
        if let Some(err) = invalid.or(exhausted) {
            return Err(SimError::DispatchFailure(err.to_string()));
        }

        self.last_submission = Some(submission);
        Ok(())
    }

    fn read_back(&mut self, dims: GridDims, arena: &wgpu::Buffer) -> Result<Generation> {
        let device = &self.gpu.device;
        let size = dims.byte_size();
        let staging = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("lifegrid readback"),
            size,
            usage: wgpu::BufferUsages::MAP_READ | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let mut encoder = device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("lifegrid readback encoder"),
        });
        encoder.copy_buffer_to_buffer(arena, 0, &staging, 0, size);
        let submission = self.gpu.queue.submit(std::iter::once(encoder.finish()));

        let slice = staging.slice(..);
        let (tx, rx) = std::sync::mpsc::channel();
        slice.map_async(wgpu::MapMode::Read, move |result| {
            let _ = tx.send(result);
        });
        self.wait(Some(submission))?;

        rx.recv()
            .map_err(|e| SimError::DeviceLost(e.to_string()))?
            .map_err(|e| SimError::DeviceLost(e.to_string()))?;

        let cells = {
            let view = slice.get_mapped_range();
            bytemuck::cast_slice::<u8, u32>(&view).to_vec()
        };
        staging.unmap();

        Generation::from_cells(dims, cells)
    }

    fn free(&mut self, arenas: [wgpu::Buffer; 2]) -> Result<()> {
        // Wait for the last step before the buffers can go away.
        let waited = match self.last_submission.take() {
            Some(submission) if !self.gpu.is_lost() => self.wait(Some(submission)),
            _ => Ok(()),
        };

        if let Some(bound) = self.bound.take() {
            drop(bound.bind_groups);
            bound.params.destroy();
        }
        for buffer in arenas {
            buffer.destroy();
        }
        waited
    }
}
