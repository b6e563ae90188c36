//! GPU Propagator - runs the transition function as a WebGPU compute shader.

use super::GpuError;
use crate::compute::{EngineError, Propagator, VoxelGrid};
use crate::schema::RuleSpec;

// Embed shader source at compile time
const TRANSITION_SHADER: &str = include_str!("shaders/transition.wgsl");

/// Uniform buffer struct for the transition shader.
#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
struct TransitionParams {
    axis_size: u32,
    survive_mask: u32,
    birth_mask: u32,
    max_state: u32,
}

/// GPU-based propagator using a WebGPU compute shader.
///
/// Each step uploads the old grid, dispatches one invocation per cell and
/// reads the new grid back through a staging buffer.
pub struct GpuPropagator {
    device: wgpu::Device,
    queue: wgpu::Queue,
    rule: RuleSpec,
    axis_size: u32,

    pipeline: wgpu::ComputePipeline,
    bind_group: wgpu::BindGroup,

    // GPU buffers
    params_buffer: wgpu::Buffer,
    old_buffer: wgpu::Buffer,
    new_buffer: wgpu::Buffer,
    staging_buffer: wgpu::Buffer,

    released: bool,
}

impl GpuPropagator {
    /// Create a new GPU propagator for a cubic grid of `axis_size`.
    pub async fn new(rule: RuleSpec, axis_size: usize) -> Result<Self, GpuError> {
        // 1. Create wgpu instance
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });

        // 2. Request adapter
        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: None,
                force_fallback_adapter: false,
            })
            .await
            .map_err(|_| GpuError::NoAdapter)?;

        // 3. Request device and queue
        let (device, queue): (wgpu::Device, wgpu::Queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("Volume Life GPU"),
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::default(),
                ..Default::default()
            })
            .await?;

        // 4. Check the grid fits in a single storage binding
        let grid_bytes = (axis_size as u64)
            .checked_pow(3)
            .and_then(|cells| cells.checked_mul(std::mem::size_of::<u32>() as u64))
            .unwrap_or(u64::MAX);
        let limits = device.limits();
        let limit = (limits.max_storage_buffer_binding_size as u64).min(limits.max_buffer_size);
        if grid_bytes > limit || axis_size > u32::MAX as usize {
            return Err(GpuError::BufferTooLarge {
                bytes: grid_bytes,
                limit,
            });
        }

        // 5. Create shader module, layouts and pipeline
        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Transition Shader"),
            source: wgpu::ShaderSource::Wgsl(TRANSITION_SHADER.into()),
        });

        let bind_group_layout = create_transition_bind_group_layout(&device);

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Transition Pipeline Layout"),
            bind_group_layouts: &[&bind_group_layout],
            ..Default::default()
        });

        let pipeline = device.create_compute_pipeline(&wgpu::ComputePipelineDescriptor {
            label: Some("Transition Pipeline"),
            layout: Some(&pipeline_layout),
            module: &shader,
            entry_point: Some("main"),
            compilation_options: Default::default(),
            cache: None,
        });

        // 6. Create GPU buffers
        let params_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Transition Params"),
            size: std::mem::size_of::<TransitionParams>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let old_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Old Cells Buffer"),
            size: grid_bytes,
            usage: wgpu::BufferUsages::STORAGE | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let new_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("New Cells Buffer"),
            size: grid_bytes,
            usage: wgpu::BufferUsages::STORAGE | wgpu::BufferUsages::COPY_SRC,
            mapped_at_creation: false,
        });
        let staging_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Cells Staging Buffer"),
            size: grid_bytes,
            usage: wgpu::BufferUsages::MAP_READ | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        // 7. Rule parameters are fixed for the propagator's lifetime
        let axis_size = axis_size as u32;
        let params = TransitionParams {
            axis_size,
            survive_mask: rule.survive_mask(),
            birth_mask: rule.birth_mask(),
            max_state: rule.max_state(),
        };
        queue.write_buffer(&params_buffer, 0, bytemuck::bytes_of(&params));

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Transition Bind Group"),
            layout: &bind_group_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: params_buffer.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: old_buffer.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: new_buffer.as_entire_binding(),
                },
            ],
        });

        log::debug!(
            "GPU propagator ready: {} ({} bytes per grid)",
            adapter.get_info().name,
            grid_bytes
        );

        Ok(Self {
            device,
            queue,
            rule,
            axis_size,
            pipeline,
            bind_group,
            params_buffer,
            old_buffer,
            new_buffer,
            staging_buffer,
            released: false,
        })
    }

    /// Side length of the grid this propagator was built for.
    pub fn axis_size(&self) -> usize {
        self.axis_size as usize
    }

    /// Synchronous readback of the staging buffer into `new`.
    fn read_back(&self, new: &mut VoxelGrid) -> Result<(), GpuError> {
        let buffer_slice = self.staging_buffer.slice(..);

        let (tx, rx) = std::sync::mpsc::channel();
        buffer_slice.map_async(wgpu::MapMode::Read, move |result| {
            let _ = tx.send(result);
        });

        self.device.poll(wgpu::PollType::wait_indefinitely()).ok();
        rx.recv().map_err(|_| GpuError::ReadbackClosed)??;

        {
            let data = buffer_slice.get_mapped_range();
            new.cells_mut().copy_from_slice(bytemuck::cast_slice(&data));
        }

        self.staging_buffer.unmap();
        Ok(())
    }
}

impl Propagator for GpuPropagator {
    fn name(&self) -> &'static str {
        "gpu"
    }

    fn rule(&self) -> &RuleSpec {
        &self.rule
    }

    fn step(&mut self, old: &VoxelGrid, new: &mut VoxelGrid) -> Result<(), EngineError> {
        if self.released {
            return Err(EngineError::NotInitialized);
        }
        assert_eq!(old.axis_size(), self.axis_size());
        assert_eq!(new.axis_size(), self.axis_size());

        // Upload current generation
        self.queue
            .write_buffer(&self.old_buffer, 0, bytemuck::cast_slice(old.cells()));

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Transition Step Encoder"),
            });

        // 3D workgroup dispatch (8x8x4 workgroup size)
        let workgroups_x = self.axis_size.div_ceil(8);
        let workgroups_y = self.axis_size.div_ceil(8);
        let workgroups_z = self.axis_size.div_ceil(4);

        {
            let mut pass = encoder.begin_compute_pass(&wgpu::ComputePassDescriptor {
                label: Some("Transition Pass"),
                timestamp_writes: None,
            });
            pass.set_pipeline(&self.pipeline);
            pass.set_bind_group(0, &self.bind_group, &[]);
            pass.dispatch_workgroups(workgroups_x, workgroups_y, workgroups_z);
        }

        encoder.copy_buffer_to_buffer(
            &self.new_buffer,
            0,
            &self.staging_buffer,
            0,
            self.staging_buffer.size(),
        );

        self.queue.submit(std::iter::once(encoder.finish()));

        self.read_back(new)?;
        Ok(())
    }

    fn release(&mut self) {
        if self.released {
            return;
        }
        self.params_buffer.destroy();
        self.old_buffer.destroy();
        self.new_buffer.destroy();
        self.staging_buffer.destroy();
        self.released = true;
    }
}

impl Drop for GpuPropagator {
    fn drop(&mut self) {
        self.release();
    }
}

fn create_transition_bind_group_layout(device: &wgpu::Device) -> wgpu::BindGroupLayout {
    device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        label: Some("Transition Bind Group Layout"),
        entries: &[
            wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::COMPUTE,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: None,
                },
                count: None,
            },
            wgpu::BindGroupLayoutEntry {
                binding: 1,
                visibility: wgpu::ShaderStages::COMPUTE,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Storage { read_only: true },
                    has_dynamic_offset: false,
                    min_binding_size: None,
                },
                count: None,
            },
            wgpu::BindGroupLayoutEntry {
                binding: 2,
                visibility: wgpu::ShaderStages::COMPUTE,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Storage { read_only: false },
                    has_dynamic_offset: false,
                    min_binding_size: None,
                },
                count: None,
            },
        ],
    })
}
