//! GPU Compute Backend for Volume Life
//!
//! Provides GPU-accelerated stepping using WebGPU (wgpu).

mod propagator;

pub use propagator::GpuPropagator;

/// Error type for GPU operations.
#[derive(Debug, thiserror::Error)]
pub enum GpuError {
    #[error("No suitable GPU adapter found")]
    NoAdapter,

    #[error("Failed to request GPU device: {0}")]
    DeviceRequest(#[from] wgpu::RequestDeviceError),

    #[error("Buffer mapping failed: {0}")]
    BufferMap(#[from] wgpu::BufferAsyncError),

    #[error("Grid needs {bytes} bytes per buffer, device limit is {limit}")]
    BufferTooLarge { bytes: u64, limit: u64 },

    #[error("Readback channel closed before mapping completed")]
    ReadbackClosed,
}
