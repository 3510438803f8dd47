use candle_core::Device;
use once_cell::sync::Lazy;

/// Process-wide compute device: CUDA when available, otherwise CPU.
pub static DEVICE: Lazy<Device> = Lazy::new(|| match Device::new_cuda(0) {
    Ok(device) => {
        tracing::info!("initialized CUDA device");
        device
    }
    Err(err) => {
        tracing::debug!(error = %err, "CUDA unavailable, falling back to CPU");
        Device::Cpu
    }
});
