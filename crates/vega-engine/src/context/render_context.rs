use std::sync::Arc;

use anyhow::{Context, Result};
use wgpu::SurfaceError;
use winit::window::Window;

use crate::command::CommandBuffer;
use crate::resources::Framebuffer;

use super::{FrameOutcome, SurfaceErrorAction};

pub(crate) const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;

/// Owns the wgpu core objects and the surface configuration.
///
/// This type is the low-level rendering context:
/// - creates and stores Instance/Adapter/Device/Queue
/// - creates and configures the Surface (swapchain)
/// - owns the depth framebuffer, rebuilt together with the surface on resize
/// - acquires frames, runs the caller's draw callback, and presents
pub struct RenderContext {
    label: String,

    /// Keeps the native window alive for as long as the surface exists.
    window: Arc<Window>,

    instance: wgpu::Instance,
    surface: wgpu::Surface<'static>,
    adapter: wgpu::Adapter,
    device: wgpu::Device,
    queue: wgpu::Queue,

    /// Active surface configuration. Exactly one is live at a time;
    /// `resize` replaces it and the depth framebuffer together.
    config: wgpu::SurfaceConfiguration,
    limits: wgpu::Limits,

    depth: Arc<Framebuffer>,
}

impl RenderContext {
    pub fn builder() -> RenderContextBuilder {
        RenderContextBuilder::new()
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn window(&self) -> &Arc<Window> {
        &self.window
    }

    pub fn device(&self) -> &wgpu::Device {
        &self.device
    }

    pub fn queue(&self) -> &wgpu::Queue {
        &self.queue
    }

    pub fn adapter(&self) -> &wgpu::Adapter {
        &self.adapter
    }

    pub fn instance(&self) -> &wgpu::Instance {
        &self.instance
    }

    pub fn limits(&self) -> &wgpu::Limits {
        &self.limits
    }

    /// Active surface color format.
    pub fn surface_format(&self) -> wgpu::TextureFormat {
        self.config.format
    }

    /// Depth attachment format used by the context-owned depth framebuffer.
    pub fn depth_format(&self) -> wgpu::TextureFormat {
        DEPTH_FORMAT
    }

    /// Current drawable size in physical pixels.
    pub fn size(&self) -> (u32, u32) {
        (self.config.width, self.config.height)
    }

    /// Depth framebuffer matching the current surface dimensions.
    pub fn depth_framebuffer(&self) -> &Arc<Framebuffer> {
        &self.depth
    }

    /// Reconfigures the surface and rebuilds the depth framebuffer.
    ///
    /// A zero width or height is a minimized-window guard and leaves the
    /// previous configuration and depth attachment untouched. Repeat calls
    /// with the current size are no-ops.
    pub fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            log::debug!("render context '{}': ignoring zero-size resize", self.label);
            return;
        }
        if width == self.config.width && height == self.config.height {
            return;
        }

        log::debug!(
            "render context '{}': resizing surface to {width}x{height}",
            self.label
        );

        self.config.width = width;
        self.config.height = height;
        self.surface.configure(&self.device, &self.config);

        // The previous depth texture is released when its last Arc drops.
        self.depth = Arc::new(Framebuffer::new_depth(
            &self.device,
            &format!("{} Depth", self.label),
            DEPTH_FORMAT,
            width,
            height,
        ));
    }

    /// Acquires the current surface texture, runs `draw` against it as a
    /// borrowed framebuffer view, then presents.
    ///
    /// Acquisition failures are policy, not panics: `Lost`/`Outdated`
    /// reconfigure the surface and skip the frame, `Timeout` just skips,
    /// and out-of-memory is fatal.
    pub fn render_frame_on_surface<F>(&mut self, draw: F) -> Result<FrameOutcome>
    where
        F: FnOnce(&RenderContext, &Arc<Framebuffer>) -> Result<()>,
    {
        let surface_texture = match self.surface.get_current_texture() {
            Ok(texture) => texture,
            Err(err) => {
                log::warn!("render context '{}': surface acquisition failed: {err}", self.label);
                return match self.handle_surface_error(err) {
                    SurfaceErrorAction::Reconfigured | SurfaceErrorAction::SkipFrame => {
                        Ok(FrameOutcome::Skipped)
                    }
                    SurfaceErrorAction::Fatal => {
                        Err(anyhow::anyhow!("surface is out of memory"))
                    }
                };
            }
        };

        let frame = Arc::new(Framebuffer::from_surface(
            &surface_texture,
            &format!("{} Frame", self.label),
            self.config.format,
            self.config.width,
            self.config.height,
        ));

        draw(self, &frame)?;

        drop(frame);
        surface_texture.present();
        Ok(FrameOutcome::Presented)
    }

    /// Submits finished command buffers to the queue in order.
    pub fn submit_commands(&self, buffers: impl IntoIterator<Item = CommandBuffer>) {
        self.queue
            .submit(buffers.into_iter().map(CommandBuffer::into_raw));
    }

    /// Converts a `SurfaceError` into a higher-level action.
    fn handle_surface_error(&mut self, err: SurfaceError) -> SurfaceErrorAction {
        match err {
            SurfaceError::Lost | SurfaceError::Outdated => {
                if self.config.width > 0 && self.config.height > 0 {
                    self.surface.configure(&self.device, &self.config);
                }
                SurfaceErrorAction::Reconfigured
            }
            SurfaceError::OutOfMemory => SurfaceErrorAction::Fatal,
            SurfaceError::Timeout => SurfaceErrorAction::SkipFrame,
            SurfaceError::Other => SurfaceErrorAction::SkipFrame,
        }
    }
}

impl Drop for RenderContext {
    fn drop(&mut self) {
        log::debug!("releasing render context '{}'", self.label);
    }
}

/// Consuming builder for [`RenderContext`].
///
/// Preferred surface properties degrade gracefully: if the surface does not
/// advertise a preference, the first advertised capability is used instead.
/// Adapter or device negotiation failure is fatal and propagates as an error.
#[derive(Debug, Clone)]
pub struct RenderContextBuilder {
    label: String,
    backends: wgpu::Backends,
    power_preference: wgpu::PowerPreference,
    force_fallback_adapter: bool,
    preferred_format: wgpu::TextureFormat,
    prefer_srgb: bool,
    preferred_present_mode: wgpu::PresentMode,
    preferred_alpha_mode: wgpu::CompositeAlphaMode,
    required_features: wgpu::Features,
    required_limits: wgpu::Limits,
    desired_maximum_frame_latency: u32,
}

impl Default for RenderContextBuilder {
    fn default() -> Self {
        Self {
            label: "Vega Render Context".to_string(),
            backends: wgpu::Backends::all(),
            power_preference: wgpu::PowerPreference::HighPerformance,
            force_fallback_adapter: false,
            preferred_format: wgpu::TextureFormat::Rgba8Unorm,
            prefer_srgb: false,
            preferred_present_mode: wgpu::PresentMode::Mailbox,
            preferred_alpha_mode: wgpu::CompositeAlphaMode::PreMultiplied,
            required_features: wgpu::Features::empty(),
            required_limits: wgpu::Limits::default(),
            desired_maximum_frame_latency: 2,
        }
    }
}

impl RenderContextBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    pub fn with_backends(mut self, backends: wgpu::Backends) -> Self {
        self.backends = backends;
        self
    }

    pub fn with_power_preference(mut self, preference: wgpu::PowerPreference) -> Self {
        self.power_preference = preference;
        self
    }

    pub fn with_force_fallback_adapter(mut self, force: bool) -> Self {
        self.force_fallback_adapter = force;
        self
    }

    pub fn with_preferred_format(mut self, format: wgpu::TextureFormat) -> Self {
        self.preferred_format = format;
        self
    }

    /// Upgrades the preferred format to its sRGB variant at build time.
    pub fn with_srgb(mut self, prefer_srgb: bool) -> Self {
        self.prefer_srgb = prefer_srgb;
        self
    }

    pub fn with_present_mode(mut self, mode: wgpu::PresentMode) -> Self {
        self.preferred_present_mode = mode;
        self
    }

    pub fn with_alpha_mode(mut self, mode: wgpu::CompositeAlphaMode) -> Self {
        self.preferred_alpha_mode = mode;
        self
    }

    pub fn with_required_features(mut self, features: wgpu::Features) -> Self {
        self.required_features = features;
        self
    }

    pub fn with_required_limits(mut self, limits: wgpu::Limits) -> Self {
        self.required_limits = limits;
        self
    }

    pub fn with_desired_maximum_frame_latency(mut self, latency: u32) -> Self {
        self.desired_maximum_frame_latency = latency;
        self
    }

    /// Negotiates adapter, device, and surface configuration for `window`.
    ///
    /// Adapter/device acquisition is asynchronous under wgpu; both requests
    /// are driven to completion before this returns.
    pub fn build(self, window: Arc<Window>) -> Result<RenderContext> {
        let size = window.inner_size();

        let instance = wgpu::Instance::new(wgpu::InstanceDescriptor {
            backends: self.backends,
            ..wgpu::InstanceDescriptor::new_without_display_handle()
        });

        let surface = instance
            .create_surface(window.clone())
            .context("failed to create wgpu surface")?;

        let adapter = pollster::block_on(instance.request_adapter(&wgpu::RequestAdapterOptions {
            power_preference: self.power_preference,
            compatible_surface: Some(&surface),
            force_fallback_adapter: self.force_fallback_adapter,
        }))
        .context("failed to find a compatible GPU adapter")?;

        log::info!(
            "render context '{}': using adapter '{}'",
            self.label,
            adapter.get_info().name
        );

        let (device, queue) = pollster::block_on(adapter.request_device(&wgpu::DeviceDescriptor {
            label: Some(self.label.as_str()),
            required_features: self.required_features,
            required_limits: self.required_limits.clone(),
            memory_hints: wgpu::MemoryHints::Performance,
            ..Default::default()
        }))
        .context("failed to create wgpu device/queue")?;

        let caps = surface.get_capabilities(&adapter);

        let preferred_format = if self.prefer_srgb {
            self.preferred_format.add_srgb_suffix()
        } else {
            self.preferred_format
        };
        let format = negotiate(&caps.formats, preferred_format)
            .context("surface advertises no formats")?;
        let present_mode = negotiate(&caps.present_modes, self.preferred_present_mode)
            .context("surface advertises no present modes")?;
        let alpha_mode = negotiate(&caps.alpha_modes, self.preferred_alpha_mode)
            .context("surface advertises no alpha modes")?;

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode,
            alpha_mode,
            view_formats: vec![],
            desired_maximum_frame_latency: self.desired_maximum_frame_latency,
        };

        surface.configure(&device, &config);

        let limits = device.limits();
        let depth = Arc::new(Framebuffer::new_depth(
            &device,
            &format!("{} Depth", self.label),
            DEPTH_FORMAT,
            config.width,
            config.height,
        ));

        log::info!(
            "render context '{}': surface {}x{} {format:?} / {present_mode:?} / {alpha_mode:?}",
            self.label,
            config.width,
            config.height
        );

        Ok(RenderContext {
            label: self.label,
            window,
            instance,
            surface,
            adapter,
            device,
            queue,
            config,
            limits,
            depth,
        })
    }
}

/// Picks `preferred` when advertised, otherwise the first advertised value.
fn negotiate<T: Copy + PartialEq>(advertised: &[T], preferred: T) -> Option<T> {
    if advertised.contains(&preferred) {
        return Some(preferred);
    }
    advertised.first().copied()
}

#[cfg(test)]
mod tests {
    use super::*;

    // ── capability negotiation ────────────────────────────────────────────

    #[test]
    fn negotiate_keeps_preferred_when_advertised() {
        let modes = [
            wgpu::PresentMode::Fifo,
            wgpu::PresentMode::Mailbox,
            wgpu::PresentMode::Immediate,
        ];
        assert_eq!(
            negotiate(&modes, wgpu::PresentMode::Mailbox),
            Some(wgpu::PresentMode::Mailbox)
        );
    }

    #[test]
    fn negotiate_falls_back_to_first_advertised() {
        let modes = [wgpu::PresentMode::Fifo];
        assert_eq!(
            negotiate(&modes, wgpu::PresentMode::Mailbox),
            Some(wgpu::PresentMode::Fifo)
        );
    }

    #[test]
    fn negotiate_with_nothing_advertised_is_none() {
        let empty: [wgpu::TextureFormat; 0] = [];
        assert_eq!(negotiate(&empty, wgpu::TextureFormat::Rgba8Unorm), None);
    }

    // ── builder defaults ──────────────────────────────────────────────────

    #[test]
    fn srgb_preference_upgrades_the_format() {
        let builder = RenderContextBuilder::new().with_srgb(true);
        assert_eq!(
            builder.preferred_format.add_srgb_suffix(),
            wgpu::TextureFormat::Rgba8UnormSrgb
        );
    }

    #[test]
    fn default_preferences_match_the_documented_contract() {
        let builder = RenderContextBuilder::new();
        assert_eq!(builder.preferred_format, wgpu::TextureFormat::Rgba8Unorm);
        assert_eq!(builder.preferred_present_mode, wgpu::PresentMode::Mailbox);
        assert_eq!(
            builder.preferred_alpha_mode,
            wgpu::CompositeAlphaMode::PreMultiplied
        );
    }
}
