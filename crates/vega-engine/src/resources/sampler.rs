use std::sync::Arc;

use crate::context::RenderContext;

/// Managed wrapper around one GPU sampler.
pub struct Sampler {
    label: String,
    sampler: wgpu::Sampler,
}

impl Sampler {
    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn raw(&self) -> &wgpu::Sampler {
        &self.sampler
    }
}

/// Builder for [`Sampler`]s.
///
/// Defaults: repeat addressing on all axes, linear filtering everywhere,
/// LOD clamp 0..1, no comparison, anisotropy 1.
#[derive(Debug, Clone)]
pub struct SamplerBuilder {
    label: String,
    address_mode_u: wgpu::AddressMode,
    address_mode_v: wgpu::AddressMode,
    address_mode_w: wgpu::AddressMode,
    mag_filter: wgpu::FilterMode,
    min_filter: wgpu::FilterMode,
    mipmap_filter: wgpu::FilterMode,
    lod_min_clamp: f32,
    lod_max_clamp: f32,
    compare: Option<wgpu::CompareFunction>,
    anisotropy_clamp: u16,
}

impl Default for SamplerBuilder {
    fn default() -> Self {
        Self {
            label: "Vega Sampler".to_string(),
            address_mode_u: wgpu::AddressMode::Repeat,
            address_mode_v: wgpu::AddressMode::Repeat,
            address_mode_w: wgpu::AddressMode::Repeat,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            mipmap_filter: wgpu::FilterMode::Linear,
            lod_min_clamp: 0.0,
            lod_max_clamp: 1.0,
            compare: None,
            anisotropy_clamp: 1,
        }
    }
}

impl SamplerBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    /// Sets the same addressing mode on all three axes.
    pub fn with_address_mode(mut self, mode: wgpu::AddressMode) -> Self {
        self.address_mode_u = mode;
        self.address_mode_v = mode;
        self.address_mode_w = mode;
        self
    }

    pub fn with_address_mode_u(mut self, mode: wgpu::AddressMode) -> Self {
        self.address_mode_u = mode;
        self
    }

    pub fn with_address_mode_v(mut self, mode: wgpu::AddressMode) -> Self {
        self.address_mode_v = mode;
        self
    }

    pub fn with_address_mode_w(mut self, mode: wgpu::AddressMode) -> Self {
        self.address_mode_w = mode;
        self
    }

    pub fn with_mag_filter(mut self, filter: wgpu::FilterMode) -> Self {
        self.mag_filter = filter;
        self
    }

    pub fn with_min_filter(mut self, filter: wgpu::FilterMode) -> Self {
        self.min_filter = filter;
        self
    }

    pub fn with_mipmap_filter(mut self, filter: wgpu::FilterMode) -> Self {
        self.mipmap_filter = filter;
        self
    }

    pub fn with_lod_min_clamp(mut self, clamp: f32) -> Self {
        self.lod_min_clamp = clamp;
        self
    }

    pub fn with_lod_max_clamp(mut self, clamp: f32) -> Self {
        self.lod_max_clamp = clamp;
        self
    }

    pub fn with_compare(mut self, compare: wgpu::CompareFunction) -> Self {
        self.compare = Some(compare);
        self
    }

    pub fn with_anisotropy_clamp(mut self, clamp: u16) -> Self {
        self.anisotropy_clamp = clamp;
        self
    }

    fn descriptor(&self) -> wgpu::SamplerDescriptor<'_> {
        wgpu::SamplerDescriptor {
            label: Some(&self.label),
            address_mode_u: self.address_mode_u,
            address_mode_v: self.address_mode_v,
            address_mode_w: self.address_mode_w,
            mag_filter: self.mag_filter,
            min_filter: self.min_filter,
            mipmap_filter: match self.mipmap_filter {
                wgpu::FilterMode::Nearest => wgpu::MipmapFilterMode::Nearest,
                wgpu::FilterMode::Linear => wgpu::MipmapFilterMode::Linear,
            },
            lod_min_clamp: self.lod_min_clamp,
            lod_max_clamp: self.lod_max_clamp,
            compare: self.compare,
            anisotropy_clamp: self.anisotropy_clamp,
            border_color: None,
        }
    }

    pub fn build(self, ctx: &RenderContext) -> Arc<Sampler> {
        let sampler = ctx.device().create_sampler(&self.descriptor());
        Arc::new(Sampler {
            label: self.label,
            sampler,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ── defaults ──────────────────────────────────────────────────────────

    #[test]
    fn default_descriptor_matches_the_contract() {
        let builder = SamplerBuilder::new();
        let desc = builder.descriptor();

        assert_eq!(desc.address_mode_u, wgpu::AddressMode::Repeat);
        assert_eq!(desc.address_mode_v, wgpu::AddressMode::Repeat);
        assert_eq!(desc.address_mode_w, wgpu::AddressMode::Repeat);
        assert_eq!(desc.mag_filter, wgpu::FilterMode::Linear);
        assert_eq!(desc.lod_min_clamp, 0.0);
        assert_eq!(desc.lod_max_clamp, 1.0);
        assert_eq!(desc.compare, None);
        assert_eq!(desc.anisotropy_clamp, 1);
    }

    #[test]
    fn lod_clamps_are_set_independently() {
        let builder = SamplerBuilder::new()
            .with_lod_min_clamp(0.5)
            .with_lod_max_clamp(4.0);
        let desc = builder.descriptor();
        assert_eq!(desc.lod_min_clamp, 0.5);
        assert_eq!(desc.lod_max_clamp, 4.0);
    }

    #[test]
    fn shared_address_mode_covers_all_axes() {
        let builder = SamplerBuilder::new().with_address_mode(wgpu::AddressMode::ClampToEdge);
        let desc = builder.descriptor();
        assert_eq!(desc.address_mode_u, wgpu::AddressMode::ClampToEdge);
        assert_eq!(desc.address_mode_v, wgpu::AddressMode::ClampToEdge);
        assert_eq!(desc.address_mode_w, wgpu::AddressMode::ClampToEdge);
    }
}
