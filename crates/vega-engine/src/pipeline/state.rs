//! Pipeline state value builders.
//!
//! Small, order-independent builders that finalize into plain wgpu state
//! structs. Defaults follow the common case: triangle-list topology, one
//! sample, replace blending, depth write enabled with less-than compare at
//! 32-bit float depth, full RGBA write mask.

use std::sync::Arc;

use crate::resources::Shader;

use super::vertex_layout::VertexLayout;

/// Builder for `wgpu::BlendState`. Defaults to replace on both channels.
#[derive(Debug, Clone, Copy)]
pub struct BlendStateBuilder {
    color: wgpu::BlendComponent,
    alpha: wgpu::BlendComponent,
}

impl Default for BlendStateBuilder {
    fn default() -> Self {
        Self {
            color: wgpu::BlendComponent::REPLACE,
            alpha: wgpu::BlendComponent::REPLACE,
        }
    }
}

impl BlendStateBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_color(
        mut self,
        operation: wgpu::BlendOperation,
        src_factor: wgpu::BlendFactor,
        dst_factor: wgpu::BlendFactor,
    ) -> Self {
        self.color = wgpu::BlendComponent {
            operation,
            src_factor,
            dst_factor,
        };
        self
    }

    pub fn with_alpha(
        mut self,
        operation: wgpu::BlendOperation,
        src_factor: wgpu::BlendFactor,
        dst_factor: wgpu::BlendFactor,
    ) -> Self {
        self.alpha = wgpu::BlendComponent {
            operation,
            src_factor,
            dst_factor,
        };
        self
    }

    /// Standard source-over alpha blending.
    pub fn alpha_blending(self) -> Self {
        let blend = wgpu::BlendState::ALPHA_BLENDING;
        Self {
            color: blend.color,
            alpha: blend.alpha,
        }
    }

    pub fn build(self) -> wgpu::BlendState {
        wgpu::BlendState {
            color: self.color,
            alpha: self.alpha,
        }
    }
}

/// Builder for `wgpu::ColorTargetState`. Write mask defaults to all channels;
/// blending is off unless supplied.
#[derive(Debug, Clone, Copy)]
pub struct ColorTargetStateBuilder {
    format: wgpu::TextureFormat,
    blend: Option<wgpu::BlendState>,
    write_mask: wgpu::ColorWrites,
}

impl ColorTargetStateBuilder {
    pub fn new(format: wgpu::TextureFormat) -> Self {
        Self {
            format,
            blend: None,
            write_mask: wgpu::ColorWrites::ALL,
        }
    }

    pub fn with_blend(mut self, blend: wgpu::BlendState) -> Self {
        self.blend = Some(blend);
        self
    }

    pub fn with_write_mask(mut self, write_mask: wgpu::ColorWrites) -> Self {
        self.write_mask = write_mask;
        self
    }

    pub fn build(self) -> wgpu::ColorTargetState {
        wgpu::ColorTargetState {
            format: self.format,
            blend: self.blend,
            write_mask: self.write_mask,
        }
    }
}

/// Builder for `wgpu::StencilFaceState`. Defaults to always-pass, keep.
#[derive(Debug, Clone, Copy)]
pub struct StencilFaceStateBuilder {
    compare: wgpu::CompareFunction,
    fail_op: wgpu::StencilOperation,
    depth_fail_op: wgpu::StencilOperation,
    pass_op: wgpu::StencilOperation,
}

impl Default for StencilFaceStateBuilder {
    fn default() -> Self {
        Self {
            compare: wgpu::CompareFunction::Always,
            fail_op: wgpu::StencilOperation::Keep,
            depth_fail_op: wgpu::StencilOperation::Keep,
            pass_op: wgpu::StencilOperation::Keep,
        }
    }
}

impl StencilFaceStateBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_compare(mut self, compare: wgpu::CompareFunction) -> Self {
        self.compare = compare;
        self
    }

    pub fn with_fail_op(mut self, op: wgpu::StencilOperation) -> Self {
        self.fail_op = op;
        self
    }

    pub fn with_depth_fail_op(mut self, op: wgpu::StencilOperation) -> Self {
        self.depth_fail_op = op;
        self
    }

    pub fn with_pass_op(mut self, op: wgpu::StencilOperation) -> Self {
        self.pass_op = op;
        self
    }

    pub fn build(self) -> wgpu::StencilFaceState {
        wgpu::StencilFaceState {
            compare: self.compare,
            fail_op: self.fail_op,
            depth_fail_op: self.depth_fail_op,
            pass_op: self.pass_op,
        }
    }
}

/// Builder for `wgpu::PrimitiveState`. Defaults to a triangle list with
/// counter-clockwise front faces and no culling.
#[derive(Debug, Clone, Copy)]
pub struct PrimitiveStateBuilder {
    topology: wgpu::PrimitiveTopology,
    strip_index_format: Option<wgpu::IndexFormat>,
    front_face: wgpu::FrontFace,
    cull_mode: Option<wgpu::Face>,
    polygon_mode: wgpu::PolygonMode,
}

impl Default for PrimitiveStateBuilder {
    fn default() -> Self {
        Self {
            topology: wgpu::PrimitiveTopology::TriangleList,
            strip_index_format: None,
            front_face: wgpu::FrontFace::Ccw,
            cull_mode: None,
            polygon_mode: wgpu::PolygonMode::Fill,
        }
    }
}

impl PrimitiveStateBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_topology(mut self, topology: wgpu::PrimitiveTopology) -> Self {
        self.topology = topology;
        self
    }

    pub fn with_strip_index_format(mut self, format: wgpu::IndexFormat) -> Self {
        self.strip_index_format = Some(format);
        self
    }

    pub fn with_front_face(mut self, front_face: wgpu::FrontFace) -> Self {
        self.front_face = front_face;
        self
    }

    pub fn with_cull_mode(mut self, face: wgpu::Face) -> Self {
        self.cull_mode = Some(face);
        self
    }

    pub fn with_polygon_mode(mut self, mode: wgpu::PolygonMode) -> Self {
        self.polygon_mode = mode;
        self
    }

    pub fn build(self) -> wgpu::PrimitiveState {
        wgpu::PrimitiveState {
            topology: self.topology,
            strip_index_format: self.strip_index_format,
            front_face: self.front_face,
            cull_mode: self.cull_mode,
            polygon_mode: self.polygon_mode,
            ..Default::default()
        }
    }
}

/// Builder for `wgpu::DepthStencilState`. Defaults to 32-bit float depth
/// with write enabled and less-than compare; stencil is inert.
#[derive(Debug, Clone, Copy)]
pub struct DepthStencilStateBuilder {
    format: wgpu::TextureFormat,
    depth_write_enabled: bool,
    depth_compare: wgpu::CompareFunction,
    stencil_front: wgpu::StencilFaceState,
    stencil_back: wgpu::StencilFaceState,
    stencil_read_mask: u32,
    stencil_write_mask: u32,
}

impl Default for DepthStencilStateBuilder {
    fn default() -> Self {
        Self {
            format: wgpu::TextureFormat::Depth32Float,
            depth_write_enabled: true,
            depth_compare: wgpu::CompareFunction::Less,
            stencil_front: wgpu::StencilFaceState::IGNORE,
            stencil_back: wgpu::StencilFaceState::IGNORE,
            stencil_read_mask: 0xFF,
            stencil_write_mask: 0xFF,
        }
    }
}

impl DepthStencilStateBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_format(mut self, format: wgpu::TextureFormat) -> Self {
        self.format = format;
        self
    }

    pub fn with_depth_write_enabled(mut self, enabled: bool) -> Self {
        self.depth_write_enabled = enabled;
        self
    }

    pub fn with_depth_compare(mut self, compare: wgpu::CompareFunction) -> Self {
        self.depth_compare = compare;
        self
    }

    pub fn with_stencil_front(mut self, state: wgpu::StencilFaceState) -> Self {
        self.stencil_front = state;
        self
    }

    pub fn with_stencil_back(mut self, state: wgpu::StencilFaceState) -> Self {
        self.stencil_back = state;
        self
    }

    pub fn with_stencil_read_mask(mut self, mask: u32) -> Self {
        self.stencil_read_mask = mask;
        self
    }

    pub fn with_stencil_write_mask(mut self, mask: u32) -> Self {
        self.stencil_write_mask = mask;
        self
    }

    pub fn build(self) -> wgpu::DepthStencilState {
        wgpu::DepthStencilState {
            format: self.format,
            depth_write_enabled: Some(self.depth_write_enabled),
            depth_compare: Some(self.depth_compare),
            stencil: wgpu::StencilState {
                front: self.stencil_front,
                back: self.stencil_back,
                read_mask: self.stencil_read_mask,
                write_mask: self.stencil_write_mask,
            },
            bias: wgpu::DepthBiasState::default(),
        }
    }
}

/// Builder for `wgpu::MultisampleState`. Defaults to one sample with a full
/// coverage mask.
#[derive(Debug, Clone, Copy)]
pub struct MultisampleStateBuilder {
    count: u32,
    mask: u64,
    alpha_to_coverage_enabled: bool,
}

impl Default for MultisampleStateBuilder {
    fn default() -> Self {
        Self {
            count: 1,
            mask: !0,
            alpha_to_coverage_enabled: false,
        }
    }
}

impl MultisampleStateBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_count(mut self, count: u32) -> Self {
        self.count = count;
        self
    }

    pub fn with_mask(mut self, mask: u64) -> Self {
        self.mask = mask;
        self
    }

    pub fn with_alpha_to_coverage(mut self, enabled: bool) -> Self {
        self.alpha_to_coverage_enabled = enabled;
        self
    }

    pub fn build(self) -> wgpu::MultisampleState {
        wgpu::MultisampleState {
            count: self.count,
            mask: self.mask,
            alpha_to_coverage_enabled: self.alpha_to_coverage_enabled,
        }
    }
}

/// Programmable vertex stage: a compiled shader, an entry point, and the
/// vertex buffer layouts the stage reads.
#[derive(Clone)]
pub struct VertexState {
    pub(crate) shader: Arc<Shader>,
    pub(crate) entry_point: String,
    pub(crate) layouts: Vec<VertexLayout>,
}

impl VertexState {
    pub fn new(shader: Arc<Shader>) -> Self {
        Self {
            shader,
            entry_point: "vs_main".to_string(),
            layouts: Vec::new(),
        }
    }

    pub fn with_entry_point(mut self, entry_point: impl Into<String>) -> Self {
        self.entry_point = entry_point.into();
        self
    }

    pub fn add_layout(mut self, layout: VertexLayout) -> Self {
        self.layouts.push(layout);
        self
    }
}

/// Programmable fragment stage: a compiled shader, an entry point, and the
/// color targets the stage writes.
#[derive(Clone)]
pub struct FragmentState {
    pub(crate) shader: Arc<Shader>,
    pub(crate) entry_point: String,
    pub(crate) targets: Vec<wgpu::ColorTargetState>,
}

impl FragmentState {
    pub fn new(shader: Arc<Shader>) -> Self {
        Self {
            shader,
            entry_point: "fs_main".to_string(),
            targets: Vec::new(),
        }
    }

    pub fn with_entry_point(mut self, entry_point: impl Into<String>) -> Self {
        self.entry_point = entry_point.into();
        self
    }

    pub fn add_target(mut self, target: wgpu::ColorTargetState) -> Self {
        self.targets.push(target);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ── defaults ──────────────────────────────────────────────────────────

    #[test]
    fn blend_defaults_to_replace() {
        assert_eq!(BlendStateBuilder::new().build(), wgpu::BlendState::REPLACE);
    }

    #[test]
    fn color_target_defaults_to_full_write_mask_without_blend() {
        let target = ColorTargetStateBuilder::new(wgpu::TextureFormat::Rgba8Unorm).build();
        assert_eq!(target.write_mask, wgpu::ColorWrites::ALL);
        assert_eq!(target.blend, None);
        assert_eq!(target.format, wgpu::TextureFormat::Rgba8Unorm);
    }

    #[test]
    fn primitive_defaults_to_triangle_list() {
        let state = PrimitiveStateBuilder::new().build();
        assert_eq!(state.topology, wgpu::PrimitiveTopology::TriangleList);
        assert_eq!(state.front_face, wgpu::FrontFace::Ccw);
        assert_eq!(state.cull_mode, None);
    }

    #[test]
    fn depth_stencil_defaults_to_less_compare_with_write() {
        let state = DepthStencilStateBuilder::new().build();
        assert_eq!(state.format, wgpu::TextureFormat::Depth32Float);
        assert!(state.depth_write_enabled);
        assert_eq!(state.depth_compare, wgpu::CompareFunction::Less);
        assert_eq!(state.stencil.read_mask, 0xFF);
    }

    #[test]
    fn multisample_defaults_to_one_sample_full_mask() {
        let state = MultisampleStateBuilder::new().build();
        assert_eq!(state.count, 1);
        assert_eq!(state.mask, !0);
        assert!(!state.alpha_to_coverage_enabled);
    }

    #[test]
    fn stencil_face_defaults_to_always_keep() {
        let state = StencilFaceStateBuilder::new().build();
        assert_eq!(state.compare, wgpu::CompareFunction::Always);
        assert_eq!(state.pass_op, wgpu::StencilOperation::Keep);
    }

    // ── composition ───────────────────────────────────────────────────────

    #[test]
    fn alpha_blending_preset_matches_wgpu() {
        assert_eq!(
            BlendStateBuilder::new().alpha_blending().build(),
            wgpu::BlendState::ALPHA_BLENDING
        );
    }

    #[test]
    fn color_target_with_blend_keeps_it() {
        let target = ColorTargetStateBuilder::new(wgpu::TextureFormat::Bgra8UnormSrgb)
            .with_blend(wgpu::BlendState::ALPHA_BLENDING)
            .build();
        assert_eq!(target.blend, Some(wgpu::BlendState::ALPHA_BLENDING));
    }
}
