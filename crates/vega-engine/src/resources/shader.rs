use std::borrow::Cow;
use std::sync::Arc;

use crate::assets::FileAsset;
use crate::context::RenderContext;

/// Shader stage selector for GLSL compilation.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum ShaderStage {
    Vertex,
    Fragment,
    Compute,
}

impl ShaderStage {
    fn to_naga(self) -> wgpu::naga::ShaderStage {
        match self {
            ShaderStage::Vertex => wgpu::naga::ShaderStage::Vertex,
            ShaderStage::Fragment => wgpu::naga::ShaderStage::Fragment,
            ShaderStage::Compute => wgpu::naga::ShaderStage::Compute,
        }
    }
}

/// Managed wrapper around one compiled shader module.
pub struct Shader {
    label: String,
    module: wgpu::ShaderModule,
}

impl Shader {
    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn raw(&self) -> &wgpu::ShaderModule {
        &self.module
    }
}

/// Builder for [`Shader`]s.
///
/// WGSL and GLSL are compiled from file asset text; SPIR-V is consumed as
/// raw bytecode. Compilation errors surface through wgpu's validation path
/// and the `log` facade.
#[derive(Debug, Clone)]
pub struct ShaderBuilder {
    label: String,
}

impl Default for ShaderBuilder {
    fn default() -> Self {
        Self {
            label: "Vega Shader".to_string(),
        }
    }
}

impl ShaderBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    fn create(self, source: wgpu::ShaderSource<'_>, ctx: &RenderContext) -> Arc<Shader> {
        let module = ctx
            .device()
            .create_shader_module(wgpu::ShaderModuleDescriptor {
                label: Some(&self.label),
                source,
            });

        Arc::new(Shader {
            label: self.label,
            module,
        })
    }

    /// Compiles WGSL source from a file asset.
    pub fn build_wgsl(self, asset: &FileAsset, ctx: &RenderContext) -> Arc<Shader> {
        self.create(
            wgpu::ShaderSource::Wgsl(Cow::Borrowed(asset.content())),
            ctx,
        )
    }

    /// Compiles GLSL source for one shader stage from a file asset.
    pub fn build_glsl(self, asset: &FileAsset, stage: ShaderStage, ctx: &RenderContext) -> Arc<Shader> {
        self.create(
            wgpu::ShaderSource::Glsl {
                shader: Cow::Borrowed(asset.content()),
                stage: stage.to_naga(),
                defines: Default::default(),
            },
            ctx,
        )
    }

    /// Wraps SPIR-V bytecode.
    pub fn build_spirv(self, bytes: &[u8], ctx: &RenderContext) -> Arc<Shader> {
        self.create(wgpu::util::make_spirv(bytes), ctx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stages_map_to_naga_stages() {
        assert_eq!(
            ShaderStage::Vertex.to_naga(),
            wgpu::naga::ShaderStage::Vertex
        );
        assert_eq!(
            ShaderStage::Fragment.to_naga(),
            wgpu::naga::ShaderStage::Fragment
        );
        assert_eq!(
            ShaderStage::Compute.to_naga(),
            wgpu::naga::ShaderStage::Compute
        );
    }
}
