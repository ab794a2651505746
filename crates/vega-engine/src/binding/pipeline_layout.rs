use std::sync::Arc;

use crate::context::RenderContext;

use super::layout::BindGroupLayout;

/// Ordered list of bind group layouts; slot position is the group index
/// referenced by shaders.
pub struct PipelineLayout {
    label: String,
    layout: wgpu::PipelineLayout,
    bind_group_layouts: Vec<Arc<BindGroupLayout>>,
}

impl PipelineLayout {
    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn raw(&self) -> &wgpu::PipelineLayout {
        &self.layout
    }

    pub fn bind_group_layouts(&self) -> &[Arc<BindGroupLayout>] {
        &self.bind_group_layouts
    }
}

/// Builder for [`PipelineLayout`]s.
pub struct PipelineLayoutBuilder {
    label: String,
    layouts: Vec<Arc<BindGroupLayout>>,
}

impl Default for PipelineLayoutBuilder {
    fn default() -> Self {
        Self {
            label: "Vega Pipeline Layout".to_string(),
            layouts: Vec::new(),
        }
    }
}

impl PipelineLayoutBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    /// Appends a layout; its position becomes the group index.
    pub fn add_bind_group_layout(mut self, layout: Arc<BindGroupLayout>) -> Self {
        self.layouts.push(layout);
        self
    }

    pub fn build(self, ctx: &RenderContext) -> Arc<PipelineLayout> {
        let raw_layouts: Vec<Option<&wgpu::BindGroupLayout>> =
            self.layouts.iter().map(|l| Some(l.raw())).collect();

        let layout = ctx
            .device()
            .create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
                label: Some(&self.label),
                bind_group_layouts: &raw_layouts,
                immediate_size: 0,
            });

        Arc::new(PipelineLayout {
            label: self.label,
            layout,
            bind_group_layouts: self.layouts,
        })
    }
}
