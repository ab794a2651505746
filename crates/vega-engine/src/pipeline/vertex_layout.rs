/// Structured description of one vertex buffer's memory layout.
///
/// Attributes are appended with an explicit format, byte offset, and shader
/// location; the layout converts into `wgpu::VertexBufferLayout` when the
/// pipeline is built.
#[derive(Debug, Clone)]
pub struct VertexLayout {
    array_stride: u64,
    step_mode: wgpu::VertexStepMode,
    attributes: Vec<wgpu::VertexAttribute>,
}

impl VertexLayout {
    pub fn new(array_stride: u64) -> Self {
        Self {
            array_stride,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: Vec::new(),
        }
    }

    pub fn with_step_mode(mut self, step_mode: wgpu::VertexStepMode) -> Self {
        self.step_mode = step_mode;
        self
    }

    pub fn add_attribute(
        mut self,
        format: wgpu::VertexFormat,
        offset: u64,
        shader_location: u32,
    ) -> Self {
        self.attributes.push(wgpu::VertexAttribute {
            format,
            offset,
            shader_location,
        });
        self
    }

    pub fn array_stride(&self) -> u64 {
        self.array_stride
    }

    pub fn attributes(&self) -> &[wgpu::VertexAttribute] {
        &self.attributes
    }

    pub(crate) fn buffer_layout(&self) -> wgpu::VertexBufferLayout<'_> {
        wgpu::VertexBufferLayout {
            array_stride: self.array_stride,
            step_mode: self.step_mode,
            attributes: &self.attributes,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn attributes_keep_insertion_order() {
        let layout = VertexLayout::new(32)
            .add_attribute(wgpu::VertexFormat::Float32x3, 0, 0)
            .add_attribute(wgpu::VertexFormat::Float32x2, 12, 1)
            .add_attribute(wgpu::VertexFormat::Float32x3, 20, 2);

        let attrs = layout.attributes();
        assert_eq!(attrs.len(), 3);
        assert_eq!(attrs[1].offset, 12);
        assert_eq!(attrs[1].shader_location, 1);
        assert_eq!(attrs[2].format, wgpu::VertexFormat::Float32x3);
    }

    #[test]
    fn buffer_layout_reflects_stride_and_step_mode() {
        let layout = VertexLayout::new(16).with_step_mode(wgpu::VertexStepMode::Instance);
        let raw = layout.buffer_layout();
        assert_eq!(raw.array_stride, 16);
        assert_eq!(raw.step_mode, wgpu::VertexStepMode::Instance);
    }
}
