mod render_pipeline;
mod state;
mod vertex_layout;

pub use render_pipeline::{RenderPipeline, RenderPipelineBuilder};
pub use state::{
    BlendStateBuilder, ColorTargetStateBuilder, DepthStencilStateBuilder, FragmentState,
    MultisampleStateBuilder, PrimitiveStateBuilder, StencilFaceStateBuilder, VertexState,
};
pub use vertex_layout::VertexLayout;
