mod error;
mod render_context;

pub use error::{FrameOutcome, SurfaceErrorAction};
pub use render_context::{RenderContext, RenderContextBuilder};
