//! Command recording: encoders, render passes, and reusable bundles.

mod bundle;
mod encoder;
mod render_pass;

pub use bundle::{RenderBundle, RenderBundleEncoder, RenderBundleEncoderBuilder};
pub use encoder::{CommandBuffer, CommandEncoder, CommandEncoderBuilder, ImageCopyTexture};
pub use render_pass::{ColorAttachment, DepthStencilAttachment, RenderPass, RenderPassBuilder};
