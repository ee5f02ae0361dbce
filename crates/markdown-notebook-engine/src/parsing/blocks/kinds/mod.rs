pub mod code_fence;
pub mod indent;

pub use code_fence::{CodeFence, FenceKind, FenceOpen};
pub use indent::Indent;
