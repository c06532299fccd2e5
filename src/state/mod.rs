pub mod editor;
pub mod transform;

pub use editor::{ConnectionEditor, DragState, PreviewColor, PreviewLine};
pub use transform::{Anchor, CoordinateTransform, PixelPoint};
