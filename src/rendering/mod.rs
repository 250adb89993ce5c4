pub mod headless;
pub mod surface;

// Re-export main types
pub use headless::{HeadlessSurface, PlaceholderState};
pub use surface::{PlaceholderId, RenderSurface};
