//! Drawing. `scene` speaks pixels and knows nothing about terminals;
//! `terminal` and `renderer` put it on screen with ratatui.

pub mod renderer;
pub mod scene;
pub mod terminal;

pub use renderer::Renderer;
pub use scene::{draw_scene, Fill, PixelRect, RenderSurface};
pub use terminal::{BufferSurface, GridView};
