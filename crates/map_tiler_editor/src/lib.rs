//! Editing layer for map_tiler
//!
//! - [`ShapeRasterizer`] - rectangles, circles, lines and flood fills as
//!   coordinate sets
//! - [`TileGridStore`] - the authoritative grid; every mutation re-resolves
//!   borders before returning
//! - [`HistoryManager`] - snapshot undo/redo, one snapshot per gesture
//! - [`EditorSession`] - press/drag/release gesture handling on top of both
//! - [`render_frame`] - per-cell sprites for a renderer
//! - [`EditorSettings`] - persisted user preferences
//!
//! All of it is single-threaded and synchronous. A host that shares a
//! session between threads must put it behind a single-writer lock.
//!
//! With the `bevy` feature, [`EditorSession`] is a Bevy `Resource`.

pub mod history;
pub mod render;
pub mod session;
pub mod settings;
pub mod shapes;
pub mod store;

pub use history::{HistoryManager, Snapshot};
pub use render::{render_frame, CellSprites, DanglingReference, RenderFrame, RenderedCell};
pub use session::{EditorSession, EditorTool, ToolShape};
pub use settings::{EditorSettings, SettingsError};
pub use shapes::ShapeRasterizer;
pub use store::TileGridStore;

// Re-export lower layers
pub use map_tiler_autotile;
pub use map_tiler_core;
