//! sheetdraw Core Library
//!
//! Headless drawing-canvas editor: scene model, graphics-engine interface,
//! editor, serialization bridge, image pipeline and multi-sheet management.

pub mod bridge;
pub mod camera;
pub mod config;
pub mod editor;
pub mod engine;
pub mod error;
pub mod export;
pub mod handle;
pub mod input;
pub mod objects;
pub mod pipeline;
pub mod placement;
pub mod scene;
pub mod sheets;

pub use bridge::{ChangeBridge, Deferred, SubscriptionId};
pub use camera::Camera;
pub use config::{EditorConfig, TextDefaults};
pub use editor::{CanvasEditor, EditorMode};
pub use engine::{GraphicsEngine, SceneEvent, Surface};
pub use error::{DocumentError, ExportError, PipelineError};
pub use export::Rasterizer;
pub use handle::CanvasHandle;
pub use input::{ClipboardItem, DroppedFile, EditorInput, Modifiers};
pub use objects::{ObjectId, ObjectTrait, SceneObject, SerializableColor};
pub use pipeline::{AssetResolver, FileAssetResolver, ImageIntent, MemoryAssetResolver, PreparedImage, ResizeOptions};
pub use placement::{EVICTION_MARGIN, ObjectFit};
pub use scene::Scene;
pub use sheets::{MAX_SHEETS, SheetCollection, SheetManager};
