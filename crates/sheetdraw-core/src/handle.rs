//! Imperative access for the host, outside the normal event flow.

use crate::editor::CanvasEditor;
use crate::engine::GraphicsEngine;

/// Direct document and engine access.
pub trait CanvasHandle {
    /// The current scene as JSON.
    fn get_document(&self) -> String;

    /// Replace the scene. Does not produce a change notification.
    fn set_document(&mut self, json: &str);

    fn engine(&self) -> &dyn GraphicsEngine;

    fn engine_mut(&mut self) -> &mut dyn GraphicsEngine;
}

impl<E: GraphicsEngine> CanvasHandle for CanvasEditor<E> {
    fn get_document(&self) -> String {
        self.serialize()
    }

    fn set_document(&mut self, json: &str) {
        self.load_scene(json);
    }

    fn engine(&self) -> &dyn GraphicsEngine {
        CanvasEditor::<E>::engine(self)
    }

    fn engine_mut(&mut self) -> &mut dyn GraphicsEngine {
        CanvasEditor::<E>::engine_mut(self)
    }
}
