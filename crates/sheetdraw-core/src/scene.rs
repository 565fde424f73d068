//! The persisted scene document.

use crate::error::DocumentError;
use crate::objects::{SceneObject, SerializableColor};
use serde::{Deserialize, Serialize};

/// Current document version.
pub const SCENE_VERSION: u32 = 1;

/// One drawing surface's full content: background plus objects in paint order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Scene {
    pub version: u32,
    pub background: SerializableColor,
    /// Objects back to front.
    pub objects: Vec<SceneObject>,
}

impl Default for Scene {
    fn default() -> Self {
        Self {
            version: SCENE_VERSION,
            background: SerializableColor::white(),
            objects: Vec::new(),
        }
    }
}

impl Scene {
    /// Create an empty white scene.
    pub fn new() -> Self {
        Self::default()
    }

    /// Serialize the scene to compact JSON.
    pub fn to_json(&self) -> Result<String, DocumentError> {
        Ok(serde_json::to_string(self)?)
    }

    /// Deserialize a scene. Blank input is an empty scene.
    pub fn from_json(json: &str) -> Result<Self, DocumentError> {
        if json.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_json::from_str(json)?)
    }

    /// Like [`Scene::from_json`], but malformed input degrades to an empty scene.
    pub fn from_json_lenient(json: &str) -> Self {
        match Self::from_json(json) {
            Ok(scene) => scene,
            Err(e) => {
                log::warn!("Discarding malformed scene document: {}", e);
                Self::default()
            }
        }
    }

    /// Check if the scene has no objects.
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// Get the number of objects.
    pub fn len(&self) -> usize {
        self.objects.len()
    }
}
