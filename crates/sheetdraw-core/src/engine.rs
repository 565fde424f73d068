//! Graphics engine interface and the in-memory drawing surface.
//!
//! The editor talks to its drawing surface only through [`GraphicsEngine`].
//! Every mutation that goes through the interface records a [`SceneEvent`],
//! which is what the serialization bridge observes.

use crate::objects::{ObjectId, ObjectTrait, SceneObject, SerializableColor};
use crate::scene::Scene;
use kurbo::{Point, Size};

/// Mutation notifications recorded by the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SceneEvent {
    Added(ObjectId),
    Modified(ObjectId),
    Removed(ObjectId),
}

/// Capabilities the editor needs from a 2D graphics engine.
pub trait GraphicsEngine {
    /// Create an empty surface with a fixed logical size.
    fn create_surface(size: Size) -> Self
    where
        Self: Sized;

    /// Logical size of the surface.
    fn size(&self) -> Size;

    fn background(&self) -> SerializableColor;

    fn set_background(&mut self, color: SerializableColor);

    /// Objects back to front.
    fn objects(&self) -> &[SceneObject];

    /// Get an object by ID.
    fn object(&self, id: ObjectId) -> Option<&SceneObject> {
        self.objects().iter().find(|o| o.id() == id)
    }

    /// Append an object on top. Records `Added`.
    fn add_object(&mut self, object: SceneObject) -> ObjectId;

    /// Remove an object. Records `Removed` if it existed.
    fn remove_object(&mut self, id: ObjectId) -> Option<SceneObject>;

    /// Apply a completed edit to an object. Records `Modified`.
    fn modify_object(&mut self, id: ObjectId, edit: &mut dyn FnMut(&mut SceneObject)) -> bool;

    /// Apply a live edit (mid-gesture) without recording an event.
    fn update_object(&mut self, id: ObjectId, edit: &mut dyn FnMut(&mut SceneObject)) -> bool;

    /// Record `Modified` for an object whose live edits are now complete.
    fn mark_modified(&mut self, id: ObjectId) -> bool;

    /// Remove all objects and reset the background to white.
    /// Records `Removed` for each object.
    fn clear(&mut self);

    /// Snapshot the surface as a scene document.
    fn to_document(&self) -> Scene;

    /// Replace the surface content. Records nothing.
    fn load_document(&mut self, scene: Scene);

    /// Drain the events recorded since the last call.
    fn take_events(&mut self) -> Vec<SceneEvent>;

    /// Objects under a point, front to back.
    fn objects_at_point(&self, point: Point, tolerance: f64) -> Vec<ObjectId> {
        self.objects()
            .iter()
            .rev()
            .filter(|o| o.hit_test(point, tolerance))
            .map(|o| o.id())
            .collect()
    }
}

/// In-memory drawing surface.
#[derive(Debug, Clone)]
pub struct Surface {
    size: Size,
    background: SerializableColor,
    objects: Vec<SceneObject>,
    events: Vec<SceneEvent>,
}

impl Surface {
    fn position(&self, id: ObjectId) -> Option<usize> {
        self.objects.iter().position(|o| o.id() == id)
    }
}

impl GraphicsEngine for Surface {
    fn create_surface(size: Size) -> Self {
        Self {
            size,
            background: SerializableColor::white(),
            objects: Vec::new(),
            events: Vec::new(),
        }
    }

    fn size(&self) -> Size {
        self.size
    }

    fn background(&self) -> SerializableColor {
        self.background
    }

    fn set_background(&mut self, color: SerializableColor) {
        self.background = color;
    }

    fn objects(&self) -> &[SceneObject] {
        &self.objects
    }

    fn add_object(&mut self, object: SceneObject) -> ObjectId {
        let id = object.id();
        self.objects.push(object);
        self.events.push(SceneEvent::Added(id));
        id
    }

    fn remove_object(&mut self, id: ObjectId) -> Option<SceneObject> {
        let index = self.position(id)?;
        let removed = self.objects.remove(index);
        self.events.push(SceneEvent::Removed(id));
        Some(removed)
    }

    fn modify_object(&mut self, id: ObjectId, edit: &mut dyn FnMut(&mut SceneObject)) -> bool {
        if self.update_object(id, edit) {
            self.events.push(SceneEvent::Modified(id));
            true
        } else {
            false
        }
    }

    fn update_object(&mut self, id: ObjectId, edit: &mut dyn FnMut(&mut SceneObject)) -> bool {
        match self.objects.iter_mut().find(|o| o.id() == id) {
            Some(object) => {
                edit(object);
                true
            }
            None => false,
        }
    }

    fn mark_modified(&mut self, id: ObjectId) -> bool {
        if self.position(id).is_some() {
            self.events.push(SceneEvent::Modified(id));
            true
        } else {
            false
        }
    }

    fn clear(&mut self) {
        for object in self.objects.drain(..) {
            self.events.push(SceneEvent::Removed(object.id()));
        }
        self.background = SerializableColor::white();
    }

    fn to_document(&self) -> Scene {
        Scene {
            background: self.background,
            objects: self.objects.clone(),
            ..Scene::default()
        }
    }

    fn load_document(&mut self, scene: Scene) {
        self.background = scene.background;
        self.objects = scene.objects;
    }

    fn take_events(&mut self) -> Vec<SceneEvent> {
        std::mem::take(&mut self.events)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::objects::{Stroke, Text};

    fn surface() -> Surface {
        Surface::create_surface(Size::new(800.0, 600.0))
    }

    #[test]
    fn test_add_remove_records_events() {
        let mut surface = surface();
        let id = surface.add_object(Text::new(Point::new(10.0, 10.0), "a").into());
        assert_eq!(surface.objects().len(), 1);
        assert!(surface.remove_object(id).is_some());
        assert!(surface.remove_object(id).is_none());
        assert_eq!(
            surface.take_events(),
            vec![SceneEvent::Added(id), SceneEvent::Removed(id)]
        );
        assert!(surface.take_events().is_empty());
    }

    #[test]
    fn test_update_is_silent_modify_is_not() {
        let mut surface = surface();
        let id = surface.add_object(Text::new(Point::new(10.0, 10.0), "a").into());
        surface.take_events();

        assert!(surface.update_object(id, &mut |o| o.transform_mut().angle = 10.0));
        assert!(surface.take_events().is_empty());

        assert!(surface.modify_object(id, &mut |o| o.transform_mut().angle = 20.0));
        assert_eq!(surface.take_events(), vec![SceneEvent::Modified(id)]);
        assert!((surface.object(id).unwrap().transform().angle - 20.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_clear_resets_background() {
        let mut surface = surface();
        surface.set_background(SerializableColor::black());
        let a = surface.add_object(Text::new(Point::ZERO, "a").into());
        let b = surface.add_object(Text::new(Point::ZERO, "b").into());
        surface.take_events();

        surface.clear();
        assert!(surface.objects().is_empty());
        assert_eq!(surface.background(), SerializableColor::white());
        assert_eq!(
            surface.take_events(),
            vec![SceneEvent::Removed(a), SceneEvent::Removed(b)]
        );
    }

    #[test]
    fn test_load_document_is_silent() {
        let mut surface = surface();
        let mut scene = Scene::new();
        scene.objects.push(Text::new(Point::ZERO, "loaded").into());
        surface.load_document(scene.clone());
        assert!(surface.take_events().is_empty());
        assert_eq!(surface.to_document(), scene);
    }

    #[test]
    fn test_objects_at_point_front_to_back() {
        let mut surface = surface();
        let back = surface.add_object(
            Stroke::from_scene_points(
                &[Point::new(0.0, 50.0), Point::new(100.0, 50.0)],
                10.0,
                SerializableColor::black(),
            )
            .into(),
        );
        let front = surface.add_object(Text::new(Point::new(50.0, 50.0), "front").into());

        let hits = surface.objects_at_point(Point::new(50.0, 50.0), 0.0);
        assert_eq!(hits, vec![front, back]);
        assert!(surface.objects_at_point(Point::new(700.0, 500.0), 0.0).is_empty());
    }
}
