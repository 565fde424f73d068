//! The canvas editor: owns a drawing surface and turns host input and
//! commands into scene mutations.
//!
//! The editor is single-threaded and cooperative. The host feeds it input and
//! calls [`CanvasEditor::tick`] once per event-loop turn; deferred loads and
//! queued image work run there, followed by at most one change notification.

use crate::bridge::{ChangeBridge, Deferred, DeferredQueue, SubscriptionId};
use crate::camera::Camera;
use crate::config::EditorConfig;
use crate::engine::{GraphicsEngine, Surface};
use crate::error::ExportError;
use crate::export::Rasterizer;
use crate::input::{ClipboardItem, DroppedFile, EditorInput, KeyCommand, Modifiers};
use crate::objects::{ObjectId, ObjectTrait, SceneObject, SerializableColor, Stroke, Text};
use crate::pipeline::{
    AssetResolver, FileAssetResolver, ImageIntent, ImageJob, ImagePipeline, PreparedImage, is_supported_mime,
};
use crate::placement::{ObjectFit, center_object, fit_object, is_out_of_canvas};
use crate::scene::Scene;
use kurbo::{Point, Size, Vec2};

/// Pointer hit tolerance in screen pixels.
const HIT_TOLERANCE: f64 = 4.0;

/// Top-level interaction mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EditorMode {
    /// Objects can be selected and transformed.
    #[default]
    Select,
    /// Pointer input draws freehand strokes.
    Drawing,
}

/// Pointer gesture in progress.
#[derive(Debug, Clone, PartialEq)]
enum Gesture {
    Idle,
    Drawing { points: Vec<Point> },
    Dragging { last: Point, moved: bool },
}

/// Scene graph host.
pub struct CanvasEditor<E: GraphicsEngine = Surface> {
    config: EditorConfig,
    engine: E,
    camera: Camera,
    viewport: Size,
    mode: EditorMode,
    brush_width: f64,
    brush_color: SerializableColor,
    /// Selected objects, primary first.
    selection: Vec<ObjectId>,
    gesture: Gesture,
    drop_hover: bool,
    bridge: ChangeBridge,
    deferred: DeferredQueue,
    pipeline: ImagePipeline,
    resolver: Box<dyn AssetResolver>,
    disposed: bool,
}

impl CanvasEditor<Surface> {
    /// Create an editor over an in-memory surface.
    pub fn new(config: EditorConfig) -> Self {
        Self::create(config)
    }

    /// Create an editor that loads `json` on its first tick.
    ///
    /// Anything inserted before that tick is replaced by the document.
    pub fn with_initial_document(config: EditorConfig, json: impl Into<String>) -> Self {
        let mut editor = Self::new(config);
        editor.queue_document(json);
        editor
    }
}

impl<E: GraphicsEngine> CanvasEditor<E> {
    /// Create an editor over a fresh surface of engine `E`.
    pub fn create(config: EditorConfig) -> Self {
        let engine = E::create_surface(config.scene_size());
        let camera = Camera::with_zoom(config.initial_zoom);
        let viewport = camera.display_size(engine.size());
        let pipeline = ImagePipeline::new(
            config.resize_options(),
            config.image_fit_multiplier,
            config.asset_fit_multiplier,
        );
        let resolver = FileAssetResolver::new(config.asset_root.clone().unwrap_or_default());

        Self {
            brush_width: config.brush_width,
            brush_color: config.brush_color,
            config,
            engine,
            camera,
            viewport,
            mode: EditorMode::Select,
            selection: Vec::new(),
            gesture: Gesture::Idle,
            drop_hover: false,
            bridge: ChangeBridge::new(),
            deferred: DeferredQueue::new(),
            pipeline,
            resolver: Box::new(resolver),
            disposed: false,
        }
    }

    /// Replace the resolver used for asset sources.
    pub fn with_resolver(mut self, resolver: impl AssetResolver + 'static) -> Self {
        self.resolver = Box::new(resolver);
        self
    }

    /// Schedule a silent document load for the next tick.
    pub fn queue_document(&mut self, json: impl Into<String>) {
        if !self.disposed {
            self.deferred.push(Deferred::Load(json.into()));
        }
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    pub fn engine_mut(&mut self) -> &mut E {
        &mut self.engine
    }

    /// Logical scene size, independent of zoom.
    pub fn scene_size(&self) -> Size {
        self.engine.size()
    }

    fn scene_center(&self) -> Point {
        let size = self.scene_size();
        Point::new(size.width / 2.0, size.height / 2.0)
    }

    // --- Mode and brush ---

    pub fn mode(&self) -> EditorMode {
        self.mode
    }

    pub fn is_drawing_mode(&self) -> bool {
        self.mode == EditorMode::Drawing
    }

    /// Switch between drawing and selection. Entering drawing clears the selection.
    pub fn set_drawing_mode(&mut self, enabled: bool) {
        let mode = if enabled { EditorMode::Drawing } else { EditorMode::Select };
        if mode == self.mode {
            return;
        }
        log::debug!("Editor mode: {:?} -> {:?}", self.mode, mode);
        self.mode = mode;
        self.gesture = Gesture::Idle;
        if enabled {
            self.selection.clear();
        }
    }

    /// Set the brush for strokes drawn from now on.
    pub fn set_brush(&mut self, width: f64, color: SerializableColor) {
        if !width.is_finite() || width <= 0.0 {
            log::warn!("Ignoring invalid brush width {}", width);
            return;
        }
        self.brush_width = width;
        self.brush_color = color;
    }

    pub fn brush(&self) -> (f64, SerializableColor) {
        (self.brush_width, self.brush_color)
    }

    // --- Selection ---

    pub fn selection(&self) -> &[ObjectId] {
        &self.selection
    }

    /// The first selected object; single-object commands act on it.
    pub fn primary_selection(&self) -> Option<ObjectId> {
        self.selection.first().copied()
    }

    /// Whether transform commands currently have an effect.
    pub fn can_transform(&self) -> bool {
        self.mode == EditorMode::Select && !self.selection.is_empty()
    }

    /// Select a single object. Ignored in drawing mode or for unknown ids.
    pub fn select(&mut self, id: ObjectId) -> bool {
        if self.mode != EditorMode::Select || self.engine.object(id).is_none() {
            return false;
        }
        self.selection = vec![id];
        true
    }

    /// Add an object to the selection.
    pub fn add_to_selection(&mut self, id: ObjectId) -> bool {
        if self.mode != EditorMode::Select || self.engine.object(id).is_none() {
            return false;
        }
        if !self.selection.contains(&id) {
            self.selection.push(id);
        }
        true
    }

    pub fn clear_selection(&mut self) {
        self.selection.clear();
    }

    // --- Insertion ---

    /// Insert a text object at the scene center and select it.
    pub fn add_text(&mut self, content: Option<&str>) -> Option<ObjectId> {
        if self.disposed {
            return None;
        }
        let defaults = &self.config.text;
        let text = Text::new(self.scene_center(), content.unwrap_or(&defaults.content))
            .with_font(defaults.font_family.clone(), defaults.font_size, defaults.weight)
            .with_color(defaults.color);
        let id = self.engine.add_object(text.into());
        self.select_inserted(id);
        log::info!("Inserted text {}", id);
        Some(id)
    }

    /// Insert an already prepared image, fitted to the scene, and select it.
    pub fn add_image(&mut self, image: PreparedImage) -> Option<ObjectId> {
        if self.disposed {
            return None;
        }
        let multiplier = self.config.image_fit_multiplier;
        Some(self.insert_fitted(image.into_image().into(), multiplier))
    }

    /// Queue an asset insertion. It is resolved and inserted on the next tick.
    pub fn add_asset(&mut self, source: impl Into<String>) -> bool {
        self.submit(ImageJob::asset(source))
    }

    /// Queue an uploaded image. Uploads are not filtered by MIME type.
    pub fn upload_image(&mut self, bytes: Vec<u8>) -> bool {
        self.submit(ImageJob::upload(bytes))
    }

    /// Queue the first supported image among clipboard items.
    pub fn insert_from_clipboard(&mut self, items: Vec<ClipboardItem>) -> bool {
        let Some(item) = items.into_iter().find(|item| is_supported_mime(&item.mime_type)) else {
            log::debug!("Clipboard holds no supported image");
            return false;
        };
        self.submit(ImageJob::Image {
            intent: ImageIntent::Clipboard,
            mime_type: Some(item.mime_type),
            bytes: item.bytes,
        })
    }

    /// Queue the first dropped file; the rest are ignored.
    pub fn insert_dropped(&mut self, files: Vec<DroppedFile>) -> bool {
        self.drop_hover = false;
        let Some(file) = files.into_iter().next() else {
            return false;
        };
        log::debug!("Dropped file '{}' ({})", file.name, file.mime_type);
        self.submit(ImageJob::Image {
            intent: ImageIntent::Drop,
            mime_type: Some(file.mime_type),
            bytes: file.bytes,
        })
    }

    /// Number of image jobs waiting for the next tick.
    pub fn pending_jobs(&self) -> usize {
        self.pipeline.pending()
    }

    fn submit(&mut self, job: ImageJob) -> bool {
        if self.disposed {
            return false;
        }
        match self.pipeline.submit(job) {
            Ok(()) => true,
            Err(e) => {
                log::warn!("Ignoring image payload: {}", e);
                false
            }
        }
    }

    fn insert_fitted(&mut self, mut object: SceneObject, multiplier: f64) -> ObjectId {
        let size = self.scene_size();
        if !fit_object(&mut object, size, ObjectFit::Contain, multiplier) {
            center_object(&mut object, size);
        }
        let kind = object.kind();
        let id = self.engine.add_object(object);
        self.select_inserted(id);
        log::info!("Inserted {} {}", kind, id);
        id
    }

    fn select_inserted(&mut self, id: ObjectId) {
        if self.mode == EditorMode::Select {
            self.selection = vec![id];
        }
    }

    // --- Commands on the selection ---

    /// Remove every selected object. Returns how many were removed.
    pub fn delete_selected(&mut self) -> usize {
        if !self.can_transform() {
            return 0;
        }
        let removed = std::mem::take(&mut self.selection)
            .into_iter()
            .filter(|id| self.engine.remove_object(*id).is_some())
            .count();
        log::debug!("Deleted {} objects", removed);
        removed
    }

    pub fn flip_selected_horizontal(&mut self) -> bool {
        self.modify_primary(|object| {
            let transform = object.transform_mut();
            transform.flip_x = !transform.flip_x;
        })
    }

    pub fn flip_selected_vertical(&mut self) -> bool {
        self.modify_primary(|object| {
            let transform = object.transform_mut();
            transform.flip_y = !transform.flip_y;
        })
    }

    /// Move the primary selection's center to the scene center.
    pub fn center_selected(&mut self) -> bool {
        let size = self.scene_size();
        self.modify_primary(|object| center_object(object, size))
    }

    /// Rescale the primary selection to the scene and recenter it.
    pub fn fit_selected_to_canvas(&mut self, fit: ObjectFit, multiplier: f64) -> bool {
        let Some(id) = self.transform_target() else {
            return false;
        };
        let size = self.scene_size();
        let mut fitted = false;
        self.engine.update_object(id, &mut |object| {
            fitted = fit_object(object, size, fit, multiplier);
        });
        fitted && self.engine.mark_modified(id)
    }

    /// Translate the selection; evicts anything pushed off the scene.
    pub fn move_selected(&mut self, delta: Vec2) -> bool {
        self.transform_selection(|object| object.transform_mut().position += delta)
    }

    /// Scale the selection about each object's center.
    pub fn scale_selected(&mut self, factor: f64) -> bool {
        if !factor.is_finite() || factor <= 0.0 {
            return false;
        }
        self.transform_selection(|object| {
            let size = object.intrinsic_size();
            let center = object.center();
            let transform = object.transform_mut();
            transform.scale_x *= factor;
            transform.scale_y *= factor;
            transform.set_center(size, center);
        })
    }

    /// Rotate the selection clockwise about each object's center.
    pub fn rotate_selected(&mut self, degrees: f64) -> bool {
        if !degrees.is_finite() {
            return false;
        }
        self.transform_selection(|object| {
            let size = object.intrinsic_size();
            let center = object.center();
            let transform = object.transform_mut();
            transform.angle = (transform.angle + degrees).rem_euclid(360.0);
            transform.set_center(size, center);
        })
    }

    fn transform_target(&self) -> Option<ObjectId> {
        if self.can_transform() {
            self.primary_selection()
        } else {
            None
        }
    }

    fn modify_primary(&mut self, mut edit: impl FnMut(&mut SceneObject)) -> bool {
        match self.transform_target() {
            Some(id) => self.engine.modify_object(id, &mut edit),
            None => false,
        }
    }

    fn transform_selection(&mut self, mut edit: impl FnMut(&mut SceneObject)) -> bool {
        if !self.can_transform() {
            return false;
        }
        let ids = self.selection.clone();
        for id in &ids {
            self.engine.update_object(*id, &mut edit);
        }
        self.finish_user_modification(&ids);
        true
    }

    /// Record a finished user edit, then evict whatever left the scene.
    fn finish_user_modification(&mut self, ids: &[ObjectId]) {
        let size = self.scene_size();
        for id in ids {
            if !self.engine.mark_modified(*id) {
                continue;
            }
            let out = self
                .engine
                .object(*id)
                .is_some_and(|object| is_out_of_canvas(object.bounds(), size));
            if out {
                log::warn!("Removing object {} moved outside the canvas", id);
                self.engine.remove_object(*id);
                self.selection.retain(|selected| selected != id);
            }
        }
    }

    // --- Scene-wide operations ---

    /// Remove every object and reset the background. Cannot be undone.
    pub fn clear_scene(&mut self) {
        self.engine.clear();
        self.selection.clear();
        self.gesture = Gesture::Idle;
    }

    /// Rasterize the current scene at its logical size.
    pub fn export_image<R: Rasterizer + ?Sized>(&self, rasterizer: &mut R) -> Result<Vec<u8>, ExportError> {
        let size = self.scene_size();
        let png = rasterizer.rasterize(&self.engine.to_document(), size, self.resolver.as_ref())?;
        log::info!("Exported {}x{} scene ({} bytes)", size.width, size.height, png.len());
        Ok(png)
    }

    /// The current scene as JSON.
    pub fn serialize(&self) -> String {
        match self.engine.to_document().to_json() {
            Ok(json) => json,
            Err(e) => {
                log::error!("Failed to serialize scene: {}", e);
                String::new()
            }
        }
    }

    /// Replace the scene with `json`. Malformed input yields an empty scene.
    /// Does not produce a change notification.
    pub fn load_scene(&mut self, json: &str) {
        let scene = Scene::from_json_lenient(json);
        self.engine.load_document(scene);
        // Edits made before the load are superseded by it.
        self.engine.take_events();
        self.selection.clear();
        self.gesture = Gesture::Idle;
    }

    // --- View ---

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn zoom(&self) -> f64 {
        self.camera.zoom
    }

    pub fn set_zoom(&mut self, zoom: f64) {
        self.camera.set_zoom(zoom);
    }

    pub fn zoom_at(&mut self, screen_point: Point, factor: f64) {
        self.camera.zoom_at(screen_point, factor);
    }

    pub fn viewport_size(&self) -> Size {
        self.viewport
    }

    /// Resize the display area. Zoom is kept and the scene is centered in it.
    pub fn set_viewport_size(&mut self, size: Size) {
        self.viewport = size;
        self.camera.center_scene(self.engine.size(), size);
    }

    /// Whether a drag is hovering over the canvas.
    pub fn is_drop_hover(&self) -> bool {
        self.drop_hover
    }

    // --- Input ---

    pub fn handle_input(&mut self, input: EditorInput) {
        if self.disposed {
            return;
        }
        match input {
            EditorInput::PointerDown { position, modifiers } => self.pointer_down(position, modifiers),
            EditorInput::PointerMove { position } => self.pointer_move(position),
            EditorInput::PointerUp { position } => self.pointer_up(position),
            EditorInput::KeyDown(key) => match KeyCommand::from_key(&key) {
                Some(KeyCommand::DeleteSelection) => {
                    self.delete_selected();
                }
                Some(KeyCommand::ClearSelection) => self.clear_selection(),
                None => {}
            },
            EditorInput::DragEnter => self.drop_hover = true,
            EditorInput::DragLeave => self.drop_hover = false,
            EditorInput::Drop(files) => {
                self.insert_dropped(files);
            }
            EditorInput::Paste(items) => {
                self.insert_from_clipboard(items);
            }
            EditorInput::Resize(size) => self.set_viewport_size(size),
        }
    }

    fn pointer_down(&mut self, screen: Point, modifiers: Modifiers) {
        let point = self.camera.screen_to_scene(screen);
        match self.mode {
            EditorMode::Drawing => {
                self.gesture = Gesture::Drawing { points: vec![point] };
            }
            EditorMode::Select => {
                let tolerance = HIT_TOLERANCE / self.camera.zoom;
                let hit = self.engine.objects_at_point(point, tolerance).first().copied();
                match hit {
                    Some(id) => {
                        if modifiers.shift {
                            self.add_to_selection(id);
                        } else if !self.selection.contains(&id) {
                            self.selection = vec![id];
                        }
                        self.gesture = Gesture::Dragging {
                            last: point,
                            moved: false,
                        };
                    }
                    None => {
                        if !modifiers.shift {
                            self.selection.clear();
                        }
                        self.gesture = Gesture::Idle;
                    }
                }
            }
        }
    }

    fn pointer_move(&mut self, screen: Point) {
        let point = self.camera.screen_to_scene(screen);
        match &mut self.gesture {
            Gesture::Drawing { points } => {
                if points.last() != Some(&point) {
                    points.push(point);
                }
            }
            Gesture::Dragging { last, moved } => {
                let delta = point - *last;
                if delta == Vec2::ZERO {
                    return;
                }
                *last = point;
                *moved = true;
                for id in &self.selection {
                    self.engine
                        .update_object(*id, &mut |object| object.transform_mut().position += delta);
                }
            }
            Gesture::Idle => {}
        }
    }

    fn pointer_up(&mut self, screen: Point) {
        self.pointer_move(screen);
        match std::mem::replace(&mut self.gesture, Gesture::Idle) {
            Gesture::Drawing { points } => {
                let stroke = Stroke::from_scene_points(&points, self.brush_width, self.brush_color);
                let id = self.engine.add_object(stroke.into());
                log::debug!("Finished stroke {} ({} points)", id, points.len());
            }
            Gesture::Dragging { moved: true, .. } => {
                let ids = self.selection.clone();
                self.finish_user_modification(&ids);
            }
            Gesture::Dragging { .. } | Gesture::Idle => {}
        }
    }

    // --- Notification ---

    /// Listen for scene snapshots. Released by `unsubscribe` or `dispose`.
    pub fn subscribe(&mut self, listener: impl FnMut(&str) + 'static) -> SubscriptionId {
        self.bridge.subscribe(listener)
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.bridge.unsubscribe(id)
    }

    /// Run deferred loads, complete queued image jobs in submission order,
    /// then emit one coalesced notification if the scene changed.
    pub fn tick(&mut self) -> Option<String> {
        if self.disposed {
            return None;
        }

        for task in self.deferred.drain() {
            match task {
                Deferred::Load(json) => self.load_scene(&json),
            }
        }

        if !self.pipeline.is_idle() {
            for completed in self.pipeline.run(self.resolver.as_ref()).into_iter().flatten() {
                self.insert_fitted(completed.object, completed.fit_multiplier);
            }
        }

        self.bridge.flush(&mut self.engine)
    }

    /// Release listeners and cancel pending work. Later ticks do nothing.
    pub fn dispose(&mut self) {
        if self.disposed {
            return;
        }
        self.bridge.clear();
        self.deferred.clear();
        let cancelled = self.pipeline.cancel_all();
        self.gesture = Gesture::Idle;
        self.disposed = true;
        log::debug!("Editor disposed ({} image jobs cancelled)", cancelled);
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed
    }
}
