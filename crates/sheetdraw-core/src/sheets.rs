//! Multiple sheets sharing one editor.
//!
//! A [`SheetCollection`] holds one serialized scene per sheet. The
//! [`SheetManager`] keeps the editor showing the active sheet and writes the
//! editor's snapshots back into it.

use crate::bridge::SubscriptionId;
use crate::config::EditorConfig;
use crate::editor::CanvasEditor;
use crate::engine::{GraphicsEngine, Surface};

/// Maximum number of sheets.
pub const MAX_SHEETS: usize = 10;

/// Display zoom used by the sheet editor.
pub const SHEET_ZOOM: f64 = 0.8;

/// Ordered serialized scenes with exactly one active sheet.
///
/// Always holds between 1 and [`MAX_SHEETS`] sheets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SheetCollection {
    sheets: Vec<String>,
    active: usize,
}

impl Default for SheetCollection {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

impl SheetCollection {
    /// An empty list becomes a single empty sheet. Extra sheets are dropped.
    pub fn new(mut sheets: Vec<String>) -> Self {
        if sheets.is_empty() {
            sheets.push(String::new());
        }
        if sheets.len() > MAX_SHEETS {
            log::warn!("Dropping {} sheets over the limit of {}", sheets.len() - MAX_SHEETS, MAX_SHEETS);
            sheets.truncate(MAX_SHEETS);
        }
        Self { sheets, active: 0 }
    }

    pub fn sheets(&self) -> &[String] {
        &self.sheets
    }

    pub fn len(&self) -> usize {
        self.sheets.len()
    }

    /// Never true once constructed.
    pub fn is_empty(&self) -> bool {
        self.sheets.is_empty()
    }

    pub fn active_index(&self) -> usize {
        self.active
    }

    pub fn active_sheet(&self) -> &str {
        &self.sheets[self.active]
    }

    pub fn can_add(&self) -> bool {
        self.sheets.len() < MAX_SHEETS
    }

    pub fn can_remove(&self) -> bool {
        self.sheets.len() > 1
    }

    /// Append an empty sheet and make it active.
    pub fn add_sheet(&mut self) -> bool {
        if !self.can_add() {
            return false;
        }
        self.sheets.push(String::new());
        self.active = self.sheets.len() - 1;
        true
    }

    /// Remove a sheet; the one before it becomes active.
    pub fn remove_sheet(&mut self, index: usize) -> bool {
        if !self.can_remove() || index >= self.sheets.len() {
            return false;
        }
        self.sheets.remove(index);
        self.active = index.saturating_sub(1);
        true
    }

    /// Make `index` active. Out-of-range indices are ignored.
    pub fn select_sheet(&mut self, index: usize) -> bool {
        if index >= self.sheets.len() {
            return false;
        }
        self.active = index;
        true
    }

    /// Replace the active sheet's content.
    pub fn write_active(&mut self, json: impl Into<String>) {
        self.sheets[self.active] = json.into();
    }

    pub fn into_sheets(self) -> Vec<String> {
        self.sheets
    }
}

impl From<Vec<String>> for SheetCollection {
    fn from(sheets: Vec<String>) -> Self {
        Self::new(sheets)
    }
}

type SheetsListener = Box<dyn FnMut(&[String])>;

/// A sheet collection bound to an editor.
pub struct SheetManager<E: GraphicsEngine = Surface> {
    sheets: SheetCollection,
    editor: CanvasEditor<E>,
    listeners: Vec<(SubscriptionId, SheetsListener)>,
    next_id: SubscriptionId,
}

impl SheetManager<Surface> {
    pub fn new(config: EditorConfig, sheets: Vec<String>) -> Self {
        Self::create(config, sheets)
    }
}

impl<E: GraphicsEngine> SheetManager<E> {
    /// Create a manager showing the first sheet. The editor zoom is fixed at [`SHEET_ZOOM`].
    pub fn create(config: EditorConfig, sheets: Vec<String>) -> Self {
        let config = EditorConfig {
            initial_zoom: SHEET_ZOOM,
            ..config
        };
        let sheets = SheetCollection::new(sheets);
        let mut editor = CanvasEditor::create(config);
        editor.load_scene(sheets.active_sheet());
        Self {
            sheets,
            editor,
            listeners: Vec::new(),
            next_id: 0,
        }
    }

    pub fn sheets(&self) -> &[String] {
        self.sheets.sheets()
    }

    pub fn collection(&self) -> &SheetCollection {
        &self.sheets
    }

    pub fn active_index(&self) -> usize {
        self.sheets.active_index()
    }

    pub fn can_add(&self) -> bool {
        self.sheets.can_add()
    }

    pub fn can_remove(&self) -> bool {
        self.sheets.can_remove()
    }

    pub fn editor(&self) -> &CanvasEditor<E> {
        &self.editor
    }

    pub fn editor_mut(&mut self) -> &mut CanvasEditor<E> {
        &mut self.editor
    }

    /// Listen for changes to the sheet list.
    pub fn on_sheets_change(&mut self, listener: impl FnMut(&[String]) + 'static) -> SubscriptionId {
        let id = self.next_id;
        self.next_id += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(listener_id, _)| *listener_id != id);
        self.listeners.len() != before
    }

    /// Add an empty sheet and switch to it.
    pub fn add_sheet(&mut self) -> bool {
        if !self.sheets.can_add() {
            return false;
        }
        self.commit();
        self.sheets.add_sheet();
        self.load_active();
        self.notify();
        true
    }

    /// Remove a sheet and switch to the one before it.
    pub fn remove_sheet(&mut self, index: usize) -> bool {
        if !self.sheets.can_remove() || index >= self.sheets.len() {
            return false;
        }
        self.commit();
        self.sheets.remove_sheet(index);
        self.load_active();
        self.notify();
        true
    }

    pub fn remove_active_sheet(&mut self) -> bool {
        self.remove_sheet(self.sheets.active_index())
    }

    /// Switch to another sheet. Out-of-range indices are ignored.
    pub fn select_sheet(&mut self, index: usize) -> bool {
        if index >= self.sheets.len() {
            return false;
        }
        self.commit();
        self.sheets.select_sheet(index);
        self.load_active();
        true
    }

    /// Tick the editor and store its snapshot in the active sheet.
    pub fn tick(&mut self) -> bool {
        if self.commit() {
            self.notify();
            true
        } else {
            false
        }
    }

    /// Release listeners and tear down the editor.
    pub fn dispose(&mut self) {
        self.listeners.clear();
        self.editor.dispose();
    }

    fn commit(&mut self) -> bool {
        match self.editor.tick() {
            Some(json) => {
                self.sheets.write_active(json);
                true
            }
            None => false,
        }
    }

    fn load_active(&mut self) {
        log::debug!("Showing sheet {} of {}", self.sheets.active_index() + 1, self.sheets.len());
        self.editor.load_scene(self.sheets.active_sheet());
    }

    fn notify(&mut self) {
        let sheets = self.sheets.sheets();
        for (_, listener) in &mut self.listeners {
            listener(sheets);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::Scene;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn manager(sheets: Vec<String>) -> SheetManager {
        SheetManager::new(EditorConfig::default(), sheets)
    }

    fn watch(manager: &mut SheetManager) -> Rc<RefCell<Vec<Vec<String>>>> {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = seen.clone();
        manager.on_sheets_change(move |sheets| sink.borrow_mut().push(sheets.to_vec()));
        seen
    }

    #[test]
    fn test_empty_collection_normalized() {
        let sheets = SheetCollection::new(Vec::new());
        assert_eq!(sheets.sheets(), &[String::new()]);
        assert_eq!(sheets.active_index(), 0);
        assert!(!sheets.can_remove());
    }

    #[test]
    fn test_collection_capped() {
        let sheets = SheetCollection::new(vec![String::new(); 12]);
        assert_eq!(sheets.len(), MAX_SHEETS);
    }

    #[test]
    fn test_add_until_limit() {
        let mut sheets = SheetCollection::default();
        for expected in 2..=MAX_SHEETS {
            assert!(sheets.add_sheet());
            assert_eq!(sheets.len(), expected);
            assert_eq!(sheets.active_index(), expected - 1);
        }
        assert!(!sheets.can_add());
        assert!(!sheets.add_sheet());
        assert_eq!(sheets.len(), MAX_SHEETS);
    }

    #[test]
    fn test_remove_bounds() {
        let mut sheets = SheetCollection::default();
        assert!(!sheets.remove_sheet(0));
        assert_eq!(sheets.len(), 1);

        let mut sheets = SheetCollection::new(vec!["a".into(), "b".into(), "c".into()]);
        assert!(!sheets.remove_sheet(3));
        assert!(sheets.remove_sheet(2));
        assert_eq!(sheets.sheets(), &["a".to_string(), "b".to_string()]);
        assert_eq!(sheets.active_index(), 1);
        assert!(sheets.remove_sheet(0));
        assert_eq!(sheets.active_index(), 0);
        assert_eq!(sheets.active_sheet(), "b");
    }

    #[test]
    fn test_select_out_of_range_ignored() {
        let mut sheets = SheetCollection::new(vec!["a".into(), "b".into()]);
        assert!(sheets.select_sheet(1));
        assert!(!sheets.select_sheet(2));
        assert_eq!(sheets.active_index(), 1);
        sheets.write_active("B");
        assert_eq!(sheets.into_sheets(), vec!["a".to_string(), "B".to_string()]);
    }

    #[test]
    fn test_manager_uses_sheet_zoom() {
        let manager = manager(Vec::new());
        assert!((manager.editor().zoom() - SHEET_ZOOM).abs() < f64::EPSILON);
        assert_eq!(manager.sheets(), &[String::new()]);
    }

    #[test]
    fn test_edits_land_in_active_sheet() {
        let mut manager = manager(Vec::new());
        let seen = watch(&mut manager);
        manager.editor_mut().add_text(Some("first"));
        assert!(manager.tick());
        assert!(!manager.tick());

        let scene = Scene::from_json(&manager.sheets()[0]).unwrap();
        assert_eq!(scene.len(), 1);
        assert_eq!(seen.borrow().len(), 1);
        assert_eq!(seen.borrow()[0], manager.sheets().to_vec());
    }

    #[test]
    fn test_switching_sheets_loads_content() {
        let mut manager = manager(Vec::new());
        manager.editor_mut().add_text(Some("on sheet one"));
        manager.tick();
        let first = manager.sheets()[0].clone();

        assert!(manager.add_sheet());
        assert_eq!(manager.active_index(), 1);
        assert!(manager.editor().engine().objects().is_empty());

        manager.editor_mut().add_text(Some("two"));
        manager.editor_mut().add_text(Some("two again"));
        // Not ticked yet: switching commits pending edits first.
        assert!(manager.select_sheet(0));
        assert_eq!(manager.editor().serialize(), first);
        assert_eq!(Scene::from_json(&manager.sheets()[1]).unwrap().len(), 2);

        assert!(!manager.select_sheet(5));
        assert_eq!(manager.active_index(), 0);
    }

    #[test]
    fn test_add_and_remove_notify() {
        let mut manager = manager(vec![String::new(); MAX_SHEETS - 1]);
        let seen = watch(&mut manager);
        assert!(manager.add_sheet());
        assert!(!manager.add_sheet());
        assert_eq!(seen.borrow().len(), 1);
        assert_eq!(seen.borrow()[0].len(), MAX_SHEETS);

        assert!(manager.remove_active_sheet());
        assert_eq!(manager.active_index(), MAX_SHEETS - 2);
        assert_eq!(seen.borrow().len(), 2);
        assert_eq!(seen.borrow()[1].len(), MAX_SHEETS - 1);
    }

    #[test]
    fn test_remove_loads_previous_sheet() {
        let mut source = CanvasEditor::new(EditorConfig::default());
        source.add_text(Some("kept"));
        let kept = source.serialize();

        let mut manager = manager(vec![kept.clone(), String::new()]);
        manager.select_sheet(1);
        assert!(manager.remove_sheet(1));
        assert_eq!(manager.active_index(), 0);
        assert_eq!(manager.editor().serialize(), kept);
        assert!(!manager.remove_sheet(0));
    }

    #[test]
    fn test_dispose_and_unsubscribe() {
        let mut manager = manager(Vec::new());
        let seen = Rc::new(RefCell::new(0));
        let sink = seen.clone();
        let id = manager.on_sheets_change(move |_| *sink.borrow_mut() += 1);
        assert!(manager.unsubscribe(id));
        manager.add_sheet();
        assert_eq!(*seen.borrow(), 0);

        let seen = watch(&mut manager);
        manager.dispose();
        manager.editor_mut().add_text(None);
        assert!(!manager.tick());
        assert!(seen.borrow().is_empty());
        assert!(manager.editor().is_disposed());
    }
}
