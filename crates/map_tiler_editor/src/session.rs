//! Interactive editing session
//!
//! `EditorSession` holds everything a host UI needs to turn pointer input
//! into committed edits: the store, its history, the selected material and
//! tool, and the gesture currently in flight. The host owns the session and
//! forwards press/drag/release events; nothing here is global.
//!
//! Gesture rules:
//! - Point tools (brush and eraser) apply while dragging and commit once on
//!   release, wherever the pointer ends up.
//! - Rectangle and circle tools only preview while dragging and apply on
//!   release. Releasing outside the canvas cancels them.
//! - Fill applies and commits on press.
//! - A gesture that changed nothing commits nothing.

use crate::history::HistoryManager;
use crate::settings::EditorSettings;
use crate::shapes::ShapeRasterizer;
use crate::store::TileGridStore;
use map_tiler_autotile::NoiseSampler;
use map_tiler_core::{Coordinate, Grid, GridConfig, MaterialId, RuleTables};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use tracing::debug;

/// What a gesture does to the cells it covers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EditorTool {
    #[default]
    Paint,
    Erase,
    /// Flood fill with the selected material
    Fill,
}

/// Which cells a paint or erase gesture covers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ToolShape {
    /// Freehand strokes
    #[default]
    Point,
    Rectangle,
    /// Circle centred on the press point, through the release point
    Circle,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Gesture {
    Idle,
    Stroke { last: Coordinate },
    Shape { anchor: Coordinate, current: Coordinate },
}

#[cfg_attr(feature = "bevy", derive(bevy::prelude::Resource))]
#[derive(Debug)]
pub struct EditorSession {
    store: TileGridStore,
    history: HistoryManager,
    tool: EditorTool,
    shape: ToolShape,
    material: Option<MaterialId>,
    gesture: Gesture,
    /// Store revision of the last committed snapshot
    committed_revision: u64,
}

impl EditorSession {
    pub fn new(store: TileGridStore) -> Self {
        let history = HistoryManager::new(store.grid());
        let committed_revision = store.revision();
        Self {
            store,
            history,
            tool: EditorTool::default(),
            shape: ToolShape::default(),
            material: None,
            gesture: Gesture::Idle,
            committed_revision,
        }
    }

    /// Build a session with an empty grid, applying the user's settings
    pub fn from_settings(
        config: GridConfig,
        tables: RuleTables,
        settings: &EditorSettings,
    ) -> Self {
        let sampler = match settings.noise_seed {
            Some(seed) => NoiseSampler::seeded(seed),
            None => NoiseSampler::from_entropy(),
        };
        let mut session = Self::new(TileGridStore::new(config, tables, sampler));
        session.history =
            HistoryManager::new(session.grid()).with_limit(settings.history_limit);
        session.tool = settings.default_tool;
        session.shape = settings.default_shape;
        session
    }

    pub fn grid(&self) -> &Grid {
        self.store.grid()
    }

    pub fn store(&self) -> &TileGridStore {
        &self.store
    }

    pub fn history(&self) -> &HistoryManager {
        &self.history
    }

    pub fn tool(&self) -> EditorTool {
        self.tool
    }

    pub fn shape(&self) -> ToolShape {
        self.shape
    }

    pub fn selected_material(&self) -> Option<&MaterialId> {
        self.material.as_ref()
    }

    /// Switching tools abandons any gesture in flight
    pub fn set_tool(&mut self, tool: EditorTool) {
        self.cancel();
        self.tool = tool;
    }

    pub fn set_shape(&mut self, shape: ToolShape) {
        self.cancel();
        self.shape = shape;
    }

    pub fn select_material(&mut self, material: Option<MaterialId>) {
        self.material = material;
    }

    pub fn is_gesture_active(&self) -> bool {
        self.gesture != Gesture::Idle
    }

    /// Pointer pressed on the canvas at `coord`
    pub fn press(&mut self, coord: Coordinate) {
        if self.is_gesture_active() {
            debug!("Ignoring press at {} during an active gesture", coord);
            return;
        }
        if !self.store.grid().contains(coord) {
            return;
        }

        match (self.tool, self.shape) {
            (EditorTool::Fill, _) => {
                let Some(material) = self.material.clone() else {
                    return;
                };
                let grid = self.store.grid();
                let region = ShapeRasterizer::for_grid(grid).flood_fill(grid, coord);
                self.store.paint_many(region, &material);
                self.commit();
            }
            (_, ToolShape::Point) => {
                if self.tool == EditorTool::Paint && self.material.is_none() {
                    return;
                }
                self.apply([coord]);
                self.gesture = Gesture::Stroke { last: coord };
            }
            (_, ToolShape::Rectangle | ToolShape::Circle) => {
                self.gesture = Gesture::Shape {
                    anchor: coord,
                    current: coord,
                };
            }
        }
    }

    /// Pointer moved to `coord` while pressed. `coord` may lie outside the
    /// canvas; strokes are clipped.
    pub fn drag(&mut self, coord: Coordinate) {
        match self.gesture {
            Gesture::Idle => {}
            Gesture::Stroke { last } => {
                let line = ShapeRasterizer::for_grid(self.store.grid()).line(last, coord);
                self.apply(line);
                self.gesture = Gesture::Stroke { last: coord };
            }
            Gesture::Shape { anchor, .. } => {
                self.gesture = Gesture::Shape {
                    anchor,
                    current: coord,
                };
            }
        }
    }

    /// Pointer released at `coord`, or outside the canvas when `None`.
    /// Returns whether a snapshot was committed.
    pub fn release(&mut self, coord: Option<Coordinate>) -> bool {
        let gesture = std::mem::replace(&mut self.gesture, Gesture::Idle);
        match gesture {
            Gesture::Idle => false,
            Gesture::Stroke { last } => {
                if let Some(coord) = coord {
                    let line = ShapeRasterizer::for_grid(self.store.grid()).line(last, coord);
                    self.apply(line);
                }
                self.commit()
            }
            Gesture::Shape { anchor, .. } => {
                let Some(coord) = coord else {
                    debug!("Shape released outside the canvas, discarding preview");
                    return false;
                };
                let cells = self.shape_cells(anchor, coord);
                self.apply(cells);
                self.commit()
            }
        }
    }

    /// Abandon the gesture in flight. A partly drawn stroke is rolled back to
    /// the last committed state.
    pub fn cancel(&mut self) {
        let gesture = std::mem::replace(&mut self.gesture, Gesture::Idle);
        if matches!(gesture, Gesture::Stroke { .. }) && self.is_dirty() {
            self.store.restore(&self.history.current().grid);
            self.committed_revision = self.store.revision();
            debug!("Cancelled stroke, restored last committed state");
        }
    }

    /// Cells the in-flight rectangle or circle would cover
    pub fn preview(&self) -> BTreeSet<Coordinate> {
        match self.gesture {
            Gesture::Shape { anchor, current } => self.shape_cells(anchor, current),
            _ => BTreeSet::new(),
        }
    }

    pub fn undo(&mut self) -> bool {
        self.cancel();
        let undone = self.history.undo(&mut self.store);
        self.committed_revision = self.store.revision();
        undone
    }

    pub fn redo(&mut self) -> bool {
        self.cancel();
        let redone = self.history.redo(&mut self.store);
        self.committed_revision = self.store.revision();
        redone
    }

    /// Clear the grid as one undoable step
    pub fn clear(&mut self) -> bool {
        self.cancel();
        self.store.clear();
        self.commit()
    }

    /// Resize the grid as one undoable step
    pub fn resize(&mut self, width: u32, height: u32) -> bool {
        self.cancel();
        self.store.resize(width, height);
        self.commit()
    }

    /// Replace the grid with a loaded one and start a fresh history
    pub fn load(&mut self, grid: Grid) {
        self.cancel();
        self.store.load(grid);
        self.reset_history();
    }

    /// Switch to different rule tables and start a fresh history
    pub fn set_tables(&mut self, tables: RuleTables) {
        self.cancel();
        self.store.set_tables(tables);
        self.reset_history();
    }

    fn reset_history(&mut self) {
        self.history.reset(self.store.grid());
        self.committed_revision = self.store.revision();
    }

    fn is_dirty(&self) -> bool {
        self.store.revision() != self.committed_revision
    }

    fn commit(&mut self) -> bool {
        if !self.is_dirty() {
            debug!("Gesture changed nothing, skipping commit");
            return false;
        }
        self.history.commit(self.store.grid());
        self.committed_revision = self.store.revision();
        true
    }

    fn apply<I>(&mut self, coords: I)
    where
        I: IntoIterator<Item = Coordinate>,
    {
        match (self.tool, &self.material) {
            (EditorTool::Erase, _) => {
                self.store.erase_many(coords);
            }
            (_, Some(material)) => {
                self.store.paint_many(coords, material);
            }
            (_, None) => {}
        }
    }

    fn shape_cells(&self, anchor: Coordinate, to: Coordinate) -> BTreeSet<Coordinate> {
        let rasterizer = ShapeRasterizer::for_grid(self.store.grid());
        match self.shape {
            ToolShape::Rectangle => rasterizer.rectangle(anchor, to),
            ToolShape::Circle => rasterizer.circle(anchor, anchor.distance(to)),
            ToolShape::Point => rasterizer.line(anchor, to),
        }
    }
}
