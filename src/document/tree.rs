//! Flat component arena.
//!
//! Every component, top-level or nested in a grid cell, lives in one map
//! keyed by id. The top level is an ordered id list; grid cells hold ordered
//! id lists inside their [`GridLayout`]; each nested component records the
//! cell that holds it. Lookups by id are a single map access regardless of
//! where the component sits.
//!
//! On the wire the tree is a snapshot of two lists:
//!
//! ```json
//! { "components": [ ...top level in z-order... ],
//!   "nested":     [ ...every component placed in a grid cell... ] }
//! ```

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use super::{Component, ComponentPatch};
use crate::error::FolioError;
use crate::geometry::Rect;
use crate::grid::{CellKey, GridError, GridLayout};

/// The grid cell that holds a nested component.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CellRef {
    pub grid: String,
    pub cell: CellKey,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ComponentTree {
    order: Vec<String>,
    nodes: HashMap<String, Component>,
    parents: HashMap<String, CellRef>,
}

impl ComponentTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of components, nested ones included.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.nodes.contains_key(id)
    }

    pub fn get(&self, id: &str) -> Option<&Component> {
        self.nodes.get(id)
    }

    pub fn parent_of(&self, id: &str) -> Option<&CellRef> {
        self.parents.get(id)
    }

    pub fn is_top_level(&self, id: &str) -> bool {
        self.nodes.contains_key(id) && !self.parents.contains_key(id)
    }

    /// Top-level components in z-order.
    pub fn top_level(&self) -> impl Iterator<Item = &Component> {
        self.order.iter().filter_map(|id| self.nodes.get(id))
    }

    pub fn top_level_ids(&self) -> &[String] {
        &self.order
    }

    /// Components placed in one grid cell, in order.
    pub fn nested_in(&self, grid_id: &str, key: CellKey) -> impl Iterator<Item = &Component> {
        self.nodes
            .get(grid_id)
            .and_then(Component::as_grid)
            .map(|g| g.cell(key))
            .unwrap_or(&[])
            .iter()
            .filter_map(|id| self.nodes.get(id))
    }

    /// The component a grid cell displays: the first in its list.
    pub fn first_in_cell(&self, grid_id: &str, key: CellKey) -> Option<&Component> {
        self.nested_in(grid_id, key).next()
    }

    /// Rectangles of every top-level component except `id`.
    pub fn sibling_rects(&self, id: &str) -> Vec<Rect> {
        self.top_level()
            .filter(|c| c.id != id)
            .map(Component::rect)
            .collect()
    }

    pub fn grid(&self, id: &str) -> Result<&GridLayout, FolioError> {
        self.nodes
            .get(id)
            .ok_or_else(|| FolioError::NotFound(format!("component {id}")))?
            .as_grid()
            .ok_or_else(|| GridError::NotAGrid(id.to_string()).into())
    }

    pub fn grid_mut(&mut self, id: &str) -> Result<&mut GridLayout, FolioError> {
        self.nodes
            .get_mut(id)
            .ok_or_else(|| FolioError::NotFound(format!("component {id}")))?
            .as_grid_mut()
            .ok_or_else(|| GridError::NotAGrid(id.to_string()).into())
    }

    /// Append a component to the top level.
    pub fn add(&mut self, component: Component) -> Result<(), FolioError> {
        self.ensure_new_id(&component.id)?;
        self.order.push(component.id.clone());
        self.nodes.insert(component.id.clone(), component);
        Ok(())
    }

    /// Place a component in a grid cell.
    ///
    /// An empty cell gets the component as its only entry. In a non-empty
    /// cell the component replaces the first entry and the rest are kept;
    /// the replaced component (with anything nested in it) is removed and
    /// returned.
    pub fn add_to_cell(
        &mut self,
        grid_id: &str,
        key: CellKey,
        component: Component,
    ) -> Result<Option<Component>, FolioError> {
        self.ensure_new_id(&component.id)?;
        let grid = self.grid(grid_id)?;
        grid.check_bounds(key)?;
        if grid.is_covered(key.row, key.col) {
            return Err(FolioError::Validation(format!(
                "cell {key} is covered by a merged cell"
            )));
        }

        let first = grid.cell(key).first().cloned();
        let replaced = first.and_then(|old| self.remove(&old));

        let id = component.id.clone();
        self.grid_mut(grid_id)?
            .cells
            .entry(key)
            .or_default()
            .insert(0, id.clone());
        self.parents.insert(
            id.clone(),
            CellRef {
                grid: grid_id.to_string(),
                cell: key,
            },
        );
        self.nodes.insert(id, component);
        Ok(replaced)
    }

    /// Apply a patch to the component with this id, wherever it lives.
    pub fn patch(&mut self, id: &str, patch: &ComponentPatch) -> Result<&Component, FolioError> {
        self.update(id, |c| patch.apply(c))
    }

    /// Mutate the component with this id in place.
    ///
    /// The id itself must not be changed by `f`.
    pub fn update(
        &mut self,
        id: &str,
        f: impl FnOnce(&mut Component),
    ) -> Result<&Component, FolioError> {
        let component = self
            .nodes
            .get_mut(id)
            .ok_or_else(|| FolioError::NotFound(format!("component {id}")))?;
        f(component);
        component.id = id.to_string();
        Ok(&*component)
    }

    pub fn move_to(&mut self, id: &str, x: f64, y: f64) -> Result<(), FolioError> {
        self.update(id, |c| {
            c.x = x;
            c.y = y;
        })
        .map(|_| ())
    }

    pub fn resize_to(&mut self, id: &str, width: f64, height: f64) -> Result<(), FolioError> {
        self.update(id, |c| {
            c.width = width;
            c.height = height;
        })
        .map(|_| ())
    }

    /// Remove a component from the one place that holds it.
    ///
    /// Removing a grid also removes everything nested in its cells.
    pub fn remove(&mut self, id: &str) -> Option<Component> {
        let component = self.nodes.remove(id)?;

        match self.parents.remove(id) {
            Some(parent) => {
                if let Some(grid) = self
                    .nodes
                    .get_mut(&parent.grid)
                    .and_then(Component::as_grid_mut)
                {
                    if let Some(ids) = grid.cells.get_mut(&parent.cell) {
                        ids.retain(|x| x != id);
                        if ids.is_empty() {
                            grid.cells.remove(&parent.cell);
                        }
                    }
                }
            }
            None => self.order.retain(|x| x != id),
        }

        if let Some(grid) = component.as_grid() {
            let children: Vec<String> = grid.all_component_ids().cloned().collect();
            for child in children {
                self.remove(&child);
            }
        }

        Some(component)
    }

    /// Change a grid's row count, removing components whose cells fell off.
    pub fn set_grid_rows(&mut self, id: &str, rows: usize) -> Result<Vec<Component>, FolioError> {
        let dropped = self.grid_mut(id)?.set_rows(rows);
        Ok(self.remove_all(dropped))
    }

    /// Change a grid's column count, removing components whose cells fell off.
    pub fn set_grid_columns(
        &mut self,
        id: &str,
        columns: usize,
    ) -> Result<Vec<Component>, FolioError> {
        let dropped = self.grid_mut(id)?.set_columns(columns);
        Ok(self.remove_all(dropped))
    }

    fn remove_all(&mut self, ids: Vec<String>) -> Vec<Component> {
        ids.iter().filter_map(|id| self.remove(id)).collect()
    }

    fn ensure_new_id(&self, id: &str) -> Result<(), FolioError> {
        if self.nodes.contains_key(id) {
            return Err(FolioError::Validation(format!(
                "component id {id} already exists"
            )));
        }
        Ok(())
    }

    /// Nested components in depth-first order from the top level.
    fn nested_in_order(&self) -> Vec<&Component> {
        let mut out = Vec::new();
        for id in &self.order {
            self.collect_nested(id, &mut out);
        }
        out
    }

    fn collect_nested<'a>(&'a self, id: &str, out: &mut Vec<&'a Component>) {
        let Some(grid) = self.nodes.get(id).and_then(Component::as_grid) else {
            return;
        };
        for child_id in grid.all_component_ids() {
            if let Some(child) = self.nodes.get(child_id) {
                out.push(child);
                self.collect_nested(child_id, out);
            }
        }
    }
}

// ============================================================================
// SNAPSHOT
// ============================================================================

#[derive(Debug, Deserialize)]
struct TreeSnapshot {
    components: Vec<Component>,
    #[serde(default)]
    nested: Vec<Component>,
}

#[derive(Serialize)]
struct TreeSnapshotRef<'a> {
    components: Vec<&'a Component>,
    nested: Vec<&'a Component>,
}

impl TryFrom<TreeSnapshot> for ComponentTree {
    type Error = FolioError;

    fn try_from(snapshot: TreeSnapshot) -> Result<Self, Self::Error> {
        let mut tree = ComponentTree::new();
        for component in snapshot.components {
            tree.add(component)?;
        }

        let nested_ids: HashSet<String> = snapshot.nested.iter().map(|c| c.id.clone()).collect();
        for component in snapshot.nested {
            tree.ensure_new_id(&component.id)?;
            tree.nodes.insert(component.id.clone(), component);
        }

        for (grid_id, component) in &tree.nodes {
            let Some(grid) = component.as_grid() else {
                continue;
            };
            grid.validate()?;
            for (key, ids) in &grid.cells {
                for id in ids {
                    if !nested_ids.contains(id) {
                        return Err(FolioError::Validation(format!(
                            "cell {key} of {grid_id} refers to unknown nested component {id}"
                        )));
                    }
                    let parent = CellRef {
                        grid: grid_id.clone(),
                        cell: *key,
                    };
                    if tree.parents.insert(id.clone(), parent).is_some() {
                        return Err(FolioError::Validation(format!(
                            "component {id} is placed in more than one cell"
                        )));
                    }
                }
            }
        }

        if let Some(orphan) = nested_ids.iter().find(|id| !tree.parents.contains_key(*id)) {
            return Err(FolioError::Validation(format!(
                "nested component {orphan} is not placed in any cell"
            )));
        }
        if tree.nested_in_order().len() != nested_ids.len() {
            return Err(FolioError::Validation(
                "nested components form a cycle".to_string(),
            ));
        }

        Ok(tree)
    }
}

impl Serialize for ComponentTree {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        TreeSnapshotRef {
            components: self.top_level().collect(),
            nested: self.nested_in_order(),
        }
        .serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for ComponentTree {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let snapshot = TreeSnapshot::deserialize(deserializer)?;
        ComponentTree::try_from(snapshot).map_err(serde::de::Error::custom)
    }
}
