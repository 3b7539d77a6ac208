use crate::common::{DomainError, DomainResult};
use crate::config::GridConfig;
use crate::domains::tilemap_path::{GridCell, PathfindingProvider, MAX_TILE_SCALE};
use petgraph::algo::astar;
use petgraph::graphmap::UnGraphMap;
use std::collections::HashSet;

/// In-memory tile map. Open tiles are nodes of an undirected graph with an
/// edge to each open 4-neighbour; routes come from A* with a Manhattan
/// heuristic.
#[derive(Debug, Clone)]
pub struct GridMap {
    width: u32,
    height: u32,
    walls: HashSet<GridCell>,
    graph: UnGraphMap<GridCell, ()>,
}

impl GridMap {
    pub fn new(
        width: u32,
        height: u32,
        walls: impl IntoIterator<Item = GridCell>,
    ) -> DomainResult<Self> {
        if width == 0 || height == 0 {
            return Err(DomainError::InvalidCommand {
                reason: format!("Grid dimensions must be positive, got {}x{}", width, height),
            });
        }
        if width > i32::MAX as u32 || height > i32::MAX as u32 {
            return Err(DomainError::InvalidCommand {
                reason: format!("Grid dimensions {}x{} exceed the cell range", width, height),
            });
        }

        let mut map = Self {
            width,
            height,
            walls: HashSet::new(),
            graph: UnGraphMap::new(),
        };
        for cell in walls {
            if !map.in_bounds(&cell) {
                return Err(DomainError::CellOutOfBounds { cell, width, height });
            }
            map.walls.insert(cell);
        }
        map.rebuild_graph();
        Ok(map)
    }

    pub fn from_config(config: &GridConfig) -> DomainResult<Self> {
        if config.tile_scale > MAX_TILE_SCALE {
            return Err(DomainError::InvalidCommand {
                reason: format!(
                    "Tile scale {} exceeds the maximum of {}",
                    config.tile_scale, MAX_TILE_SCALE
                ),
            });
        }
        Self::new(config.width, config.height, config.walls.iter().copied())
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn in_bounds(&self, cell: &GridCell) -> bool {
        cell.col >= 0
            && cell.row >= 0
            && (cell.col as u32) < self.width
            && (cell.row as u32) < self.height
    }

    pub fn is_open(&self, cell: &GridCell) -> bool {
        self.in_bounds(cell) && !self.walls.contains(cell)
    }

    pub fn set_wall(&mut self, cell: GridCell, wall: bool) -> DomainResult<()> {
        if !self.in_bounds(&cell) {
            return Err(DomainError::CellOutOfBounds {
                cell,
                width: self.width,
                height: self.height,
            });
        }
        let changed = if wall {
            self.walls.insert(cell)
        } else {
            self.walls.remove(&cell)
        };
        if changed {
            self.rebuild_graph();
        }
        Ok(())
    }

    fn rebuild_graph(&mut self) {
        let mut graph = UnGraphMap::new();
        for row in 0..self.height as i32 {
            for col in 0..self.width as i32 {
                let cell = GridCell::new(col, row);
                if !self.is_open(&cell) {
                    continue;
                }
                graph.add_node(cell);
                for neighbour in [GridCell::new(col + 1, row), GridCell::new(col, row + 1)] {
                    if self.is_open(&neighbour) {
                        graph.add_edge(cell, neighbour, ());
                    }
                }
            }
        }
        self.graph = graph;
    }
}

impl PathfindingProvider for GridMap {
    fn find_path(&self, from: GridCell, to: GridCell) -> Vec<GridCell> {
        if !self.graph.contains_node(from) || !self.graph.contains_node(to) {
            return Vec::new();
        }
        astar(
            &self.graph,
            from,
            |cell| cell == to,
            |_| 1u32,
            |cell| cell.col.abs_diff(to.col) + cell.row.abs_diff(to.row),
        )
        .map(|(_, cells)| cells)
        .unwrap_or_default()
    }
}
