use bevy::prelude::Resource;
use tracing::warn;

use crate::coords::Tile;
use crate::world::cell::{Cell, Occupant, TerrainKind};

/// The level grid, row-major. Owned exclusively by the simulation schedule;
/// a renderer only ever calls the read-only queries.
#[derive(Resource, Debug, Clone, Default)]
pub struct WorldGrid {
    width: u32,
    height: u32,
    cells: Vec<Cell>,
}

impl WorldGrid {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            cells: vec![Cell::default(); (width * height) as usize],
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    fn index(&self, tile: Tile) -> Option<usize> {
        if tile.x < 0 || tile.y < 0 || tile.x >= self.width as i32 || tile.y >= self.height as i32 {
            None
        } else {
            Some(tile.y as usize * self.width as usize + tile.x as usize)
        }
    }

    pub fn get(&self, tile: Tile) -> Option<&Cell> {
        self.index(tile).map(|i| &self.cells[i])
    }

    pub fn get_mut(&mut self, tile: Tile) -> Option<&mut Cell> {
        self.index(tile).map(move |i| &mut self.cells[i])
    }

    /// Clamp a tile onto the grid. Out-of-range coordinates clamp to the
    /// border rather than erroring.
    pub fn clamp(&self, tile: Tile) -> Tile {
        if self.cells.is_empty() {
            return Tile::new(0, 0);
        }
        Tile::new(
            tile.x.clamp(0, self.width as i32 - 1),
            tile.y.clamp(0, self.height as i32 - 1),
        )
    }

    /// Clamped access; total for any tile. An empty grid reads as solid wall.
    pub fn cell_at(&self, tile: Tile) -> &Cell {
        const FALLBACK: Cell = Cell {
            terrain: TerrainKind::Wall,
            occupant: None,
            revealed: false,
        };
        match self.get(self.clamp(tile)) {
            Some(cell) => cell,
            None => {
                warn!("cell_at on an empty grid");
                &FALLBACK
            }
        }
    }

    /// Out-of-bounds tiles read as impassable.
    pub fn is_passable(&self, tile: Tile) -> bool {
        self.get(tile)
            .map(|c| c.terrain.info().passable)
            .unwrap_or(false)
    }

    /// Out-of-bounds tiles read as opaque, so sight never leaks off the map.
    pub fn is_opaque(&self, tile: Tile) -> bool {
        self.get(tile)
            .map(|c| c.terrain.info().opaque)
            .unwrap_or(true)
    }

    pub fn is_revealed(&self, tile: Tile) -> bool {
        self.get(tile).map(|c| c.revealed).unwrap_or(false)
    }

    /// Mark a cell revealed. Monotonic: nothing ever clears the flag.
    pub fn reveal(&mut self, tile: Tile) {
        if let Some(cell) = self.get_mut(tile) {
            cell.revealed = true;
        }
    }

    pub fn occupant(&self, tile: Tile) -> Option<Occupant> {
        self.get(tile).and_then(|c| c.occupant)
    }

    pub fn clear_occupant(&mut self, tile: Tile) {
        if let Some(cell) = self.get_mut(tile) {
            cell.occupant = None;
        }
    }

    pub fn iter_tiles(&self) -> impl Iterator<Item = Tile> + '_ {
        let width = self.width as i32;
        let height = self.height as i32;
        (0..height).flat_map(move |y| (0..width).map(move |x| Tile::new(x, y)))
    }

    pub(crate) fn rows_mut(&mut self) -> std::slice::ChunksMut<'_, Cell> {
        let width = self.width.max(1) as usize;
        self.cells.chunks_mut(width)
    }

    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::cell::TerrainKind;

    #[test]
    fn out_of_bounds_reads_are_safe_defaults() {
        let grid = WorldGrid::new(4, 4);
        let oob = Tile::new(-1, 99);
        assert!(grid.get(oob).is_none());
        assert!(!grid.is_passable(oob));
        assert!(grid.is_opaque(oob));
        assert!(!grid.is_revealed(oob));
    }

    #[test]
    fn clamped_access_hits_the_border() {
        let mut grid = WorldGrid::new(4, 4);
        grid.get_mut(Tile::new(3, 3)).unwrap().terrain = TerrainKind::Wall;
        assert_eq!(grid.cell_at(Tile::new(99, 99)).terrain, TerrainKind::Wall);
        assert_eq!(grid.clamp(Tile::new(-5, 2)), Tile::new(0, 2));
    }

    #[test]
    fn reveal_is_monotonic() {
        let mut grid = WorldGrid::new(4, 4);
        let tile = Tile::new(1, 1);
        grid.reveal(tile);
        assert!(grid.is_revealed(tile));
        // Revealing elsewhere never clears earlier reveals.
        grid.reveal(Tile::new(3, 0));
        grid.reveal(tile);
        assert!(grid.is_revealed(tile));
    }

    #[test]
    fn iter_tiles_covers_the_grid() {
        let grid = WorldGrid::new(3, 2);
        assert_eq!(grid.iter_tiles().count(), 6);
    }
}
