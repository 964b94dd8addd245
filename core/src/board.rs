use alloc::collections::{BTreeSet, VecDeque};
use core::ops::Index;
use ndarray::Array2;
use rand::prelude::*;
use rand::rngs::SmallRng;

use crate::*;

fn validate_size(size: Coord2) -> Result<Coord2> {
    if size.0 == 0 || size.1 == 0 {
        Err(GameError::InvalidSize)
    } else {
        Ok(size)
    }
}

/// Grid of tiles with bomb placement and reveal resolution.
///
/// The board is reinitialized in place for every new game, level and
/// first-move retry; it keeps the last bomb count so that [`Board::reinitialize`]
/// can produce a fresh layout with the same density.
#[derive(Clone, Debug)]
pub struct Board {
    tiles: Array2<Tile>,
    bomb_count: CellCount,
    /// Non-bomb tiles that are still hidden.
    remaining: CellCount,
    flag_count: CellCount,
    rng: SmallRng,
}

impl Board {
    /// Creates an empty board, [`Board::initialize`] must be called before play.
    pub fn new(size: Coord2, seed: u64) -> Result<Self> {
        let size = validate_size(size)?;
        Ok(Self {
            tiles: Array2::default(size.to_nd_index()),
            bomb_count: 0,
            remaining: area(size),
            flag_count: 0,
            rng: SmallRng::seed_from_u64(seed),
        })
    }

    /// Creates a board with bombs at the given coordinates, duplicates are counted once.
    pub fn with_bombs(size: Coord2, bombs: &[Coord2], seed: u64) -> Result<Self> {
        let mut board = Self::new(size, seed)?;
        let bombs = bombs
            .iter()
            .map(|&coords| board.validate_coords(coords))
            .collect::<Result<BTreeSet<_>>>()?;

        let bomb_count = CellCount::try_from(bombs.len()).map_err(|_| GameError::TooManyBombs)?;
        if bomb_count >= board.total_tiles() {
            return Err(GameError::TooManyBombs);
        }

        for coords in bombs {
            board.plant_bomb(coords);
        }
        board.bomb_count = bomb_count;
        board.remaining = board.total_tiles() - bomb_count;
        Ok(board)
    }

    /// Replaces the whole grid with a fresh random layout of `bomb_count` bombs.
    pub fn initialize(&mut self, bomb_count: CellCount) -> Result<()> {
        let total = self.total_tiles();
        if bomb_count >= total {
            log::warn!(
                "Refusing to place {} bombs on a board of {} tiles",
                bomb_count,
                total
            );
            return Err(GameError::TooManyBombs);
        }

        self.tiles.fill(Tile::default());
        self.bomb_count = bomb_count;
        self.remaining = total - bomb_count;
        self.flag_count = 0;

        let (rows, cols) = self.size();
        for _ in 0..bomb_count {
            // rejection sampling, redraw when the tile already holds a bomb
            let coords = loop {
                let coords = (self.rng.random_range(0..rows), self.rng.random_range(0..cols));
                if !self.tiles[coords.to_nd_index()].is_bomb {
                    break coords;
                }
            };
            self.plant_bomb(coords);
        }

        log::debug!(
            "Generated {}x{} board with {} bombs",
            rows,
            cols,
            bomb_count
        );
        Ok(())
    }

    /// Generates a new layout with the most recently used bomb count.
    pub fn reinitialize(&mut self) -> Result<()> {
        self.initialize(self.bomb_count)
    }

    /// Reallocates the grid to new dimensions without placing any bombs.
    pub fn set_grid(&mut self, size: Coord2) -> Result<()> {
        let size = validate_size(size)?;
        self.tiles = Array2::default(size.to_nd_index());
        self.bomb_count = 0;
        self.remaining = area(size);
        self.flag_count = 0;
        log::debug!("Resized board to {}x{}", size.0, size.1);
        Ok(())
    }

    pub fn reveal(&mut self, coords: Coord2) -> Result<RevealOutcome> {
        let coords = self.validate_coords(coords)?;
        let tile = self.tiles[coords.to_nd_index()];

        if tile.is_revealed {
            return Ok(RevealOutcome::Continue);
        }

        if tile.is_bomb {
            self.uncover(coords);
            log::debug!("Bomb revealed at {:?}", coords);
            return Ok(RevealOutcome::Loss);
        }

        if tile.neighbor_bombs == 0 {
            // the origin is still hidden, so the cascade counts it like any other tile
            self.cascade(coords);
        } else {
            self.uncover(coords);
            self.remaining -= 1;
        }

        Ok(if self.remaining == 0 {
            RevealOutcome::Win
        } else {
            RevealOutcome::Continue
        })
    }

    /// Breadth-first flood fill from a zero tile; the revealed state is the visited marker.
    fn cascade(&mut self, origin: Coord2) {
        let mut queue = VecDeque::from([origin]);
        log::trace!("Starting cascade from {:?}", origin);

        while let Some(coords) = queue.pop_front() {
            if self.tiles[coords.to_nd_index()].is_revealed {
                continue;
            }

            let tile = self.uncover(coords);
            self.remaining -= 1;
            log::trace!(
                "Cascade revealed {:?}, neighbor bombs: {}",
                coords,
                tile.neighbor_bombs
            );

            if self.remaining == 0 {
                return;
            }

            if tile.neighbor_bombs == 0 {
                queue.extend(self.iter_neighbors(coords));
            }
        }
    }

    pub fn toggle_flag(&mut self, coords: Coord2) -> Result<MarkOutcome> {
        let coords = self.validate_coords(coords)?;
        let tile = &mut self.tiles[coords.to_nd_index()];

        if tile.is_revealed {
            return Ok(MarkOutcome::NoChange);
        }

        tile.has_flag = !tile.has_flag;
        if tile.has_flag {
            self.flag_count += 1;
        } else {
            self.flag_count -= 1;
        }
        Ok(MarkOutcome::Changed)
    }

    pub fn tile_at(&self, coords: Coord2) -> Result<Tile> {
        let coords = self.validate_coords(coords)?;
        Ok(self.tiles[coords.to_nd_index()])
    }

    /// All tiles in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = (Coord2, Tile)> + '_ {
        self.tiles
            .indexed_iter()
            .map(|((row, col), &tile)| ((row as Coord, col as Coord), tile))
    }

    pub fn validate_coords(&self, coords: Coord2) -> Result<Coord2> {
        let (rows, cols) = self.size();
        if coords.0 < rows && coords.1 < cols {
            Ok(coords)
        } else {
            Err(GameError::InvalidCoords)
        }
    }

    pub fn size(&self) -> Coord2 {
        let (rows, cols) = self.tiles.dim();
        (rows as Coord, cols as Coord)
    }

    pub fn rows(&self) -> Coord {
        self.size().0
    }

    pub fn cols(&self) -> Coord {
        self.size().1
    }

    pub fn total_tiles(&self) -> CellCount {
        area(self.size())
    }

    pub fn bomb_count(&self) -> CellCount {
        self.bomb_count
    }

    pub fn tiles_remaining(&self) -> CellCount {
        self.remaining
    }

    pub fn flag_count(&self) -> CellCount {
        self.flag_count
    }

    /// Bombs not yet accounted for by a flag, negative when over-flagged.
    pub fn bombs_left(&self) -> isize {
        (self.bomb_count as isize) - (self.flag_count as isize)
    }

    pub fn iter_neighbors(&self, coords: Coord2) -> NeighborIter {
        self.tiles.iter_neighbors(coords)
    }

    fn plant_bomb(&mut self, coords: Coord2) {
        self.tiles[coords.to_nd_index()].is_bomb = true;
        for neighbor in self.iter_neighbors(coords) {
            self.tiles[neighbor.to_nd_index()].neighbor_bombs += 1;
        }
    }

    /// Marks a tile revealed, dropping any flag on it.
    fn uncover(&mut self, coords: Coord2) -> Tile {
        let tile = &mut self.tiles[coords.to_nd_index()];
        tile.is_revealed = true;
        if core::mem::take(&mut tile.has_flag) {
            self.flag_count -= 1;
        }
        *tile
    }
}

impl Index<Coord2> for Board {
    type Output = Tile;

    fn index(&self, coords: Coord2) -> &Self::Output {
        &self.tiles[coords.to_nd_index()]
    }
}
