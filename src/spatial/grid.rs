//! Toroidal grid holding terrain and agent occupancy
//!
//! Both axes wrap, so every coordinate addresses a cell. The grid owns
//! occupancy; an agent's `position` is a mirror kept in sync by `place` and
//! `move_agent` and never written anywhere else.

use rand::Rng;
use rand_chacha::ChaCha8Rng;

use crate::core::config::TerrainConfig;
use crate::core::error::{HuntError, Result};
use crate::core::types::{AgentId, Position};
use crate::entity::Agent;
use crate::spatial::terrain::{Cell, Terrain};

const ORTHOGONAL: [(i32, i32); 4] = [(0, 1), (1, 0), (0, -1), (-1, 0)];
const DIAGONAL: [(i32, i32); 4] = [(1, 1), (1, -1), (-1, 1), (-1, -1)];

#[derive(Debug, Clone)]
pub struct Grid {
    width: i32,
    height: i32,
    cells: Vec<Cell>,
}

impl Grid {
    /// Create a grid of open terrain
    ///
    /// # Panics
    ///
    /// Panics if either dimension is not positive. `Simulation::new` checks
    /// the dimensions and returns an error before getting here.
    pub fn new(width: i32, height: i32) -> Self {
        assert!(width > 0 && height > 0, "grid dimensions must be positive");
        let mut cells = Vec::with_capacity((width * height) as usize);
        for y in 0..height {
            for x in 0..width {
                cells.push(Cell::new(Position::new(x, y), Terrain::Open));
            }
        }
        Self { width, height, cells }
    }

    /// Create a grid and scatter terrain over it
    ///
    /// Each kind is stamped onto `fraction * area` randomly sampled cells, in
    /// the order sand, rocky, trap, hostile. Samples may repeat and later kinds
    /// overwrite earlier ones, so the final shares come out slightly lower.
    pub fn generate(width: i32, height: i32, config: &TerrainConfig, rng: &mut ChaCha8Rng) -> Self {
        let mut grid = Self::new(width, height);
        let area = (width * height) as f64;
        let passes = [
            (Terrain::SlowSand, config.slow_sand_fraction),
            (Terrain::Rocky, config.rocky_fraction),
            (Terrain::Trap, config.trap_fraction),
            (Terrain::Hostile, config.hostile_fraction),
        ];

        for (terrain, fraction) in passes {
            let count = (area * fraction) as usize;
            for _ in 0..count {
                let x = rng.gen_range(0..width);
                let y = rng.gen_range(0..height);
                grid.set_terrain(Position::new(x, y), terrain);
            }
        }

        grid
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    /// Wrap a coordinate into bounds on both axes
    #[inline]
    pub fn wrap(&self, pos: Position) -> Position {
        Position::new(pos.x.rem_euclid(self.width), pos.y.rem_euclid(self.height))
    }

    /// Whether a coordinate lies inside the grid without wrapping
    pub fn contains(&self, pos: Position) -> bool {
        (0..self.width).contains(&pos.x) && (0..self.height).contains(&pos.y)
    }

    #[inline]
    fn index(&self, pos: Position) -> usize {
        let p = self.wrap(pos);
        (p.y * self.width + p.x) as usize
    }

    /// Cell at a (wrapped) coordinate. Never fails.
    pub fn cell_at(&self, pos: Position) -> &Cell {
        &self.cells[self.index(pos)]
    }

    fn cell_at_mut(&mut self, pos: Position) -> &mut Cell {
        let idx = self.index(pos);
        &mut self.cells[idx]
    }

    /// All cells in row-major order
    pub fn cells(&self) -> impl Iterator<Item = &Cell> {
        self.cells.iter()
    }

    /// Rows of cells, top to bottom
    pub fn rows(&self) -> impl Iterator<Item = &[Cell]> {
        self.cells.chunks(self.width as usize)
    }

    /// Overwrite the terrain of a cell
    pub fn set_terrain(&mut self, pos: Position, terrain: Terrain) {
        self.cell_at_mut(pos).set_terrain(terrain);
    }

    /// The 4 (or 8) wrapped neighbours of a cell, unfiltered
    pub fn neighbors(&self, pos: Position, include_diagonals: bool) -> Vec<&Cell> {
        let mut out: Vec<&Cell> = ORTHOGONAL
            .iter()
            .map(|&(dx, dy)| self.cell_at(pos.offset(dx, dy)))
            .collect();
        if include_diagonals {
            out.extend(DIAGONAL.iter().map(|&(dx, dy)| self.cell_at(pos.offset(dx, dy))));
        }
        out
    }

    /// Wrapped positions of orthogonal neighbours nobody occupies
    pub fn passable_neighbors(&self, pos: Position) -> Vec<Position> {
        self.neighbors(pos, false)
            .into_iter()
            .filter(|c| c.is_passable())
            .map(|c| c.position)
            .collect()
    }

    /// Manhattan distance taking the shorter way round on each axis
    pub fn toroidal_distance(&self, a: Position, b: Position) -> i32 {
        let a = self.wrap(a);
        let b = self.wrap(b);
        let dx = (a.x - b.x).abs();
        let dy = (a.y - b.y).abs();
        dx.min(self.width - dx) + dy.min(self.height - dy)
    }

    pub fn occupant_at(&self, pos: Position) -> Option<AgentId> {
        self.cell_at(pos).occupant()
    }

    pub fn is_passable(&self, pos: Position) -> bool {
        self.cell_at(pos).is_passable()
    }

    pub fn empty_positions(&self) -> Vec<Position> {
        self.cells
            .iter()
            .filter(|c| c.is_passable())
            .map(|c| c.position)
            .collect()
    }

    /// Bind an agent to a cell and mirror the position onto the agent
    pub fn place(&mut self, agent: &mut Agent, pos: Position) -> Result<()> {
        let pos = self.wrap(pos);
        let cell = self.cell_at_mut(pos);
        if cell.occupant().is_some() {
            return Err(HuntError::Occupied { x: pos.x, y: pos.y });
        }
        cell.set_occupant(Some(agent.id));
        agent.set_position(pos);
        Ok(())
    }

    /// Clear a cell's occupant slot. Idempotent.
    pub fn vacate(&mut self, pos: Position) {
        self.cell_at_mut(pos).set_occupant(None);
    }

    /// Transfer the occupant of `old` to `new`
    ///
    /// Returns the stamina cost of the destination. Agent stats are left to
    /// the caller.
    pub fn move_agent(&mut self, agents: &mut [Agent], old: Position, new: Position) -> Result<i32> {
        let old = self.wrap(old);
        let new = self.wrap(new);

        let id = self
            .occupant_at(old)
            .ok_or(HuntError::NoOccupant { x: old.x, y: old.y })?;
        if self.occupant_at(new).is_some() {
            return Err(HuntError::Occupied { x: new.x, y: new.y });
        }

        self.cell_at_mut(old).set_occupant(None);
        self.cell_at_mut(new).set_occupant(Some(id));
        if let Some(agent) = agents.get_mut(id.index()) {
            agent.set_position(new);
        }

        Ok(self.cell_at(new).stamina_cost())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::{Agent, MonsterState, Role};
    use rand::SeedableRng;

    fn monster(id: u32) -> Agent {
        Agent::new(
            AgentId(id),
            format!("Monster_{}", id),
            50,
            Role::Monster(MonsterState { aggression: 0.5 }),
        )
    }

    #[test]
    fn test_cell_at_wraps_both_axes() {
        let grid = Grid::new(5, 4);
        assert_eq!(grid.cell_at(Position::new(-1, 0)).position, Position::new(4, 0));
        assert_eq!(grid.cell_at(Position::new(5, 4)).position, Position::new(0, 0));
        assert_eq!(grid.cell_at(Position::new(12, -5)).position, Position::new(2, 3));
    }

    #[test]
    fn test_neighbors_wrap_at_corner() {
        let grid = Grid::new(5, 5);
        let around: Vec<Position> = grid
            .neighbors(Position::new(0, 0), false)
            .iter()
            .map(|c| c.position)
            .collect();
        assert_eq!(
            around,
            vec![
                Position::new(0, 1),
                Position::new(1, 0),
                Position::new(0, 4),
                Position::new(4, 0)
            ]
        );
        assert_eq!(grid.neighbors(Position::new(0, 0), true).len(), 8);
    }

    #[test]
    fn test_toroidal_distance_takes_short_way() {
        let grid = Grid::new(25, 25);
        assert_eq!(grid.toroidal_distance(Position::new(0, 0), Position::new(24, 24)), 2);
        assert_eq!(grid.toroidal_distance(Position::new(1, 1), Position::new(20, 20)), 12);
        assert_eq!(grid.toroidal_distance(Position::new(3, 3), Position::new(3, 3)), 0);
    }

    #[test]
    fn test_place_rejects_occupied_cell() {
        let mut grid = Grid::new(5, 5);
        let mut a = monster(0);
        let mut b = monster(1);
        grid.place(&mut a, Position::new(2, 2)).unwrap();
        let err = grid.place(&mut b, Position::new(2, 2)).unwrap_err();
        assert!(matches!(err, HuntError::Occupied { x: 2, y: 2 }));
        assert_eq!(grid.occupant_at(Position::new(2, 2)), Some(AgentId(0)));
    }

    #[test]
    fn test_move_transfers_occupancy_and_returns_cost() {
        let mut grid = Grid::new(5, 5);
        grid.set_terrain(Position::new(3, 2), Terrain::Rocky);
        let mut agents = vec![monster(0)];
        grid.place(&mut agents[0], Position::new(2, 2)).unwrap();

        let cost = grid
            .move_agent(&mut agents, Position::new(2, 2), Position::new(3, 2))
            .unwrap();

        assert_eq!(cost, 3);
        assert_eq!(agents[0].position(), Position::new(3, 2));
        assert_eq!(grid.occupant_at(Position::new(3, 2)), Some(AgentId(0)));
        assert!(grid.is_passable(Position::new(2, 2)));
    }

    #[test]
    fn test_move_errors() {
        let mut grid = Grid::new(5, 5);
        let mut agents = vec![monster(0), monster(1)];
        grid.place(&mut agents[0], Position::new(0, 0)).unwrap();
        grid.place(&mut agents[1], Position::new(1, 0)).unwrap();

        let empty = grid.move_agent(&mut agents, Position::new(4, 4), Position::new(3, 3));
        assert!(matches!(empty, Err(HuntError::NoOccupant { x: 4, y: 4 })));

        let blocked = grid.move_agent(&mut agents, Position::new(0, 0), Position::new(1, 0));
        assert!(matches!(blocked, Err(HuntError::Occupied { x: 1, y: 0 })));
        assert_eq!(agents[0].position(), Position::new(0, 0));
    }

    #[test]
    fn test_vacate_is_idempotent() {
        let mut grid = Grid::new(3, 3);
        let mut a = monster(0);
        grid.place(&mut a, Position::new(1, 1)).unwrap();
        grid.vacate(Position::new(1, 1));
        grid.vacate(Position::new(1, 1));
        assert!(grid.is_passable(Position::new(1, 1)));
        assert_eq!(grid.empty_positions().len(), 9);
    }

    #[test]
    fn test_generation_is_seeded() {
        let config = TerrainConfig::default();
        let a = Grid::generate(25, 25, &config, &mut ChaCha8Rng::seed_from_u64(42));
        let b = Grid::generate(25, 25, &config, &mut ChaCha8Rng::seed_from_u64(42));
        let kinds_a: Vec<Terrain> = a.cells().map(|c| c.terrain()).collect();
        let kinds_b: Vec<Terrain> = b.cells().map(|c| c.terrain()).collect();
        assert_eq!(kinds_a, kinds_b);
        assert!(kinds_a.iter().any(|t| *t != Terrain::Open));
    }

    #[test]
    fn test_open_config_generates_no_hazards() {
        let grid = Grid::generate(
            10,
            10,
            &TerrainConfig::open(),
            &mut ChaCha8Rng::seed_from_u64(1),
        );
        assert!(grid.cells().all(|c| c.terrain() == Terrain::Open));
    }
}
