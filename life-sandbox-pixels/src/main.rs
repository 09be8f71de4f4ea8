#![deny(clippy::all)]
#![forbid(unsafe_code)]

use life_grid::{CellGrid, GridCell, GridSize, Loc, Neighborhood, Random, World};
use log::debug;
use pixels::Error;
use pixels_canvas_support::{animate, window_size_to_grid_size};
use std::time::Duration;

const TICK_MILLIS: u64 = 250;
const CELL_PIXEL_WIDTH: u32 = 10;
const LIFE_ODDS: f64 = 0.3;
const ALIVE_COLOR: [u8; 4] = [0x00, 0x00, 0x00, 0xff];
const DEAD_COLOR: [u8; 4] = [0xff, 0xff, 0xff, 0xff];

fn main() -> Result<(), Error> {
    env_logger::init();
    animate(Duration::from_millis(TICK_MILLIS), |window_size| {
        LifeWorld::new(
            window_size_to_grid_size(window_size, CELL_PIXEL_WIDTH),
            Random::new(),
        )
    })
}

#[derive(Debug)]
pub struct LifeWorld {
    grid: CellGrid<LifeCell>,
    rand: Random,
    generation: u64,
}

impl LifeWorld {
    // The grid starts with every cell dead; life is drawn in with the
    // mouse or scattered with the R key.
    pub fn new(size: GridSize, rand: Random) -> Self {
        Self {
            grid: CellGrid::new(size),
            rand,
            generation: 0,
        }
    }
}

impl World for LifeWorld {
    fn width(&self) -> u32 {
        self.grid.size().width
    }

    fn height(&self) -> u32 {
        self.grid.size().height
    }

    fn num_cells(&self) -> usize {
        self.grid.num_cells()
    }

    fn cells_iter(&self) -> impl DoubleEndedIterator<Item = &impl GridCell> + Clone {
        self.grid.cells_iter()
    }

    fn update(&mut self) {
        self.grid.update();
        self.generation += 1;
        debug!("generation {}", self.generation);
    }

    fn toggle_cell(&mut self, loc: Loc) {
        if let Some(cell) = self.grid.cell_mut(loc) {
            cell.alive = !cell.alive;
        }
    }

    fn clear(&mut self) {
        for cell in self.grid.cells_iter_mut() {
            cell.alive = false;
        }
        self.generation = 0;
    }

    fn randomize(&mut self) {
        for cell in self.grid.cells_iter_mut() {
            cell.alive = self.rand.next_bool(LIFE_ODDS);
        }
    }
}

#[derive(Clone, Copy, Debug, Default)]
pub struct LifeCell {
    alive: bool,
}

impl LifeCell {
    fn num_live_neighbors(neighborhood: &Neighborhood<LifeCell>) -> u32 {
        let mut result = 0;
        neighborhood.for_neighbor_cells(|neighbor| {
            if neighbor.alive {
                result += 1;
            }
        });
        result
    }
}

impl GridCell for LifeCell {
    fn color_rgba(&self) -> [u8; 4] {
        if self.alive { ALIVE_COLOR } else { DEAD_COLOR }
    }

    fn update(&self, neighborhood: &Neighborhood<LifeCell>, next_cell: &mut LifeCell) {
        let neighbors = Self::num_live_neighbors(neighborhood);
        next_cell.alive = if self.alive {
            2 <= neighbors && neighbors <= 3
        } else {
            neighbors == 3
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn world(width: u32, height: u32) -> LifeWorld {
        LifeWorld::new(GridSize::new(width, height), Random::new())
    }

    fn is_alive(world: &LifeWorld, row: u32, col: u32) -> bool {
        world
            .grid
            .cell(Loc::new(row, col))
            .is_some_and(|cell| cell.alive)
    }

    fn set_alive(world: &mut LifeWorld, cells: &[(u32, u32)]) {
        for &(row, col) in cells {
            if let Some(cell) = world.grid.cell_mut(Loc::new(row, col)) {
                cell.alive = true;
            }
        }
    }

    fn assert_cells(world: &LifeWorld, expected_alive: &[(u32, u32)]) {
        for row in 0..world.height() {
            for col in 0..world.width() {
                assert_eq!(
                    is_alive(world, row, col),
                    expected_alive.contains(&(row, col)),
                    "cell ({row}, {col})"
                );
            }
        }
    }

    #[test]
    fn a_dead_grid_stays_dead() {
        let mut world = world(4, 4);
        for _ in 0..10 {
            world.update();
        }
        assert_cells(&world, &[]);
    }

    #[test]
    fn a_lone_cell_dies_of_underpopulation() {
        let mut world = world(3, 3);
        set_alive(&mut world, &[(1, 1)]);
        world.update();
        assert_cells(&world, &[]);
    }

    #[test]
    fn a_cell_with_one_neighbor_dies() {
        let mut world = world(4, 4);
        set_alive(&mut world, &[(1, 1), (1, 2)]);
        world.update();
        assert_cells(&world, &[]);
    }

    #[test]
    fn a_cell_with_four_neighbors_dies_of_overpopulation() {
        let mut world = world(3, 3);
        set_alive(&mut world, &[(0, 1), (1, 0), (1, 1), (1, 2), (2, 1)]);
        world.update();
        assert!(!is_alive(&world, 1, 1));
    }

    #[test]
    fn a_dead_cell_with_three_neighbors_is_born() {
        let mut world = world(3, 3);
        set_alive(&mut world, &[(0, 0), (0, 1), (1, 0)]);
        world.update();
        assert_cells(&world, &[(0, 0), (0, 1), (1, 0), (1, 1)]);
    }

    #[test]
    fn a_block_is_a_still_life() {
        let mut world = world(4, 4);
        let block = [(1, 1), (1, 2), (2, 1), (2, 2)];
        set_alive(&mut world, &block);
        world.update();
        assert_cells(&world, &block);
    }

    #[test]
    fn a_blinker_oscillates_with_period_two() {
        let mut world = world(3, 3);
        set_alive(&mut world, &[(0, 1), (1, 1), (2, 1)]);

        world.update();
        assert_cells(&world, &[(1, 0), (1, 1), (1, 2)]);

        world.update();
        assert_cells(&world, &[(0, 1), (1, 1), (2, 1)]);
    }

    #[test]
    fn edge_cells_count_only_in_bounds_neighbors() {
        // The corner cell has two live neighbors and survives; nothing
        // beyond the edge is counted.
        let mut world = world(3, 3);
        set_alive(&mut world, &[(0, 0), (0, 1), (1, 0)]);
        world.update();
        assert!(is_alive(&world, 0, 0));
    }

    #[test]
    fn toggling_a_cell_twice_restores_it() {
        let mut world = world(3, 3);
        world.toggle_cell(Loc::new(1, 2));
        assert!(is_alive(&world, 1, 2));
        world.toggle_cell(Loc::new(1, 2));
        assert_cells(&world, &[]);
    }

    #[test]
    fn toggling_outside_the_grid_is_a_no_op() {
        let mut world = world(3, 3);
        set_alive(&mut world, &[(2, 2)]);
        // One past the end in each direction is the easiest off-by-one to
        // let through.
        world.toggle_cell(Loc::new(3, 0));
        world.toggle_cell(Loc::new(0, 3));
        world.toggle_cell(Loc::new(u32::MAX, u32::MAX));
        assert_cells(&world, &[(2, 2)]);
    }

    #[test]
    fn clear_kills_every_cell() {
        let mut world = world(4, 4);
        world.randomize();
        world.clear();
        assert_cells(&world, &[]);
    }
}
