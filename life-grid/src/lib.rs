#![deny(clippy::all)]
#![forbid(unsafe_code)]

use rand::prelude::*;
use rand::rngs::SmallRng;
use std::mem;
use std::ops::{Index, IndexMut};

pub trait World {
    fn width(&self) -> u32;
    fn height(&self) -> u32;
    fn num_cells(&self) -> usize;
    fn cells_iter(&self) -> impl DoubleEndedIterator<Item = &impl GridCell> + Clone;
    fn update(&mut self);
    fn toggle_cell(&mut self, loc: Loc);
    fn clear(&mut self);
    fn randomize(&mut self);
}

pub trait GridCell
where
    Self: Copy + Default,
{
    fn color_rgba(&self) -> [u8; 4];
    fn update(&self, neighborhood: &Neighborhood<Self>, next_cell: &mut Self);
}

#[derive(Clone, Debug)]
pub struct CellGrid<C>
where
    C: GridCell,
{
    size: GridSize,
    cells: GridCells<C>,
    next_cells: GridCells<C>,
}

impl<C> CellGrid<C>
where
    C: GridCell,
{
    pub fn new(size: GridSize) -> Self {
        assert!(size.width > 0 && size.height > 0);
        Self {
            size,
            cells: GridCells::new(size),
            next_cells: GridCells::new(size),
        }
    }

    pub fn size(&self) -> GridSize {
        self.size
    }

    pub fn num_cells(&self) -> usize {
        self.cells.num_cells()
    }

    pub fn cell(&self, loc: Loc) -> Option<&C> {
        self.cells.cell(loc)
    }

    pub fn cell_mut(&mut self, loc: Loc) -> Option<&mut C> {
        self.cells.cell_mut(loc)
    }

    pub fn cells_iter(&self) -> impl DoubleEndedIterator<Item = &C> + Clone {
        self.cells.cells_iter()
    }

    pub fn cells_iter_mut(&mut self) -> impl Iterator<Item = &mut C> {
        self.cells.cells_iter_mut()
    }

    pub fn update(&mut self) {
        self.next_cells.copy_from(&self.cells);
        for row in 0..self.size.height {
            for col in 0..self.size.width {
                self.update_cell(Loc::new(row, col));
            }
        }
        mem::swap(&mut self.next_cells, &mut self.cells);
    }

    fn update_cell(&mut self, loc: Loc) {
        let cell = &self.cells[loc];
        let neighborhood = Neighborhood::new(&self.cells, loc);
        let next_cell = &mut self.next_cells[loc];
        cell.update(&neighborhood, next_cell);
    }
}

#[derive(Clone, Debug)]
pub struct GridCells<C>
where
    C: GridCell,
{
    cells: Vec<C>,
    size: GridSize,
}

impl<C> GridCells<C>
where
    C: GridCell,
{
    fn new(size: GridSize) -> Self {
        Self {
            cells: vec![C::default(); size.num_cells()],
            size,
        }
    }

    fn num_cells(&self) -> usize {
        self.cells.len()
    }

    fn cells_iter(&self) -> impl DoubleEndedIterator<Item = &C> + Clone {
        self.cells.iter()
    }

    fn cells_iter_mut(&mut self) -> impl Iterator<Item = &mut C> {
        self.cells.iter_mut()
    }

    pub fn cell(&self, loc: Loc) -> Option<&C> {
        loc.grid_index(self.size).map(|index| &self.cells[index])
    }

    pub fn cell_mut(&mut self, loc: Loc) -> Option<&mut C> {
        loc.grid_index(self.size)
            .map(move |index| &mut self.cells[index])
    }

    fn copy_from(&mut self, source: &Self) {
        self.cells.copy_from_slice(&source.cells);
    }
}

impl<C> Index<Loc> for GridCells<C>
where
    C: GridCell,
{
    type Output = C;

    fn index(&self, loc: Loc) -> &Self::Output {
        self.cell(loc)
            .unwrap_or_else(|| panic!("Index indices {}, {} out of bounds", loc.row, loc.col))
    }
}

impl<C> IndexMut<Loc> for GridCells<C>
where
    C: GridCell,
{
    fn index_mut(&mut self, loc: Loc) -> &mut Self::Output {
        self.cell_mut(loc)
            .unwrap_or_else(|| panic!("Index_mut indices {}, {} out of bounds", loc.row, loc.col))
    }
}

pub struct Neighborhood<'a, C>
where
    C: GridCell,
{
    cells: &'a GridCells<C>,
    center: Loc,
}

impl<'a, C> Neighborhood<'a, C>
where
    C: GridCell,
{
    pub fn new(cells: &'a GridCells<C>, center: Loc) -> Self {
        Self { cells, center }
    }

    // Neighbors beyond the grid edge are dead: they are never visited.
    pub fn for_neighbor_cells<F>(&self, mut f: F)
    where
        F: FnMut(&C),
    {
        for row_delta in -1..=1 {
            for col_delta in -1..=1 {
                if row_delta == 0 && col_delta == 0 {
                    continue;
                }
                if let Some(cell) = self.neighbor_cell(row_delta, col_delta) {
                    f(cell);
                }
            }
        }
    }

    fn neighbor_cell(&self, row_delta: i32, col_delta: i32) -> Option<&C> {
        let loc = self.center.offset(row_delta, col_delta)?;
        self.cells.cell(loc)
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct GridSize {
    pub width: u32,
    pub height: u32,
}

impl GridSize {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn num_cells(self) -> usize {
        self.width as usize * self.height as usize
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Loc {
    pub row: u32,
    pub col: u32,
}

impl Loc {
    pub fn new(row: u32, col: u32) -> Self {
        Self { row, col }
    }

    pub fn offset(self, row_delta: i32, col_delta: i32) -> Option<Loc> {
        let row = self.row.checked_add_signed(row_delta)?;
        let col = self.col.checked_add_signed(col_delta)?;
        Some(Loc::new(row, col))
    }

    pub fn grid_index(self, size: GridSize) -> Option<usize> {
        if self.row < size.height && self.col < size.width {
            Some(self.row as usize * size.width as usize + self.col as usize)
        } else {
            None
        }
    }
}

#[derive(Debug)]
pub struct Random {
    rng: SmallRng,
}

impl Random {
    pub fn new() -> Self {
        Self {
            rng: SmallRng::from_rng(&mut rand::rng()),
        }
    }

    pub fn next_bool(&mut self, p: f64) -> bool {
        self.rng.random_bool(p)
    }
}

impl Default for Random {
    fn default() -> Self {
        Self::new()
    }
}
