use rand::{Rng, SeedableRng, rngs::StdRng};
use serde::{Deserialize, Serialize};

use crate::coords::{Position, Size};
use crate::error::{CraneError, StateConflict};

/// Stack height per (x, z) column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Warehouse {
    size: Size,
    heights: Vec<u32>,
    manipulated: bool,
}

impl Warehouse {
    pub fn new(size: Size) -> Self {
        Self {
            size,
            heights: vec![0; size.column_count()],
            manipulated: false,
        }
    }

    pub fn size(&self) -> Size {
        self.size
    }

    pub fn max_height(&self) -> u32 {
        self.size.height.max(0) as u32
    }

    fn index(&self, x: i32, z: i32) -> Option<usize> {
        if !self.size.contains_column(x, z) {
            return None;
        }
        Some((x * self.size.depth + z) as usize)
    }

    fn column_index(&self, x: i32, z: i32) -> Result<usize, CraneError> {
        self.index(x, z)
            .ok_or_else(|| CraneError::out_of_bounds(Position::new(x, 0, z), self.size))
    }

    /// Height of the column at (x, z). Columns outside the warehouse read as empty.
    pub fn height_at(&self, x: i32, z: i32) -> u32 {
        self.index(x, z).map(|i| self.heights[i]).unwrap_or(0)
    }

    pub fn increment(&mut self, x: i32, z: i32) -> Result<u32, CraneError> {
        let i = self.column_index(x, z)?;
        let max = self.max_height();
        if self.heights[i] >= max {
            return Err(CraneError::Overflow { x, z, height: max });
        }
        self.heights[i] += 1;
        self.manipulated = true;
        Ok(self.heights[i])
    }

    pub fn decrement(&mut self, x: i32, z: i32) -> Result<u32, CraneError> {
        let i = self.column_index(x, z)?;
        if self.heights[i] == 0 {
            return Err(CraneError::Underflow { x, z });
        }
        self.heights[i] -= 1;
        self.manipulated = true;
        Ok(self.heights[i])
    }

    // Missing rows and entries are empty columns; nothing is written unless all of rows is valid.
    pub fn fill(&mut self, rows: &[Vec<u32>]) -> Result<(), CraneError> {
        if self.manipulated {
            return Err(CraneError::InvalidState(StateConflict::FillAfterManipulation));
        }
        let max = self.max_height();
        let mut heights = vec![0; self.size.column_count()];
        for (x, row) in rows.iter().enumerate() {
            for (z, &h) in row.iter().enumerate() {
                let (x, z) = (x as i32, z as i32);
                let i = self.index(x, z).ok_or_else(|| {
                    CraneError::out_of_bounds(Position::new(x, 0, z), self.size)
                })?;
                if h > max {
                    return Err(CraneError::out_of_bounds(
                        Position::new(x, h as i32, z),
                        self.size,
                    ));
                }
                heights[i] = h;
            }
        }
        self.heights = heights;
        Ok(())
    }

    pub fn heights(&self) -> &[u32] {
        &self.heights
    }

    pub fn rows(&self) -> Vec<Vec<u32>> {
        if self.size.is_empty() {
            return Vec::new();
        }
        self.heights
            .chunks(self.size.depth as usize)
            .map(|c| c.to_vec())
            .collect()
    }

    pub fn total(&self) -> u32 {
        self.heights.iter().sum()
    }
}

/// A reproducible `rows[x][z]` layout; each cell of a column is stacked with probability `density`.
pub fn random_layout(size: Size, seed: u64, density: f64) -> Vec<Vec<u32>> {
    let mut rng = StdRng::seed_from_u64(seed);
    let density = density.clamp(0.0, 1.0);
    let width = size.width.max(0);
    let depth = size.depth.max(0);
    let mut rows = Vec::with_capacity(width as usize);
    for _ in 0..width {
        let mut row = Vec::with_capacity(depth as usize);
        for _ in 0..depth {
            let mut h = 0u32;
            for _ in 0..size.height.max(0) {
                let roll: f64 = rng.r#gen();
                if roll >= density {
                    break;
                }
                h += 1;
            }
            row.push(h);
        }
        rows.push(row);
    }
    rows
}
