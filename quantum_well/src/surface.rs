//! Height-field surfaces driven by the wavefunction
//!
//! A [`SurfaceGrid`] is a fixed `resolution × resolution` lattice over the well,
//! laid out row by row from the top edge (y = +1) down, x increasing along each
//! row. Every [`SurfaceBuffer`] is allocated once on that lattice; updates only
//! rewrite heights and normals in place.

use glam::Vec3;

use crate::constants::WELL_HALF_WIDTH;
use crate::error::{QuantumWellError, Result};
use crate::simulation::SimulationState;
use crate::wavefunction::{evaluate, Quantity};

/// Position of a grid vertex inside the well, each coordinate in [0, 1]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridSample {
    pub normalized_x: f32,
    pub normalized_y: f32,
}

impl GridSample {
    /// Scene-space x in [-1, 1]
    pub fn x(&self) -> f32 {
        (2.0 * self.normalized_x - 1.0) * WELL_HALF_WIDTH
    }

    /// Scene-space y in [-1, 1]
    pub fn y(&self) -> f32 {
        (2.0 * self.normalized_y - 1.0) * WELL_HALF_WIDTH
    }
}

/// Square sampling lattice shared by all surfaces
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SurfaceGrid {
    resolution: usize,
}

impl SurfaceGrid {
    pub fn new(resolution: usize) -> Result<Self> {
        if resolution < 2 {
            return Err(QuantumWellError::InvalidResolution(resolution));
        }
        Ok(Self { resolution })
    }

    /// Samples per side
    pub fn resolution(&self) -> usize {
        self.resolution
    }

    pub fn vertex_count(&self) -> usize {
        self.resolution * self.resolution
    }

    /// Flattened vertex index of column `ix`, row `iy`
    pub fn index(&self, ix: usize, iy: usize) -> usize {
        ix + iy * self.resolution
    }

    /// Sample at column `ix`, row `iy`
    pub fn sample(&self, ix: usize, iy: usize) -> GridSample {
        let last = (self.resolution - 1) as f32;
        // Divide instead of accumulating a step so the edges land exactly on 0 and 1
        GridSample {
            normalized_x: ix as f32 / last,
            normalized_y: 1.0 - iy as f32 / last,
        }
    }

    /// All samples in vertex order
    pub fn samples(&self) -> impl Iterator<Item = GridSample> + '_ {
        (0..self.resolution)
            .flat_map(move |iy| (0..self.resolution).map(move |ix| self.sample(ix, iy)))
    }

    /// Two counter-clockwise (seen from +Z) triangles per grid cell
    pub fn triangles(&self) -> impl Iterator<Item = [u32; 3]> + '_ {
        let cells = self.resolution - 1;
        (0..cells).flat_map(move |iy| {
            (0..cells).flat_map(move |ix| {
                let a = self.index(ix, iy) as u32;
                let b = self.index(ix, iy + 1) as u32;
                let c = self.index(ix + 1, iy + 1) as u32;
                let d = self.index(ix + 1, iy) as u32;
                [[a, b, d], [b, c, d]]
            })
        })
    }

    /// Index list for a triangle-list draw
    pub fn triangle_indices(&self) -> Vec<u32> {
        self.triangles().flatten().collect()
    }

    /// Index list for a line-list wireframe: every cell edge plus the diagonal
    pub fn edge_indices(&self) -> Vec<u32> {
        let n = self.resolution;
        let mut indices = Vec::with_capacity(self.edge_count() * 2);
        for iy in 0..n {
            for ix in 0..n {
                let here = self.index(ix, iy) as u32;
                if ix + 1 < n {
                    indices.extend([here, self.index(ix + 1, iy) as u32]);
                }
                if iy + 1 < n {
                    indices.extend([here, self.index(ix, iy + 1) as u32]);
                }
                if ix + 1 < n && iy + 1 < n {
                    indices.extend([self.index(ix, iy + 1) as u32, self.index(ix + 1, iy) as u32]);
                }
            }
        }
        indices
    }

    /// Number of wireframe segments
    pub fn edge_count(&self) -> usize {
        let n = self.resolution;
        let cells = n - 1;
        2 * n * cells + cells * cells
    }
}

/// One displayed height field: fixed X/Y, Z rewritten every update
#[derive(Debug, Clone)]
pub struct SurfaceBuffer {
    grid: SurfaceGrid,
    vertices: Vec<Vec3>,
    normals: Vec<Vec3>,
}

impl SurfaceBuffer {
    /// Flat surface at z = 0
    pub fn new(grid: SurfaceGrid) -> Self {
        let vertices: Vec<Vec3> = grid.samples().map(|s| Vec3::new(s.x(), s.y(), 0.0)).collect();
        let normals = vec![Vec3::Z; vertices.len()];
        Self { grid, vertices, normals }
    }

    pub fn grid(&self) -> SurfaceGrid {
        self.grid
    }

    pub fn vertices(&self) -> &[Vec3] {
        &self.vertices
    }

    pub fn normals(&self) -> &[Vec3] {
        &self.normals
    }

    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Area-weighted vertex normals from the current heights
    pub fn recompute_normals(&mut self) {
        self.normals.iter_mut().for_each(|n| *n = Vec3::ZERO);

        for [a, b, c] in self.grid.triangles() {
            let (a, b, c) = (a as usize, b as usize, c as usize);
            let pa = self.vertices[a];
            let pb = self.vertices[b];
            let pc = self.vertices[c];
            let face = (pc - pb).cross(pa - pb);
            self.normals[a] += face;
            self.normals[b] += face;
            self.normals[c] += face;
        }

        for n in &mut self.normals {
            let unit = n.normalize_or_zero();
            *n = if unit == Vec3::ZERO { Vec3::Z } else { unit };
        }
    }
}

/// Rewrite every height of `buffer` with `scale ×` the chosen component of ψ.
///
/// Reads time and mode numbers from `state` once, so the whole pass reflects a
/// single snapshot. Normals are recomputed afterwards.
pub fn update(buffer: &mut SurfaceBuffer, quantity: Quantity, scale: f32, state: &SimulationState) {
    let t = state.simulation_time();
    let modes = state.modes();

    for vertex in &mut buffer.vertices {
        let psi = evaluate(vertex.x, vertex.y, t, modes);
        vertex.z = psi.component(quantity) * scale;
    }

    buffer.recompute_normals();
}

/// The three overlaid surfaces on one shared grid
#[derive(Debug, Clone)]
pub struct SurfaceSet {
    grid: SurfaceGrid,
    real: SurfaceBuffer,
    imaginary: SurfaceBuffer,
    probability: SurfaceBuffer,
}

impl SurfaceSet {
    pub fn new(grid: SurfaceGrid) -> Self {
        Self {
            grid,
            real: SurfaceBuffer::new(grid),
            imaginary: SurfaceBuffer::new(grid),
            probability: SurfaceBuffer::new(grid),
        }
    }

    pub fn grid(&self) -> SurfaceGrid {
        self.grid
    }

    pub fn get(&self, quantity: Quantity) -> &SurfaceBuffer {
        match quantity {
            Quantity::Real => &self.real,
            Quantity::Imaginary => &self.imaginary,
            Quantity::Probability => &self.probability,
        }
    }

    fn get_mut(&mut self, quantity: Quantity) -> &mut SurfaceBuffer {
        match quantity {
            Quantity::Real => &mut self.real,
            Quantity::Imaginary => &mut self.imaginary,
            Quantity::Probability => &mut self.probability,
        }
    }

    /// Recompute all three surfaces for the current state
    pub fn update_all(&mut self, scale: f32, state: &SimulationState) {
        for quantity in Quantity::ALL {
            update(self.get_mut(quantity), quantity, scale, state);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wavefunction::QuantumNumbers;

    fn state(nx: u32, ny: u32, t: f64) -> SimulationState {
        SimulationState::new(QuantumNumbers::new(nx, ny).unwrap(), 1.0).with_time(t)
    }

    #[test]
    fn test_grid_rejects_degenerate_resolution() {
        assert_eq!(SurfaceGrid::new(1), Err(QuantumWellError::InvalidResolution(1)));
        assert!(SurfaceGrid::new(2).is_ok());
    }

    #[test]
    fn test_grid_spans_the_well_exactly() {
        let grid = SurfaceGrid::new(50).unwrap();
        assert_eq!(grid.vertex_count(), 2500);

        let top_left = grid.sample(0, 0);
        assert_eq!((top_left.x(), top_left.y()), (-1.0, 1.0));

        let bottom_right = grid.sample(49, 49);
        assert_eq!((bottom_right.x(), bottom_right.y()), (1.0, -1.0));

        for s in grid.samples() {
            assert!((0.0..=1.0).contains(&s.normalized_x));
            assert!((0.0..=1.0).contains(&s.normalized_y));
        }
    }

    #[test]
    fn test_index_counts() {
        let grid = SurfaceGrid::new(50).unwrap();
        assert_eq!(grid.triangles().count(), 2 * 49 * 49);
        assert_eq!(grid.triangle_indices().len(), 6 * 49 * 49);
        assert_eq!(grid.edge_indices().len(), grid.edge_count() * 2);
        assert!(grid.edge_indices().iter().all(|&i| (i as usize) < grid.vertex_count()));
    }

    #[test]
    fn test_small_grid_triangulation() {
        let grid = SurfaceGrid::new(2).unwrap();
        // 0 1
        // 2 3
        assert_eq!(grid.triangle_indices(), vec![0, 2, 1, 2, 3, 1]);
        assert_eq!(grid.edge_count(), 5);
    }

    #[test]
    fn test_update_writes_scaled_component() {
        // 9 samples per side: column 2 is x = -0.5 (u = 0.25), column 6 is
        // x = 0.5 (u = 0.75), row 4 is y = 0 (v = 0.5)
        let grid = SurfaceGrid::new(9).unwrap();
        let left = grid.index(2, 4);
        let right = grid.index(6, 4);
        let mut buffer = SurfaceBuffer::new(grid);

        // (2, 3) at t = 0: 2 · sin(π/2) · sin(3π/2) = -2, scaled by 0.3
        update(&mut buffer, Quantity::Real, 0.3, &state(2, 3, 0.0));
        assert!((buffer.vertices()[left].z - -0.6).abs() < 1e-6);
        assert!((buffer.vertices()[right].z - 0.6).abs() < 1e-6);
        assert_eq!(buffer.vertices()[grid.index(4, 4)].z, 0.0);

        // Quarter period: Im = -2 sin(...) sin(...) · sin(π/2) = 2 at the left sample
        let quarter = QuantumNumbers::new(2, 3).unwrap().period() / 4.0;
        update(&mut buffer, Quantity::Imaginary, 0.3, &state(2, 3, quarter));
        assert!((buffer.vertices()[left].z - 0.6).abs() < 1e-5);
        assert!((buffer.vertices()[right].z - -0.6).abs() < 1e-5);

        update(&mut buffer, Quantity::Probability, 0.3, &state(2, 3, quarter));
        assert!((buffer.vertices()[left].z - 1.2).abs() < 1e-5);
    }

    #[test]
    fn test_update_keeps_xy_and_allocation() {
        let grid = SurfaceGrid::new(20).unwrap();
        let mut buffer = SurfaceBuffer::new(grid);
        let before: Vec<(f32, f32)> = buffer.vertices().iter().map(|v| (v.x, v.y)).collect();
        let ptr = buffer.vertices().as_ptr();

        for step in 0..10 {
            update(&mut buffer, Quantity::Real, 0.3, &state(1 + step % 6, 2, step as f64));
        }

        let after: Vec<(f32, f32)> = buffer.vertices().iter().map(|v| (v.x, v.y)).collect();
        assert_eq!(before, after);
        assert_eq!(buffer.vertices().as_ptr(), ptr);
        assert_eq!(buffer.len(), 400);
    }

    #[test]
    fn test_walls_stay_flat() {
        let grid = SurfaceGrid::new(50).unwrap();
        let mut set = SurfaceSet::new(grid);
        set.update_all(0.3, &state(5, 6, 12.3));

        for quantity in Quantity::ALL {
            let buffer = set.get(quantity);
            for i in 0..50 {
                for idx in [grid.index(0, i), grid.index(49, i), grid.index(i, 0), grid.index(i, 49)] {
                    assert_eq!(buffer.vertices()[idx].z, 0.0);
                }
            }
        }
    }

    #[test]
    fn test_set_shares_grid_positions() {
        let grid = SurfaceGrid::new(12).unwrap();
        let mut set = SurfaceSet::new(grid);
        set.update_all(0.3, &state(3, 4, 2.0));

        let real = set.get(Quantity::Real).vertices();
        for quantity in [Quantity::Imaginary, Quantity::Probability] {
            let other = set.get(quantity).vertices();
            assert_eq!(real.len(), other.len());
            for (a, b) in real.iter().zip(other) {
                assert_eq!((a.x, a.y), (b.x, b.y));
            }
        }
    }

    #[test]
    fn test_probability_surface_is_non_negative() {
        let grid = SurfaceGrid::new(30).unwrap();
        let mut set = SurfaceSet::new(grid);
        set.update_all(0.3, &state(4, 1, 7.5));
        let heights: Vec<f32> = set.get(Quantity::Probability).vertices().iter().map(|v| v.z).collect();
        assert!(heights.iter().all(|&z| z >= 0.0));
        assert!(heights.iter().any(|&z| z > 0.0));
    }

    #[test]
    fn test_flat_surface_normals_point_up() {
        let grid = SurfaceGrid::new(10).unwrap();
        let mut buffer = SurfaceBuffer::new(grid);
        buffer.recompute_normals();
        for n in buffer.normals() {
            assert!((*n - Vec3::Z).length() < 1e-6);
        }
    }

    #[test]
    fn test_normals_follow_heights() {
        let grid = SurfaceGrid::new(25).unwrap();
        let mut buffer = SurfaceBuffer::new(grid);
        update(&mut buffer, Quantity::Real, 0.3, &state(1, 1, 0.0));

        for n in buffer.normals() {
            assert!((n.length() - 1.0).abs() < 1e-5);
            assert!(n.z > 0.0);
        }

        // Ground state rises toward the centre, so the left half tilts toward -x
        let left = buffer.normals()[grid.index(5, 12)];
        let right = buffer.normals()[grid.index(19, 12)];
        assert!(left.x < 0.0);
        assert!(right.x > 0.0);
    }
}
