//! Fixed lattice of the sheet: rest positions, texture coordinates,
//! neighbour links and the triangle index list.
//!
//! Built once per viewport size and never mutated afterwards.

use glam::{Vec2, Vec3};

use crate::constants::{MAX_NODES, MIN_GRID_DIM};
use crate::error::MeshError;

/// Direction of a stored link. Each undirected edge is stored once, on the
/// node above or to the left of it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Link {
    Down,
    Right,
}

impl Link {
    /// Relaxation order.
    pub const ALL: [Link; 2] = [Link::Down, Link::Right];
}

/// Outgoing links of a node, `None` at the grid boundary.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct NodeLinks {
    pub down: Option<usize>,
    pub right: Option<usize>,
}

impl NodeLinks {
    #[inline]
    pub fn get(&self, link: Link) -> Option<usize> {
        match link {
            Link::Down => self.down,
            Link::Right => self.right,
        }
    }
}

/// Immutable lattice description shared by the stepper and the renderer.
#[derive(Clone, Debug, PartialEq)]
pub struct GridTopology {
    /// Nodes per row.
    pub width: usize,
    /// Nodes per column.
    pub height: usize,
    /// Target of the homing force, normalized into the unit square.
    pub rest_positions: Vec<Vec3>,
    pub tex_coords: Vec<Vec2>,
    pub links: Vec<NodeLinks>,
    /// Two triangles per cell, clockwise when y points up.
    pub indices: Vec<u16>,
    /// Rest distance between horizontal (x) and vertical (y) neighbours.
    pub spacing: Vec2,
}

impl GridTopology {
    /// Number of rows for a sheet `grid_width` nodes wide covering a
    /// `viewport_width` x `viewport_height` surface.
    pub fn vertical_resolution(grid_width: usize, viewport_width: u32, viewport_height: u32) -> usize {
        let rows = (grid_width as f64 * viewport_height as f64 / viewport_width as f64).round();
        (rows as usize).max(MIN_GRID_DIM)
    }

    /// Build a lattice matching the viewport aspect ratio.
    pub fn for_viewport(
        grid_width: usize,
        viewport_width: u32,
        viewport_height: u32,
    ) -> Result<Self, MeshError> {
        if viewport_width == 0 || viewport_height == 0 {
            return Err(MeshError::EmptyViewport {
                width: viewport_width,
                height: viewport_height,
            });
        }
        let height = Self::vertical_resolution(grid_width, viewport_width, viewport_height);
        Self::new(grid_width, height)
    }

    /// Build a `width` x `height` lattice.
    pub fn new(width: usize, height: usize) -> Result<Self, MeshError> {
        if width < MIN_GRID_DIM || height < MIN_GRID_DIM {
            return Err(MeshError::GridTooSmall { width, height });
        }
        if width.checked_mul(height).map_or(true, |n| n > MAX_NODES) {
            return Err(MeshError::TooManyNodes { width, height });
        }

        let count = width * height;
        let mut rest_positions = Vec::with_capacity(count);
        let mut tex_coords = Vec::with_capacity(count);
        let mut links = Vec::with_capacity(count);

        for y in 0..height {
            for x in 0..width {
                tex_coords.push(Vec2::new(
                    x as f32 / width as f32,
                    1.0 - y as f32 / height as f32,
                ));
                rest_positions.push(Vec3::new(
                    x as f32 / (width - 1) as f32,
                    y as f32 / (height - 1) as f32,
                    0.0,
                ));
                links.push(NodeLinks {
                    down: (y + 1 < height).then(|| (y + 1) * width + x),
                    right: (x + 1 < width).then(|| y * width + x + 1),
                });
            }
        }

        let mut indices = Vec::with_capacity((width - 1) * (height - 1) * 6);
        for y in 0..height - 1 {
            for x in 0..width - 1 {
                let p1 = (y * width + x) as u16;
                let p2 = (y * width + x + 1) as u16;
                let p3 = ((y + 1) * width + x) as u16;
                let p4 = ((y + 1) * width + x + 1) as u16;

                indices.extend_from_slice(&[p1, p3, p2, p2, p3, p4]);
            }
        }

        Ok(Self {
            width,
            height,
            rest_positions,
            tex_coords,
            links,
            indices,
            spacing: Vec2::new(1.0 / (width - 1) as f32, 1.0 / (height - 1) as f32),
        })
    }

    #[inline]
    pub fn node_count(&self) -> usize {
        self.width * self.height
    }

    /// Flat index of an in-bounds grid coordinate.
    #[inline]
    pub fn idx(&self, x: usize, y: usize) -> usize {
        debug_assert!(x < self.width && y < self.height);
        y * self.width + x
    }

    /// Flat index of a possibly out-of-bounds coordinate.
    #[inline]
    pub fn index(&self, x: i32, y: i32) -> Option<usize> {
        if x < 0 || y < 0 || x as usize >= self.width || y as usize >= self.height {
            return None;
        }
        Some(y as usize * self.width + x as usize)
    }

    /// Grid coordinate of a flat index.
    #[inline]
    pub fn coords(&self, index: usize) -> (usize, usize) {
        (index % self.width, index / self.width)
    }

    /// Rest length of a link.
    #[inline]
    pub fn rest_length(&self, link: Link) -> f32 {
        match link {
            Link::Down => self.spacing.y,
            Link::Right => self.spacing.x,
        }
    }

    /// Number of stored (undirected) links.
    pub fn link_count(&self) -> usize {
        self.links
            .iter()
            .map(|l| l.down.is_some() as usize + l.right.is_some() as usize)
            .sum()
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Link list as line segment index pairs, Down before Right per node.
    pub fn line_indices(&self) -> Vec<u16> {
        let mut lines = Vec::with_capacity(self.link_count() * 2);
        for (i, node) in self.links.iter().enumerate() {
            for link in Link::ALL {
                if let Some(j) = node.get(link) {
                    lines.push(i as u16);
                    lines.push(j as u16);
                }
            }
        }
        lines
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_small_grid_indexing() {
        let grid = GridTopology::new(4, 3).unwrap();
        assert_eq!(grid.idx(2, 1), 6);
        assert_eq!(grid.links[6].right, Some(7));
        assert_eq!(grid.links[6].down, Some(10));
        assert_eq!(grid.coords(6), (2, 1));
    }

    #[test]
    fn test_signed_index_bounds() {
        let grid = GridTopology::new(4, 3).unwrap();
        assert_eq!(grid.index(-1, 0), None);
        assert_eq!(grid.index(0, -1), None);
        assert_eq!(grid.index(4, 0), None);
        assert_eq!(grid.index(0, 3), None);
        assert_eq!(grid.index(3, 2), Some(11));
    }

    #[test]
    fn test_rest_positions_span_unit_square() {
        let grid = GridTopology::new(5, 4).unwrap();
        let first = grid.rest_positions[0];
        let last = grid.rest_positions[grid.node_count() - 1];
        assert_eq!(first, Vec3::ZERO);
        assert!((last - Vec3::new(1.0, 1.0, 0.0)).length() < 1e-6);
        assert!((grid.spacing.x - 0.25).abs() < 1e-6);
        assert!((grid.spacing.y - 1.0 / 3.0).abs() < 1e-6);
    }

    #[test]
    fn test_tex_coords_flip_vertically() {
        let grid = GridTopology::new(4, 4).unwrap();
        assert_eq!(grid.tex_coords[0], Vec2::new(0.0, 1.0));
        assert_eq!(grid.tex_coords[grid.idx(2, 2)], Vec2::new(0.5, 0.5));
    }

    #[test]
    fn test_first_cell_winding() {
        let grid = GridTopology::new(3, 3).unwrap();
        assert_eq!(&grid.indices[..6], &[0, 3, 1, 1, 3, 4]);
    }

    #[test]
    fn test_vertical_resolution_rounds() {
        assert_eq!(GridTopology::vertical_resolution(60, 800, 600), 45);
        // 60 * 601/800 = 45.075
        assert_eq!(GridTopology::vertical_resolution(60, 800, 601), 45);
        // 60 * 610/800 = 45.75
        assert_eq!(GridTopology::vertical_resolution(60, 800, 610), 46);
        // Very wide viewports still get two rows.
        assert_eq!(GridTopology::vertical_resolution(60, 10_000, 10), 2);
    }

    #[test]
    fn test_rejects_degenerate_inputs() {
        assert_eq!(
            GridTopology::for_viewport(60, 0, 600),
            Err(MeshError::EmptyViewport { width: 0, height: 600 })
        );
        assert_eq!(
            GridTopology::new(1, 5),
            Err(MeshError::GridTooSmall { width: 1, height: 5 })
        );
        assert!(matches!(
            GridTopology::for_viewport(60, 100, 2000),
            Err(MeshError::TooManyNodes { width: 60, height: 1200 })
        ));
    }

    #[test]
    fn test_largest_grid_fits_u16() {
        let grid = GridTopology::new(256, 256).unwrap();
        assert_eq!(grid.indices.iter().copied().max(), Some(u16::MAX));
    }

    #[test]
    fn test_line_indices_follow_links() {
        let grid = GridTopology::new(3, 2).unwrap();
        let lines = grid.line_indices();
        assert_eq!(lines.len(), grid.link_count() * 2);
        // Node 0 links down to 3, then right to 1.
        assert_eq!(&lines[..4], &[0, 3, 0, 1]);
        for pair in lines.chunks(2) {
            let (ax, ay) = grid.coords(pair[0] as usize);
            let (bx, by) = grid.coords(pair[1] as usize);
            assert_eq!(bx - ax + by - ay, 1);
        }
    }

    #[test]
    fn test_huge_dimensions_are_rejected_without_overflow() {
        assert!(matches!(
            GridTopology::new(usize::MAX / 2, 3),
            Err(MeshError::TooManyNodes { .. })
        ));
        assert!(matches!(
            GridTopology::for_viewport(usize::MAX - 1, 800, 600),
            Err(MeshError::TooManyNodes { .. })
        ));
    }
}
