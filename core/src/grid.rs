//! Tile grid geometry shared by the simulation and the renderer.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Side length of a single square tile expressed in world units.
pub const TILE_SIZE: f32 = 64.0;

/// Continuous position expressed in world units.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct WorldPoint {
    /// Horizontal coordinate, growing toward increasing columns.
    pub x: f32,
    /// Vertical coordinate, growing toward increasing rows.
    pub y: f32,
}

impl WorldPoint {
    /// Creates a new world-space point.
    #[must_use]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Euclidean distance between two points.
    #[must_use]
    pub fn distance_to(self, other: WorldPoint) -> f32 {
        (other.x - self.x).hypot(other.y - self.y)
    }

    /// Heading in radians from `self` toward `other`.
    #[must_use]
    pub fn angle_to(self, other: WorldPoint) -> f32 {
        (other.y - self.y).atan2(other.x - self.x)
    }

    /// Returns the point displaced by the provided deltas.
    #[must_use]
    pub fn offset(self, dx: f32, dy: f32) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }

    /// Linear interpolation toward `other`; `t = 0` yields `self`.
    #[must_use]
    pub fn lerp(self, other: WorldPoint, t: f32) -> Self {
        Self::new(
            self.x + (other.x - self.x) * t,
            self.y + (other.y - self.y) * t,
        )
    }
}

/// Position expressed in tile units, as written in level configuration.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct TilePoint {
    /// Horizontal coordinate measured in tiles.
    pub x: f32,
    /// Vertical coordinate measured in tiles.
    pub y: f32,
}

impl TilePoint {
    /// Creates a new tile-space point.
    #[must_use]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Converts the point into world units using [`TILE_SIZE`].
    #[must_use]
    pub fn to_world(self) -> WorldPoint {
        WorldPoint::new(self.x * TILE_SIZE, self.y * TILE_SIZE)
    }
}

/// Content of a single grid cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CellCode {
    /// Walkable floor; rays pass through.
    Empty,
    /// Regular wall.
    Wall,
    /// Wall segment housing the data server, drawn with its own color.
    ServerWall,
}

impl CellCode {
    /// Decodes the integer stored in level configuration.
    #[must_use]
    pub const fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(Self::Empty),
            1 => Some(Self::Wall),
            2 => Some(Self::ServerWall),
            _ => None,
        }
    }

    /// Integer representation used by level configuration.
    #[must_use]
    pub const fn code(self) -> u8 {
        match self {
            Self::Empty => 0,
            Self::Wall => 1,
            Self::ServerWall => 2,
        }
    }

    /// Reports whether the cell blocks movement and rays.
    #[must_use]
    pub const fn is_solid(self) -> bool {
        !matches!(self, Self::Empty)
    }
}

/// Reasons a cell matrix is rejected as a level map.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum GridError {
    /// The matrix has no rows or its first row has no cells.
    #[error("grid map must contain at least one cell")]
    Empty,
    /// A row length differs from the first row.
    #[error("row {row} has {found} cells, expected {expected}")]
    Ragged {
        /// Zero-based index of the offending row.
        row: usize,
        /// Cell count of the first row.
        expected: usize,
        /// Cell count of the offending row.
        found: usize,
    },
    /// A cell holds a code outside the catalog.
    #[error("cell ({column}, {row}) holds unknown code {code}")]
    UnknownCode {
        /// Column of the offending cell.
        column: usize,
        /// Row of the offending cell.
        row: usize,
        /// Raw code that failed to decode.
        code: u8,
    },
    /// A border cell is walkable, so rays could escape the map.
    #[error("boundary cell ({column}, {row}) is not a wall")]
    OpenBoundary {
        /// Column of the open border cell.
        column: usize,
        /// Row of the open border cell.
        row: usize,
    },
}

/// Static rectangular tile grid that defines a level's geometry.
///
/// Construction guarantees a closed boundary of solid cells, so any ray cast
/// from inside the map terminates on a wall.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Vec<u8>>", into = "Vec<Vec<u8>>")]
pub struct GridMap {
    columns: usize,
    rows: usize,
    cells: Vec<CellCode>,
}

impl GridMap {
    /// Builds a grid map from rows of integer cell codes.
    pub fn from_rows(rows: Vec<Vec<u8>>) -> Result<Self, GridError> {
        let row_count = rows.len();
        let columns = rows.first().map_or(0, Vec::len);
        if row_count == 0 || columns == 0 {
            return Err(GridError::Empty);
        }

        let mut cells = Vec::with_capacity(row_count * columns);
        for (row_index, row) in rows.iter().enumerate() {
            if row.len() != columns {
                return Err(GridError::Ragged {
                    row: row_index,
                    expected: columns,
                    found: row.len(),
                });
            }
            for (column_index, &code) in row.iter().enumerate() {
                let cell = CellCode::from_code(code).ok_or(GridError::UnknownCode {
                    column: column_index,
                    row: row_index,
                    code,
                })?;
                let on_border = row_index == 0
                    || column_index == 0
                    || row_index + 1 == row_count
                    || column_index + 1 == columns;
                if on_border && !cell.is_solid() {
                    return Err(GridError::OpenBoundary {
                        column: column_index,
                        row: row_index,
                    });
                }
                cells.push(cell);
            }
        }

        Ok(Self {
            columns,
            rows: row_count,
            cells,
        })
    }

    /// Number of cell columns.
    #[must_use]
    pub const fn columns(&self) -> usize {
        self.columns
    }

    /// Number of cell rows.
    #[must_use]
    pub const fn rows(&self) -> usize {
        self.rows
    }

    /// Total width of the map in world units.
    #[must_use]
    pub fn width(&self) -> f32 {
        self.columns as f32 * TILE_SIZE
    }

    /// Total height of the map in world units.
    #[must_use]
    pub fn height(&self) -> f32 {
        self.rows as f32 * TILE_SIZE
    }

    /// Returns the cell at the provided integer coordinates, if inside the map.
    #[must_use]
    pub fn cell(&self, column: i64, row: i64) -> Option<CellCode> {
        if column < 0 || row < 0 {
            return None;
        }
        let column = usize::try_from(column).ok()?;
        let row = usize::try_from(row).ok()?;
        if column >= self.columns || row >= self.rows {
            return None;
        }
        self.cells.get(row * self.columns + column).copied()
    }

    /// Returns the cell containing the world-space point, if inside the map.
    #[must_use]
    pub fn cell_at(&self, point: WorldPoint) -> Option<CellCode> {
        let column = (point.x / TILE_SIZE).floor();
        let row = (point.y / TILE_SIZE).floor();
        if !column.is_finite() || !row.is_finite() {
            return None;
        }
        self.cell(column as i64, row as i64)
    }

    /// Reports whether the point lies in a solid cell. Points outside the map
    /// count as walls.
    #[must_use]
    pub fn is_wall(&self, point: WorldPoint) -> bool {
        self.cell_at(point).map_or(true, CellCode::is_solid)
    }

    /// Iterates over every cell as `(column, row, code)` in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, usize, CellCode)> + '_ {
        let columns = self.columns;
        self.cells
            .iter()
            .enumerate()
            .map(move |(index, &cell)| (index % columns, index / columns, cell))
    }
}

impl TryFrom<Vec<Vec<u8>>> for GridMap {
    type Error = GridError;

    fn try_from(rows: Vec<Vec<u8>>) -> Result<Self, Self::Error> {
        Self::from_rows(rows)
    }
}

impl From<GridMap> for Vec<Vec<u8>> {
    fn from(map: GridMap) -> Self {
        map.cells
            .chunks(map.columns)
            .map(|row| row.iter().map(|cell| cell.code()).collect())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ring(columns: usize, rows: usize) -> Vec<Vec<u8>> {
        (0..rows)
            .map(|row| {
                (0..columns)
                    .map(|column| {
                        let border =
                            row == 0 || column == 0 || row + 1 == rows || column + 1 == columns;
                        u8::from(border)
                    })
                    .collect()
            })
            .collect()
    }

    #[test]
    fn accepts_closed_rectangular_map() {
        let map = GridMap::from_rows(ring(5, 4)).expect("closed ring is valid");

        assert_eq!(map.columns(), 5);
        assert_eq!(map.rows(), 4);
        assert_eq!(map.cell(2, 1), Some(CellCode::Empty));
        assert_eq!(map.cell(0, 0), Some(CellCode::Wall));
    }

    #[test]
    fn rejects_ragged_rows() {
        let mut rows = ring(4, 4);
        rows[2].push(1);

        assert_eq!(
            GridMap::from_rows(rows),
            Err(GridError::Ragged {
                row: 2,
                expected: 4,
                found: 5
            })
        );
    }

    #[test]
    fn rejects_unknown_codes_and_open_borders() {
        let mut unknown = ring(4, 4);
        unknown[1][1] = 7;
        assert!(matches!(
            GridMap::from_rows(unknown),
            Err(GridError::UnknownCode { code: 7, .. })
        ));

        let mut open = ring(4, 4);
        open[0][2] = 0;
        assert_eq!(
            GridMap::from_rows(open),
            Err(GridError::OpenBoundary { column: 2, row: 0 })
        );

        assert_eq!(GridMap::from_rows(Vec::new()), Err(GridError::Empty));
    }

    #[test]
    fn out_of_bounds_points_are_walls() {
        let map = GridMap::from_rows(ring(4, 4)).expect("valid map");

        assert!(map.is_wall(WorldPoint::new(-1.0, 96.0)));
        assert!(map.is_wall(WorldPoint::new(96.0, 10_000.0)));
        assert!(map.is_wall(WorldPoint::new(f32::NAN, 96.0)));
        assert!(!map.is_wall(WorldPoint::new(96.0, 96.0)));
    }

    #[test]
    fn deserializes_from_integer_matrix() {
        #[derive(Deserialize)]
        struct Holder {
            map: GridMap,
        }

        let holder: Holder = toml::from_str("map = [[1,1,1],[1,2,1],[1,1,1]]").expect("parse");
        assert_eq!(holder.map.cell(1, 1), Some(CellCode::ServerWall));

        let rejected = toml::from_str::<Holder>("map = [[1,1],[1]]");
        assert!(rejected.is_err());
    }
}
