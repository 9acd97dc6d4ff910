use rayon::iter::{IntoParallelIterator, ParallelIterator};

use crate::{config::Config, map::Map, player::Player};

pub const RAY_STEP: f32 = 0.1; // march increment, map units
pub const MAX_RAY_DISTANCE: f32 = 16.0;
/// Max angle (radians) between a ray and a cell corner for the column to be
/// drawn as a wall edge.
pub const BOUNDARY_TOLERANCE: f32 = 0.001;

const WALL_BASE_SHADE: f32 = 255.0;
const FLOOR_BASE_SHADE: f32 = 128.0;

#[derive(Debug, Clone, Copy)]
enum Bound {
    AtMost(f64),
    Below(f64),
}

impl Bound {
    #[inline]
    fn contains(self, v: f32) -> bool {
        let v = f64::from(v);
        match self {
            Bound::AtMost(t) => v <= t,
            Bound::Below(t) => v < t,
        }
    }
}

/// Scanned in order, first match wins. Only the nearest band is inclusive.
const WALL_BANDS: [(Bound, f32); 7] = [
    (Bound::AtMost((MAX_RAY_DISTANCE / 8.0) as f64), 0.9),
    (Bound::Below((MAX_RAY_DISTANCE / 7.0) as f64), 0.8),
    (Bound::Below((MAX_RAY_DISTANCE / 6.0) as f64), 0.7),
    (Bound::Below((MAX_RAY_DISTANCE / 5.0) as f64), 0.6),
    (Bound::Below((MAX_RAY_DISTANCE / 4.0) as f64), 0.5),
    (Bound::Below((MAX_RAY_DISTANCE / 3.0) as f64), 0.4),
    (Bound::Below((MAX_RAY_DISTANCE / 2.0) as f64), 0.3),
];
const WALL_FAR_FACTOR: f32 = 0.2;

/// Keyed on how far a floor row is from the bottom of the screen, 0 at the
/// bottom and 1 at the horizon.
const FLOOR_BANDS: [(Bound, f32); 9] = [
    (Bound::Below(0.1), 0.9),
    (Bound::Below(0.2), 0.8),
    (Bound::Below(0.3), 0.7),
    (Bound::Below(0.4), 0.6),
    (Bound::Below(0.5), 0.5),
    (Bound::Below(0.6), 0.4),
    (Bound::Below(0.7), 0.3),
    (Bound::Below(0.8), 0.2),
    (Bound::Below(0.9), 0.1),
];
const FLOOR_FAR_FACTOR: f32 = 0.0;

#[inline]
fn band_factor(value: f32, bands: &[(Bound, f32)], fallback: f32) -> f32 {
    bands
        .iter()
        .find(|(bound, _)| bound.contains(value))
        .map_or(fallback, |&(_, factor)| factor)
}

/// Grey level of a wall slice. Edge columns are drawn black.
pub fn wall_shade(distance: f32, boundary: bool) -> u8 {
    if boundary {
        return 0;
    }
    (WALL_BASE_SHADE * band_factor(distance, &WALL_BANDS, WALL_FAR_FACTOR)) as u8
}

/// Blue level of a floor row; brightest at the bottom of the screen.
pub fn floor_shade(row: i32, num_rows: u32) -> u8 {
    let half = num_rows as f32 / 2.0;
    let fraction = 1.0 - (row as f32 - half) / half;
    (FLOOR_BASE_SHADE * band_factor(fraction, &FLOOR_BANDS, FLOOR_FAR_FACTOR)) as u8
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RayHit {
    pub distance: f32,
    pub boundary: bool, // ray passed within tolerance of a corner of the hit cell
}

impl RayHit {
    const MISS: RayHit = RayHit {
        distance: MAX_RAY_DISTANCE,
        boundary: false,
    };
}

#[inline]
pub fn ray_angle(player: &Player, column: u32, num_columns: u32) -> f32 {
    (player.angle - player.fov / 2.0) + (column as f32 / num_columns as f32) * player.fov
}

/// March from `origin` along `angle` until a wall, the map edge, or
/// `MAX_RAY_DISTANCE`. Edges and misses report exactly `MAX_RAY_DISTANCE`.
///
/// The distance is a running sum of `RAY_STEP`s and keeps its f32 rounding:
/// twenty steps come out slightly over 2.0.
pub fn cast_ray(map: &Map, origin: [f32; 2], angle: f32) -> RayHit {
    let dir = [angle.sin(), angle.cos()];

    let mut distance = 0.0f32;
    while distance < MAX_RAY_DISTANCE {
        distance += RAY_STEP;

        let col = (origin[0] + dir[0] * distance).floor() as i32;
        let row = (origin[1] + dir[1] * distance).floor() as i32;

        if !map.in_bounds(col, row) {
            return RayHit::MISS;
        }
        if map.is_wall(col, row) {
            return RayHit {
                distance,
                boundary: near_cell_corner(origin, dir, col, row),
            };
        }
    }
    RayHit::MISS
}

/// True when one of the two corners of cell `(col, row)` nearest the origin
/// lies almost exactly along `dir`.
fn near_cell_corner(origin: [f32; 2], dir: [f32; 2], col: i32, row: i32) -> bool {
    // (distance, cos of angle to ray)
    let mut corners = [(0.0f32, 0.0f32); 4];
    let offsets = [(0, 0), (0, 1), (1, 0), (1, 1)];
    for (corner, (dx, dy)) in corners.iter_mut().zip(offsets) {
        let vx = (col + dx) as f32 - origin[0];
        let vy = (row + dy) as f32 - origin[1];
        let d = (vx * vx + vy * vy).sqrt();
        let dot = (dir[0] * vx + dir[1] * vy) / d;
        *corner = (d, dot);
    }
    corners.sort_by(|a, b| a.0.total_cmp(&b.0));

    corners[..2]
        .iter()
        .any(|&(_, dot)| dot.clamp(-1.0, 1.0).acos() < BOUNDARY_TOLERANCE)
}

/// Screen rows where the wall slice starts and ends for a given distance.
/// `ceiling` can be negative for walls close enough to overflow the screen.
#[inline]
pub fn column_extent(distance: f32, num_rows: u32) -> (i32, i32) {
    let rows = num_rows as f32;
    let ceiling = (rows / 2.0 - rows / distance) as i32;
    (ceiling, num_rows as i32 - ceiling)
}

/// One screen column worth of ray results.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Column {
    pub hit: RayHit,
    pub ceiling: i32,
    pub floor: i32,
    pub wall_shade: u8,
}

impl Column {
    pub fn cast(map: &Map, player: &Player, x: u32, cfg: &Config) -> Self {
        let angle = ray_angle(player, x, cfg.num_columns);
        let hit = cast_ray(map, [player.x, player.y], angle);
        let (ceiling, floor) = column_extent(hit.distance, cfg.num_rows);
        Self {
            hit,
            ceiling,
            floor,
            wall_shade: wall_shade(hit.distance, hit.boundary),
        }
    }

    /// RGB of `row`: sky above the ceiling, wall down to and including the
    /// floor line, blue floor below.
    pub fn row_color(&self, row: i32, num_rows: u32) -> [u8; 3] {
        if row < self.ceiling {
            [0, 0, 0]
        } else if row <= self.floor {
            [self.wall_shade; 3]
        } else {
            [0, 0, floor_shade(row, num_rows)]
        }
    }
}

/// Cast every column of the frame. Columns are independent, so they run on
/// the rayon pool; the result is indexed by screen column.
pub fn cast_columns(map: &Map, player: &Player, cfg: &Config) -> Vec<Column> {
    (0..cfg.num_columns)
        .into_par_iter()
        .map(|x| Column::cast(map, player, x, cfg))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::{FRAC_PI_4, PI};

    fn open_map(size: usize) -> Map {
        let row = ".".repeat(size);
        Map::from_rows(&vec![row; size]).unwrap()
    }

    /// 10x10 with a full wall along row 5.
    fn wall_row_map() -> Map {
        let mut rows = vec![".".repeat(10); 10];
        rows[5] = "#".repeat(10);
        Map::from_rows(&rows).unwrap()
    }

    #[test]
    fn hits_wall_straight_ahead() {
        let hit = cast_ray(&wall_row_map(), [0.5, 0.5], 0.0);
        assert!((hit.distance - 4.5).abs() <= RAY_STEP + 1e-4, "{hit:?}");
        assert!(!hit.boundary);
    }

    #[test]
    fn distance_accumulates_step_by_step() {
        let map = Map::from_rows(&["....", "....", "####", "...."]).unwrap();
        // twentieth step lands in the wall row
        let hit = cast_ray(&map, [1.5, 0.05], 0.0);
        assert!(hit.distance > MAX_RAY_DISTANCE / 8.0, "{hit:?}");
        assert!((hit.distance - 2.0).abs() < 1e-4);
        // just past the inclusive first band
        assert_eq!(wall_shade(hit.distance, hit.boundary), 204);
    }

    #[test]
    fn empty_map_caps_at_max_distance() {
        let hit = cast_ray(&open_map(40), [20.0, 20.0], 0.3);
        assert_eq!(hit.distance, MAX_RAY_DISTANCE);
        assert!(!hit.boundary);
    }

    #[test]
    fn leaving_the_map_caps_at_max_distance() {
        let map = open_map(16);
        assert_eq!(cast_ray(&map, [8.0, 8.0], 1.0).distance, MAX_RAY_DISTANCE);
        // facing -y from the first row leaves on the first step
        let hit = cast_ray(&map, [0.5, 0.05], PI);
        assert_eq!(hit, RayHit::MISS);
    }

    #[test]
    fn corner_strike_is_boundary() {
        let mut rows = vec![".".repeat(10); 10];
        rows[5].replace_range(5..6, "#");
        let map = Map::from_rows(&rows).unwrap();

        let hit = cast_ray(&map, [0.5, 0.5], FRAC_PI_4);
        assert!(hit.boundary, "{hit:?}");
        assert!(hit.distance < MAX_RAY_DISTANCE);
        assert_eq!(wall_shade(hit.distance, hit.boundary), 0);
    }

    #[test]
    fn wall_bands_keep_their_comparisons() {
        let max = MAX_RAY_DISTANCE;
        // first band is inclusive
        assert_eq!(wall_shade(max / 8.0, false), 229);
        assert_eq!(wall_shade(0.1, false), 229);
        // the rest are exclusive
        assert_eq!(wall_shade(max / 7.0, false), 178);
        assert_eq!(wall_shade(max / 7.0 - 0.01, false), 204);
        assert_eq!(wall_shade(max / 2.0, false), 51);
        assert_eq!(wall_shade(max / 2.0 - 0.01, false), 76);
        assert_eq!(wall_shade(max, false), 51);
    }

    #[test]
    fn boundary_overrides_distance() {
        for d in [0.1, 2.0, 5.0, MAX_RAY_DISTANCE] {
            assert_eq!(wall_shade(d, true), 0);
        }
    }

    #[test]
    fn floor_brightens_toward_bottom() {
        assert_eq!(floor_shade(179, 180), 115);
        assert_eq!(floor_shade(91, 180), 0);
        // fraction lands on 0.9 and still counts as below it
        assert_eq!(floor_shade(99, 180), 12);
        let mut last = 0;
        for row in 91..180 {
            let s = floor_shade(row, 180);
            assert!(s >= last);
            last = s;
        }
    }

    #[test]
    fn extent_is_symmetric() {
        let mut d = RAY_STEP;
        while d <= MAX_RAY_DISTANCE {
            let (ceiling, floor) = column_extent(d, 180);
            assert_eq!(ceiling + floor, 180);
            d += 0.37;
        }
        assert_eq!(column_extent(MAX_RAY_DISTANCE, 180), (78, 102));
        // close walls run off both ends of the screen
        assert_eq!(column_extent(1.0, 180), (-90, 270));
    }

    #[test]
    fn rays_sweep_left_to_right() {
        let p = Player::new(0.0, 0.0, 1.0);
        assert!((ray_angle(&p, 0, 512) - (1.0 - p.fov / 2.0)).abs() < 1e-6);
        assert!((ray_angle(&p, 256, 512) - 1.0).abs() < 1e-6);
        assert!(ray_angle(&p, 511, 512) < 1.0 + p.fov / 2.0);
    }

    #[test]
    fn row_colors_split_sky_wall_floor() {
        let col = Column {
            hit: RayHit {
                distance: 4.0,
                boundary: false,
            },
            ceiling: 45,
            floor: 135,
            wall_shade: 127,
        };
        assert_eq!(col.row_color(0, 180), [0, 0, 0]);
        assert_eq!(col.row_color(44, 180), [0, 0, 0]);
        assert_eq!(col.row_color(45, 180), [127; 3]);
        assert_eq!(col.row_color(135, 180), [127; 3]);
        assert_eq!(col.row_color(136, 180), [0, 0, floor_shade(136, 180)]);
    }

    #[test]
    fn parallel_columns_match_sequential() {
        let map = Map::reference();
        let player = Player::new(8.0, 8.0, 0.7);
        let cfg = Config::default();
        let par = cast_columns(&map, &player, &cfg);
        let seq: Vec<Column> = (0..cfg.num_columns)
            .map(|x| Column::cast(&map, &player, x, &cfg))
            .collect();
        assert_eq!(par.len(), cfg.num_columns as usize);
        assert_eq!(par, seq);
    }
}
