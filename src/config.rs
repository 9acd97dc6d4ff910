use thiserror::Error;

pub const SCREEN_WIDTH: u32 = 1024;
pub const SCREEN_HEIGHT: u32 = 720;
pub const NUM_COLUMNS: u32 = 512;
pub const NUM_ROWS: u32 = 180;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} must be non-zero")]
    Zero(&'static str),

    #[error("{dim} of {pixels}px cannot fit {cells} cells")]
    CellTooSmall {
        dim: &'static str,
        pixels: u32,
        cells: u32,
    },
}

/// Display geometry, fixed once the window is created.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Config {
    pub screen_width: u32,
    pub screen_height: u32,
    pub num_columns: u32, // one ray per column
    pub num_rows: u32,
    pub cell_width_x: u32, // pixels per column
    pub cell_width_y: u32, // pixels per row
}

impl Config {
    pub fn new(
        screen_width: u32,
        screen_height: u32,
        num_columns: u32,
        num_rows: u32,
    ) -> Result<Self, ConfigError> {
        for (name, value) in [
            ("screen width", screen_width),
            ("screen height", screen_height),
            ("column count", num_columns),
            ("row count", num_rows),
        ] {
            if value == 0 {
                return Err(ConfigError::Zero(name));
            }
        }

        let cell_width_x = screen_width / num_columns;
        if cell_width_x == 0 {
            return Err(ConfigError::CellTooSmall {
                dim: "screen width",
                pixels: screen_width,
                cells: num_columns,
            });
        }
        let cell_width_y = screen_height / num_rows;
        if cell_width_y == 0 {
            return Err(ConfigError::CellTooSmall {
                dim: "screen height",
                pixels: screen_height,
                cells: num_rows,
            });
        }

        Ok(Self {
            screen_width,
            screen_height,
            num_columns,
            num_rows,
            cell_width_x,
            cell_width_y,
        })
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            screen_width: SCREEN_WIDTH,
            screen_height: SCREEN_HEIGHT,
            num_columns: NUM_COLUMNS,
            num_rows: NUM_ROWS,
            cell_width_x: SCREEN_WIDTH / NUM_COLUMNS,
            cell_width_y: SCREEN_HEIGHT / NUM_ROWS,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_matches_validated_reference() {
        let cfg = Config::new(SCREEN_WIDTH, SCREEN_HEIGHT, NUM_COLUMNS, NUM_ROWS).unwrap();
        assert_eq!(cfg, Config::default());
        assert_eq!(cfg.cell_width_x, 2);
        assert_eq!(cfg.cell_width_y, 4);
    }

    #[test]
    fn rejects_zero_dimensions() {
        assert_eq!(
            Config::new(1024, 720, 0, 180),
            Err(ConfigError::Zero("column count"))
        );
        assert_eq!(
            Config::new(0, 720, 512, 180),
            Err(ConfigError::Zero("screen width"))
        );
    }

    #[test]
    fn rejects_sub_pixel_cells() {
        assert!(matches!(
            Config::new(100, 720, 512, 180),
            Err(ConfigError::CellTooSmall { dim: "screen width", .. })
        ));
        assert!(matches!(
            Config::new(1024, 90, 512, 180),
            Err(ConfigError::CellTooSmall { dim: "screen height", .. })
        ));
    }
}
