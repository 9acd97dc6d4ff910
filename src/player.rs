use crate::map::Map;

/// Total horizontal spread of the rays, 60 degrees.
pub const FIELD_OF_VIEW: f32 = std::f32::consts::FRAC_PI_3;

pub struct Player {
    pub x: f32,     // map-cell units, not snapped to the grid
    pub y: f32,     // map-cell units
    pub angle: f32, // radians, clockwise; 0 faces +y
    pub fov: f32,   // radians
    pub angular_speed: f32, // rad/s, set by input every frame
    pub forward_speed: f32, // cells/s, negative walks backwards
}

impl Player {
    pub fn new(x: f32, y: f32, angle: f32) -> Self {
        Self {
            x,
            y,
            angle,
            fov: FIELD_OF_VIEW,
            angular_speed: 0.0,
            forward_speed: 0.0,
        }
    }

    /// Unit vector the player is facing, `(sin, cos)` of the angle.
    #[inline]
    pub fn facing(&self) -> [f32; 2] {
        [self.angle.sin(), self.angle.cos()]
    }

    /// Turn, walk, then undo the walk if it ended inside a wall.
    ///
    /// The collision check only samples the destination cell, so a step
    /// longer than a cell can skip over a wall.
    pub fn update(&mut self, map: &Map, dt: f32) {
        self.angle += self.angular_speed * dt;

        let (prev_x, prev_y) = (self.x, self.y);
        let [s, c] = self.facing();
        self.x += s * self.forward_speed * dt;
        self.y += c * self.forward_speed * dt;

        if map.is_wall(self.x.floor() as i32, self.y.floor() as i32) {
            // Restore rather than subtract so the rollback is exact.
            self.x = prev_x;
            self.y = prev_y;
        }
    }
}
