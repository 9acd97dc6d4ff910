use crate::player::Player;

pub const TURN_SPEED: f32 = 2.0; // rad/s
pub const MOVE_SPEED: f32 = 5.0; // cells/s

/// Which logical actions are held down this frame.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct InputState {
    pub turn_left: bool,
    pub turn_right: bool,
    pub move_forward: bool,
    pub move_backward: bool,
}

impl InputState {
    /// Overwrite the player's speeds. When opposite keys are both held,
    /// turn-right and move-backward win.
    pub fn apply(&self, player: &mut Player) {
        player.angular_speed = 0.0;
        player.forward_speed = 0.0;

        if self.turn_left {
            player.angular_speed = -TURN_SPEED;
        }
        if self.turn_right {
            player.angular_speed = TURN_SPEED;
        }
        if self.move_forward {
            player.forward_speed = MOVE_SPEED;
        }
        if self.move_backward {
            player.forward_speed = -MOVE_SPEED;
        }
    }
}
