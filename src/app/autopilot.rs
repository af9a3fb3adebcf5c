use crate::world_core::avatar::{Avatar, InputState};
use crate::world_core::config::AvatarConfig;
use crate::world_core::physics::Contact;

/// Scripted input for unattended runs: keep heading right, hop over whatever
/// blocks the way and spend the double jump on the way down.
pub struct Autopilot {
    jump_held: bool,
    resting: bool,
    jump_cost: f32,
    resume_energy: f32,
}

impl Autopilot {
    pub fn new(config: &AvatarConfig) -> Self {
        Self {
            jump_held: false,
            resting: false,
            jump_cost: config.jump_cost,
            resume_energy: config.double_jump_cost.max(config.jump_cost),
        }
    }

    pub fn next_input(&mut self, avatar: &Avatar, contact: Contact) -> InputState {
        // Running drains energy faster than idling restores it, so stop at a
        // wall until there is enough for a jump plus a double jump.
        if contact.blocked_horizontally && avatar.energy() < self.jump_cost {
            self.resting = true;
        }
        if self.resting && avatar.energy() >= self.resume_energy {
            self.resting = false;
        }

        let wants_jump = (contact.blocked_horizontally && avatar.is_on_ground())
            || (avatar.is_falling() && !avatar.double_jump_used());
        let jump = wants_jump && !self.jump_held && !self.resting;
        self.jump_held = jump;

        InputState {
            left: false,
            right: !self.resting,
            jump,
        }
    }
}
