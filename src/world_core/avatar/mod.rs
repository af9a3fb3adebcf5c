mod energy;
mod state;

pub use self::energy::{EnergyListener, EnergyMeter};
pub use self::state::{next_state, AnimationKind, AvatarState, InputState};

use glam::Vec2;

use crate::world_core::config::AvatarConfig;
use crate::world_core::physics::{resolve_collisions, Aabb, Body, Contact};

pub struct Avatar {
    body: Body,
    state: AvatarState,
    animation: AnimationKind,
    energy: EnergyMeter,
    facing_left: bool,
    double_jump_used: bool,
    jump_held_last_tick: bool,
    config: AvatarConfig,
}

impl Avatar {
    pub fn new(top_left: Vec2, config: AvatarConfig) -> Self {
        let state = AvatarState::Idle;
        Self {
            body: Body::new(top_left, Vec2::splat(config.size)),
            state,
            animation: state.on_enter(),
            energy: EnergyMeter::new(config.max_energy),
            facing_left: false,
            double_jump_used: false,
            jump_held_last_tick: false,
            config,
        }
    }

    /// Places the avatar so its feet rest on `ground_y` with its left edge at `x`.
    pub fn spawn_on_ground(x: f32, ground_y: f32, config: AvatarConfig) -> Self {
        let top_left = Vec2::new(x, ground_y - config.size);
        Self::new(top_left, config)
    }

    /// Runs the state machine for one tick, then integrates gravity and velocity.
    pub fn update(&mut self, input: &InputState, dt: f32) {
        if self.is_on_ground() {
            self.double_jump_used = false;
        }

        let next = next_state(
            self.is_on_ground(),
            input,
            self.energy.value(),
            self.config.run_threshold,
        );
        if next != self.state {
            log::debug!("avatar {:?} -> {:?}", self.state, next);
            self.state.on_exit();
            self.state = next;
            self.animation = next.on_enter();
        }

        let jump_pressed = input.jump && !self.jump_held_last_tick;
        match self.state {
            AvatarState::Idle => self.update_idle(jump_pressed),
            AvatarState::Run => self.update_run(input, jump_pressed),
            AvatarState::Jump => self.update_jump(input, jump_pressed),
        }

        self.body.integrate(dt, self.config.gravity);
        self.jump_held_last_tick = input.jump;
    }

    pub fn resolve_collisions(&mut self, solids: &[Aabb]) -> Contact {
        resolve_collisions(&mut self.body, solids)
    }

    /// Ground contact is exactly zero vertical velocity. This also reads true
    /// for the single tick a jump peaks at zero.
    pub fn is_on_ground(&self) -> bool {
        self.body.velocity.y == 0.0
    }

    pub fn is_falling(&self) -> bool {
        self.body.velocity.y > 0.0
    }

    /// Energy award entry point used by collected fruit.
    pub fn increase_energy(&mut self, amount: f32) {
        self.energy.add(amount);
    }

    pub fn subscribe_energy(&mut self, listener: EnergyListener) {
        self.energy.subscribe(listener);
    }

    pub fn energy(&self) -> f32 {
        self.energy.value()
    }

    pub fn state(&self) -> AvatarState {
        self.state
    }

    pub fn animation(&self) -> AnimationKind {
        self.animation
    }

    pub fn facing_left(&self) -> bool {
        self.facing_left
    }

    pub fn double_jump_used(&self) -> bool {
        self.double_jump_used
    }

    pub fn bounds(&self) -> Aabb {
        self.body.bounds()
    }

    pub fn center(&self) -> Vec2 {
        self.body.center()
    }

    pub fn position(&self) -> Vec2 {
        self.body.position
    }

    pub fn velocity(&self) -> Vec2 {
        self.body.velocity
    }

    fn update_idle(&mut self, jump_pressed: bool) {
        self.body.velocity.x = 0.0;

        if self.is_on_ground() {
            self.energy.add(self.config.idle_gain);
        }
        self.try_ground_jump(jump_pressed);
    }

    fn update_run(&mut self, input: &InputState, jump_pressed: bool) {
        let vx = input.horizontal_axis() * self.config.run_speed;

        if vx == 0.0 {
            self.body.velocity.x = 0.0;
        } else if self.is_on_ground() {
            if self.energy.can_afford(self.config.run_cost) {
                self.body.velocity.x = vx;
                self.update_facing(vx);
                self.energy.spend(self.config.run_cost);
            } else {
                self.body.velocity.x = 0.0;
            }
        } else {
            self.body.velocity.x = vx;
            self.update_facing(vx);
        }

        self.try_ground_jump(jump_pressed);
    }

    fn update_jump(&mut self, input: &InputState, jump_pressed: bool) {
        let vx = input.horizontal_axis() * self.config.run_speed;
        self.body.velocity.x = vx;

        if vx != 0.0 {
            self.animation = AnimationKind::Run;
            self.update_facing(vx);
        } else {
            self.animation = AnimationKind::Jump;
        }

        if !self.is_on_ground()
            && self.is_falling()
            && !self.double_jump_used
            && jump_pressed
            && self.energy.can_afford(self.config.double_jump_cost)
        {
            self.energy.spend(self.config.double_jump_cost);
            self.double_jump_used = true;
            self.body.velocity.y = self.config.jump_velocity;
        }
    }

    fn try_ground_jump(&mut self, jump_pressed: bool) {
        if self.is_on_ground() && jump_pressed && self.energy.can_afford(self.config.jump_cost) {
            self.energy.spend(self.config.jump_cost);
            self.body.velocity.y = self.config.jump_velocity;
        }
    }

    fn update_facing(&mut self, vx: f32) {
        if vx < 0.0 {
            self.facing_left = true;
        } else if vx > 0.0 {
            self.facing_left = false;
        }
    }
}
