/// Motion state of the avatar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AvatarState {
    Idle,
    Run,
    Jump,
}

/// Animation clip the renderer should be playing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnimationKind {
    Idle,
    Run,
    Jump,
}

/// Held keys for one tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InputState {
    pub left: bool,
    pub right: bool,
    pub jump: bool,
}

impl InputState {
    pub fn exactly_one_direction(&self) -> bool {
        self.left != self.right
    }

    /// -1, 0 or +1.
    pub fn horizontal_axis(&self) -> f32 {
        let mut axis = 0.0;
        if self.left {
            axis -= 1.0;
        }
        if self.right {
            axis += 1.0;
        }
        axis
    }
}

/// Transition table, evaluated once per tick.
///
/// Airborne beats everything; running needs exactly one direction held and
/// enough energy; anything else idles.
pub fn next_state(on_ground: bool, input: &InputState, energy: f32, run_threshold: f32) -> AvatarState {
    if !on_ground {
        return AvatarState::Jump;
    }
    if input.exactly_one_direction() && energy >= run_threshold {
        return AvatarState::Run;
    }
    AvatarState::Idle
}

impl AvatarState {
    pub fn on_enter(self) -> AnimationKind {
        match self {
            AvatarState::Idle => AnimationKind::Idle,
            AvatarState::Run => AnimationKind::Run,
            AvatarState::Jump => AnimationKind::Jump,
        }
    }

    // Leaving any state has no cleanup beyond what entering the next one sets.
    pub fn on_exit(self) {}
}
