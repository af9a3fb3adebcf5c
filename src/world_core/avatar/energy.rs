pub type EnergyListener = Box<dyn FnMut(f32)>;

/// Clamped energy budget with change listeners.
///
/// `set` is the only path that writes the value. Listeners hear about a change
/// once, and only when the clamped value differs from the stored one.
pub struct EnergyMeter {
    value: f32,
    max: f32,
    listeners: Vec<EnergyListener>,
}

impl EnergyMeter {
    pub fn new(max: f32) -> Self {
        Self {
            value: max,
            max,
            listeners: Vec::new(),
        }
    }

    pub fn value(&self) -> f32 {
        self.value
    }

    /// Returns whether the stored value changed.
    pub fn set(&mut self, value: f32) -> bool {
        let clamped = value.clamp(0.0, self.max);
        if clamped == self.value {
            return false;
        }
        self.value = clamped;
        for listener in &mut self.listeners {
            listener(clamped);
        }
        true
    }

    pub fn add(&mut self, amount: f32) -> bool {
        self.set(self.value + amount)
    }

    pub fn spend(&mut self, amount: f32) -> bool {
        self.set(self.value - amount)
    }

    pub fn can_afford(&self, cost: f32) -> bool {
        self.value >= cost
    }

    /// Registers a listener and immediately replays the current value to it.
    pub fn subscribe(&mut self, mut listener: EnergyListener) {
        listener(self.value);
        self.listeners.push(listener);
    }
}
