/// Text readout of the avatar's energy.
pub struct EnergyDisplay {
    text: String,
    last: Option<f32>,
    redraws: u32,
}

impl EnergyDisplay {
    pub fn new() -> Self {
        Self {
            text: String::new(),
            last: None,
            redraws: 0,
        }
    }

    /// Repeated values are ignored so the label is only rebuilt on change.
    pub fn update_energy(&mut self, energy: f32) {
        if self.last == Some(energy) {
            return;
        }
        self.last = Some(energy);
        self.text = format!("Energy: {}", energy as i32);
        self.redraws += 1;
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn redraws(&self) -> u32 {
        self.redraws
    }
}

impl Default for EnergyDisplay {
    fn default() -> Self {
        Self::new()
    }
}
