mod energy_display;

pub use energy_display::EnergyDisplay;
