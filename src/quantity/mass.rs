use crate::quantity::energy::KilowattHours;

quantity!(Kilograms, suffix: "kg", precision: 1);

impl KilowattHours {
    /// Estimate the emitted CO₂ mass for the given grid intensity in kg/kWh.
    pub fn co2_equivalent(self, intensity_kg_per_kwh: f64) -> Kilograms {
        Kilograms(self.0 * intensity_kg_per_kwh)
    }
}
