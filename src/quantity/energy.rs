use crate::quantity::{currency::Euros, price::KilowattHourPrice};

quantity!(
    /// Energy over an hourly step.
    ///
    /// With one-hour steps, the average power in kilowatts equals the energy in kilowatt-hours.
    KilowattHours, suffix: "kWh", precision: 1
);

implement_mul!(KilowattHours, KilowattHourPrice, Euros);

impl KilowattHours {
    /// Clamp numerical noise below `epsilon` to exact zero.
    pub fn denoised(self, epsilon: f64) -> Self {
        if self.0.abs() > epsilon { self } else { Self::ZERO }
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;

    use super::*;

    #[test]
    fn test_denoised() {
        assert_eq!(KilowattHours(1e-9).denoised(1e-6), KilowattHours::ZERO);
        assert_eq!(KilowattHours(-1e-6).denoised(1e-6), KilowattHours::ZERO);
        assert_eq!(KilowattHours(0.5).denoised(1e-6), KilowattHours(0.5));
    }

    #[test]
    fn test_energy_times_price() {
        let cost = KilowattHours(3.0) * KilowattHourPrice(0.25);
        assert_abs_diff_eq!(cost.0, 0.75);
    }

    #[test]
    fn test_display_uses_precision() {
        assert_eq!(KilowattHours(17.96).to_string(), "18.0 kWh");
    }
}
