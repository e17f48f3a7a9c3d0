use crate::quantity::{currency::Euros, energy::KilowattHours};

quantity!(
    /// Euro per kilowatt-hour.
    KilowattHourPrice, suffix: "€/kWh", precision: 3
);

implement_div!(Euros, KilowattHours, KilowattHourPrice);
