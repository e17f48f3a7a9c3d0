quantity!(
    /// Sunshine duration and other hour counts reported as fractional hours.
    Hours, suffix: "h", precision: 1
);
