quantity!(Euros, suffix: "€", precision: 2);

impl Euros {
    pub const ONE_CENT: Self = Self(0.01);
}
