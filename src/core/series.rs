use itertools::Itertools;
use ordered_float::OrderedFloat;

impl<T> Extremes for T where T: ?Sized {}

/// Positional extremes with the first occurrence winning ties.
pub trait Extremes {
    #[must_use]
    fn position_of_max<V>(self) -> Option<usize>
    where
        Self: Sized + IntoIterator<Item = V>,
        V: Ord,
    {
        // `min_by` returns the first of equal elements, unlike `max_by`:
        self.into_iter().enumerate().min_by(|(_, lhs), (_, rhs)| rhs.cmp(lhs)).map(|(i, _)| i)
    }

    #[must_use]
    fn position_of_min<V>(self) -> Option<usize>
    where
        Self: Sized + IntoIterator<Item = V>,
        V: Ord,
    {
        self.into_iter().enumerate().min_by(|(_, lhs), (_, rhs)| lhs.cmp(rhs)).map(|(i, _)| i)
    }
}

impl<T> Quantile for T where T: ?Sized {}

pub trait Quantile {
    /// Quantile with linear interpolation between the closest ranks.
    #[must_use]
    fn quantile(self, q: f64) -> Option<f64>
    where
        Self: Sized + IntoIterator<Item = f64>,
    {
        let values = self.into_iter().map(OrderedFloat).sorted_unstable().collect_vec();
        let last_index = values.len().checked_sub(1)?;

        #[allow(clippy::cast_precision_loss)]
        let position = q.clamp(0.0, 1.0) * last_index as f64;

        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let (lower, upper) = (position.floor() as usize, position.ceil() as usize);

        #[allow(clippy::cast_precision_loss)]
        let fraction = position - lower as f64;

        Some(values[lower].0 + (values[upper].0 - values[lower].0) * fraction)
    }
}
