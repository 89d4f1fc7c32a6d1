/// A totally ordered severity scale with an explicit rank table.
///
/// Both severity taxonomies implement this so that "worst of" composition is
/// written once instead of as inline comparisons.
pub trait Ordinal: Copy {
    /// Rank within the taxonomy; higher is more severe.
    fn rank(&self) -> u8;

    /// The more severe of `self` and `other`. Ties keep `self`.
    fn worse(self, other: Self) -> Self {
        if other.rank() > self.rank() {
            other
        } else {
            self
        }
    }
}

/// Highest-ranked member of `items`, or `None` for an empty iterator.
pub fn worst_of<T, I>(items: I) -> Option<T>
where
    T: Ordinal,
    I: IntoIterator<Item = T>,
{
    items.into_iter().reduce(Ordinal::worse)
}
