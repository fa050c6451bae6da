/// Tags a fetch with the state of its owner at the time it was issued.
///
/// Owners advance their generation whenever earlier fetches become
/// irrelevant (a reset, a new key, the screen going away). A result is only
/// applied if it carries the owner's current generation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Generation(u64);

impl Generation {
    /// Move to the next generation and return it.
    pub(crate) fn advance(&mut self) -> Generation {
        self.0 = self.0.wrapping_add(1);
        *self
    }
}
