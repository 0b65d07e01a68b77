//! Clone-then-modify updates for immutable state.

/// Produce a modified copy of a value, leaving the original untouched.
///
/// ```
/// use rudder::With;
///
/// #[derive(Clone, Debug, PartialEq)]
/// struct Profile {
///     name: String,
///     visits: u32,
/// }
///
/// let before = Profile { name: "ada".into(), visits: 1 };
/// let after = before.with(|p| p.visits += 1);
/// assert_eq!(before.visits, 1);
/// assert_eq!(after.visits, 2);
/// ```
pub trait With: Clone {
    fn with(&self, modify: impl FnOnce(&mut Self)) -> Self {
        let mut next = self.clone();
        modify(&mut next);
        next
    }
}

impl<T: Clone> With for T {}
