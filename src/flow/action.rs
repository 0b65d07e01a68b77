//! Base trait for actions dispatched to a store.

use std::fmt::Debug;

/// Marker trait for action values.
///
/// Actions represent:
/// - User interaction (button clicks, key presses)
/// - System events (responses, timers)
/// - Follow-ups dispatched by logic flows
///
/// Applications usually model them as one enum per store so that every
/// state flow can match the variants it handles and ignore the rest.
pub trait Action: Debug + Send + Sync + 'static {}

impl<T> Action for T where T: Debug + Send + Sync + 'static {}

/// Short display name of an action type, without its module path.
///
/// `my_app::actions::CounterAction` becomes `CounterAction`.
pub fn action_name<A: ?Sized>() -> &'static str {
    let full = std::any::type_name::<A>();
    let base = full.split('<').next().unwrap_or(full);
    base.rsplit("::").next().unwrap_or(base)
}

#[cfg(test)]
mod tests {
    use super::action_name;

    #[derive(Debug)]
    enum CounterAction {}

    #[test]
    fn strips_module_path() {
        assert_eq!(action_name::<CounterAction>(), "CounterAction");
    }

    #[test]
    fn keeps_primitive_names() {
        assert_eq!(action_name::<&str>(), "&str");
        assert_eq!(action_name::<u32>(), "u32");
    }

    #[test]
    fn drops_generic_arguments() {
        assert_eq!(action_name::<Vec<CounterAction>>(), "Vec");
    }
}
