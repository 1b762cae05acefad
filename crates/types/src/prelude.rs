// Path: crates/types/src/prelude.rs

//! Small extension traits shared by the services.

/// Turns an absent record into a typed error.
pub trait OptionExt<T> {
    /// Returns the contained value, or `err` when the option is `None`.
    fn required<E>(self, err: E) -> Result<T, E>;

    /// Like [`OptionExt::required`], building the error lazily.
    fn required_with<E, F: FnOnce() -> E>(self, err: F) -> Result<T, E>;
}

impl<T> OptionExt<T> for Option<T> {
    fn required<E>(self, err: E) -> Result<T, E> {
        self.ok_or(err)
    }

    fn required_with<E, F: FnOnce() -> E>(self, err: F) -> Result<T, E> {
        self.ok_or_else(err)
    }
}
