//! Attribute state for builders
//!
//! Every builder attribute starts in an explicit `Unset` state distinct
//! from any valid value, including a set `None`-like value. A tagged
//! union per attribute, not a sentinel object compared by identity.

/// One builder attribute: not yet set, or set to a value
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Attr<T> {
    /// Never assigned
    #[default]
    Unset,
    /// Assigned exactly once or more; the latest assignment wins
    Value(T),
}

impl<T> Attr<T> {
    pub fn is_unset(&self) -> bool {
        matches!(self, Attr::Unset)
    }

    pub fn is_set(&self) -> bool {
        !self.is_unset()
    }

    /// Borrow the value when set
    pub fn value(&self) -> Option<&T> {
        match self {
            Attr::Unset => None,
            Attr::Value(v) => Some(v),
        }
    }

    /// Clone the value out, falling back when unset
    pub fn value_or(&self, fallback: T) -> T
    where
        T: Clone,
    {
        match self {
            Attr::Unset => fallback,
            Attr::Value(v) => v.clone(),
        }
    }

    /// Clone the value into an `Option` (unset becomes `None`)
    pub fn to_option(&self) -> Option<T>
    where
        T: Clone,
    {
        self.value().cloned()
    }
}

impl<T> From<T> for Attr<T> {
    fn from(value: T) -> Self {
        Attr::Value(value)
    }
}

impl<T> From<Option<T>> for Attr<T> {
    fn from(value: Option<T>) -> Self {
        match value {
            None => Attr::Unset,
            Some(v) => Attr::Value(v),
        }
    }
}
