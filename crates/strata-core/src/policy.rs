//! Key normalization applied to every stored and looked-up key.

use std::borrow::Cow;

/// How keys are normalized before they reach a layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum KeyPolicy {
    /// Keys are used as given.
    #[default]
    CaseSensitive,
    /// Keys are folded to lowercase, so `Foo` and `FOO` are the same key.
    CaseInsensitive,
}

impl KeyPolicy {
    /// Pick the policy matching a `case_sensitive` flag.
    pub fn from_case_sensitive(case_sensitive: bool) -> Self {
        if case_sensitive {
            Self::CaseSensitive
        } else {
            Self::CaseInsensitive
        }
    }

    /// Whether keys differing only by case stay distinct.
    pub fn is_case_sensitive(self) -> bool {
        matches!(self, Self::CaseSensitive)
    }

    /// Normalize a key, borrowing when nothing changes.
    pub fn normalize(self, key: &str) -> Cow<'_, str> {
        match self {
            Self::CaseSensitive => Cow::Borrowed(key),
            Self::CaseInsensitive => {
                let folded = key.to_lowercase();
                if folded == key {
                    Cow::Borrowed(key)
                } else {
                    Cow::Owned(folded)
                }
            }
        }
    }
}
