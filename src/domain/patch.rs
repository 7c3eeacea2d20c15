//! Partial-update ("copy-with") support.
//!
//! A plain `Option` cannot say whether an optional field should keep its
//! current value or be cleared, so patches use the three-way [`Patch`]
//! marker for optional fields and `Option` (None = keep) for required ones.
//! The per-record patch structs and `copy_with` methods are generated by
//! [`record_patch!`] from a single field list per record.

/// Update marker for an optional field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Patch<T> {
    /// Leave the current value untouched.
    #[default]
    Keep,
    /// Reset the field to unset.
    Clear,
    /// Replace the field with a new value.
    Set(T),
}

impl<T> Patch<T> {
    /// Resolves the patch against the current value.
    pub fn apply_to(self, current: Option<T>) -> Option<T> {
        match self {
            Self::Keep => current,
            Self::Clear => None,
            Self::Set(value) => Some(value),
        }
    }
}

/// `patch.field(value)` reads as "set"; pass `Patch::Clear` to unset.
impl<T> From<T> for Patch<T> {
    fn from(value: T) -> Self {
        Self::Set(value)
    }
}

/// Generates `<Record>Patch` (chainable setters included) and
/// `Record::copy_with` from one declarative field list.
///
/// `required` fields patch as `Option<T>` (None = keep); `optional` fields
/// patch as [`Patch<T>`] so "keep", "clear" and "set" stay distinct.
macro_rules! record_patch {
    (
        $(#[$meta:meta])*
        $record:ident => $patch:ident {
            required { $( $req:ident : $rty:ty ),* $(,)? }
            optional { $( $opt:ident : $oty:ty ),* $(,)? }
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Default)]
        pub struct $patch {
            $( pub $req: Option<$rty>, )*
            $( pub $opt: $crate::domain::patch::Patch<$oty>, )*
        }

        impl $patch {
            pub fn new() -> Self {
                Self::default()
            }

            $(
                #[must_use]
                pub fn $req(mut self, value: $rty) -> Self {
                    self.$req = Some(value);
                    self
                }
            )*

            $(
                #[must_use]
                pub fn $opt(
                    mut self,
                    value: impl Into<$crate::domain::patch::Patch<$oty>>,
                ) -> Self {
                    self.$opt = value.into();
                    self
                }
            )*
        }

        impl $record {
            /// Non-destructive update: fields named in `patch` are replaced,
            /// everything else carries over unchanged from `self`.
            #[must_use]
            pub fn copy_with(&self, patch: $patch) -> Self {
                let mut next = self.clone();
                $( if let Some(value) = patch.$req { next.$req = value; } )*
                $( next.$opt = patch.$opt.apply_to(next.$opt.take()); )*
                next
            }
        }
    };
}
pub(crate) use record_patch;
