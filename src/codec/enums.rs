//! Wire enums: closed string sets with a declared fallback variant.
//!
//! Every enum is declared once through [`wire_enum!`], which derives the
//! variant list, the wire-string mapping, `Display`, `Serialize` and the
//! [`WireEnum`] impl from a single source of truth. Decoding an unknown
//! wire string yields the `#[default]` variant instead of failing, so old
//! clients keep working against newer payloads.

/// A string-encoded enum with a stable wire representation.
pub trait WireEnum: Copy + Default {
    /// Type name, used in the fallback log line.
    const NAME: &'static str;

    /// Exact wire string → variant. `None` for unrecognized input.
    fn from_wire(s: &str) -> Option<Self>;

    /// Variant → exact wire string.
    fn as_wire(self) -> &'static str;

    /// Lenient decode: unknown wire strings map to the default variant.
    fn from_wire_or_default(s: &str) -> Self {
        Self::from_wire(s).unwrap_or_else(|| {
            let fallback = Self::default();
            tracing::warn!(
                value = s,
                "unknown {} wire value, falling back to `{}`",
                Self::NAME,
                fallback.as_wire()
            );
            fallback
        })
    }
}

/// Declares a wire enum: variants, their wire strings, and (via a
/// `#[default]` attribute on one variant) the fallback used for
/// unrecognized input.
macro_rules! wire_enum {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident {
            $(
                $(#[$vmeta:meta])*
                $variant:ident => $wire:literal
            ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
        $vis enum $name {
            $( $(#[$vmeta])* $variant, )+
        }

        impl $crate::codec::enums::WireEnum for $name {
            const NAME: &'static str = stringify!($name);

            fn from_wire(s: &str) -> Option<Self> {
                match s {
                    $( $wire => Some(Self::$variant), )+
                    _ => None,
                }
            }

            fn as_wire(self) -> &'static str {
                match self {
                    $( Self::$variant => $wire, )+
                }
            }
        }

        impl ::std::fmt::Display for $name {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                f.write_str($crate::codec::enums::WireEnum::as_wire(*self))
            }
        }

        impl ::serde::Serialize for $name {
            fn serialize<S: ::serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_str($crate::codec::enums::WireEnum::as_wire(*self))
            }
        }
    };
}
pub(crate) use wire_enum;

#[cfg(test)]
mod tests {
    use super::*;

    wire_enum! {
        enum Sample {
            #[default]
            Alpha => "alpha",
            Beta => "beta-mode",
        }
    }

    #[test]
    fn round_trips_declared_wire_strings() {
        assert_eq!(Sample::from_wire("alpha"), Some(Sample::Alpha));
        assert_eq!(Sample::from_wire("beta-mode"), Some(Sample::Beta));
        assert_eq!(Sample::Beta.as_wire(), "beta-mode");
    }

    #[test]
    fn unknown_wire_string_falls_back_to_default() {
        assert_eq!(Sample::from_wire("gamma"), None);
        assert_eq!(Sample::from_wire_or_default("gamma"), Sample::Alpha);
    }

    #[test]
    fn display_and_serialize_use_the_wire_string() {
        assert_eq!(Sample::Beta.to_string(), "beta-mode");
        assert_eq!(
            serde_json::to_value(Sample::Beta).unwrap(),
            serde_json::json!("beta-mode")
        );
    }
}
