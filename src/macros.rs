//! Macros to reduce boilerplate in the codebase

/// Macro to generate the wire-name plumbing for closed enums sent to and
/// received from the backend: `as_str`, `ALL`, `Display`, `FromStr` and
/// string-based serde impls.
///
/// Parsing is case-insensitive and ignores spaces, `_` and `-`, so
/// `under_investigation` parses the same as `Under Investigation`.
///
/// # Usage
///
/// ```rust,ignore
/// use crate::error::DashError;
///
/// wire_enum!(
///     MyEnum,
///     DashError::InvalidMyEnum,
///     {
///         Variant1 => "Variant One",
///         Variant2 => "Variant Two",
///     }
/// );
/// ```
#[macro_export]
macro_rules! wire_enum {
    (
        $enum_name:ident,
        $error_variant:path,
        { $($variant:ident => $str:expr),+ $(,)? }
    ) => {
        impl $enum_name {
            /// Every variant, in declaration order.
            pub const ALL: &'static [$enum_name] = &[$($enum_name::$variant,)+];

            /// The name the backend uses for this value.
            pub fn as_str(&self) -> &'static str {
                match self {
                    $($enum_name::$variant => $str,)+
                }
            }
        }

        impl std::fmt::Display for $enum_name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl std::str::FromStr for $enum_name {
            type Err = $crate::error::DashError;

            fn from_str(s: &str) -> ::std::result::Result<Self, Self::Err> {
                let wanted = $crate::macros::normalize_wire_name(s);
                $(
                    if wanted == $crate::macros::normalize_wire_name($str) {
                        return Ok($enum_name::$variant);
                    }
                )+
                Err($error_variant(s.to_string()))
            }
        }

        impl serde::Serialize for $enum_name {
            fn serialize<S: serde::Serializer>(
                &self,
                serializer: S,
            ) -> ::std::result::Result<S::Ok, S::Error> {
                serializer.serialize_str(self.as_str())
            }
        }

        impl<'de> serde::Deserialize<'de> for $enum_name {
            fn deserialize<D: serde::Deserializer<'de>>(
                deserializer: D,
            ) -> ::std::result::Result<Self, D::Error> {
                let raw = String::deserialize(deserializer)?;
                raw.parse().map_err(serde::de::Error::custom)
            }
        }
    };
}

/// Lowercase and drop word separators for lenient enum parsing.
#[doc(hidden)]
pub fn normalize_wire_name(s: &str) -> String {
    s.chars()
        .filter(|c| !matches!(c, ' ' | '_' | '-'))
        .map(|c| c.to_ascii_lowercase())
        .collect()
}
