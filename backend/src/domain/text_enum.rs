//! Helper macro for closed string vocabularies (roles and statuses).
//!
//! Every generated enum serialises to the same lower snake case text stored in
//! the database, so adapters can round-trip values through `as_str` and
//! `FromStr` without bespoke match arms.

/// Error returned when text does not name a known variant.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{kind} must be one of: {}", allowed.join(", "))]
pub struct UnknownVariant {
    kind: &'static str,
    value: String,
    allowed: &'static [&'static str],
}

impl UnknownVariant {
    /// Build an error for `value` against the allowed vocabulary.
    pub fn new(kind: &'static str, value: &str, allowed: &'static [&'static str]) -> Self {
        Self {
            kind,
            value: value.to_owned(),
            allowed,
        }
    }

    /// Vocabulary name, for example `status`.
    pub fn kind(&self) -> &'static str {
        self.kind
    }

    /// The rejected input.
    pub fn value(&self) -> &str {
        self.value.as_str()
    }

    /// Accepted values.
    pub fn allowed(&self) -> &'static [&'static str] {
        self.allowed
    }
}

macro_rules! define_text_enum {
    (
        $(#[$outer:meta])*
        pub enum $name:ident as $kind:literal {
            $(
                $(#[$variant_meta:meta])*
                $variant:ident => $text:literal
            ),+ $(,)?
        }
    ) => {
        $(#[$outer])*
        #[derive(
            Debug,
            Clone,
            Copy,
            PartialEq,
            Eq,
            Hash,
            ::serde::Serialize,
            ::serde::Deserialize,
            ::utoipa::ToSchema,
        )]
        pub enum $name {
            $(
                $(#[$variant_meta])*
                #[serde(rename = $text)]
                $variant,
            )+
        }

        impl $name {
            /// Accepted text values in declaration order.
            pub const VALUES: &'static [&'static str] = &[$($text),+];

            /// Stable wire and storage representation.
            pub const fn as_str(self) -> &'static str {
                match self {
                    $(Self::$variant => $text,)+
                }
            }
        }

        impl ::std::fmt::Display for $name {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl ::std::str::FromStr for $name {
            type Err = $crate::domain::UnknownVariant;

            fn from_str(value: &str) -> Result<Self, Self::Err> {
                match value {
                    $($text => Ok(Self::$variant),)+
                    other => Err($crate::domain::UnknownVariant::new($kind, other, Self::VALUES)),
                }
            }
        }
    };
}

pub(crate) use define_text_enum;

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use rstest::rstest;

    define_text_enum! {
        pub enum Colour as "colour" {
            Red => "red",
            DeepBlue => "deep_blue",
        }
    }

    #[rstest]
    #[case("red", Colour::Red)]
    #[case("deep_blue", Colour::DeepBlue)]
    fn parses_known_values(#[case] raw: &str, #[case] expected: Colour) {
        assert_eq!(Colour::from_str(raw), Ok(expected));
        assert_eq!(expected.as_str(), raw);
    }

    #[rstest]
    fn unknown_value_lists_vocabulary() {
        let err = Colour::from_str("Red").expect_err("case sensitive");
        assert_eq!(err.kind(), "colour");
        assert_eq!(err.value(), "Red");
        assert_eq!(err.to_string(), "colour must be one of: red, deep_blue");
    }

    #[rstest]
    fn serde_uses_storage_text() {
        let json = serde_json::to_string(&Colour::DeepBlue).expect("serialise");
        assert_eq!(json, "\"deep_blue\"");
    }
}
