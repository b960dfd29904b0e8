//! Declarative helpers shared by the vocabulary modules.

/// Define a closed enum whose variants travel over the wire as fixed strings.
///
/// Generates serde renames, `as_str`, `Display`, an `ALL` slice and a
/// `FromStr` impl that rejects anything outside the vocabulary with the given
/// [`ValidationError`](crate::error::ValidationError) variant.
macro_rules! wire_enum {
    (
        $(#[doc = $doc:expr])*
        $name:ident ($kind:literal, $err:ident) {
            $( $(#[doc = $vdoc:expr])* $variant:ident => $wire:literal ),+ $(,)?
        }
    ) => {
        $(#[doc = $doc])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
        pub enum $name {
            $(
                $(#[doc = $vdoc])*
                #[serde(rename = $wire)]
                $variant,
            )+
        }

        impl $name {
            /// Every member of the vocabulary, in declaration order.
            pub const ALL: &'static [Self] = &[$(Self::$variant),+];

            /// The wire representation.
            #[must_use]
            pub fn as_str(self) -> &'static str {
                match self {
                    $(Self::$variant => $wire,)+
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl std::str::FromStr for $name {
            type Err = $crate::error::ValidationError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($wire => Ok(Self::$variant),)+
                    other => Err($crate::error::ValidationError::$err {
                        kind: $kind,
                        value: other.to_string(),
                    }),
                }
            }
        }
    };
}
