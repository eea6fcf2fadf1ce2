/// Declares a closed wire-code enumeration with a fallible `from_code` and
/// the inverse `code`.
///
/// An out-of-range code is always [`DecodeError::UnrecognizedCode`] tagged
/// with the field name; there is no fallback variant.
///
/// [`DecodeError::UnrecognizedCode`]: crate::protocols::common::DecodeError::UnrecognizedCode
macro_rules! wire_codes {
    (
        $(#[$meta:meta])*
        $name:ident, $field:literal {
            $($variant:ident = $code:literal,)+
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, ::serde::Serialize)]
        #[serde(rename_all = "snake_case")]
        pub enum $name {
            $($variant,)+
        }

        impl $name {
            pub fn from_code(code: u8) -> Result<Self, $crate::protocols::common::DecodeError> {
                match code {
                    $($code => Ok(Self::$variant),)+
                    other => Err($crate::protocols::common::DecodeError::UnrecognizedCode {
                        field: $field,
                        code: u32::from(other),
                    }),
                }
            }

            pub fn code(self) -> u8 {
                match self {
                    $(Self::$variant => $code,)+
                }
            }
        }
    };
}

pub(crate) use wire_codes;
