//! Macro for implementing Display and FromStr for wire-code enums
//!
//! Status and phase enums travel as fixed upper-case codes (`FC_3`,
//! `NEEDS_REVIEW`, ...). This macro keeps the Display and FromStr
//! implementations in one mapping table.
//!
//! # Example
//!
//! ```rust
//! use claimgate_domain::impl_wire_code_conversions;
//!
//! #[derive(Debug, Clone, Copy, PartialEq, Eq)]
//! pub enum ReviewState {
//!     Open,
//!     Closed,
//! }
//!
//! impl_wire_code_conversions!(ReviewState {
//!     Open => "OPEN",
//!     Closed => "CLOSED",
//! });
//!
//! assert_eq!(ReviewState::Open.to_string(), "OPEN");
//! assert_eq!("closed".parse::<ReviewState>(), Ok(ReviewState::Closed));
//! ```

/// Implements Display, FromStr and `as_str` for wire-code enums
///
/// - Display writes the code exactly as declared
/// - FromStr matches codes case-insensitively
#[macro_export]
macro_rules! impl_wire_code_conversions {
    ($enum_name:ident { $($variant:ident => $code:expr),+ $(,)? }) => {
        impl $enum_name {
            /// Wire code for this variant
            pub const fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $code,)+
                }
            }
        }

        impl ::std::fmt::Display for $enum_name {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl ::std::str::FromStr for $enum_name {
            type Err = ::std::string::String;

            fn from_str(s: &str) -> ::std::result::Result<Self, Self::Err> {
                $(
                    if s.eq_ignore_ascii_case($code) {
                        return ::std::result::Result::Ok(Self::$variant);
                    }
                )+
                ::std::result::Result::Err(::std::format!(
                    "Invalid {}: {}",
                    stringify!($enum_name),
                    s
                ))
            }
        }
    };
}
