//! Macros to reduce boilerplate in the codebase

/// Generate `Display` and case-insensitive `FromStr` for a fieldless enum.
///
/// # Usage
///
/// ```rust,ignore
/// enum_display_fromstr!(
///     Severity,
///     TermbaseError::invalid_severity,
///     {
///         Info => "info",
///         Warn => "warn",
///     }
/// );
/// ```
#[macro_export]
macro_rules! enum_display_fromstr {
    (
        $enum_name:ident,
        $error_ctor:path,
        { $($variant:ident => $str:expr),+ $(,)? }
    ) => {
        impl std::fmt::Display for $enum_name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                match self {
                    $($enum_name::$variant => write!(f, $str),)+
                }
            }
        }

        impl std::str::FromStr for $enum_name {
            type Err = $crate::error::TermbaseError;

            fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
                match s.to_lowercase().as_str() {
                    $($str => Ok($enum_name::$variant),)+
                    _ => Err($error_ctor(s.to_string())),
                }
            }
        }
    };
}

#[cfg(test)]
mod test {
    use std::str::FromStr;

    use crate::error::{Result, TermbaseError};

    #[derive(Debug, Clone, PartialEq, Eq)]
    enum TestEnum {
        A,
        B,
    }

    enum_display_fromstr!(TestEnum, TermbaseError::invalid_field, { A => "a", B => "b" });

    #[test]
    fn test_display() {
        assert_eq!(TestEnum::A.to_string(), "a");
        assert_eq!(TestEnum::B.to_string(), "b");
    }

    #[test]
    fn test_from_str_is_case_insensitive() {
        assert_eq!(TestEnum::from_str("A").unwrap(), TestEnum::A);
        assert!(TestEnum::from_str("c").is_err());
    }

    // expands next to the crate's one-parameter Result alias
    fn parse_with_alias(s: &str) -> Result<TestEnum> {
        s.parse()
    }

    #[test]
    fn test_expansion_with_result_alias_in_scope() {
        assert_eq!(parse_with_alias("b").unwrap(), TestEnum::B);
        assert!(matches!(
            parse_with_alias("z"),
            Err(TermbaseError::InvalidField(_))
        ));
    }
}
