use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::ValidationError;

/// DSE market segment ("group") a company is listed under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Category {
    A,
    B,
    G,
    N,
    Z,
}

impl Category {
    /// Parse a group code; surrounding whitespace and case are ignored.
    pub fn parse(input: &str) -> Result<Self, ValidationError> {
        match input.trim().to_ascii_uppercase().as_str() {
            "A" => Ok(Self::A),
            "B" => Ok(Self::B),
            "G" => Ok(Self::G),
            "N" => Ok(Self::N),
            "Z" => Ok(Self::Z),
            _ => Err(ValidationError::InvalidGroupName {
                value: input.to_owned(),
            }),
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::A => "A",
            Self::B => "B",
            Self::G => "G",
            Self::N => "N",
            Self::Z => "Z",
        }
    }
}

/// Whitelist check used before building any group-scoped request.
pub fn is_valid_category(code: &str) -> bool {
    Category::parse(code).is_ok()
}

impl Display for Category {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = ValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::parse(value)
    }
}

impl TryFrom<String> for Category {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Category> for String {
    fn from(value: Category) -> Self {
        value.as_str().to_owned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_whitelisted_codes() {
        assert!(is_valid_category("A"));
        assert!(is_valid_category("z"));
        assert_eq!(Category::parse(" g ").expect("valid"), Category::G);
    }

    #[test]
    fn rejects_unknown_codes() {
        assert!(!is_valid_category("ABAA"));
        assert!(!is_valid_category("Abaa"));
        assert!(!is_valid_category(""));
        let err = Category::parse("C").expect_err("must fail");
        assert!(matches!(err, ValidationError::InvalidGroupName { .. }));
    }
}
