//! Constraint operators.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The operator of an atomic constraint.
///
/// The engine does not give operators any meaning of its own; they are
/// handed to the registered constraint function together with the right
/// operand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Operator {
    /// Equal to.
    Eq,

    /// Not equal to.
    Neq,

    /// Greater than.
    Gt,

    /// Greater than or equal to.
    Geq,

    /// Less than.
    Lt,

    /// Less than or equal to.
    Leq,

    /// Member of a collection.
    In,

    /// Has the right operand as a part.
    HasPart,

    /// Is an instance of.
    IsA,

    /// Is all of the right operand's members.
    IsAllOf,

    /// Is any of the right operand's members.
    IsAnyOf,

    /// Is none of the right operand's members.
    IsNoneOf,
}

impl Operator {
    /// All operators, in declaration order.
    pub const ALL: [Operator; 12] = [
        Self::Eq,
        Self::Neq,
        Self::Gt,
        Self::Geq,
        Self::Lt,
        Self::Leq,
        Self::In,
        Self::HasPart,
        Self::IsA,
        Self::IsAllOf,
        Self::IsAnyOf,
        Self::IsNoneOf,
    ];

    /// Get the canonical name of this operator.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Eq => "EQ",
            Self::Neq => "NEQ",
            Self::Gt => "GT",
            Self::Geq => "GEQ",
            Self::Lt => "LT",
            Self::Leq => "LEQ",
            Self::In => "IN",
            Self::HasPart => "HAS_PART",
            Self::IsA => "IS_A",
            Self::IsAllOf => "IS_ALL_OF",
            Self::IsAnyOf => "IS_ANY_OF",
            Self::IsNoneOf => "IS_NONE_OF",
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Error returned when parsing an unknown operator name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownOperator(pub String);

impl fmt::Display for UnknownOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Unknown operator '{}'", self.0)
    }
}

impl std::error::Error for UnknownOperator {}

impl FromStr for Operator {
    type Err = UnknownOperator;

    /// Parse an operator from its canonical name (case-insensitive) or its
    /// ODRL spelling, with or without the `odrl:` prefix.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.strip_prefix("odrl:").unwrap_or(s);
        let normalized: String = name
            .chars()
            .filter(|c| *c != '_')
            .flat_map(char::to_lowercase)
            .collect();

        match normalized.as_str() {
            "eq" => Ok(Self::Eq),
            "neq" => Ok(Self::Neq),
            "gt" => Ok(Self::Gt),
            "geq" | "gteq" => Ok(Self::Geq),
            "lt" => Ok(Self::Lt),
            "leq" | "lteq" => Ok(Self::Leq),
            "in" => Ok(Self::In),
            "haspart" => Ok(Self::HasPart),
            "isa" => Ok(Self::IsA),
            "isallof" => Ok(Self::IsAllOf),
            "isanyof" => Ok(Self::IsAnyOf),
            "isnoneof" => Ok(Self::IsNoneOf),
            _ => Err(UnknownOperator(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canonical_names_parse_back() {
        for operator in Operator::ALL {
            assert_eq!(operator.as_str().parse::<Operator>(), Ok(operator));
        }
    }

    #[test]
    fn test_odrl_spellings() {
        assert_eq!("odrl:gteq".parse::<Operator>(), Ok(Operator::Geq));
        assert_eq!("lteq".parse::<Operator>(), Ok(Operator::Leq));
        assert_eq!("odrl:isAnyOf".parse::<Operator>(), Ok(Operator::IsAnyOf));
        assert_eq!("hasPart".parse::<Operator>(), Ok(Operator::HasPart));
        assert!("odrl:between".parse::<Operator>().is_err());
    }

    #[test]
    fn test_serde_names() {
        let json = serde_json::to_string(&Operator::IsNoneOf).unwrap();
        assert_eq!(json, "\"IS_NONE_OF\"");
    }
}
