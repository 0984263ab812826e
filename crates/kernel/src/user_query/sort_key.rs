//! User sort keys.

use std::str::FromStr;

use uuid::Uuid;

use crate::models::User;
use crate::pagination::{CursorValue, PaginationError, SortKey};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UserSortKey {
    #[default]
    CreatedAt,
    FirstName,
    LastName,
}

impl UserSortKey {
    /// Symbolic name as used by clients.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::CreatedAt => "CREATED_AT",
            Self::FirstName => "FIRST_NAME",
            Self::LastName => "LAST_NAME",
        }
    }

    /// SQL expression rows are ordered by. Names sort bytewise with NULL
    /// as the empty string.
    pub fn sql_expr(&self) -> &'static str {
        match self {
            Self::CreatedAt => "created",
            Self::FirstName => "COALESCE(first_name, '') COLLATE \"C\"",
            Self::LastName => "COALESCE(last_name, '') COLLATE \"C\"",
        }
    }
}

impl FromStr for UserSortKey {
    type Err = PaginationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "CREATED_AT" => Ok(Self::CreatedAt),
            "FIRST_NAME" => Ok(Self::FirstName),
            "LAST_NAME" => Ok(Self::LastName),
            other => Err(PaginationError::invalid(format!(
                "Unsupported sortKey for sorting '{other}'"
            ))),
        }
    }
}

impl SortKey for UserSortKey {
    type Node = User;

    fn field(&self) -> &'static str {
        match self {
            Self::CreatedAt => "created",
            Self::FirstName => "first_name",
            Self::LastName => "last_name",
        }
    }

    fn value(&self, user: &User) -> CursorValue {
        let name = |n: &Option<String>| CursorValue::Text(n.clone().unwrap_or_default());
        match self {
            Self::CreatedAt => CursorValue::Integer(user.created),
            Self::FirstName => name(&user.first_name),
            Self::LastName => name(&user.last_name),
        }
    }

    fn id(user: &User) -> Uuid {
        user.id
    }

    fn accepts(&self, value: &CursorValue) -> bool {
        matches!(
            (self, value),
            (Self::CreatedAt, CursorValue::Integer(_))
                | (Self::FirstName | Self::LastName, CursorValue::Text(_))
        )
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn parses_symbolic_keys() {
        assert_eq!(
            "FIRST_NAME".parse::<UserSortKey>().unwrap(),
            UserSortKey::FirstName
        );
        assert_eq!(UserSortKey::default().field(), "created");
    }

    #[test]
    fn unknown_key_names_the_key() {
        let err = "NICKNAME".parse::<UserSortKey>().unwrap_err();
        assert_eq!(err.to_string(), "Unsupported sortKey for sorting 'NICKNAME'");
    }

    #[test]
    fn names_take_text_values_and_created_takes_integers() {
        assert!(UserSortKey::CreatedAt.accepts(&CursorValue::Integer(1)));
        assert!(!UserSortKey::CreatedAt.accepts(&CursorValue::Text("Ada".into())));
        assert!(UserSortKey::FirstName.accepts(&CursorValue::Text(String::new())));
        assert!(!UserSortKey::LastName.accepts(&CursorValue::Integer(1)));
    }
}
