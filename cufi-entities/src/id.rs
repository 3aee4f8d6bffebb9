use std::{borrow::Borrow, fmt, str::FromStr};

/// Identifier of a user as handed out by the external identity provider.
#[derive(Default, Debug, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct UserId(String);

impl UserId {
    pub fn is_valid(&self) -> bool {
        !self.0.is_empty()
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl AsRef<str> for UserId {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl From<String> for UserId {
    fn from(from: String) -> Self {
        Self(from)
    }
}

impl From<&str> for UserId {
    fn from(from: &str) -> Self {
        from.to_owned().into()
    }
}

impl From<UserId> for String {
    fn from(from: UserId) -> Self {
        from.0
    }
}

impl FromStr for UserId {
    type Err = ();
    fn from_str(s: &str) -> Result<UserId, Self::Err> {
        Ok(s.into())
    }
}

impl Borrow<str> for UserId {
    fn borrow(&self) -> &str {
        self.as_ref()
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter) -> Result<(), fmt::Error> {
        f.write_str(self.as_ref())
    }
}

// Numeric row identifiers assigned by the store.
macro_rules! numeric_id {
    ($name:ident) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
        pub struct $name(i64);

        impl $name {
            pub const fn new(value: i64) -> Self {
                Self(value)
            }

            pub const fn to_inner(self) -> i64 {
                self.0
            }
        }

        impl From<i64> for $name {
            fn from(from: i64) -> Self {
                Self(from)
            }
        }

        impl From<$name> for i64 {
            fn from(from: $name) -> Self {
                from.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter) -> Result<(), fmt::Error> {
                write!(f, "{}", self.0)
            }
        }
    };
}

numeric_id!(EventId);
numeric_id!(ListId);
numeric_id!(IncidentId);
