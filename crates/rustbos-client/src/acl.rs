//! Canned object ACLs.

use std::fmt;
use std::str::FromStr;

use crate::error::BosError;

/// A canned ACL accepted by `put_object_acl`.
///
/// # Examples
///
/// ```
/// use rustbos_client::Acl;
///
/// let acl: Acl = "public-read".parse().unwrap();
/// assert_eq!(acl, Acl::PublicRead);
/// assert!("public-read-write".parse::<Acl>().is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Acl {
    /// Only the owner may read or write.
    Private,
    /// Anyone may read; only the owner may write.
    PublicRead,
}

impl Acl {
    /// The wire value sent in `x-bce-acl`.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Private => "private",
            Self::PublicRead => "public-read",
        }
    }
}

impl fmt::Display for Acl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Acl {
    type Err = BosError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "private" => Ok(Self::Private),
            "public-read" => Ok(Self::PublicRead),
            other => Err(BosError::UnsupportedAcl(other.to_owned())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_should_parse_supported_acls() {
        assert_eq!("private".parse::<Acl>().ok(), Some(Acl::Private));
        assert_eq!("public-read".parse::<Acl>().ok(), Some(Acl::PublicRead));
        assert_eq!(Acl::PublicRead.to_string(), "public-read");
    }

    #[test]
    fn test_should_reject_unsupported_acl() {
        for value in ["public-read-write", "Private", ""] {
            let err = value.parse::<Acl>().unwrap_err();
            assert!(
                matches!(&err, BosError::UnsupportedAcl(v) if v == value),
                "unexpected error for {value:?}: {err:?}"
            );
        }
    }
}
