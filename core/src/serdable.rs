pub use self::glob::GlobPattern;

pub mod glob {
    use std::{fmt, ops::Deref, str::FromStr};

    use ::glob::PatternError;
    use ::serde::{de, Deserialize, Deserializer};

    /// File name pattern that can be read from TOML and from the command line.
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub struct GlobPattern(::glob::Pattern);

    impl GlobPattern {
        pub fn parse(pattern: &str) -> Result<Self, PatternError> {
            ::glob::Pattern::new(pattern).map(Self)
        }
    }

    impl Deref for GlobPattern {
        type Target = ::glob::Pattern;

        fn deref(&self) -> &Self::Target {
            &self.0
        }
    }

    impl FromStr for GlobPattern {
        type Err = PatternError;

        fn from_str(s: &str) -> Result<Self, Self::Err> {
            Self::parse(s)
        }
    }

    impl fmt::Display for GlobPattern {
        fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
            f.write_str(self.0.as_str())
        }
    }

    impl<'de> Deserialize<'de> for GlobPattern {
        fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
        where
            D: Deserializer<'de>,
        {
            let s = String::deserialize(deserializer)?;
            Self::parse(&s).map_err(de::Error::custom)
        }
    }

}
