use serde::Serialize;
use strum_macros::{Display, EnumIter, EnumString};

/// Where a style value came from.
///
/// Origins are ranked in declaration order: a value from a higher origin
/// always beats one from a lower origin, whatever the specificities.
///
/// ```
/// use tern_css::Origin;
///
/// assert!(Origin::Inline > Origin::Author);
/// assert_eq!("user-agent".parse::<Origin>().unwrap(), Origin::UserAgent);
/// assert_eq!(Origin::Override.to_string(), "override");
/// ```
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Display,
    EnumString,
    EnumIter,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum Origin {
    /// Defaults shipped with the host.
    UserAgent,
    /// Stylesheets supplied by the document author.
    Author,
    /// Declarations attached directly to one element.
    Inline,
    /// Values set programmatically by the host. Never written by the cascade.
    Override,
}

impl Origin {
    /// Number of origins.
    pub const COUNT: usize = 4;

    /// Precedence rank, `0` for the weakest origin.
    #[must_use]
    pub const fn rank(self) -> usize {
        self as usize
    }
}
