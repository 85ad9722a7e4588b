use std::fmt;

mod error;

pub use error::{Error, Result};

/// The number of leading characters of a [`ContainerID`] used as the `id`
/// metric label.
pub const CONTAINER_ID_SHORT_LEN: usize = 12;

/// The maximum allowed length for a [`ContainerID`].
const CONTAINER_ID_MAX_LEN: usize = 255;

/// A validated container identifier.
///
/// The docker daemon assigns 64-character hexadecimal identifiers. This type
/// only requires enough structure to make the truncated `id` label
/// well-defined: ASCII alphanumeric characters, at least
/// [`CONTAINER_ID_SHORT_LEN`] of them.
///
/// # Examples
///
/// ```
/// # use dockstats::container::ContainerID;
/// let container_id = ContainerID::new("abcdef1234567890").unwrap();
/// assert_eq!(container_id.short(), "abcdef123456");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ContainerID(String);

impl ContainerID {
    /// Creates a new `ContainerID` from the given raw id.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidContainerID`] if the input is shorter than
    /// [`CONTAINER_ID_SHORT_LEN`], longer than 255 characters, or contains
    /// characters other than ASCII letters and digits.
    pub fn new(src: impl AsRef<str>) -> Result<Self> {
        let src = src.as_ref();
        if src.len() < CONTAINER_ID_SHORT_LEN || src.len() > CONTAINER_ID_MAX_LEN {
            return Err(Error::InvalidContainerID(src.to_owned()));
        }
        if !src.bytes().all(|b| b.is_ascii_alphanumeric()) {
            return Err(Error::InvalidContainerID(src.to_owned()));
        }

        Ok(Self(src.to_owned()))
    }

    /// Returns the first [`CONTAINER_ID_SHORT_LEN`] characters of the
    /// identifier, the form used as the `id` label on every metric.
    pub fn short(&self) -> &str {
        &self.0[..CONTAINER_ID_SHORT_LEN]
    }
}

impl AsRef<str> for ContainerID {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ContainerID {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
