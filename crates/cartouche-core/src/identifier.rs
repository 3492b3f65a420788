//! Panel identifiers backed by a global string interner.
//!
//! Panels and connector endpoints refer to each other by name. [`Id`] keeps
//! those names as small `Copy` symbols so lookups and comparisons stay cheap
//! while the composition engine shuffles them between placements.

use std::{
    fmt,
    str::FromStr,
    sync::{Mutex, OnceLock},
};

use serde::{Deserialize, Deserializer};
use string_interner::{DefaultStringInterner, DefaultSymbol};

/// Global string interner shared by every [`Id`].
static INTERNER: OnceLock<Mutex<DefaultStringInterner>> = OnceLock::new();

fn with_interner<R>(f: impl FnOnce(&mut DefaultStringInterner) -> R) -> R {
    let mut interner = INTERNER
        .get_or_init(|| Mutex::new(DefaultStringInterner::new()))
        .lock()
        .expect("Failed to acquire interner lock");
    f(&mut interner)
}

/// Interned identifier of a panel.
///
/// # Examples
///
/// ```
/// use cartouche_core::identifier::Id;
///
/// let mainland = Id::new("mainland");
/// let alaska = Id::new("alaska");
///
/// assert_ne!(mainland, alaska);
/// assert_eq!(mainland, "mainland");
///
/// // Unnamed grid cells get positional identifiers
/// let cell = Id::from_anonymous(2);
/// assert_eq!(cell.to_string(), "__2");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Id(DefaultSymbol);

impl Id {
    /// Creates an `Id` from a name, interning it on first use.
    pub fn new(name: &str) -> Self {
        Self(with_interner(|interner| interner.get_or_intern(name)))
    }

    /// Creates a positional identifier for an unnamed panel.
    ///
    /// # Arguments
    ///
    /// * `idx` - The position of the panel in its batch.
    pub fn from_anonymous(idx: usize) -> Self {
        Self::new(&format!("__{idx}"))
    }
}

impl fmt::Display for Id {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = with_interner(|interner| {
            interner
                .resolve(self.0)
                .expect("Symbol should exist in interner")
                .to_string()
        });
        f.write_str(&name)
    }
}

impl FromStr for Id {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::new(s))
    }
}

impl From<&str> for Id {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl PartialEq<str> for Id {
    /// Allows direct comparison with string slices: `id == "mainland"`
    fn eq(&self, other: &str) -> bool {
        with_interner(|interner| interner.resolve(self.0) == Some(other))
    }
}

impl PartialEq<&str> for Id {
    fn eq(&self, other: &&str) -> bool {
        self == *other
    }
}

impl<'de> Deserialize<'de> for Id {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let name = String::deserialize(deserializer)?;
        Ok(Self::new(&name))
    }
}
