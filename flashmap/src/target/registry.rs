//! Lookup of targets by part number.

use super::{builtin, Target, TargetError};

/// Errors while looking up a target.
#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    /// No target matches the name.
    #[error("The requested chip '{0}' was not found in the list of known targets.")]
    ChipNotFound(String),
    /// The name is a prefix of several targets.
    #[error("The chip name '{name}' is ambiguous, it matches {candidates:?}.")]
    Ambiguous {
        /// The requested name.
        name: String,
        /// The part numbers it matches.
        candidates: Vec<&'static str>,
    },
    /// The target definition is broken.
    #[error("The target could not be built.")]
    Target(#[from] TargetError),
}

/// One registered target.
#[derive(Debug, Clone, Copy)]
pub struct RegistryEntry {
    /// The full part number.
    pub part_number: &'static str,
    /// Short names also accepted for the target.
    pub aliases: &'static [&'static str],
    /// Builds the target.
    pub factory: fn() -> Result<Target, TargetError>,
}

impl RegistryEntry {
    fn is_named(&self, name: &str) -> bool {
        self.part_number.eq_ignore_ascii_case(name)
            || self
                .aliases
                .iter()
                .any(|alias| alias.eq_ignore_ascii_case(name))
    }

    fn starts_with(&self, prefix: &str) -> bool {
        let part_number = self.part_number.to_ascii_lowercase();
        part_number.starts_with(&prefix.to_ascii_lowercase())
    }
}

/// The set of known targets.
#[derive(Debug, Clone)]
pub struct Registry {
    entries: Vec<RegistryEntry>,
}

impl Registry {
    /// A registry with all targets built into this crate.
    pub fn builtin() -> Self {
        Self {
            entries: builtin::entries(),
        }
    }

    /// A registry with the given entries.
    pub fn from_entries(entries: Vec<RegistryEntry>) -> Self {
        Self { entries }
    }

    /// Adds an entry, replacing one with the same part number.
    pub fn add(&mut self, entry: RegistryEntry) {
        self.entries.retain(|existing| !existing.is_named(entry.part_number));
        self.entries.push(entry);
    }

    /// Part numbers of all registered targets.
    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.entries.iter().map(|entry| entry.part_number)
    }

    /// Builds the target registered under `name`.
    ///
    /// The name is compared case-insensitively with the part numbers and their
    /// aliases. If nothing matches exactly, a name that is the prefix of
    /// exactly one part number selects that part.
    pub fn get_target_by_name(&self, name: impl AsRef<str>) -> Result<Target, RegistryError> {
        let name = name.as_ref();
        tracing::debug!("Searching registry for chip with name {}", name);

        let exact = self.entries.iter().find(|entry| entry.is_named(name));

        let entry = match exact {
            Some(entry) => entry,
            None => {
                let candidates: Vec<&RegistryEntry> = self
                    .entries
                    .iter()
                    .filter(|entry| entry.starts_with(name))
                    .collect();

                match candidates.as_slice() {
                    [] => return Err(RegistryError::ChipNotFound(name.to_string())),
                    [entry] => {
                        tracing::warn!(
                            "Found chip {} which matches given partial name {}. Consider specifying its full name.",
                            entry.part_number,
                            name
                        );
                        *entry
                    }
                    _ => {
                        return Err(RegistryError::Ambiguous {
                            name: name.to_string(),
                            candidates: candidates.iter().map(|entry| entry.part_number).collect(),
                        });
                    }
                }
            }
        };

        Ok((entry.factory)()?)
    }
}
