//! The field registry: known field names and their bound property paths.
//!
//! Entries are kept in registration order so iteration is deterministic.
//! Registration is idempotent, and declaring a binding for an unknown name
//! is a documented no-op: optional bindings may reference fields that were
//! never added to this particular form.

/// One registry entry: a field name and its bound property path.
///
/// The binding defaults to the empty string, meaning "not bound".
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistryEntry {
    /// The field name.
    pub name: String,
    /// The bound property path; empty when unbound.
    pub binding: String,
}

/// Tracks the set of known field names and their bindings.
#[derive(Debug, Clone, Default)]
pub struct FieldRegistry {
    entries: Vec<RegistryEntry>,
}

impl FieldRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a field name. Idempotent: re-registering an existing name
    /// leaves its entry (including any binding) untouched.
    pub fn register(&mut self, name: impl Into<String>) {
        let name = name.into();
        if self.get(&name).is_none() {
            self.entries.push(RegistryEntry {
                name,
                binding: String::new(),
            });
        }
    }

    /// Sets the bound property path for a registered name.
    ///
    /// A no-op if the name is not registered.
    pub fn set_binding(&mut self, name: &str, property_path: impl Into<String>) {
        match self.entries.iter_mut().find(|entry| entry.name == name) {
            Some(entry) => entry.binding = property_path.into(),
            None => {
                tracing::debug!(field = name, "binding declared for unregistered field, ignoring");
            }
        }
    }

    /// Looks up an entry by name.
    pub fn get(&self, name: &str) -> Option<&RegistryEntry> {
        self.entries.iter().find(|entry| entry.name == name)
    }

    /// The bound property path for a name, if registered and non-empty.
    pub fn binding(&self, name: &str) -> Option<&str> {
        self.get(name)
            .map(|entry| entry.binding.as_str())
            .filter(|binding| !binding.is_empty())
    }

    /// Whether the name is registered.
    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// All entries, in registration order.
    pub fn entries(&self) -> &[RegistryEntry] {
        &self.entries
    }

    /// The number of registered names.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Drops every entry. Used on full form reset only.
    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
