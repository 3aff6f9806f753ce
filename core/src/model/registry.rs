use serde::{Deserialize, Serialize};
use anyhow::{anyhow, bail, Result};

/// Ordered set of known user names. Never empty.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(try_from = "Vec<String>", into = "Vec<String>")]
pub struct UserRegistry {
    names: Vec<String>,
}

impl UserRegistry {
    pub fn new<I, S>(names: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut registry = Self { names: Vec::new() };
        for name in names {
            let name: String = name.into();
            registry.add(&name)?;
        }
        if registry.names.is_empty() {
            bail!("At least one user is required");
        }
        Ok(registry)
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.iter().any(|n| n == name)
    }

    /// Returns the stored (trimmed) name.
    pub fn add(&mut self, name: &str) -> Result<String> {
        let name = name.trim();
        if name.is_empty() {
            bail!("User name cannot be empty");
        }
        if self.contains(name) {
            bail!("User already exists: {}", name);
        }
        self.names.push(name.to_string());
        Ok(name.to_string())
    }

    /// Checks a rename without applying it and returns the trimmed new name.
    pub fn check_rename(&self, old: &str, new: &str) -> Result<String> {
        let new = new.trim();
        if !self.contains(old) {
            bail!("Unknown user: {}", old);
        }
        if new.is_empty() {
            bail!("User name cannot be empty");
        }
        if new == old {
            bail!("New name is the same as the old name");
        }
        if self.contains(new) {
            bail!("User already exists: {}", new);
        }
        Ok(new.to_string())
    }

    /// Renames in place, keeping the position. Callers validate with `check_rename` first.
    pub(crate) fn apply_rename(&mut self, old: &str, new: &str) {
        if let Some(slot) = self.names.iter_mut().find(|n| n.as_str() == old) {
            *slot = new.to_string();
        }
    }

    pub fn check_remove(&self, name: &str) -> Result<usize> {
        let pos = self
            .names
            .iter()
            .position(|n| n == name)
            .ok_or_else(|| anyhow!("Unknown user: {}", name))?;
        if self.names.len() <= 1 {
            bail!("Cannot remove the last remaining user");
        }
        Ok(pos)
    }

    pub fn remove(&mut self, name: &str) -> Result<()> {
        let pos = self.check_remove(name)?;
        self.names.remove(pos);
        Ok(())
    }
}

impl TryFrom<Vec<String>> for UserRegistry {
    type Error = anyhow::Error;

    fn try_from(names: Vec<String>) -> Result<Self> {
        Self::new(names)
    }
}

impl From<UserRegistry> for Vec<String> {
    fn from(registry: UserRegistry) -> Self {
        registry.names
    }
}
