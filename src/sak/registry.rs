use crate::command::{Executable, ParameterizedCommand, SimpleCommand};
use crate::composite::Composite;
use crate::error::{Result, SakError};
use std::collections::HashSet;

/// One named entry of a [`Registry`].
#[derive(Debug)]
pub struct CommandDescriptor {
    name: &'static str,
    description: &'static str,
    executable: Executable,
}

impl CommandDescriptor {
    pub fn new(name: &'static str, description: &'static str, executable: Executable) -> Self {
        Self {
            name,
            description,
            executable,
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn description(&self) -> &'static str {
        self.description
    }

    pub fn executable(&self) -> &Executable {
        &self.executable
    }

    pub fn subcommands(&self) -> Option<&Registry> {
        self.executable.subcommands()
    }
}

/// An ordered, immutable set of uniquely named commands.
///
/// Declaration order only matters for help and completion output; lookup is
/// by exact, case-sensitive name.
#[derive(Debug)]
pub struct Registry {
    entries: Vec<CommandDescriptor>,
}

impl Registry {
    pub fn builder() -> RegistryBuilder {
        RegistryBuilder::default()
    }

    /// Fails with [`SakError::DuplicateCommand`] if two descriptors share a name.
    pub fn new(entries: Vec<CommandDescriptor>) -> Result<Self> {
        let mut seen = HashSet::new();
        for entry in &entries {
            if !seen.insert(entry.name) {
                return Err(SakError::DuplicateCommand(entry.name.to_string()));
            }
        }
        Ok(Self { entries })
    }

    pub fn lookup(&self, name: &str) -> Option<&CommandDescriptor> {
        self.entries.iter().find(|entry| entry.name == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &CommandDescriptor> {
        self.entries.iter()
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.entries.iter().map(|entry| entry.name).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<'a> IntoIterator for &'a Registry {
    type Item = &'a CommandDescriptor;
    type IntoIter = std::slice::Iter<'a, CommandDescriptor>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

#[derive(Default)]
pub struct RegistryBuilder {
    entries: Vec<CommandDescriptor>,
}

impl RegistryBuilder {
    pub fn simple(
        mut self,
        name: &'static str,
        description: &'static str,
        command: impl SimpleCommand + 'static,
    ) -> Self {
        self.entries.push(CommandDescriptor::new(
            name,
            description,
            Executable::Simple(Box::new(command)),
        ));
        self
    }

    pub fn parameterized(
        mut self,
        name: &'static str,
        description: &'static str,
        command: impl ParameterizedCommand + 'static,
    ) -> Self {
        self.entries.push(CommandDescriptor::new(
            name,
            description,
            Executable::Parameterized(Box::new(command)),
        ));
        self
    }

    /// Registers a command that dispatches into its own nested registry.
    pub fn composite(
        self,
        name: &'static str,
        description: &'static str,
        registry: Registry,
    ) -> Self {
        self.parameterized(name, description, Composite::new(registry))
    }

    pub fn build(self) -> Result<Registry> {
        Registry::new(self.entries)
    }
}
