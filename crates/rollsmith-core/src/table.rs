//! The table document: groups, variables, and output decoration.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::group::Group;
use crate::vars::VariableStore;

/// A parsed table file: named groups, declared variables, and optional
/// header/footer text set by directives.
///
/// Group structure is fixed after parsing; the variable store and each
/// group's use-once state mutate while rolling, so a table being
/// evaluated must not be shared across threads without external
/// synchronization.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Table {
    /// Identifier derived from the source file stem, lowercased.
    pub name: String,
    /// Text prepended to generated output (`/OutputHeader`).
    pub header: Option<String>,
    /// Text appended to generated output (`/OutputFooter`).
    pub footer: Option<String>,
    /// Declared variables.
    pub variables: VariableStore,
    /// Groups by name. Names are unique; re-declaration replaces.
    pub groups: HashMap<String, Group>,
}

impl Table {
    /// Create an empty table.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            header: None,
            footer: None,
            variables: VariableStore::new(),
            groups: HashMap::new(),
        }
    }

    /// Close `group` and add it. A group with the same name is replaced.
    pub fn add_group(&mut self, mut group: Group) {
        group.close();
        self.groups.insert(group.name.clone(), group);
    }

    /// Look up a group by name.
    pub fn group(&self, name: &str) -> Option<&Group> {
        self.groups.get(name)
    }

    /// Look up a group for rolling or resetting.
    pub fn group_mut(&mut self, name: &str) -> Option<&mut Group> {
        self.groups.get_mut(name)
    }
}
