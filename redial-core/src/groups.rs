//! Group registry for numbering capture groups
//!
//! The parser registers every capturing group here as it is opened, so
//! numbers are assigned strictly left-to-right starting at 1. Named groups
//! (`(?P<name>...)`) also record their name, which is how `(?P=name)`
//! resolves to a plain numbered backreference. A group is closed once its
//! `)` is parsed; only closed groups can be referred to.

use std::collections::HashMap;

use thiserror::Error;

use crate::error::SyntaxErrorKind;

/// Information about a capture group
#[derive(Debug, Clone, PartialEq)]
pub struct GroupInfo {
    /// The number of the group (1-based, as used by `\1`, `\2`, ...)
    pub index: u32,
    /// The name of the group, if it was declared with one
    pub name: Option<String>,
    /// Whether the group's `)` has been parsed
    pub closed: bool,
}

/// Registry for tracking capture groups
#[derive(Debug, Clone)]
pub struct GroupRegistry {
    groups: Vec<GroupInfo>,
    name_to_index: HashMap<String, u32>,
    next_index: u32,
}

impl Default for GroupRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl GroupRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        GroupRegistry {
            groups: Vec::new(),
            name_to_index: HashMap::new(),
            next_index: 1,
        }
    }

    /// Register a new capture group and return its number
    ///
    /// # Errors
    /// Returns an error if the name is already in use
    pub fn register_group(&mut self, name: Option<String>) -> Result<u32, GroupRegistryError> {
        if let Some(ref group_name) = name {
            if self.name_to_index.contains_key(group_name) {
                return Err(GroupRegistryError::DuplicateGroupName(group_name.clone()));
            }
            self.name_to_index.insert(group_name.clone(), self.next_index);
        }

        let index = self.next_index;
        self.next_index += 1;
        self.groups.push(GroupInfo {
            index,
            name,
            closed: false,
        });
        Ok(index)
    }

    /// Get group information by number
    pub fn get_by_index(&self, index: u32) -> Option<&GroupInfo> {
        let slot = usize::try_from(index.checked_sub(1)?).ok()?;
        self.groups.get(slot)
    }

    /// Mark a group as closed; backreferences may target it from here on
    pub fn close_group(&mut self, index: u32) {
        let slot = index.checked_sub(1).and_then(|i| usize::try_from(i).ok());
        if let Some(info) = slot.and_then(|i| self.groups.get_mut(i)) {
            info.closed = true;
        }
    }

    /// Get group number by name
    pub fn get_by_name(&self, name: &str) -> Option<u32> {
        self.name_to_index.get(name).copied()
    }

    /// Get the total number of capture groups
    pub fn group_count(&self) -> u32 {
        self.next_index - 1
    }

    /// Get all group infos, in number order
    pub fn groups(&self) -> &[GroupInfo] {
        &self.groups
    }

    /// Resolve a named backreference to its group number
    pub fn validate_backref_name(&self, name: &str) -> Result<u32, GroupRegistryError> {
        let index = self
            .get_by_name(name)
            .ok_or_else(|| GroupRegistryError::UndefinedBackreference(name.to_string()))?;
        self.check_closed(index)
    }

    /// Check that a numbered backreference names a group parsed so far
    pub fn validate_backref_number(&self, num: u32) -> Result<u32, GroupRegistryError> {
        if num == 0 || num >= self.next_index {
            return Err(GroupRegistryError::InvalidBackreference(num));
        }
        self.check_closed(num)
    }

    fn check_closed(&self, index: u32) -> Result<u32, GroupRegistryError> {
        match self.get_by_index(index) {
            Some(info) if info.closed => Ok(index),
            Some(_) => Err(GroupRegistryError::OpenGroupReference(index)),
            None => Err(GroupRegistryError::InvalidBackreference(index)),
        }
    }
}

/// Errors that can occur in the group registry
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GroupRegistryError {
    /// A group name is used more than once
    #[error("duplicate group name: {0}")]
    DuplicateGroupName(String),
    /// A backreference refers to a name that was never declared
    #[error("undefined backreference: {0}")]
    UndefinedBackreference(String),
    /// A backreference number has no matching group
    #[error("invalid backreference number: {0}")]
    InvalidBackreference(u32),
    /// A backreference from inside the group it refers to
    #[error("backreference to open group: {0}")]
    OpenGroupReference(u32),
}

impl From<GroupRegistryError> for SyntaxErrorKind {
    fn from(err: GroupRegistryError) -> Self {
        match err {
            GroupRegistryError::DuplicateGroupName(name) => SyntaxErrorKind::DuplicateGroupName(name),
            GroupRegistryError::UndefinedBackreference(name) => {
                SyntaxErrorKind::UnknownGroupName(name)
            }
            GroupRegistryError::InvalidBackreference(num) => {
                SyntaxErrorKind::InvalidGroupReference(num)
            }
            GroupRegistryError::OpenGroupReference(_) => SyntaxErrorKind::OpenGroupReference,
        }
    }
}
