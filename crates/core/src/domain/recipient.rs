// Recipient Domain Model

use super::error::{DomainError, Result};
use std::collections::HashMap;

/// Reserved group name; notifications to this group never copy the oversight address
pub const GROUP_RECIPIENT_NAME: &str = "Drivers";

/// A person (or group mailbox) that receives notifications
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Recipient {
    pub name: String,
    pub email: String,
}

impl Recipient {
    pub fn new(name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
        }
    }

    /// True for the reserved group recipient
    pub fn is_group(&self) -> bool {
        self.name == GROUP_RECIPIENT_NAME
    }

    pub fn validate(&self) -> Result<()> {
        validate_address(&self.email)
    }
}

/// Tag -> recipient routing table (read-only once loaded)
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecipientRules(HashMap<String, Recipient>);

impl RecipientRules {
    pub fn new(rules: HashMap<String, Recipient>) -> Self {
        Self(rules)
    }

    /// Look up the recipient for an exact tag
    pub fn get(&self, tag: &str) -> Option<&Recipient> {
        self.0.get(tag)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Validate every rule's address
    pub fn validate(&self) -> Result<()> {
        for (tag, recipient) in &self.0 {
            recipient.validate().map_err(|_| {
                DomainError::InvalidRecipient(format!("{} (tag '{}')", recipient.email, tag))
            })?;
        }
        Ok(())
    }
}

impl FromIterator<(String, Recipient)> for RecipientRules {
    fn from_iter<I: IntoIterator<Item = (String, Recipient)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Minimal shape check for a mailbox address (`local@domain`)
pub fn validate_address(address: &str) -> Result<()> {
    match address.split_once('@') {
        Some((local, domain))
            if !local.is_empty()
                && !domain.is_empty()
                && !domain.contains('@')
                && !address.chars().any(char::is_whitespace) =>
        {
            Ok(())
        }
        _ => Err(DomainError::InvalidRecipient(address.to_string())),
    }
}
