//! Screening agent configuration

use serde::Deserialize;

use super::error::ValidationError;
use crate::domain::screening::DialogueConfig;

/// Agent configuration
#[derive(Debug, Clone, Deserialize, Default)]
pub struct AgentConfig {
    /// Organization named in the opening line; generic opener when unset
    pub company_name: Option<String>,
}

impl AgentConfig {
    /// Dialogue settings with the default keyword lists
    pub fn dialogue_config(&self) -> DialogueConfig {
        let config = DialogueConfig::default();
        match &self.company_name {
            Some(name) => config.with_company_name(name.trim()),
            None => config,
        }
    }

    /// Validate agent configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self
            .company_name
            .as_ref()
            .is_some_and(|name| name.trim().is_empty())
        {
            return Err(ValidationError::EmptyCompanyName);
        }
        Ok(())
    }
}
