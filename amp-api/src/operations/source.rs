//! Source command

use amp_state::SourceId;
use serde::{Deserialize, Serialize};

use super::{check_name, Validate};
use crate::error::ValidationError;

/// Partial update of one input; absent fields stay as they are
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SetSource {
    pub id: SourceId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, alias = "digital", skip_serializing_if = "Option::is_none")]
    pub is_digital: Option<bool>,
}

impl SetSource {
    pub fn new(id: SourceId) -> Self {
        Self {
            id,
            name: None,
            is_digital: None,
        }
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn digital(mut self, is_digital: bool) -> Self {
        self.is_digital = Some(is_digital);
        self
    }
}

impl Validate for SetSource {
    fn validate_boundary(&self) -> Result<(), ValidationError> {
        check_name("name", self.name.as_deref())
    }
}
