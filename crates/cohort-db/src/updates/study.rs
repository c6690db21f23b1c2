//! Study update builder.
//!
//! Covers descriptive fields only. `state` and `public` have no setter here;
//! they move through `CohortService::execute_transition`.

use serde::Serialize;

#[derive(Debug, Clone, Default, Serialize)]
pub struct StudyUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub short_description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub long_description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub criteria: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contact_info: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub blocks: Option<serde_json::Value>,
}

impl StudyUpdate {
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.short_description.is_none()
            && self.long_description.is_none()
            && self.criteria.is_none()
            && self.duration.is_none()
            && self.contact_info.is_none()
            && self.image.is_none()
            && self.blocks.is_none()
    }
}

pub struct StudyUpdateBuilder(StudyUpdate);

impl StudyUpdateBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self(StudyUpdate::default())
    }

    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.0.name = Some(name.into());
        self
    }

    #[must_use]
    pub fn short_description(mut self, text: impl Into<String>) -> Self {
        self.0.short_description = Some(text.into());
        self
    }

    #[must_use]
    pub fn long_description(mut self, text: impl Into<String>) -> Self {
        self.0.long_description = Some(text.into());
        self
    }

    #[must_use]
    pub fn criteria(mut self, criteria: impl Into<String>) -> Self {
        self.0.criteria = Some(criteria.into());
        self
    }

    #[must_use]
    pub fn duration(mut self, duration: impl Into<String>) -> Self {
        self.0.duration = Some(duration.into());
        self
    }

    #[must_use]
    pub fn contact_info(mut self, contact: impl Into<String>) -> Self {
        self.0.contact_info = Some(contact.into());
        self
    }

    #[must_use]
    pub fn image(mut self, image: Option<String>) -> Self {
        self.0.image = Some(image);
        self
    }

    #[must_use]
    pub fn blocks(mut self, blocks: serde_json::Value) -> Self {
        self.0.blocks = Some(blocks);
        self
    }

    #[must_use]
    pub fn build(self) -> StudyUpdate {
        self.0
    }
}

impl Default for StudyUpdateBuilder {
    fn default() -> Self {
        Self::new()
    }
}
