/// Static metadata describing an action type.
///
/// The registry keys actions by [`ActionMetadata::key`], which is the name
/// callers pass to `get_action_by_name`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionMetadata {
    /// Unique key identifying this action (e.g. `"runScript"`).
    pub key: String,
    /// Human-readable display name.
    pub name: String,
    /// Short description of what this action does.
    pub description: String,
    /// Owning plugin / grouping (e.g. `"database"`).
    pub category: String,
}

impl ActionMetadata {
    /// Create metadata with the minimum required fields.
    pub fn new(
        key: impl Into<String>,
        name: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            key: key.into(),
            name: name.into(),
            description: description.into(),
            category: String::new(),
        }
    }

    /// Set the category for this action.
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = category.into();
        self
    }
}
