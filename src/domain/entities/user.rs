use std::fmt;

/// Represents a chat user
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct User {
    pub id: String,
    pub name: String,
    pub global_name: Option<String>,
    pub is_bot: bool,
}

impl User {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            global_name: None,
            is_bot: false,
        }
    }

    pub fn with_global_name(mut self, global_name: impl Into<String>) -> Self {
        self.global_name = Some(global_name.into());
        self
    }

    pub fn display_name(&self) -> &str {
        self.global_name.as_deref().unwrap_or(&self.name)
    }
}

impl fmt::Display for User {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_name_prefers_global_name() {
        let user = User::new("1", "spooky");
        assert_eq!(user.display_name(), "spooky");

        let user = user.with_global_name("Spooky Dev");
        assert_eq!(user.display_name(), "Spooky Dev");
        assert_eq!(user.to_string(), "spooky (1)");
    }
}
