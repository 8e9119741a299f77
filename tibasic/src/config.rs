//! Run configuration

/// Prompt shown by `Input NAME` when no prompt string is given
pub const DEFAULT_INPUT_PROMPT: &str = "?";

/// Settings for one interpreter session
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunConfig {
    /// Maximum number of statements a run may execute (`None` = unlimited)
    pub step_limit: Option<u64>,
    /// Prompt for a bare `Input NAME`
    pub default_input_prompt: String,
    /// Persist REPL history in the home directory
    pub history: bool,
}

impl RunConfig {
    pub fn new() -> Self {
        Self {
            step_limit: None,
            default_input_prompt: DEFAULT_INPUT_PROMPT.to_string(),
            history: true,
        }
    }

    /// Set the statement budget
    pub fn step_limit(mut self, limit: Option<u64>) -> Self {
        self.step_limit = limit;
        self
    }

    /// Set the prompt for a bare `Input`
    pub fn default_input_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.default_input_prompt = prompt.into();
        self
    }

    /// Enable or disable REPL history
    pub fn history(mut self, enabled: bool) -> Self {
        self.history = enabled;
        self
    }
}

impl Default for RunConfig {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = RunConfig::default();
        assert_eq!(config.step_limit, None);
        assert_eq!(config.default_input_prompt, "?");
        assert!(config.history);
    }

    #[test]
    fn test_builder() {
        let config = RunConfig::new()
            .step_limit(Some(100))
            .default_input_prompt("> ")
            .history(false);
        assert_eq!(config.step_limit, Some(100));
        assert_eq!(config.default_input_prompt, "> ");
        assert!(!config.history);
    }
}
