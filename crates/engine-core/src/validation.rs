use serde::Serialize;
use std::fmt;

/// One structured validation failure: where, and what is wrong.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Violation {
    pub path: String,
    pub message: String,
}

impl Violation {
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.path, self.message)
    }
}

pub type Rule<T> = Box<dyn Fn(&T) -> Vec<Violation> + Send + Sync>;

/// A composable set of validation rules. Rules are plain closures returning
/// violation lists; validation runs them all and concatenates, so a caller
/// gets every problem at once instead of the first.
pub struct RuleSet<T> {
    rules: Vec<Rule<T>>,
}

impl<T> Default for RuleSet<T> {
    fn default() -> Self {
        Self { rules: Vec::new() }
    }
}

impl<T> RuleSet<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn rule(
        mut self,
        check: impl Fn(&T) -> Vec<Violation> + Send + Sync + 'static,
    ) -> Self {
        self.rules.push(Box::new(check));
        self
    }

    pub fn validate(&self, value: &T) -> Vec<Violation> {
        self.rules.iter().flat_map(|rule| rule(value)).collect()
    }
}

/// Violation for a blank string at `path`, if any.
pub fn require_non_blank(path: &str, value: &str) -> Vec<Violation> {
    if value.trim().is_empty() {
        vec![Violation::new(path, "must not be blank")]
    } else {
        vec![]
    }
}

/// Violation for a value below `min` at `path`, if any.
pub fn require_at_least(path: &str, value: u64, min: u64) -> Vec<Violation> {
    if value < min {
        vec![Violation::new(path, format!("must be at least {min}"))]
    } else {
        vec![]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Config {
        name: String,
        batch_size: u64,
    }

    fn rules() -> RuleSet<Config> {
        RuleSet::new()
            .rule(|c: &Config| require_non_blank("name", &c.name))
            .rule(|c: &Config| require_at_least("batch_size", c.batch_size, 1))
    }

    #[test]
    fn collects_all_violations() {
        let violations = rules().validate(&Config {
            name: "  ".into(),
            batch_size: 0,
        });

        assert_eq!(violations.len(), 2);
        assert_eq!(violations[0].path, "name");
        assert_eq!(violations[1].path, "batch_size");
    }

    #[test]
    fn valid_value_passes() {
        let violations = rules().validate(&Config {
            name: "compute".into(),
            batch_size: 100,
        });
        assert!(violations.is_empty());
    }
}
