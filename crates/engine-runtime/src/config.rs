use engine_core::validation::{RuleSet, Violation, require_at_least, require_non_blank};
use engine_processing::tasklet::compute_completeness::DEFAULT_BATCH_SIZE;
use model::core::identifiers::FamilyCode;
use std::collections::HashSet;

/// Configuration of one compute-completeness job. Validated in full before
/// a job is built; an invalid configuration reports every violation at
/// once, not just the first.
#[derive(Debug, Clone)]
pub struct JobConfig {
    pub job_name: String,
    pub family_codes: Vec<FamilyCode>,
    pub batch_size: usize,
}

impl JobConfig {
    pub fn new(job_name: impl Into<String>, family_codes: Vec<FamilyCode>) -> Self {
        Self {
            job_name: job_name.into(),
            family_codes,
            batch_size: DEFAULT_BATCH_SIZE,
        }
    }

    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size;
        self
    }

    fn rules() -> RuleSet<JobConfig> {
        RuleSet::new()
            .rule(|c: &JobConfig| require_non_blank("job_name", &c.job_name))
            .rule(|c: &JobConfig| require_at_least("batch_size", c.batch_size as u64, 1))
            .rule(|c: &JobConfig| {
                if c.family_codes.is_empty() {
                    vec![Violation::new(
                        "family_codes",
                        "must name at least one family",
                    )]
                } else {
                    vec![]
                }
            })
            .rule(|c: &JobConfig| {
                c.family_codes
                    .iter()
                    .enumerate()
                    .flat_map(|(i, code)| {
                        require_non_blank(&format!("family_codes[{i}]"), code.as_str())
                    })
                    .collect()
            })
            .rule(|c: &JobConfig| {
                let mut seen = HashSet::new();
                c.family_codes
                    .iter()
                    .filter(|code| !seen.insert(*code))
                    .map(|code| {
                        Violation::new("family_codes", format!("duplicate code '{code}'"))
                    })
                    .collect()
            })
    }

    pub fn validate(&self) -> Vec<Violation> {
        Self::rules().validate(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_batch_size_is_applied() {
        let config = JobConfig::new("nightly", vec!["shoes".into()]);
        assert_eq!(config.batch_size, 100);
        assert!(config.validate().is_empty());
    }

    #[test]
    fn all_violations_reported_together() {
        let config = JobConfig::new("  ", vec![]).with_batch_size(0);
        let violations = config.validate();

        let paths: Vec<&str> = violations.iter().map(|v| v.path.as_str()).collect();
        assert!(paths.contains(&"job_name"));
        assert!(paths.contains(&"batch_size"));
        assert!(paths.contains(&"family_codes"));
    }

    #[test]
    fn duplicate_and_blank_codes_are_rejected() {
        let config = JobConfig::new(
            "nightly",
            vec!["shoes".into(), " ".into(), "shoes".into()],
        );
        let violations = config.validate();

        assert!(violations.iter().any(|v| v.path == "family_codes[1]"));
        assert!(
            violations
                .iter()
                .any(|v| v.message.contains("duplicate code 'shoes'"))
        );
    }
}
