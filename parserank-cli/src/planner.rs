//! Suite Planner
//!
//! Builds the execution plan by filtering configured suites.
//!
//! Filtering options:
//! - Regex pattern matching on suite name
//! - Regex pattern matching on candidate name (applied per suite at run time)
//!
//! Ordering: suites run in configuration order, candidates in registration order.

use crate::config::SuiteConfig;
use regex::Regex;

/// Execution plan for suites
#[derive(Debug, Clone)]
pub struct ExecutionPlan {
    /// Ordered list of suites to run
    pub suites: Vec<SuiteConfig>,
    /// Candidate name filter
    pub candidate_filter: Option<Regex>,
}

impl ExecutionPlan {
    /// Whether a candidate passes the name filter
    pub fn selects_candidate(&self, name: &str) -> bool {
        self.candidate_filter
            .as_ref()
            .is_none_or(|re| re.is_match(name))
    }
}

/// Build execution plan from configured suites
pub fn build_plan(
    suites: &[SuiteConfig],
    suite_filter: Option<&Regex>,
    candidate_filter: Option<Regex>,
) -> ExecutionPlan {
    let suites = suites
        .iter()
        .filter(|s| suite_filter.is_none_or(|re| re.is_match(&s.name)))
        .cloned()
        .collect();

    ExecutionPlan {
        suites,
        candidate_filter,
    }
}
