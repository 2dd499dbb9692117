//! Suite Runner
//!
//! A [`Suite`] is an ordered set of named candidates sharing one validator.
//! Running it times each candidate in registration order, strictly one after
//! another. Each candidate's operation is wrapped so its output passes
//! through the validator before the invocation counts as successful.
//!
//! ```text
//! Candidate (name, operation, exclude_when)
//!        │
//!        ▼
//!   excluded? ──yes──► skipped
//!        │ no
//!        ▼
//!  time_operation(operation ∘ validator)
//!        │
//!        ▼
//!   Measurement (registration order)
//! ```

use crate::error::ConfigError;
use crate::measurement::{Failure, Measurement};
use crate::timing::{TimingConfig, time_operation};
use futures::FutureExt;
use futures::future::LocalBoxFuture;
use std::collections::HashSet;
use std::future::Future;
use tracing::debug;

/// Future returned by a candidate operation
pub type CandidateFuture<T> = LocalBoxFuture<'static, anyhow::Result<T>>;

type Operation<T> = Box<dyn FnMut() -> CandidateFuture<T>>;
type ExclusionPredicate<P> = Box<dyn Fn(&P) -> bool>;
type Validator<T> = Box<dyn Fn(&T) -> anyhow::Result<()>>;

/// One named implementation under comparison
///
/// `T` is the operation's output, `P` the run parameters the exclusion
/// predicate inspects.
pub struct Candidate<T, P = ()> {
    name: String,
    operation: Operation<T>,
    exclude_when: Option<ExclusionPredicate<P>>,
}

impl<T: 'static, P> Candidate<T, P> {
    /// Create a candidate from a zero-argument async operation
    pub fn new<F, Fut>(name: impl Into<String>, mut operation: F) -> Self
    where
        F: FnMut() -> Fut + 'static,
        Fut: Future<Output = anyhow::Result<T>> + 'static,
    {
        Self {
            name: name.into(),
            operation: Box::new(move || operation().boxed_local()),
            exclude_when: None,
        }
    }

    /// Skip this candidate for runs where `predicate` holds
    pub fn exclude_when(mut self, predicate: impl Fn(&P) -> bool + 'static) -> Self {
        self.exclude_when = Some(Box::new(predicate));
        self
    }

    /// Candidate name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Whether the exclusion predicate rules this candidate out for `params`
    pub fn is_excluded(&self, params: &P) -> bool {
        self.exclude_when
            .as_ref()
            .is_some_and(|predicate| predicate(params))
    }
}

impl<T, P> std::fmt::Debug for Candidate<T, P> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Candidate")
            .field("name", &self.name)
            .field("has_exclusion", &self.exclude_when.is_some())
            .finish()
    }
}

/// Observer for suite progress
///
/// All methods default to no-ops.
pub trait SuiteProgress {
    /// A candidate is about to be timed
    fn candidate_started(&mut self, _name: &str) {}
    /// A candidate finished (timed or failed)
    fn candidate_finished(&mut self, _measurement: &Measurement) {}
    /// A candidate was excluded for this run
    fn candidate_skipped(&mut self, _name: &str) {}
}

/// Progress observer that ignores every event
#[derive(Debug, Default, Clone, Copy)]
pub struct NoProgress;

impl SuiteProgress for NoProgress {}

/// Measurements of one suite run
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SuiteRun {
    /// One measurement per timed candidate, in registration order
    pub measurements: Vec<Measurement>,
    /// Candidates excluded for this run, in registration order
    pub skipped: Vec<String>,
}

impl SuiteRun {
    /// Measurements whose candidate failed
    pub fn failures(&self) -> impl Iterator<Item = &Measurement> {
        self.measurements.iter().filter(|m| m.elapsed.is_failed())
    }
}

/// Ordered candidates plus the validator they share
pub struct Suite<T, P = ()> {
    candidates: Vec<Candidate<T, P>>,
    validator: Validator<T>,
}

impl<T: 'static, P> Suite<T, P> {
    /// Create an empty suite with the given output validator
    pub fn new(validator: impl Fn(&T) -> anyhow::Result<()> + 'static) -> Self {
        Self {
            candidates: Vec::new(),
            validator: Box::new(validator),
        }
    }

    /// Append a candidate (builder form)
    pub fn with_candidate(mut self, candidate: Candidate<T, P>) -> Self {
        self.candidates.push(candidate);
        self
    }

    /// Append a candidate
    pub fn push(&mut self, candidate: Candidate<T, P>) {
        self.candidates.push(candidate);
    }

    /// Keep only candidates whose name satisfies `keep`
    pub fn retain(&mut self, mut keep: impl FnMut(&str) -> bool) {
        self.candidates.retain(|c| keep(&c.name));
    }

    /// Candidate names in registration order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.candidates.iter().map(|c| c.name.as_str())
    }

    /// Number of registered candidates
    pub fn len(&self) -> usize {
        self.candidates.len()
    }

    /// Whether no candidates are registered
    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }

    /// Check structural invariants: names are non-empty and unique
    pub fn check(&self) -> Result<(), ConfigError> {
        let mut seen = HashSet::with_capacity(self.candidates.len());
        for candidate in &self.candidates {
            if candidate.name.is_empty() {
                return Err(ConfigError::EmptyCandidateName);
            }
            if !seen.insert(candidate.name.as_str()) {
                return Err(ConfigError::DuplicateCandidate(candidate.name.clone()));
            }
        }
        Ok(())
    }

    /// Run every candidate not excluded for `params`
    pub async fn run(&mut self, params: &P, config: &TimingConfig) -> Result<SuiteRun, ConfigError> {
        self.run_with_progress(params, config, &mut NoProgress).await
    }

    /// Run every candidate not excluded for `params`, reporting progress.
    ///
    /// Structural errors are returned before any candidate runs. Candidate
    /// failures are recorded in the returned measurements.
    pub async fn run_with_progress(
        &mut self,
        params: &P,
        config: &TimingConfig,
        progress: &mut dyn SuiteProgress,
    ) -> Result<SuiteRun, ConfigError> {
        self.check()?;

        let validator = &self.validator;
        let mut run = SuiteRun::default();

        for candidate in self.candidates.iter_mut() {
            if candidate.is_excluded(params) {
                debug!(candidate = %candidate.name, "excluded for this run");
                progress.candidate_skipped(&candidate.name);
                run.skipped.push(candidate.name.clone());
                continue;
            }

            progress.candidate_started(&candidate.name);

            let operation = &mut candidate.operation;
            let measurement = time_operation(
                &candidate.name,
                || {
                    let pending = operation();
                    async move {
                        let output = pending
                            .await
                            .map_err(|e| Failure::crashed(format!("{:#}", e)))?;
                        validator(&output).map_err(|e| Failure::rejected(format!("{:#}", e)))
                    }
                },
                config,
            )
            .await;

            progress.candidate_finished(&measurement);
            run.measurements.push(measurement);
        }

        Ok(run)
    }
}

impl<T, P> std::fmt::Debug for Suite<T, P> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Suite")
            .field("candidates", &self.candidates)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::FailureKind;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn sum_is(expected: u64) -> impl Fn(&Vec<u64>) -> anyhow::Result<()> {
        move |rows: &Vec<u64>| {
            let sum: u64 = rows.iter().sum();
            anyhow::ensure!(sum == expected, "Test Failed. Sum: {}", sum);
            Ok(())
        }
    }

    fn fast_config() -> TimingConfig {
        TimingConfig::new(2).unwrap()
    }

    #[tokio::test]
    async fn test_measurements_follow_registration_order() {
        let mut suite: Suite<Vec<u64>> = Suite::new(sum_is(6))
            .with_candidate(Candidate::new("zeta", || async { Ok(vec![1, 2, 3]) }))
            .with_candidate(Candidate::new("alpha", || async { Ok(vec![3, 3]) }));

        let run = suite.run(&(), &fast_config()).await.unwrap();

        let names: Vec<_> = run.measurements.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(names, ["zeta", "alpha"]);
        assert!(run.measurements.iter().all(|m| !m.elapsed.is_failed()));
        assert!(run.skipped.is_empty());
    }

    #[tokio::test]
    async fn test_crash_does_not_stop_other_candidates() {
        let mut suite: Suite<Vec<u64>> = Suite::new(sum_is(1))
            .with_candidate(Candidate::new("crashes", || async {
                Err(anyhow::anyhow!("stream closed"))
            }))
            .with_candidate(Candidate::new("works", || async { Ok(vec![1]) }));

        let run = suite.run(&(), &fast_config()).await.unwrap();

        assert_eq!(run.measurements.len(), 2);
        let crash = run.measurements[0].elapsed.failure().unwrap();
        assert_eq!(crash.kind, FailureKind::Crashed);
        assert!(crash.message.contains("stream closed"));
        assert!(run.measurements[1].elapsed.millis().is_some());
        assert_eq!(run.failures().count(), 1);
    }

    #[tokio::test]
    async fn test_validator_rejection_is_a_failure() {
        let mut suite: Suite<Vec<u64>> = Suite::new(sum_is(10))
            .with_candidate(Candidate::new("off-by-one", || async { Ok(vec![1, 2, 3, 3]) }));

        let run = suite.run(&(), &fast_config()).await.unwrap();

        let failure = run.measurements[0].elapsed.failure().unwrap();
        assert_eq!(failure.kind, FailureKind::Rejected);
        assert!(failure.message.contains("Sum: 9"));
    }

    #[tokio::test]
    async fn test_exclusion_predicate_skips_candidate() {
        let calls = Rc::new(RefCell::new(0));
        let counter = Rc::clone(&calls);

        let mut suite: Suite<Vec<u64>, u64> = Suite::new(|_rows: &Vec<u64>| Ok(()))
            .with_candidate(
                Candidate::new("small-only", move || {
                    *counter.borrow_mut() += 1;
                    async { Ok(vec![]) }
                })
                .exclude_when(|rows: &u64| *rows > 10_000),
            )
            .with_candidate(Candidate::new("always", || async { Ok(vec![]) }));

        let run = suite.run(&100_000, &fast_config()).await.unwrap();
        assert_eq!(run.skipped, ["small-only"]);
        assert_eq!(run.measurements.len(), 1);
        assert_eq!(*calls.borrow(), 0);

        let run = suite.run(&10, &fast_config()).await.unwrap();
        assert!(run.skipped.is_empty());
        assert_eq!(run.measurements.len(), 2);
        assert_eq!(*calls.borrow(), 3);
    }

    #[tokio::test]
    async fn test_duplicate_names_fail_before_running() {
        let calls = Rc::new(RefCell::new(0));
        let counter = Rc::clone(&calls);

        let mut suite: Suite<Vec<u64>> = Suite::new(|_rows: &Vec<u64>| Ok(()))
            .with_candidate(Candidate::new("same", move || {
                *counter.borrow_mut() += 1;
                async { Ok(vec![]) }
            }))
            .with_candidate(Candidate::new("same", || async { Ok(vec![]) }));

        let err = suite.run(&(), &fast_config()).await.unwrap_err();
        assert_eq!(err, ConfigError::DuplicateCandidate("same".to_string()));
        assert_eq!(*calls.borrow(), 0);
    }

    #[tokio::test]
    async fn test_empty_suite_yields_empty_run() {
        let mut suite: Suite<Vec<u64>> = Suite::new(|_rows: &Vec<u64>| Ok(()));
        let run = suite.run(&(), &fast_config()).await.unwrap();
        assert_eq!(run, SuiteRun::default());
    }

    #[derive(Default)]
    struct Recorder {
        events: Vec<String>,
    }

    impl SuiteProgress for Recorder {
        fn candidate_started(&mut self, name: &str) {
            self.events.push(format!("start {}", name));
        }
        fn candidate_finished(&mut self, measurement: &Measurement) {
            self.events.push(format!("done {}", measurement.name));
        }
        fn candidate_skipped(&mut self, name: &str) {
            self.events.push(format!("skip {}", name));
        }
    }

    #[tokio::test]
    async fn test_progress_events_are_sequential() {
        let mut suite: Suite<Vec<u64>, bool> = Suite::new(|_rows: &Vec<u64>| Ok(()))
            .with_candidate(Candidate::new("a", || async { Ok(vec![]) }))
            .with_candidate(Candidate::new("b", || async { Ok(vec![]) }).exclude_when(|q: &bool| *q))
            .with_candidate(Candidate::new("c", || async { Ok(vec![]) }));

        let mut recorder = Recorder::default();
        suite
            .run_with_progress(&true, &fast_config(), &mut recorder)
            .await
            .unwrap();

        assert_eq!(
            recorder.events,
            ["start a", "done a", "skip b", "start c", "done c"]
        );
    }

    #[test]
    fn test_retain_filters_by_name() {
        let mut suite: Suite<Vec<u64>> = Suite::new(|_rows: &Vec<u64>| Ok(()))
            .with_candidate(Candidate::new("csv-reader", || async { Ok(vec![]) }))
            .with_candidate(Candidate::new("str-split", || async { Ok(vec![]) }));

        suite.retain(|name| name.starts_with("csv"));
        assert_eq!(suite.names().collect::<Vec<_>>(), ["csv-reader"]);
        assert_eq!(suite.len(), 1);
    }
}
