//! Candidate Timing
//!
//! Times one operation under the warm-up + fixed-cycle protocol:
//! one discarded warm-up call, then `cycles` calls measured as a single
//! wall-clock block. The reported value is the block time divided by
//! `cycles`.
//!
//! Any error or panic, including during warm-up, ends the measurement for
//! that candidate. The failure is logged and returned as
//! [`Elapsed::Failed`]; it never propagates to the caller. There are no
//! retries.

use crate::error::ConfigError;
use crate::measure::Timer;
use crate::measurement::{Elapsed, Failure, FailurePhase, Measurement};
use futures::FutureExt;
use std::any::Any;
use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::time::Duration;
use tracing::{debug, error, info};

/// Default number of measured cycles
pub const DEFAULT_CYCLES: u32 = 10;

/// Validated timing parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimingConfig {
    cycles: u32,
}

impl TimingConfig {
    /// Create a config with `cycles` measured cycles (must be positive)
    pub fn new(cycles: i64) -> Result<Self, ConfigError> {
        match u32::try_from(cycles) {
            Ok(cycles) if cycles > 0 => Ok(Self { cycles }),
            _ => Err(ConfigError::InvalidCycles(cycles)),
        }
    }

    /// Number of measured cycles (warm-up excluded)
    pub fn cycles(&self) -> u32 {
        self.cycles
    }
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            cycles: DEFAULT_CYCLES,
        }
    }
}

/// Time `operation` and return its measurement.
///
/// The operation is invoked `config.cycles() + 1` times on success. On the
/// first failure it is not invoked again.
pub async fn time_operation<F, Fut>(name: &str, mut operation: F, config: &TimingConfig) -> Measurement
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<(), Failure>>,
{
    let cycles = config.cycles();

    let elapsed = match run_cycles(name, &mut operation, cycles).await {
        Ok(total) => {
            let elapsed = Elapsed::from_total(total, cycles);
            info!(
                candidate = name,
                elapsed_ms = elapsed.millis().unwrap_or_default(),
                cycles,
                "{}: {}",
                name,
                elapsed
            );
            elapsed
        }
        Err(failure) => {
            error!(
                candidate = name,
                kind = %failure.kind,
                phase = %failure.phase,
                error = %failure.message,
                "{}: {}",
                name,
                failure.kind
            );
            Elapsed::Failed(failure)
        }
    };

    Measurement::new(name, elapsed)
}

async fn run_cycles<F, Fut>(name: &str, operation: &mut F, cycles: u32) -> Result<Duration, Failure>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<(), Failure>>,
{
    debug!(candidate = name, "warm-up");
    invoke(operation)
        .await
        .map_err(|f| f.in_phase(FailurePhase::WarmUp))?;

    let timer = Timer::start();
    for cycle in 1..=cycles {
        invoke(operation)
            .await
            .map_err(|f| f.in_phase(FailurePhase::Cycle(cycle)))?;
    }
    Ok(timer.stop())
}

/// Run one invocation, converting a panic into a crash.
///
/// The call itself happens inside the guarded future so a panic raised
/// before the first `.await` is caught too.
async fn invoke<F, Fut>(operation: &mut F) -> Result<(), Failure>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<(), Failure>>,
{
    match AssertUnwindSafe(async { operation().await })
        .catch_unwind()
        .await
    {
        Ok(result) => result,
        Err(panic) => Err(Failure::crashed(format!(
            "panicked: {}",
            panic_message(panic.as_ref())
        ))),
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "Unknown panic".to_string()
    }
}
