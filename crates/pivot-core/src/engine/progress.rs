/// Events emitted while a chain is mixed or sampled.
#[derive(Debug, Clone, PartialEq)]
pub enum Progress {
    PhaseStart {
        name: &'static str,
    },
    PhaseFinish,

    /// A sweep of `iterations` pivot attempts is starting.
    SweepStart {
        iterations: u64,
    },
    /// `iterations` more attempts completed; `accepted` is the running total
    /// of accepted pivots in the current sweep.
    SweepAdvance {
        iterations: u64,
        accepted: u64,
    },
    SweepFinish {
        attempted: u64,
        accepted: u64,
    },

    /// Observation `index` (1-based) of `total` was recorded.
    SampleRecorded {
        index: usize,
        total: usize,
    },
    Message(String),
}

pub type ProgressCallback<'a> = Box<dyn Fn(Progress) + Send + Sync + 'a>;

/// Forwards [`Progress`] events to an optional listener.
#[derive(Default)]
pub struct ProgressReporter<'a> {
    callback: Option<ProgressCallback<'a>>,
}

impl<'a> ProgressReporter<'a> {
    /// A reporter that drops every event.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_callback(callback: ProgressCallback<'a>) -> Self {
        Self {
            callback: Some(callback),
        }
    }

    pub fn is_listening(&self) -> bool {
        self.callback.is_some()
    }

    #[inline]
    pub fn report(&self, event: Progress) {
        if let Some(cb) = &self.callback {
            cb(event);
        }
    }
}
