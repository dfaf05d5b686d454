//! the external helper process, the preferred source of metrics.

use {
    std::{
        collections::VecDeque,
        io::{self, Read},
        path::PathBuf,
        process::{Command, ExitStatus, Stdio},
        sync::{
            Mutex, PoisonError,
            mpsc::{self, RecvTimeoutError},
        },
        thread,
        time::{Duration, Instant},
    },
    tracing::trace,
};

/// a source of the helper's json emission.
pub trait HelperSource {
    /// runs the helper once, returning what it wrote to stdout.
    fn emit(&self) -> Result<Vec<u8>, HelperError>;
}

/// runs the helper as `<path> metrics --json --once`.
#[derive(Clone, Debug)]
pub struct HelperProcess {
    path: PathBuf,
    timeout: Duration,
}

/// a mock helper, replaying canned emissions.
#[derive(Default)]
pub struct MockHelper {
    emissions: Mutex<VecDeque<Result<Vec<u8>, HelperError>>>,
}

#[derive(Debug, thiserror::Error)]
pub enum HelperError {
    #[error("no helper at {}", .0.display())]
    Unavailable(PathBuf),
    #[error("failed to run helper: {0}")]
    Spawn(#[source] io::Error),
    #[error("helper did not finish within {0:?}")]
    Timeout(Duration),
    #[error("helper exited unsuccessfully: {0}")]
    Exit(ExitStatus),
    #[error("failed to read helper output: {0}")]
    Output(#[source] io::Error),
    #[error("helper output is not valid json: {0}")]
    Malformed(#[from] serde_json::Error),
}

// === impl HelperProcess ===

impl HelperProcess {
    /// the arguments requesting a single json emission.
    pub const ARGS: [&str; 3] = ["metrics", "--json", "--once"];

    /// how often the child is polled for completion.
    const POLL: Duration = Duration::from_millis(10);

    pub fn new(path: impl Into<PathBuf>, timeout: Duration) -> Self {
        Self {
            path: path.into(),
            timeout,
        }
    }
}

impl HelperSource for HelperProcess {
    fn emit(&self) -> Result<Vec<u8>, HelperError> {
        let Self { path, timeout } = self;

        if !path.is_file() {
            return Err(HelperError::Unavailable(path.clone()));
        }

        let mut child = Command::new(path)
            .args(Self::ARGS)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .spawn()
            .map_err(HelperError::Spawn)?;

        // drain stdout as it is written, so a chatty helper cannot fill the pipe and stall.
        let (tx, rx) = mpsc::channel();
        if let Some(mut stdout) = child.stdout.take() {
            thread::spawn(move || {
                let mut out = Vec::new();
                let _ = tx.send(stdout.read_to_end(&mut out).map(|_| out));
            });
        }

        let start = Instant::now();
        let status = loop {
            match child.try_wait().map_err(HelperError::Spawn)? {
                Some(status) => break status,
                None if start.elapsed() >= *timeout => {
                    // the child may have exited in the meantime, so both are best-effort.
                    let _ = child.kill();
                    let _ = child.wait();
                    return Err(HelperError::Timeout(*timeout));
                }
                None => thread::sleep(Self::POLL),
            }
        };
        trace!(?status, elapsed = ?start.elapsed(), "helper exited");

        if !status.success() {
            return Err(HelperError::Exit(status));
        }

        // a descendant of the helper may still hold stdout open after the helper exits.
        match rx.recv_timeout(timeout.saturating_sub(start.elapsed())) {
            Ok(output) => output.map_err(HelperError::Output),
            Err(RecvTimeoutError::Timeout) => Err(HelperError::Timeout(*timeout)),
            Err(RecvTimeoutError::Disconnected) => Err(HelperError::Output(io::Error::other(
                "stdout reader stopped without output",
            ))),
        }
    }
}

// === impl MockHelper ===

impl HelperSource for MockHelper {
    fn emit(&self) -> Result<Vec<u8>, HelperError> {
        let Self { emissions } = self;

        emissions
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .pop_front()
            .unwrap_or_else(|| Err(HelperError::Unavailable(PathBuf::from("mock"))))
    }
}

impl MockHelper {
    /// queues an emission; once all are used, the helper is unavailable.
    pub fn push(&self, emission: Result<Vec<u8>, HelperError>) -> &Self {
        self.emissions
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push_back(emission);
        self
    }

    /// queues a successful emission of `json`.
    pub fn push_json(&self, json: &str) -> &Self {
        self.push(Ok(json.as_bytes().to_vec()))
    }
}
