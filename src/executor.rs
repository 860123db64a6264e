//! Background decode worker for animated images.
//!
//! A [`DecodeExecutor`] owns one named thread fed through a job queue. Hosts
//! create it, share it as `Arc<DecodeExecutor>` with every animated drawable,
//! and drop it (or call [`DecodeExecutor::shutdown`]) to stop the thread.

use std::panic::{self, AssertUnwindSafe};
use std::sync::mpsc::{self, Sender};
use std::sync::{Mutex, PoisonError};
use std::thread::{self, JoinHandle};

use calloop::ping::Ping;

/// Work run on the decode thread.
pub type Job = Box<dyn FnOnce() + Send + 'static>;

/// Errors returned by [`DecodeExecutor`].
#[derive(Debug, thiserror::Error)]
pub enum ExecutorError {
    #[error("decode executor has shut down")]
    ShutDown,
    #[error("failed to spawn decode thread: {0}")]
    Spawn(#[from] std::io::Error),
}

/// Configuration for the decode thread.
#[derive(Debug, Clone)]
pub struct ExecutorConfig {
    /// Name given to the worker thread
    pub thread_name: String,
    /// Worker stack size in bytes; `None` keeps the platform default
    pub stack_size: Option<usize>,
}

impl Default for ExecutorConfig {
    fn default() -> Self {
        Self {
            thread_name: "drawable-decode".to_string(),
            stack_size: None,
        }
    }
}

impl ExecutorConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn thread_name(mut self, name: impl Into<String>) -> Self {
        self.thread_name = name.into();
        self
    }

    pub fn stack_size(mut self, bytes: usize) -> Self {
        self.stack_size = Some(bytes);
        self
    }
}

/// Single-threaded job queue used to decode frames off the render thread.
pub struct DecodeExecutor {
    name: String,
    sender: Mutex<Option<Sender<Job>>>,
    worker: Mutex<Option<JoinHandle<()>>>,
}

impl DecodeExecutor {
    /// Spawn a worker with the default configuration.
    pub fn new() -> Result<Self, ExecutorError> {
        Self::with_config(ExecutorConfig::default())
    }

    pub fn with_config(config: ExecutorConfig) -> Result<Self, ExecutorError> {
        Self::spawn(config, None)
    }

    /// Spawn a worker that pings `waker` after every finished job, so an
    /// event loop sleeping in calloop wakes up to apply decoded frames.
    pub fn with_waker(config: ExecutorConfig, waker: Ping) -> Result<Self, ExecutorError> {
        Self::spawn(config, Some(waker))
    }

    fn spawn(config: ExecutorConfig, waker: Option<Ping>) -> Result<Self, ExecutorError> {
        let (sender, receiver) = mpsc::channel::<Job>();

        let mut builder = thread::Builder::new().name(config.thread_name.clone());
        if let Some(bytes) = config.stack_size {
            builder = builder.stack_size(bytes);
        }

        let name = config.thread_name.clone();
        let worker = builder.spawn(move || {
            log::debug!("{name}: started");
            for job in receiver {
                if panic::catch_unwind(AssertUnwindSafe(job)).is_err() {
                    log::warn!("{name}: decode job panicked");
                }
                if let Some(waker) = &waker {
                    waker.ping();
                }
            }
            log::debug!("{name}: stopped");
        })?;

        Ok(Self {
            name: config.thread_name,
            sender: Mutex::new(Some(sender)),
            worker: Mutex::new(Some(worker)),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Queue `job` behind every previously submitted job.
    pub fn submit<F>(&self, job: F) -> Result<(), ExecutorError>
    where
        F: FnOnce() + Send + 'static,
    {
        let sender = self.sender.lock().unwrap_or_else(PoisonError::into_inner);
        match sender.as_ref() {
            Some(sender) => sender
                .send(Box::new(job))
                .map_err(|_| ExecutorError::ShutDown),
            None => Err(ExecutorError::ShutDown),
        }
    }

    pub fn is_shut_down(&self) -> bool {
        self.sender
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .is_none()
    }

    /// Close the queue and wait for the jobs already queued to finish.
    /// Later submissions fail with [`ExecutorError::ShutDown`].
    pub fn shutdown(&self) {
        let sender = self
            .sender
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        drop(sender);

        let worker = self
            .worker
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        if let Some(worker) = worker {
            // A job dropping the last handle cannot join its own thread
            if worker.thread().id() != thread::current().id() && worker.join().is_err() {
                log::warn!("{}: worker exited with a panic", self.name);
            }
        }
    }
}

impl Drop for DecodeExecutor {
    fn drop(&mut self) {
        self.shutdown();
    }
}

impl std::fmt::Debug for DecodeExecutor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DecodeExecutor")
            .field("name", &self.name)
            .field("shut_down", &self.is_shut_down())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::mpsc::channel;
    use std::time::Duration;

    #[test]
    fn test_jobs_run_in_order_on_named_thread() {
        let executor = DecodeExecutor::with_config(ExecutorConfig::new().thread_name("decode-test"))
            .expect("spawn");
        let (tx, rx) = channel();
        for i in 0..3 {
            let tx = tx.clone();
            executor
                .submit(move || {
                    let name = thread::current().name().map(str::to_owned);
                    tx.send((i, name)).expect("send");
                })
                .expect("submit");
        }

        let received: Vec<_> = (0..3)
            .map(|_| rx.recv_timeout(Duration::from_secs(5)).expect("job ran"))
            .collect();
        assert_eq!(
            received,
            vec![
                (0, Some("decode-test".to_string())),
                (1, Some("decode-test".to_string())),
                (2, Some("decode-test".to_string())),
            ]
        );
    }

    #[test]
    fn test_submit_after_shutdown_fails() {
        let executor = DecodeExecutor::new().expect("spawn");
        executor.shutdown();
        assert!(executor.is_shut_down());
        assert!(matches!(executor.submit(|| {}), Err(ExecutorError::ShutDown)));
    }

    #[test]
    fn test_shutdown_drains_queued_jobs() {
        let executor = DecodeExecutor::new().expect("spawn");
        let (tx, rx) = channel();
        executor
            .submit(move || {
                thread::sleep(Duration::from_millis(20));
                tx.send(()).expect("send");
            })
            .expect("submit");
        executor.shutdown();
        assert!(rx.try_recv().is_ok());
    }

    #[test]
    fn test_panicking_job_does_not_kill_worker() {
        let executor = DecodeExecutor::new().expect("spawn");
        executor.submit(|| panic!("boom")).expect("submit");
        let (tx, rx) = channel();
        executor.submit(move || tx.send(()).expect("send")).expect("submit");
        assert!(rx.recv_timeout(Duration::from_secs(5)).is_ok());
    }
}
