//! Background worker that runs rewrite requests off the UI thread.
//!
//! The UI thread hands a [`PendingRewrite`] to the worker and keeps
//! drawing; the worker performs the blocking call and sends the
//! [`CompletedRewrite`] back, which the UI thread applies on its next tick.

use crate::application::{CompletedRewrite, PendingRewrite};
use crate::domain::RewriteService;
use crossbeam_channel::{Receiver, RecvTimeoutError, Sender, TrySendError};
use std::io;
use std::thread;
use std::time::Duration;
use tracing::{debug, warn};

pub struct RewriteWorker {
    jobs: Option<Sender<PendingRewrite>>,
    completions: Receiver<CompletedRewrite>,
}

impl RewriteWorker {
    /// Starts the worker thread, which owns `service` from then on.
    pub fn spawn<S>(service: S) -> io::Result<Self>
    where
        S: RewriteService + Send + 'static,
    {
        // One job at a time; the processing lease already forbids more.
        let (job_tx, job_rx) = crossbeam_channel::bounded::<PendingRewrite>(1);
        let (done_tx, done_rx) = crossbeam_channel::unbounded();

        thread::Builder::new()
            .name("rewrite-worker".to_string())
            .spawn(move || {
                for job in job_rx.iter() {
                    debug!(chars = job.text().chars().count(), "worker picked up rewrite job");
                    let done = job.run(&service);
                    if done_tx.send(done).is_err() {
                        break;
                    }
                }
                debug!("rewrite worker stopped");
            })?;

        Ok(Self {
            jobs: Some(job_tx),
            completions: done_rx,
        })
    }

    /// Queues a job. Hands it back if the worker cannot take it.
    pub fn dispatch(&self, job: PendingRewrite) -> Result<(), PendingRewrite> {
        let Some(jobs) = &self.jobs else {
            return Err(job);
        };
        jobs.try_send(job).map_err(|err| {
            match &err {
                TrySendError::Full(_) => warn!("rewrite worker is busy"),
                TrySendError::Disconnected(_) => warn!("rewrite worker is gone"),
            }
            err.into_inner()
        })
    }

    /// Returns a finished job, if one is waiting.
    pub fn try_completion(&self) -> Option<CompletedRewrite> {
        self.completions.try_recv().ok()
    }

    /// Waits up to `timeout` for a finished job.
    pub fn wait_completion(&self, timeout: Duration) -> Option<CompletedRewrite> {
        match self.completions.recv_timeout(timeout) {
            Ok(done) => Some(done),
            Err(RecvTimeoutError::Timeout | RecvTimeoutError::Disconnected) => None,
        }
    }

    /// Closes the job queue. The thread exits after any request in flight.
    pub fn shutdown(&mut self) {
        self.jobs.take();
    }
}

impl Drop for RewriteWorker {
    fn drop(&mut self) {
        self.shutdown();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::SubmissionController;
    use crate::domain::{Notification, ServiceError, ServiceErrorKind};

    struct EchoService;

    impl RewriteService for EchoService {
        fn rewrite(&self, text: &str) -> Result<String, ServiceError> {
            Ok(text.to_uppercase())
        }
    }

    #[test]
    fn test_worker_round_trip() {
        let worker = RewriteWorker::spawn(EchoService).unwrap();
        let mut controller = SubmissionController::new();
        let mut sink: Vec<Notification> = Vec::new();
        controller.update_input("teks mentah");

        let job = controller.submit(&mut sink).unwrap();
        worker.dispatch(job).unwrap();
        assert!(controller.is_processing());

        let done = worker
            .wait_completion(Duration::from_secs(5))
            .expect("worker should answer");
        controller.complete(done, &mut sink).unwrap();

        assert_eq!(controller.output(), "TEKS MENTAH");
        assert!(!controller.is_processing());
        assert!(worker.try_completion().is_none());
    }

    struct FlakyService;

    impl RewriteService for FlakyService {
        fn rewrite(&self, text: &str) -> Result<String, ServiceError> {
            if text == "rusak" {
                panic!("service bug");
            }
            Ok(text.to_string())
        }
    }

    #[test]
    fn test_worker_survives_panicking_service() {
        let worker = RewriteWorker::spawn(FlakyService).unwrap();
        let mut controller = SubmissionController::new();
        let mut sink: Vec<Notification> = Vec::new();

        controller.update_input("rusak");
        worker.dispatch(controller.submit(&mut sink).unwrap()).unwrap();
        let done = worker
            .wait_completion(Duration::from_secs(5))
            .expect("worker should answer after a panic");
        assert_eq!(
            done.outcome().as_ref().unwrap_err().kind,
            ServiceErrorKind::WorkerUnavailable
        );
        controller.complete(done, &mut sink).unwrap_err();
        assert!(!controller.is_processing());
        assert_eq!(sink.last().unwrap().title, "Terjadi kesalahan");

        controller.update_input("utuh");
        worker.dispatch(controller.submit(&mut sink).unwrap()).unwrap();
        let done = worker.wait_completion(Duration::from_secs(5)).unwrap();
        controller.complete(done, &mut sink).unwrap();
        assert_eq!(controller.output(), "utuh");
    }

    #[test]
    fn test_dispatch_after_shutdown_returns_job() {
        let mut worker = RewriteWorker::spawn(EchoService).unwrap();
        worker.shutdown();

        let mut controller = SubmissionController::new();
        let mut sink: Vec<Notification> = Vec::new();
        controller.update_input("teks");

        let job = controller.submit(&mut sink).unwrap();
        let job = worker.dispatch(job).unwrap_err();
        assert_eq!(job.text(), "teks");

        controller
            .complete(job.abandon(ServiceError::worker_unavailable()), &mut sink)
            .unwrap_err();
        assert!(!controller.is_processing());
    }
}
