//! Marshalling work onto the UI thread.
//!
//! The [`UiDispatcher`] lives on the UI thread and owns the receiving end of
//! a job queue. Any thread can hold a cloned [`UiHandle`] and post closures;
//! the host's event loop drains them with [`UiDispatcher::process_pending`].

use crossbeam_channel::{Receiver, Sender};

use crate::error::DispatchError;
use crate::logging::targets;
use crate::thread_check::ThreadAffinity;

type Job = Box<dyn FnOnce() + Send + 'static>;

/// The UI-thread side of the job queue.
pub struct UiDispatcher {
    sender: Sender<Job>,
    receiver: Receiver<Job>,
    affinity: ThreadAffinity,
}

impl Default for UiDispatcher {
    fn default() -> Self {
        Self::new()
    }
}

impl UiDispatcher {
    /// Create a dispatcher bound to the calling thread.
    pub fn new() -> Self {
        let (sender, receiver) = crossbeam_channel::unbounded();
        Self {
            sender,
            receiver,
            affinity: ThreadAffinity::current(),
        }
    }

    /// A cloneable handle for posting work from any thread.
    pub fn handle(&self) -> UiHandle {
        UiHandle {
            sender: self.sender.clone(),
            affinity: self.affinity,
        }
    }

    /// The thread this dispatcher drains on.
    pub fn affinity(&self) -> ThreadAffinity {
        self.affinity
    }

    /// Check if any jobs are waiting.
    pub fn has_pending(&self) -> bool {
        !self.receiver.is_empty()
    }

    /// Get the number of waiting jobs.
    pub fn pending_count(&self) -> usize {
        self.receiver.len()
    }

    /// Run every job that is queued right now.
    ///
    /// Jobs posted while draining are left for the next call. Returns the
    /// number of jobs run.
    pub fn process_pending(&self) -> usize {
        self.affinity
            .debug_assert_same_thread("UiDispatcher must be drained on its own thread");

        let count = self.receiver.len();
        let mut processed = 0;
        while processed < count {
            match self.receiver.try_recv() {
                Ok(job) => {
                    job();
                    processed += 1;
                }
                Err(_) => break,
            }
        }

        if processed > 0 {
            tracing::trace!(target: targets::DISPATCH, processed, "processed UI jobs");
        }
        processed
    }
}

impl std::fmt::Debug for UiDispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UiDispatcher")
            .field("pending", &self.receiver.len())
            .field("affinity", &self.affinity)
            .finish()
    }
}

/// A handle for posting work to the UI thread.
#[derive(Clone, Debug)]
pub struct UiHandle {
    sender: Sender<Job>,
    affinity: ThreadAffinity,
}

impl UiHandle {
    /// Returns `true` if the caller is already on the UI thread.
    pub fn is_ui_thread(&self) -> bool {
        self.affinity.is_same_thread()
    }

    /// Queue a job to run on the UI thread at the next drain.
    pub fn post<F>(&self, job: F) -> Result<(), DispatchError>
    where
        F: FnOnce() + Send + 'static,
    {
        self.sender
            .send(Box::new(job))
            .map_err(|_| DispatchError::Disconnected)
    }

    /// Run the job inline when on the UI thread, otherwise queue it.
    pub fn run_or_post<F>(&self, job: F) -> Result<(), DispatchError>
    where
        F: FnOnce() + Send + 'static,
    {
        if self.is_ui_thread() {
            job();
            Ok(())
        } else {
            self.post(job)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[test]
    fn test_post_from_background_thread() {
        let dispatcher = UiDispatcher::new();
        let handle = dispatcher.handle();
        let ran_on = Arc::new(parking_lot::Mutex::new(None));

        let ran_on_clone = ran_on.clone();
        std::thread::spawn(move || {
            handle
                .post(move || {
                    *ran_on_clone.lock() = Some(std::thread::current().id());
                })
                .unwrap();
        })
        .join()
        .unwrap();

        assert!(ran_on.lock().is_none());
        assert_eq!(dispatcher.pending_count(), 1);
        assert_eq!(dispatcher.process_pending(), 1);
        assert_eq!(*ran_on.lock(), Some(std::thread::current().id()));
        assert!(!dispatcher.has_pending());
    }

    #[test]
    fn test_run_or_post_inline_on_ui_thread() {
        let dispatcher = UiDispatcher::new();
        let count = Arc::new(AtomicUsize::new(0));

        let count_clone = count.clone();
        dispatcher
            .handle()
            .run_or_post(move || {
                count_clone.fetch_add(1, Ordering::SeqCst);
            })
            .unwrap();

        assert_eq!(count.load(Ordering::SeqCst), 1);
        assert_eq!(dispatcher.process_pending(), 0);
    }

    #[test]
    fn test_post_after_dispatcher_dropped() {
        let dispatcher = UiDispatcher::new();
        let handle = dispatcher.handle();
        drop(dispatcher);

        assert_eq!(handle.post(|| {}), Err(DispatchError::Disconnected));
    }

    #[test]
    fn test_jobs_posted_while_draining_wait() {
        let dispatcher = UiDispatcher::new();
        let handle = dispatcher.handle();

        let inner_handle = handle.clone();
        handle
            .post(move || {
                inner_handle.post(|| {}).unwrap();
            })
            .unwrap();

        assert_eq!(dispatcher.process_pending(), 1);
        assert_eq!(dispatcher.process_pending(), 1);
        assert_eq!(dispatcher.process_pending(), 0);
    }
}
