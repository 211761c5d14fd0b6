use std::sync::{Mutex, mpsc};
use std::thread;

/// Why a batch could not be completed.
#[derive(Debug)]
pub enum PoolError {
    /// The operating system refused to start a worker thread.
    Spawn(std::io::Error),
    /// A worker died before reporting the result of job `job`.
    WorkerPanicked { worker: String, job: usize },
}

/// Fixed-size pool of named worker threads.
///
/// Jobs are queued on a channel that all workers pull from; results come back
/// on a second channel tagged with their job index, so the output order does
/// not depend on which worker finished first.
#[derive(Debug, Clone)]
pub struct WorkerPool {
    name: String,
    worker_count: usize,
}

impl WorkerPool {
    pub fn new(name: impl Into<String>, worker_count: usize) -> Self {
        Self { name: name.into(), worker_count: worker_count.max(1) }
    }

    pub fn worker_count(&self) -> usize {
        self.worker_count
    }

    /// Runs `work` on every job and returns the results in job order.
    ///
    /// Blocks until every worker has exited. Borrowed data captured by `work`
    /// is shared read-only between the workers.
    pub fn run<J, R, F>(&self, jobs: Vec<J>, work: F) -> Result<Vec<R>, PoolError>
    where
        J: Send,
        R: Send,
        F: Fn(J) -> R + Sync,
    {
        let job_count = jobs.len();
        if job_count == 0 {
            return Ok(Vec::new());
        }

        let (job_tx, job_rx) = mpsc::channel::<(usize, J)>();
        for job in jobs.into_iter().enumerate() {
            // The receiver is alive until the end of this function.
            let _ = job_tx.send(job);
        }
        drop(job_tx);
        let job_rx = Mutex::new(job_rx);

        let (result_tx, result_rx) = mpsc::channel::<(usize, R)>();
        let threads = self.worker_count.min(job_count);
        let mut results: Vec<Option<R>> = (0..job_count).map(|_| None).collect();
        let mut failed_worker: Option<String> = None;

        thread::scope(|scope| -> Result<(), PoolError> {
            let mut handles = Vec::with_capacity(threads);

            for worker in 0..threads {
                let result_tx = result_tx.clone();
                let job_rx = &job_rx;
                let work = &work;
                let worker_name = format!("{}-{}", self.name, worker);

                let spawned = thread::Builder::new().name(worker_name.clone()).spawn_scoped(scope, move || {
                    log::debug!("Worker {} started.", worker_name);
                    let mut done = 0usize;
                    loop {
                        // Lock only while taking the next job; the queue is already full.
                        let next = match job_rx.lock() {
                            Ok(rx) => rx.recv(),
                            Err(_) => break,
                        };
                        let Ok((index, job)) = next else { break };

                        if result_tx.send((index, work(job))).is_err() {
                            break;
                        }
                        done += 1;
                    }
                    log::debug!("Worker {} finished after {} jobs.", worker_name, done);
                });

                match spawned {
                    Ok(handle) => handles.push(handle),
                    Err(e) if handles.is_empty() => return Err(PoolError::Spawn(e)),
                    Err(e) => {
                        log::warn!("Could not start worker {} of pool '{}': {}. Continuing with {}.", worker, self.name, e, handles.len());
                        break;
                    }
                }
            }
            drop(result_tx);

            for (index, result) in result_rx.iter() {
                results[index] = Some(result);
            }

            for handle in handles {
                let worker = handle.thread().name().unwrap_or("unnamed").to_string();
                if handle.join().is_err() {
                    log::error!("Worker {} panicked.", worker);
                    failed_worker.get_or_insert(worker);
                }
            }
            Ok(())
        })?;

        if let Some(job) = results.iter().position(Option::is_none) {
            let worker = failed_worker.unwrap_or_else(|| self.name.clone());
            return Err(PoolError::WorkerPanicked { worker, job });
        }

        Ok(results.into_iter().flatten().collect())
    }
}
