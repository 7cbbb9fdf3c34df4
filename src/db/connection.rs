use std::{
    path::{Path, PathBuf},
    sync::{mpsc, Arc, Mutex},
    thread::{self, JoinHandle},
    time::Duration,
};

use anyhow::{anyhow, Context, Result};
use log::{error, info, warn};
use rusqlite::{functions::FunctionFlags, Connection};
use tokio::sync::oneshot;

use super::migrations::run_migrations;

const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

type Job = Box<dyn FnOnce(&mut Connection) + Send + 'static>;

enum Message {
    Run(Job),
    Close,
}

/// Owns the worker thread; the last clone of [`Database`] to go away closes it.
struct Worker {
    jobs: mpsc::Sender<Message>,
    thread: Mutex<Option<JoinHandle<()>>>,
}

impl Drop for Worker {
    fn drop(&mut self) {
        let handle = self
            .thread
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .take();

        let Some(handle) = handle else {
            return;
        };
        if let Err(err) = self.jobs.send(Message::Close) {
            error!("Failed to ask the journal thread to close: {err}");
        }
        if let Err(err) = handle.join() {
            error!("Journal thread panicked: {err:?}");
        }
    }
}

/// Handle to the journal database. All statements run on one dedicated
/// thread that owns the connection; clones share that thread.
#[derive(Clone)]
pub struct Database {
    worker: Arc<Worker>,
    db_path: Arc<PathBuf>,
}

impl Database {
    /// Opens (creating if needed) the database file and brings its schema up
    /// to date before returning.
    pub fn new(db_path: PathBuf) -> Result<Self> {
        if let Some(parent) = db_path.parent() {
            std::fs::create_dir_all(parent).with_context(|| {
                format!("failed to create database directory {}", parent.display())
            })?;
        }

        let path_for_thread = db_path.clone();
        let worker = spawn_worker(move || {
            let conn = Connection::open(&path_for_thread)?;
            if let Err(err) = conn.pragma_update(None, "journal_mode", "WAL") {
                warn!("Failed to enable WAL mode: {err}");
            }
            Ok(conn)
        })?;

        info!("Journal database ready at {}", db_path.display());

        Ok(Self {
            worker: Arc::new(worker),
            db_path: Arc::new(db_path),
        })
    }

    /// A private database that lives as long as the handle. Nothing touches disk.
    pub fn in_memory() -> Result<Self> {
        let worker = spawn_worker(|| Ok(Connection::open_in_memory()?))?;
        Ok(Self {
            worker: Arc::new(worker),
            db_path: Arc::new(PathBuf::from(":memory:")),
        })
    }

    pub fn path(&self) -> &Path {
        self.db_path.as_path()
    }

    /// Runs `task` on the database thread and waits for its result.
    pub async fn execute<F, T>(&self, task: F) -> Result<T>
    where
        F: FnOnce(&mut Connection) -> Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let (reply_tx, reply_rx) = oneshot::channel();

        let job: Job = Box::new(move |conn| {
            if reply_tx.send(task(conn)).is_err() {
                warn!("Journal caller went away before its result arrived");
            }
        });

        self.worker
            .jobs
            .send(Message::Run(job))
            .map_err(|err| anyhow!("journal thread is not accepting work: {err}"))?;

        reply_rx
            .await
            .map_err(|_| anyhow!("journal thread stopped before replying"))?
    }
}

/// Starts the thread, opens the connection on it, runs migrations and waits
/// until that has succeeded or failed.
fn spawn_worker<O>(open: O) -> Result<Worker>
where
    O: FnOnce() -> Result<Connection> + Send + 'static,
{
    let (jobs_tx, jobs_rx) = mpsc::channel::<Message>();
    let (ready_tx, ready_rx) = mpsc::channel::<Result<()>>();

    let thread = thread::Builder::new()
        .name("oratio-db".into())
        .spawn(move || {
            let mut conn = match prepare_connection(open) {
                Ok(conn) => conn,
                Err(err) => {
                    let _ = ready_tx.send(Err(err));
                    return;
                }
            };

            if ready_tx.send(Ok(())).is_err() {
                return;
            }

            for message in jobs_rx {
                match message {
                    Message::Run(job) => job(&mut conn),
                    Message::Close => break,
                }
            }

            info!("Journal thread closed");
        })
        .context("failed to spawn journal thread")?;

    ready_rx
        .recv()
        .context("journal thread exited during startup")??;

    Ok(Worker {
        jobs: jobs_tx,
        thread: Mutex::new(Some(thread)),
    })
}

fn prepare_connection<O>(open: O) -> Result<Connection>
where
    O: FnOnce() -> Result<Connection>,
{
    let mut conn = open().context("failed to open SQLite database")?;
    conn.busy_timeout(BUSY_TIMEOUT)
        .context("failed to set busy timeout")?;
    register_functions(&conn)?;
    run_migrations(&mut conn).context("failed to run database migrations")?;
    Ok(conn)
}

/// SQLite's own `lower()` folds ASCII only.
fn register_functions(conn: &Connection) -> Result<()> {
    conn.create_scalar_function(
        "unicode_lower",
        1,
        FunctionFlags::SQLITE_UTF8 | FunctionFlags::SQLITE_DETERMINISTIC,
        |ctx| {
            let value: Option<String> = ctx.get(0)?;
            Ok(value.map(|text| text.to_lowercase()))
        },
    )
    .context("failed to register unicode_lower")
}
