use super::Cartographer;
use crate::error::{CartographerError, Result};
use indexmap::IndexMap;
use notify::{Config, Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher as NotifyWatcher};
use std::collections::HashSet;
use std::io;
use std::path::{Path, PathBuf};
use std::pin::pin;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{Instant, sleep};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

/// Where events for one source path show up.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Target {
    /// Manifest file, observed through its parent directory so that a
    /// manifest created later or replaced by rename is still seen
    File(PathBuf),
    /// Directory source, observed recursively
    Dir(PathBuf),
}

/// Resolve a source path into the directory to subscribe and the target
/// its events are matched against. Both are canonical so they line up with
/// the paths the backend reports.
fn resolve(path: &Path) -> io::Result<(PathBuf, RecursiveMode, Target)> {
    if path.is_dir() {
        let dir = std::fs::canonicalize(path)?;
        return Ok((dir.clone(), RecursiveMode::Recursive, Target::Dir(dir)));
    }

    let absolute = std::path::absolute(path)?;
    let (Some(parent), Some(file_name)) = (absolute.parent(), absolute.file_name()) else {
        return Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            "manifest path has no parent directory",
        ));
    };
    let parent = std::fs::canonicalize(parent)?;
    let file = parent.join(file_name);
    Ok((parent, RecursiveMode::NonRecursive, Target::File(file)))
}

#[derive(Debug, Default)]
struct WatchTargets {
    files: HashSet<PathBuf>,
    dirs: Vec<PathBuf>,
}

impl WatchTargets {
    fn add(&mut self, target: Target) {
        match target {
            Target::File(file) => {
                self.files.insert(file);
            }
            Target::Dir(dir) => self.dirs.push(dir),
        }
    }

    fn is_relevant(&self, event: &Event) -> bool {
        event
            .paths
            .iter()
            .any(|p| self.files.contains(p) || self.dirs.iter().any(|d| p.starts_with(d)))
    }

    /// A modification touching one of the watched manifests
    fn qualifies(&self, event: &Event) -> bool {
        is_modification(event) && self.is_relevant(event)
    }
}

struct FsWatcher {
    // Keep watcher alive
    _watcher: RecommendedWatcher,
    rx: mpsc::UnboundedReceiver<notify::Result<Event>>,
    targets: WatchTargets,
}

impl FsWatcher {
    /// Subscribe to every path that can be watched; returns those that were.
    fn new(paths: &[PathBuf]) -> notify::Result<(Self, Vec<PathBuf>)> {
        let (tx, rx) = mpsc::unbounded_channel();
        let mut watcher = RecommendedWatcher::new(
            move |res| {
                let _ = tx.send(res);
            },
            Config::default(),
        )?;

        let mut resolved = Vec::with_capacity(paths.len());
        let mut subscriptions: IndexMap<PathBuf, RecursiveMode> = IndexMap::new();
        for path in paths {
            match resolve(path) {
                Ok((dir, mode, target)) => {
                    let slot = subscriptions.entry(dir.clone()).or_insert(mode);
                    if mode == RecursiveMode::Recursive {
                        *slot = mode;
                    }
                    resolved.push((path, dir, target));
                }
                Err(e) => warn!("Cannot watch {}: {}", path.display(), e),
            }
        }

        let mut failed = HashSet::new();
        for (dir, mode) in subscriptions {
            if let Err(e) = watcher.watch(&dir, mode) {
                warn!("Cannot watch {}: {}", dir.display(), e);
                failed.insert(dir);
            }
        }

        let mut targets = WatchTargets::default();
        let mut watched = Vec::with_capacity(resolved.len());
        for (path, dir, target) in resolved {
            if failed.contains(&dir) {
                continue;
            }
            debug!("Watching {} for {:?}", dir.display(), target);
            targets.add(target);
            watched.push(path.clone());
        }

        Ok((
            Self {
                _watcher: watcher,
                rx,
                targets,
            },
            watched,
        ))
    }

    async fn next_event_async(&mut self) -> Option<notify::Result<Event>> {
        self.rx.recv().await
    }
}

fn is_modification(event: &Event) -> bool {
    matches!(event.kind, EventKind::Modify(_))
}

/// Handle on a running watcher task.
///
/// Dropping the handle does not stop the watcher; it runs until `stop` is
/// called or the [`Cartographer`] is dropped.
pub struct WatchHandle {
    paths: Vec<PathBuf>,
    cancel_token: CancellationToken,
    task: JoinHandle<()>,
}

impl WatchHandle {
    /// Paths actually being watched
    pub fn paths(&self) -> &[PathBuf] {
        &self.paths
    }

    pub fn stop(&self) {
        self.cancel_token.cancel();
    }

    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }

    /// Wait for the watcher task to end
    pub async fn join(self) {
        if let Err(e) = self.task.await {
            error!("Watcher task failed: {}", e);
        }
    }
}

impl Cartographer {
    /// Watch the updatable manifests and rediscover on modification.
    ///
    /// The path set is fixed here; sources that show up later are not
    /// observed. A manifest file is watched through its parent directory, so
    /// it may be missing at this point or be replaced by rename later. Errors raised while rediscovering are logged and the loop
    /// keeps running.
    pub async fn start_watch(self: Arc<Self>) -> Result<WatchHandle> {
        let paths = self.watch_paths();
        let (mut watcher, watched) = FsWatcher::new(&paths)?;
        let targets = std::mem::take(&mut watcher.targets);
        if watched.is_empty() && !paths.is_empty() {
            return Err(CartographerError::Internal(
                "none of the manifest paths could be watched".to_string(),
            ));
        }

        let cancel_token = self.cancel_token.child_token();
        let task_token = cancel_token.clone();
        let debounce = self.debounce;
        let cartographer_weak = Arc::downgrade(&self);
        let watched_count = watched.len();

        let task = tokio::spawn(async move {
            info!("Started watching {} manifest paths", watched_count);
            // Armed by the first qualifying event of a burst; later events
            // do not push it back
            let mut debounce_timer = pin!(sleep(debounce));
            let mut pending = false;

            loop {
                tokio::select! {
                    _ = task_token.cancelled() => {
                        break;
                    }
                    event = watcher.next_event_async() => {
                        match event {
                            Some(Ok(event)) => {
                                if targets.qualifies(&event) {
                                    debug!("Manifest event: {:?}", event);
                                    if !pending {
                                        debounce_timer.as_mut().reset(Instant::now() + debounce);
                                        pending = true;
                                    }
                                }
                            }
                            Some(Err(e)) => warn!("Watch error: {}", e),
                            None => break,
                        }
                    }
                    _ = debounce_timer.as_mut(), if pending => {
                        pending = false;
                        let Some(cartographer) = cartographer_weak.upgrade() else {
                            break;
                        };

                        info!("Manifest change detected, rediscovering...");
                        match tokio::task::spawn_blocking(move || cartographer.rediscover()).await {
                            Ok(reports) => {
                                let refreshed = reports.iter().filter(|r| r.result.is_ok()).count();
                                info!("Refreshed {}/{} updatable sources", refreshed, reports.len());
                            }
                            Err(e) => error!("Rediscover task failed: {}", e),
                        }
                    }
                }
            }
            info!("Manifest watcher stopped");
        });

        Ok(WatchHandle {
            paths: watched,
            cancel_token,
            task,
        })
    }
}
