//! Path listing with file/directory classification

use std::sync::Arc;

use futures::stream::{self, StreamExt};
use tracing::debug;

use crate::exec::invocation;
use crate::exec::runner::{is_error_line, CommandRunner, LineStream};

const MISSING_MARKERS: [&str; 2] = ["No such file or directory", "Permission denied"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathKind {
    Missing,
    File,
    Directory,
}

/// Classifies a path from the output of a first `ls -la` pass.
#[derive(Debug, Clone, Copy, Default)]
pub struct PathProbe {
    exists: bool,
    last_is_dir: bool,
}

impl PathProbe {
    /// Record one output line; returns false for lines that only report the
    /// path as unreadable and should not be shown.
    pub fn observe(&mut self, line: &str) -> bool {
        if MISSING_MARKERS.iter().any(|m| line.contains(m)) {
            return false;
        }
        self.exists = true;
        self.last_is_dir = !line.starts_with('-');
        true
    }

    pub fn kind(&self) -> PathKind {
        match (self.exists, self.last_is_dir) {
            (false, _) => PathKind::Missing,
            (true, true) => PathKind::Directory,
            (true, false) => PathKind::File,
        }
    }
}

enum ListState {
    Probing {
        runner: Arc<dyn CommandRunner>,
        path: String,
        lines: LineStream,
        probe: PathProbe,
    },
    Listing(LineStream),
    Done,
}

/// List `path`, then report what it is. A directory is listed a second time
/// after the `directory:` line.
pub fn list_path(runner: Arc<dyn CommandRunner>, path: &str) -> LineStream {
    let lines = runner.run(&invocation::list_path(path));
    let state = ListState::Probing {
        runner,
        path: path.to_string(),
        lines,
        probe: PathProbe::default(),
    };
    stream::unfold(state, step).boxed()
}

async fn step(state: ListState) -> Option<(String, ListState)> {
    match state {
        ListState::Probing {
            runner,
            path,
            mut lines,
            mut probe,
        } => {
            while let Some(line) = lines.next().await {
                if is_error_line(&line) {
                    return Some((line, ListState::Done));
                }
                if probe.observe(&line) {
                    let state = ListState::Probing {
                        runner,
                        path,
                        lines,
                        probe,
                    };
                    return Some((line, state));
                }
            }

            let kind = probe.kind();
            debug!("{} classified as {:?}", path, kind);
            match kind {
                PathKind::Missing => Some((format!("invalid path: {}", path), ListState::Done)),
                PathKind::File => Some((format!("file: {}", path), ListState::Done)),
                PathKind::Directory => {
                    let listing = runner.run(&invocation::list_path(&path));
                    Some((format!("directory: {}", path), ListState::Listing(listing)))
                }
            }
        }
        ListState::Listing(mut lines) => {
            let line = lines.next().await?;
            Some((line, ListState::Listing(lines)))
        }
        ListState::Done => None,
    }
}
