//! On-disk story library.
//!
//! Story days are stored as `<root>/act_<n>/chapter_<m>/<day>.json`. Only acts
//! listed in [`ACTS`] are served; any other act has no story.

use std::fs;
use std::io::ErrorKind;
use std::path::{Component, Path, PathBuf};

use crate::error::{StoryError, StoryResult};
use crate::graph::StoryGraph;

/// The published acts and their titles, in display order.
pub const ACTS: [(u32, &str); 5] = [
    (1, "Act 1 - End of Summer"),
    (2, "Act 2 - Fall"),
    (3, "Act 3 - Winter"),
    (4, "Act 4 - Spring"),
    (5, "Act 5 - Summer Break DLC"),
];

/// The days every chapter is split into, in display order.
pub const WEEK_DAYS: [&str; 7] = [
    "sunday",
    "monday",
    "tuesday",
    "wednesday",
    "thursday",
    "friday",
    "saturday",
];

/// Title of a published act.
pub fn act_title(act: u32) -> Option<&'static str> {
    ACTS.iter()
        .find(|(number, _)| *number == act)
        .map(|(_, title)| *title)
}

/// A day name must be exactly one plain path segment.
fn is_plain_segment(name: &str) -> bool {
    let mut components = Path::new(name).components();
    matches!(
        (components.next(), components.next()),
        (Some(Component::Normal(_)), None)
    )
}

/// Chapter number of a `chapter_<m>[_...]` directory name.
fn chapter_number(name: &str) -> Option<u32> {
    if !name.starts_with("chapter_") {
        return None;
    }
    name.split('_').nth(1)?.parse().ok()
}

/// Read access to a directory tree of story files.
#[derive(Debug, Clone)]
pub struct StoryLibrary {
    root: PathBuf,
}

impl StoryLibrary {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn act_dir(&self, act: u32) -> PathBuf {
        self.root.join(format!("act_{act}"))
    }

    /// Path of the story file for one day.
    ///
    /// `None` for unpublished acts and for day names that are not a single
    /// plain segment, so no lookup can leave the library root.
    pub fn day_path(&self, act: u32, chapter: u32, day: &str) -> Option<PathBuf> {
        if act_title(act).is_none() || !is_plain_segment(day) {
            return None;
        }
        Some(
            self.act_dir(act)
                .join(format!("chapter_{chapter}"))
                .join(format!("{day}.json")),
        )
    }

    /// Chapter numbers found under a published act, sorted ascending.
    ///
    /// Unpublished acts and a missing act directory yield no chapters.
    /// Directories are matched on `chapter_<number>`, ignoring any further
    /// `_suffix`; other entries are skipped.
    pub fn chapters_for_act(&self, act: u32) -> StoryResult<Vec<u32>> {
        if act_title(act).is_none() {
            tracing::debug!(act, "chapters requested for unpublished act");
            return Ok(Vec::new());
        }

        let act_dir = self.act_dir(act);
        let entries = match fs::read_dir(&act_dir) {
            Ok(entries) => entries,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(source) => {
                return Err(StoryError::Io {
                    path: act_dir,
                    source,
                })
            }
        };

        let mut chapters = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|source| StoryError::Io {
                path: act_dir.clone(),
                source,
            })?;
            if !entry.path().is_dir() {
                continue;
            }
            if let Some(number) = entry.file_name().to_str().and_then(chapter_number) {
                chapters.push(number);
            }
        }

        chapters.sort_unstable();
        chapters.dedup();
        Ok(chapters)
    }

    /// Load one day. Returns `Ok(None)` when no story has been written for it.
    pub fn load_day(&self, act: u32, chapter: u32, day: &str) -> StoryResult<Option<StoryGraph>> {
        let Some(path) = self.day_path(act, chapter, day) else {
            tracing::debug!(act, chapter, day, "day outside the published library");
            return Ok(None);
        };
        let json = match fs::read_to_string(&path) {
            Ok(json) => json,
            Err(err) if err.kind() == ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "no story file for day");
                return Ok(None);
            }
            Err(source) => return Err(StoryError::Io { path, source }),
        };

        let graph = StoryGraph::from_json_str(&json)?;
        tracing::debug!(path = %path.display(), periods = graph.len(), "loaded story day");
        Ok(Some(graph))
    }
}
