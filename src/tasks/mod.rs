// Copyright (C) 2026  Caprica Software Limited
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License
// along with this program.  If not, see <https://www.gnu.org/licenses/>.

//! Asynchronous application task processing.
//!
//! Work that touches the filesystem is offloaded from the main UI thread to a
//! dedicated worker, which translates [`AppTask`] requests into results
//! broadcast back to the application as [`AppEvent`]s.
//!
//! Only actions that may block, or may take more than a trivial amount of time
//! to process, should be implemented as tasks. Other actions are likely more
//! suited to events.

use anyhow::Result;
use std::{
    sync::mpsc::{Receiver, Sender},
    thread,
};
use tracing::{debug, warn};

use crate::{
    config::AppConfig,
    events::AppEvent,
    game::photo::{FsPhotoSource, PhotoSource, resolve},
};

#[derive(Debug)]
pub(crate) enum AppTask {
    /// Load the photo for a round, trying fallback file names in turn.
    ///
    /// The session and round identify the request so that a result arriving
    /// after the player has moved on can be recognised and dropped.
    LoadPhoto {
        session: u64,
        round: usize,
        path: String,
    },
}

/// Spawns a background thread to process application tasks.
///
/// # Arguments
///
/// * `config` - The application configuration.
/// * `task_rx` - The receiving end of the task channel.
/// * `event_tx` - The sending end of the channel for broadcasting results.
pub(crate) fn spawn_task_worker(
    config: &AppConfig,
    task_rx: Receiver<AppTask>,
    event_tx: Sender<AppEvent>,
) {
    let source = FsPhotoSource::new(&config.photos_dir);

    thread::spawn(move || {
        while let Ok(task) = task_rx.recv() {
            let ctx = TaskContext {
                event_tx: &event_tx,
                source: &source,
            };

            if let Err(e) = handle_task(task, &ctx) {
                let _ = event_tx.send(AppEvent::Error(e.to_string()));
            }
        }
    });
}

/// Bundles shared resources required by task handlers.
struct TaskContext<'a> {
    event_tx: &'a Sender<AppEvent>,
    source: &'a dyn PhotoSource,
}

fn handle_task(task: AppTask, ctx: &TaskContext) -> Result<()> {
    match task {
        AppTask::LoadPhoto {
            session,
            round,
            path,
        } => load_photo(ctx, session, round, &path),
    }
}

fn load_photo(ctx: &TaskContext, session: u64, round: usize, path: &str) -> Result<()> {
    let event = match resolve(ctx.source, path) {
        Ok(photo) => {
            debug!("Loaded {} as {} ({} bytes)", photo.path, photo.mime_type, photo.size);
            AppEvent::PhotoLoaded {
                session,
                round,
                photo,
            }
        }
        Err(failure) => {
            warn!("{}", failure);
            AppEvent::PhotoLoadFailed {
                session,
                round,
                failure,
            }
        }
    };

    ctx.event_tx.send(event)?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use std::{fs, sync::mpsc};

    use tempfile::TempDir;

    use super::*;

    #[test]
    fn load_photo_reports_fallback_and_failure() {
        let dir = TempDir::new().unwrap();
        let png = [
            0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A, 0x00, 0x00, 0x00, 0x0D, 0x49, 0x48,
            0x44, 0x52,
        ];
        fs::write(dir.path().join("beach.png"), png).unwrap();

        let source = FsPhotoSource::new(dir.path());
        let (event_tx, event_rx) = mpsc::channel();
        let ctx = TaskContext {
            event_tx: &event_tx,
            source: &source,
        };

        let task = AppTask::LoadPhoto {
            session: 2,
            round: 1,
            path: "beach.jpg".to_string(),
        };
        handle_task(task, &ctx).unwrap();

        match event_rx.recv().unwrap() {
            AppEvent::PhotoLoaded {
                session,
                round,
                photo,
            } => {
                assert_eq!((session, round), (2, 1));
                assert_eq!(photo.path, "beach.png");
                assert_eq!(photo.mime_type, "image/png");
            }
            other => panic!("unexpected event {other:?}"),
        }

        let task = AppTask::LoadPhoto {
            session: 2,
            round: 2,
            path: "gone.gif".to_string(),
        };
        handle_task(task, &ctx).unwrap();

        match event_rx.recv().unwrap() {
            AppEvent::PhotoLoadFailed { round, failure, .. } => {
                assert_eq!(round, 2);
                assert_eq!(failure.attempted.len(), 5);
                assert_eq!(failure.attempted[0], "gone.gif");
            }
            other => panic!("unexpected event {other:?}"),
        }
    }
}
