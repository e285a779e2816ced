use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::mpsc::{Receiver, Sender};
use std::thread::{self, JoinHandle};

use crate::pages::load_page;
use crate::query::QueryClient;
use crate::state::{Delta, FetchCommand, MountId};

/// The most recent mount, shared between the UI thread and the worker so that
/// fetches for pages that already unmounted are skipped before they start.
#[derive(Debug, Clone, Default)]
pub struct MountTracker(Arc<AtomicU64>);

impl MountTracker {
    pub fn mark(&self, mount: MountId) {
        self.0.store(mount, Ordering::SeqCst);
    }

    pub fn is_current(&self, mount: MountId) -> bool {
        self.0.load(Ordering::SeqCst) == mount
    }
}

pub fn spawn_fetch_worker(
    client: Arc<dyn QueryClient>,
    tx: Sender<Delta>,
    cmd_rx: Receiver<FetchCommand>,
    latest: MountTracker,
) -> JoinHandle<()> {
    thread::spawn(move || {
        // Ends when the UI drops its command sender.
        for cmd in cmd_rx {
            if !latest.is_current(cmd.mount) {
                continue;
            }
            if tx.send(run_fetch(client.as_ref(), cmd)).is_err() {
                break;
            }
        }
    })
}

pub fn run_fetch(client: &dyn QueryClient, cmd: FetchCommand) -> Delta {
    Delta::PageLoaded {
        route: cmd.route,
        mount: cmd.mount,
        result: load_page(client, cmd.route),
    }
}
