use crate::modules::helpers::encoded_image::EncodedImage;
use crate::remote::{EditRequest, RemoteEditError, RemoteEditor};
use eframe::egui;
use std::sync::Arc;
use std::sync::mpsc::{Receiver, Sender, channel};
use tokio::runtime::Handle;

struct Completion {
    generation: u64,
    result: Result<EncodedImage, RemoteEditError>,
}

/// Runs remote edits off the UI thread. Every submission gets a new generation
/// and only the newest one may be committed; older completions are dropped.
pub struct RemoteDispatcher {
    handle: Handle,
    backend: Arc<dyn RemoteEditor>,
    tx: Sender<Completion>,
    rx: Receiver<Completion>,
    latest: u64,
    pending: bool,
}

impl RemoteDispatcher {
    pub fn new(handle: Handle, backend: Arc<dyn RemoteEditor>) -> Self {
        let (tx, rx) = channel();
        Self { handle, backend, tx, rx, latest: 0, pending: false }
    }

    /// Requests already in flight keep the backend they started with.
    pub fn set_backend(&mut self, backend: Arc<dyn RemoteEditor>) { self.backend = backend; }

    pub fn is_processing(&self) -> bool { self.pending }

    pub fn submit(&mut self, request: EditRequest, repaint: Option<egui::Context>) -> u64 {
        self.latest += 1;
        self.pending = true;
        let generation = self.latest;
        let backend = Arc::clone(&self.backend);
        let tx = self.tx.clone();

        log::info!("Remote edit #{} submitted ({:?}): {}", generation, request.tier, request.instruction);
        let runtime = self.handle.clone();
        self.handle.spawn(async move {
            // A panicking backend still has to report back or the editor stays busy.
            let result = match runtime.spawn(async move { backend.edit(request).await }).await {
                Ok(result) => result,
                Err(e) => {
                    log::error!("Remote edit #{} aborted: {}", generation, e);
                    Err(RemoteEditError::Aborted(e.to_string()))
                }
            };
            if tx.send(Completion { generation, result }).is_err() {
                log::debug!("Remote edit #{} finished after the editor closed", generation);
            }
            if let Some(ctx) = repaint { ctx.request_repaint(); }
        });
        generation
    }

    /// Forgets the request in flight so its result is dropped as stale.
    pub fn invalidate(&mut self) {
        if !self.pending { return; }
        log::info!("Remote edit #{} cancelled", self.latest);
        self.latest += 1;
        self.pending = false;
    }

    /// Drains finished requests. Returns the outcome of the newest submission
    /// once it lands; stale completions are discarded.
    pub fn poll(&mut self) -> Option<Result<EncodedImage, RemoteEditError>> {
        let mut outcome = None;
        while let Ok(done) = self.rx.try_recv() {
            if done.generation != self.latest {
                log::info!("Discarding stale remote edit #{} (latest is #{})", done.generation, self.latest);
                continue;
            }
            self.pending = false;
            outcome = Some(done.result);
        }
        outcome
    }
}
