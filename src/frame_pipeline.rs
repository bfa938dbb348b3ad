// THEORY:
// The `frame_pipeline` module is the asynchronous front of the engine. It
// decouples frame producers (a capture loop, a test harness) from the
// synchronous isolation core by moving frames through channels: every frame
// arrives as a task carrying a oneshot reply sender, a single worker task
// owns the `HandIsolator`, and results travel back through the reply.
//
// Because one task owns the isolator, palette rebuilds and classification
// passes are serialized by construction: an `Initialize` message can never
// interleave with an in-flight pass.
//
// Completion notifications are fire-and-forget and single-subscriber: at most
// one listener is registered at a time, and each committed pass publishes a
// `PassComplete` carrying only the frame id. The frame itself travels back
// through the task's reply channel first, so by the time a listener hears
// about frame N its pixels are already committed and handed off.

use crate::core_modules::classifier::QUADRANT_WORKERS;
use crate::core_modules::frame::Frame;
use crate::error::IsolationError;
use crate::pipeline::{HandIsolator, PassOutcome};
use tokio::sync::{mpsc, oneshot};

/// Raised after a pass commits. Carries only the frame id; consumers take the
/// frame itself from the reply side of the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PassComplete {
    pub frame_id: u64,
}

/// What a finished task hands back: the frame (classified or untouched) and
/// the outcome of its pass.
pub type PassReply = (Frame, Result<PassOutcome, IsolationError>);

struct FrameTask {
    frame: Frame,
    reply: oneshot::Sender<PassReply>,
}

enum PipelineMessage {
    /// Seed the palette from this frame, then isolate it.
    Initialize(FrameTask),
    /// Isolate this frame against the established palette.
    Isolate(FrameTask),
    /// Register (or replace) the completion listener.
    Subscribe(mpsc::UnboundedSender<PassComplete>),
    Shutdown,
}

/// Channel-driven pipeline front: producers push frames in, the owning worker
/// runs the isolator, and completion events fan out to one subscriber.
pub struct FramePipeline {
    sender: mpsc::UnboundedSender<PipelineMessage>,
    worker: tokio::task::JoinHandle<()>,
}

impl FramePipeline {
    pub fn new() -> Self {
        let (sender, mut receiver) = mpsc::unbounded_channel::<PipelineMessage>();
        log::info!(
            "isolation pipeline up: {} quadrant workers per pass, {} cores available",
            QUADRANT_WORKERS,
            num_cpus::get()
        );

        let worker = tokio::spawn(async move {
            let mut isolator = HandIsolator::new();
            let mut listener: Option<mpsc::UnboundedSender<PassComplete>> = None;
            let mut frame_counter: u64 = 0;

            while let Some(message) = receiver.recv().await {
                match message {
                    PipelineMessage::Initialize(task) => {
                        let frame_id = frame_counter;
                        frame_counter += 1;
                        Self::run_task(&mut isolator, task, true, frame_id, &mut listener);
                    }
                    PipelineMessage::Isolate(task) => {
                        let frame_id = frame_counter;
                        frame_counter += 1;
                        Self::run_task(&mut isolator, task, false, frame_id, &mut listener);
                    }
                    PipelineMessage::Subscribe(sender) => {
                        listener = Some(sender);
                    }
                    PipelineMessage::Shutdown => break,
                }
            }
        });

        Self { sender, worker }
    }

    fn run_task(
        isolator: &mut HandIsolator,
        task: FrameTask,
        seed_palette: bool,
        frame_id: u64,
        listener: &mut Option<mpsc::UnboundedSender<PassComplete>>,
    ) {
        let mut frame = task.frame;
        let result = if seed_palette {
            isolator
                .initialize(&frame)
                .and_then(|_| isolator.process_frame(&mut frame))
        } else {
            isolator.process_frame(&mut frame)
        };

        let committed = matches!(&result, Ok(PassOutcome::Isolated));
        match &result {
            Ok(PassOutcome::Isolated) => log::info!("frame {frame_id} isolated"),
            Ok(PassOutcome::NotReady) => log::debug!("frame {frame_id} skipped: palette not ready"),
            Err(error) => log::warn!("frame {frame_id} pass failed: {error}"),
        }

        // Hand the frame off first, then raise the event, so a listener
        // reacting to the notification finds the result already delivered.
        let _ = task.reply.send((frame, result));
        if committed {
            if let Some(sender) = listener {
                if sender.send(PassComplete { frame_id }).is_err() {
                    // The subscriber went away; stop publishing to it.
                    *listener = None;
                }
            }
        }
    }

    /// Seeds the palette from this frame, isolates it, and hands it back.
    pub async fn initialize(&self, frame: Frame) -> Result<PassReply, &'static str> {
        self.submit(frame, PipelineMessage::Initialize).await
    }

    /// Isolates one frame against the established palette. Before
    /// initialization this is a no-op pass returning `PassOutcome::NotReady`.
    pub async fn isolate(&self, frame: Frame) -> Result<PassReply, &'static str> {
        self.submit(frame, PipelineMessage::Isolate).await
    }

    async fn submit(
        &self,
        frame: Frame,
        wrap: impl FnOnce(FrameTask) -> PipelineMessage,
    ) -> Result<PassReply, &'static str> {
        let (reply, receiver) = oneshot::channel();
        self.sender
            .send(wrap(FrameTask { frame, reply }))
            .map_err(|_| "Failed to send frame to pipeline worker")?;
        receiver
            .await
            .map_err(|_| "Pipeline worker dropped the frame reply")
    }

    /// Registers the completion listener, replacing any previous one. At most
    /// one subscriber is active at a time.
    pub fn subscribe_completed(&self) -> mpsc::UnboundedReceiver<PassComplete> {
        let (sender, receiver) = mpsc::unbounded_channel();
        let _ = self.sender.send(PipelineMessage::Subscribe(sender));
        receiver
    }

    /// Stops the worker after it drains the messages already queued.
    pub async fn shutdown(self) {
        let _ = self.sender.send(PipelineMessage::Shutdown);
        let _ = self.worker.await;
    }
}

impl Default for FramePipeline {
    fn default() -> Self {
        Self::new()
    }
}
