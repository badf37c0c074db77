use std::thread::JoinHandle;
use tokio::sync::mpsc;
use voxdrive_audio::{BlockConsumer, QueueHandle};
use voxdrive_command::CommandInterpreter;
use voxdrive_core::{DispatchedCommand, RecognitionEvent};
use voxdrive_engine::RecognizerSession;
use voxdrive_sink::AudioArchive;

/// Overflow warnings are emitted for the first drop and then once per this
/// many drops.
const DROP_WARN_EVERY: u64 = 100;

/// Counters a finished loop hands back to whoever stopped it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoopReport {
    pub blocks: u64,
    pub finals: u64,
    pub dispatched: u64,
}

/// Pops audio blocks, feeds the recognizer, and turns every final transcript
/// into at most one dispatched command. Runs on its own thread; see
/// [`CommandLoop::start`].
pub struct CommandLoop {
    consumer: BlockConsumer,
    session: RecognizerSession,
    interpreter: CommandInterpreter,
    archive: Option<AudioArchive>,
    command_tx: mpsc::UnboundedSender<DispatchedCommand>,
    report: LoopReport,
    warned_drops: u64,
}

impl CommandLoop {
    pub fn new(
        consumer: BlockConsumer,
        session: RecognizerSession,
        interpreter: CommandInterpreter,
        command_tx: mpsc::UnboundedSender<DispatchedCommand>,
    ) -> Self {
        Self {
            consumer,
            session,
            interpreter,
            archive: None,
            command_tx,
            report: LoopReport::default(),
            warned_drops: 0,
        }
    }

    pub fn with_archive(mut self, archive: AudioArchive) -> Self {
        self.archive = Some(archive);
        self
    }

    /// Processes blocks until the queue is closed.
    pub fn run(mut self) -> LoopReport {
        let queue = self.consumer.handle();
        tracing::debug!(engine = %self.session.engine_name(), "command loop running");

        while let Some(block) = self.consumer.pop() {
            self.report.blocks += 1;
            self.check_drops(&queue);

            if let Some(archive) = self.archive.as_mut() {
                archive.write_block(&block);
            }

            match self.session.next_event(block) {
                Some(RecognitionEvent::Partial(text)) => {
                    if !text.is_empty() {
                        tracing::debug!(partial = %text);
                    }
                }
                Some(RecognitionEvent::Final(text)) => self.handle_final(&text),
                None => {}
            }
        }

        let discarded = self.consumer.discard_pending();
        if discarded > 0 {
            tracing::debug!(discarded, "queue closed with blocks pending");
        }
        if let Some(archive) = self.archive.as_mut() {
            archive.finish();
        }

        tracing::debug!(
            blocks = self.report.blocks,
            finals = self.report.finals,
            dispatched = self.report.dispatched,
            "command loop finished"
        );
        self.report
    }

    /// Spawns [`run`](Self::run) on a thread named `command-loop`.
    pub fn start(self) -> std::io::Result<LoopHandle> {
        let queue = self.consumer.handle();
        let thread = std::thread::Builder::new()
            .name("command-loop".into())
            .spawn(move || self.run())?;
        Ok(LoopHandle {
            queue,
            thread: Some(thread),
        })
    }

    fn handle_final(&mut self, text: &str) {
        self.report.finals += 1;
        let utterance = self.report.finals;

        let interpretation = self.interpreter.interpret(text);
        if interpretation.command.is_noop() {
            return;
        }

        let dispatched = DispatchedCommand {
            utterance,
            transcript: interpretation.normalized.text().to_string(),
            command: interpretation.command,
        };
        if self.command_tx.send(dispatched).is_err() {
            tracing::warn!(utterance, "no sink is listening; command discarded");
            return;
        }
        self.report.dispatched += 1;
    }

    fn check_drops(&mut self, queue: &QueueHandle) {
        let dropped = queue.stats().dropped;
        if dropped <= self.warned_drops {
            return;
        }
        if self.warned_drops == 0 || dropped / DROP_WARN_EVERY > self.warned_drops / DROP_WARN_EVERY {
            tracing::warn!(dropped, "audio queue full, dropping blocks");
        }
        self.warned_drops = dropped;
    }
}

/// Owner of a running [`CommandLoop`] thread.
pub struct LoopHandle {
    queue: QueueHandle,
    thread: Option<JoinHandle<LoopReport>>,
}

impl LoopHandle {
    pub fn queue(&self) -> &QueueHandle {
        &self.queue
    }

    pub fn is_finished(&self) -> bool {
        self.thread.as_ref().map_or(true, |t| t.is_finished())
    }

    /// Close the queue and wait for the loop thread to exit. Blocks still
    /// queued are discarded, not processed.
    pub fn stop(mut self) -> LoopReport {
        self.queue.close();
        match self.thread.take().map(JoinHandle::join) {
            Some(Ok(report)) => report,
            Some(Err(_)) => {
                tracing::error!("command loop thread panicked");
                LoopReport::default()
            }
            None => LoopReport::default(),
        }
    }
}
