//! In-process engine that echoes input frames.
//!
//! Input packets are queued without bound and processed on a worker thread.
//! For every frame the worker re-emits the image on the video output stream
//! and, when the generator returns one, a landmark set on the landmark
//! stream.

use crate::{
    Engine, GraphError, ImageFrame, InputPacket, LandmarkList, NormalizedLandmark, OutputPacket,
    Packet, POSE_LANDMARK_COUNT, StreamNames, Timestamp,
};
use std::collections::HashMap;
use std::thread::{self, JoinHandle};
use std::time::Duration;
use tokio::sync::mpsc;

/// Produces the landmarks reported for a frame, or `None` for "nobody
/// detected".
pub type LandmarkGenerator = Box<dyn FnMut(&ImageFrame, Timestamp) -> Option<LandmarkList> + Send>;

/// A fixed 33-point standing pose. Point `i` sits on a 3-column grid so
/// every landmark is distinct.
pub fn fixed_pose() -> LandmarkList {
    (0..POSE_LANDMARK_COUNT)
        .map(|i| {
            let column = (i % 3) as f32;
            let row = (i / 3) as f32;
            NormalizedLandmark {
                x: 0.25 + 0.25 * column,
                y: row / POSE_LANDMARK_COUNT.div_ceil(3) as f32,
                z: -0.01 * i as f32,
                visibility: Some(1.0),
            }
        })
        .collect()
}

struct OutputQueue {
    sender: mpsc::UnboundedSender<OutputPacket>,
    receiver: mpsc::UnboundedReceiver<OutputPacket>,
}

enum State {
    Idle,
    Running {
        input: Option<mpsc::UnboundedSender<InputPacket>>,
        worker: Option<JoinHandle<()>>,
    },
}

pub struct LoopbackEngine {
    streams: StreamNames,
    outputs: HashMap<String, OutputQueue>,
    generator: Option<LandmarkGenerator>,
    latency: Duration,
    state: State,
}

impl std::fmt::Debug for LoopbackEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let running = matches!(self.state, State::Running { .. });
        f.debug_struct("LoopbackEngine")
            .field("streams", &self.streams)
            .field("observed", &self.outputs.keys().collect::<Vec<_>>())
            .field("latency", &self.latency)
            .field("running", &running)
            .finish()
    }
}

impl LoopbackEngine {
    pub fn new(streams: StreamNames) -> Self {
        Self {
            streams,
            outputs: HashMap::new(),
            generator: Some(Box::new(|_, _| Some(fixed_pose()))),
            latency: Duration::ZERO,
            state: State::Idle,
        }
    }

    pub fn with_landmarks(
        mut self,
        generator: impl FnMut(&ImageFrame, Timestamp) -> Option<LandmarkList> + Send + 'static,
    ) -> Self {
        self.generator = Some(Box::new(generator));
        self
    }

    /// Simulated processing time per frame.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    fn sender_for(&self, stream: &str) -> Option<mpsc::UnboundedSender<OutputPacket>> {
        self.outputs.get(stream).map(|queue| queue.sender.clone())
    }
}

struct Worker {
    video: Option<mpsc::UnboundedSender<OutputPacket>>,
    landmarks: Option<mpsc::UnboundedSender<OutputPacket>>,
    generator: LandmarkGenerator,
    latency: Duration,
}

impl Worker {
    fn run(mut self, mut input: mpsc::UnboundedReceiver<InputPacket>) {
        let mut processed = 0u64;
        while let Some(packet) = input.blocking_recv() {
            if !self.latency.is_zero() {
                thread::sleep(self.latency);
            }
            let Packet { timestamp, value } = packet;
            if let Some(landmarks) = (self.generator)(&value, timestamp) {
                if let Some(sender) = &self.landmarks {
                    let _ = sender.send(OutputPacket::Landmarks(Packet::new(landmarks, timestamp)));
                }
            }
            if let Some(sender) = &self.video {
                let _ = sender.send(OutputPacket::Image(Packet::new(value, timestamp)));
            }
            processed += 1;
        }
        log::debug!("loopback worker: input closed after {} packets", processed);
    }
}

impl Engine for LoopbackEngine {
    fn observe(&mut self, stream: &str) -> Result<(), GraphError> {
        if matches!(self.state, State::Running { .. }) {
            return Err(GraphError::Engine(format!(
                "cannot observe {stream} after the graph started"
            )));
        }
        if stream != self.streams.output_video && stream != self.streams.landmarks {
            return Err(GraphError::UnknownStream(stream.to_string()));
        }
        let (sender, receiver) = mpsc::unbounded_channel();
        self.outputs
            .insert(stream.to_string(), OutputQueue { sender, receiver });
        Ok(())
    }

    /// Spawn the worker thread that answers every input frame.
    ///
    /// # Errors
    ///
    /// Returns `GraphError::Engine` if the graph is already running or was
    /// started before, and `GraphError::Io` if the thread cannot be spawned.
    fn start(&mut self) -> Result<(), GraphError> {
        if matches!(self.state, State::Running { .. }) {
            return Err(GraphError::Engine("graph already started".to_string()));
        }
        let generator = self
            .generator
            .take()
            .ok_or_else(|| GraphError::Engine("graph cannot be restarted".to_string()))?;

        // Hand the generator and the observed senders to the worker
        let worker = Worker {
            video: self.sender_for(&self.streams.output_video),
            landmarks: self.sender_for(&self.streams.landmarks),
            generator,
            latency: self.latency,
        };
        // Spawn worker
        let (input_tx, input_rx) = mpsc::unbounded_channel();
        let handle = thread::Builder::new()
            .name("loopback-graph".to_string())
            .spawn(move || worker.run(input_rx))?;

        // the worker holds the only senders now, so queues disconnect once it exits
        for queue in self.outputs.values_mut() {
            let (closed, _) = mpsc::unbounded_channel();
            queue.sender = closed;
        }

        self.state = State::Running {
            input: Some(input_tx),
            worker: Some(handle),
        };
        Ok(())
    }

    fn submit(&mut self, stream: &str, packet: InputPacket) -> Result<(), GraphError> {
        if stream != self.streams.input {
            return Err(GraphError::UnknownStream(stream.to_string()));
        }
        match &self.state {
            State::Idle => Err(GraphError::Engine("graph not started".to_string())),
            State::Running { input: None, .. } => Err(GraphError::StreamClosed(stream.to_string())),
            State::Running {
                input: Some(sender),
                ..
            } => sender
                .send(packet)
                .map_err(|_| GraphError::Engine("loopback worker exited".to_string())),
        }
    }

    fn poll_next(&mut self, stream: &str) -> Result<Option<OutputPacket>, GraphError> {
        let queue = self
            .outputs
            .get_mut(stream)
            .ok_or_else(|| GraphError::UnknownStream(stream.to_string()))?;
        match queue.receiver.try_recv() {
            Ok(packet) => Ok(Some(packet)),
            Err(mpsc::error::TryRecvError::Empty) => Ok(None),
            Err(mpsc::error::TryRecvError::Disconnected) => Ok(None),
        }
    }

    fn close_input(&mut self, stream: &str) -> Result<(), GraphError> {
        if stream != self.streams.input {
            return Err(GraphError::UnknownStream(stream.to_string()));
        }
        match &mut self.state {
            State::Idle => Err(GraphError::Engine("graph not started".to_string())),
            State::Running { input, .. } => {
                input.take();
                Ok(())
            }
        }
    }

    fn wait_until_done(&mut self) -> Result<(), GraphError> {
        match &mut self.state {
            State::Idle => Ok(()),
            State::Running { input: Some(_), .. } => Err(GraphError::Engine(
                "input stream still open, nothing would finish".to_string(),
            )),
            State::Running {
                input: None,
                worker,
            } => match worker.take() {
                Some(handle) => handle
                    .join()
                    .map_err(|_| GraphError::Engine("loopback worker panicked".to_string())),
                None => Ok(()),
            },
        }
    }
}

impl Drop for LoopbackEngine {
    fn drop(&mut self) {
        if let State::Running { input, worker } = &mut self.state {
            input.take();
            if let Some(handle) = worker.take() {
                let _ = handle.join();
            }
        }
    }
}
