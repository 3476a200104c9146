use crate::{GraphConfig, GraphError, InputPacket, ModelAssets, OutputPacket};

/// Capability interface of a running computation graph.
///
/// Lifecycle: `observe` every output stream that will be polled, `start`,
/// then any number of `submit` / `poll_next`, then `close_input` and
/// `wait_until_done`. Dropping the engine releases its resources.
pub trait Engine {
    /// Register interest in an output stream. Only observed streams buffer
    /// packets; must happen before `start`.
    fn observe(&mut self, stream: &str) -> Result<(), GraphError>;

    fn start(&mut self) -> Result<(), GraphError>;

    /// Hand a packet to an input stream. Ownership moves into the engine.
    fn submit(&mut self, stream: &str, packet: InputPacket) -> Result<(), GraphError>;

    /// Non-blocking; at most one buffered packet per call. `Ok(None)` means
    /// nothing is ready yet, which is not an error.
    fn poll_next(&mut self, stream: &str) -> Result<Option<OutputPacket>, GraphError>;

    /// Signal that no more packets will be submitted to `stream`.
    fn close_input(&mut self, stream: &str) -> Result<(), GraphError>;

    /// Block until every submitted packet has been processed. Inputs must be
    /// closed first.
    fn wait_until_done(&mut self) -> Result<(), GraphError>;
}

impl<E: Engine + ?Sized> Engine for Box<E> {
    fn observe(&mut self, stream: &str) -> Result<(), GraphError> {
        (**self).observe(stream)
    }

    fn start(&mut self) -> Result<(), GraphError> {
        (**self).start()
    }

    fn submit(&mut self, stream: &str, packet: InputPacket) -> Result<(), GraphError> {
        (**self).submit(stream, packet)
    }

    fn poll_next(&mut self, stream: &str) -> Result<Option<OutputPacket>, GraphError> {
        (**self).poll_next(stream)
    }

    fn close_input(&mut self, stream: &str) -> Result<(), GraphError> {
        (**self).close_input(stream)
    }

    fn wait_until_done(&mut self) -> Result<(), GraphError> {
        (**self).wait_until_done()
    }
}

/// Everything an engine gets at construction time.
#[derive(Debug, Clone)]
pub struct EngineSetup {
    pub config: GraphConfig,
    pub assets: ModelAssets,
}

/// Builds an engine once configuration and assets are loaded.
pub trait EngineFactory {
    type Engine: Engine;

    fn create(self, setup: EngineSetup) -> Result<Self::Engine, GraphError>;
}

impl<E: Engine, F: FnOnce(EngineSetup) -> Result<E, GraphError>> EngineFactory for F {
    type Engine = E;

    fn create(self, setup: EngineSetup) -> Result<E, GraphError> {
        self(setup)
    }
}
