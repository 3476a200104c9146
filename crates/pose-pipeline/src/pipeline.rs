use crate::{MonotonicClock, PipelineConfig, PipelineError, Presenter};
use pose_base::{Rect, Vec2};
use pose_graph::{
    Engine, EngineFactory, EngineSetup, GraphConfig, ModelAssets, OutputPoller, StreamAdapter,
    Timestamp,
};
use pose_video::{CaptureBackend, FrameBuffer, FrameSource, open_configured};
use std::time::{Duration, Instant};

/// Devices report tiny placeholder sizes while they warm up; only a size
/// larger than this in both dimensions counts.
pub const MIN_VALID_SIZE: usize = 16;

/// What one tick did.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct TickReport {
    /// Timestamp of the frame submitted this tick, if the source had one.
    pub submitted: Option<Timestamp>,
    pub image_updated: bool,
    /// Number of landmarks presented, 0 when no landmark packet arrived.
    pub landmarks: usize,
}

impl TickReport {
    pub fn is_idle(&self) -> bool {
        self.submitted.is_none() && !self.image_updated && self.landmarks == 0
    }
}

// everything that only exists while the pipeline runs
#[derive(Debug)]
struct Session {
    adapter: StreamAdapter,
    poller: OutputPoller,
    input: FrameBuffer,
    clock: MonotonicClock,
    presenter: Presenter,
}

/// Frame source, engine and presenter driven one tick at a time.
///
/// `start` brings everything up, `tick` moves at most one frame through the
/// graph and `stop` tears down in order: capture first, then the engine's
/// input is closed and drained, then the engine is dropped. Dropping a
/// running pipeline stops it.
pub struct Pipeline<E: Engine> {
    config: PipelineConfig,
    source: Option<Box<dyn FrameSource>>,
    engine: Option<E>,
    engine_started: bool,
    session: Option<Session>,
    ticks: u64,
}

impl<E: Engine> std::fmt::Debug for Pipeline<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Pipeline")
            .field("source", &self.source.is_some())
            .field("engine", &self.engine.is_some())
            .field("engine_started", &self.engine_started)
            .field("ticks", &self.ticks)
            .finish()
    }
}

impl<E: Engine> Pipeline<E> {
    pub fn new(config: PipelineConfig) -> Self {
        Self {
            config,
            source: None,
            engine: None,
            engine_started: false,
            session: None,
            ticks: 0,
        }
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    pub fn is_running(&self) -> bool {
        self.session.is_some()
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Negotiated frame size, once started.
    pub fn frame_size(&self) -> Option<Vec2<usize>> {
        self.session.as_ref().map(|session| session.input.size())
    }

    pub fn presenter(&self) -> Option<&Presenter> {
        self.session.as_ref().map(|session| &session.presenter)
    }

    pub fn presenter_mut(&mut self) -> Option<&mut Presenter> {
        self.session.as_mut().map(|session| &mut session.presenter)
    }

    pub fn engine(&self) -> Option<&E> {
        self.engine.as_ref()
    }

    /// Open the capture device, wait for it to report a size, load the graph
    /// and assets, then build and start the engine.
    ///
    /// Nothing engine-related is created when the backend has no devices.
    /// On failure whatever was brought up is torn down again.
    pub async fn start<F>(
        &mut self,
        backend: &dyn CaptureBackend,
        factory: F,
    ) -> Result<(), PipelineError>
    where
        F: EngineFactory<Engine = E>,
    {
        if self.source.is_some() || self.engine.is_some() {
            return Err(PipelineError::Config("pipeline already started".to_string()));
        }
        let result = self.bring_up(backend, factory).await;
        if let Err(e) = &result {
            log::error!("pipeline start failed: {}", e);
            if let Err(e) = self.stop() {
                log::warn!("cleanup after failed start: {}", e);
            }
        }
        result
    }

    async fn bring_up<F>(
        &mut self,
        backend: &dyn CaptureBackend,
        factory: F,
    ) -> Result<(), PipelineError>
    where
        F: EngineFactory<Engine = E>,
    {
        self.config.validate()?;

        let source = self.source.insert(
            open_configured(backend, &self.config.capture()).map_err(PipelineError::Open)?,
        );
        let size = wait_for_size(
            &**source,
            self.config.size_timeout(),
            self.config.size_poll(),
        )
        .await?;
        log::info!("capture ready at {}x{}", size.x, size.y);

        let graph = GraphConfig::load(&self.config.graph_path)
            .await
            .map_err(PipelineError::Engine)?;
        graph
            .require_streams(&self.config.streams)
            .map_err(PipelineError::Engine)?;
        let assets = ModelAssets::load(&self.config.asset_dir, self.config.assets.as_slice())
            .await
            .map_err(PipelineError::Engine)?;

        let engine = self.engine.insert(
            factory
                .create(EngineSetup {
                    config: graph,
                    assets,
                })
                .map_err(PipelineError::Engine)?,
        );
        // streams must be observed before the graph runs
        let poller =
            OutputPoller::observe(engine, &self.config.streams).map_err(PipelineError::Engine)?;
        engine.start().map_err(PipelineError::Engine)?;
        self.engine_started = true;

        self.session = Some(Session {
            adapter: StreamAdapter::new(self.config.streams.input.clone(), size),
            poller,
            input: FrameBuffer::new(size),
            clock: MonotonicClock::start(),
            presenter: Presenter::new(
                size,
                Rect::from_pixels(size),
                self.config.screen_origin.into(),
                self.config.landmark_range,
            ),
        });
        log::info!("pipeline started");
        Ok(())
    }

    /// Read the newest frame, submit it, poll both outputs once and present
    /// whatever arrived.
    ///
    /// A tick with no new frame submits nothing; outputs that are not ready
    /// leave the texture and landmarks as they were. When presenting one
    /// output fails the other is still presented before the error returns.
    pub fn tick(&mut self) -> Result<TickReport, PipelineError> {
        let (Some(source), Some(engine), Some(session)) = (
            self.source.as_mut(),
            self.engine.as_mut(),
            self.session.as_mut(),
        ) else {
            return Err(PipelineError::NotStarted);
        };
        self.ticks += 1;

        let mut report = TickReport::default();
        if source.read_into(&mut session.input)? {
            let timestamp = session.clock.now();
            session
                .adapter
                .submit(engine, session.input.as_slice(), timestamp)
                .map_err(PipelineError::Submit)?;
            report.submitted = Some(timestamp);
        }

        let polled = session.poller.poll(engine).map_err(PipelineError::Poll)?;

        // both packets are already off their queues, present each one
        let image = match &polled.image {
            Some(image) => session.presenter.present_image(image).map(|()| true),
            None => Ok(false),
        };
        let landmarks = match &polled.landmarks {
            Some(landmarks) => session
                .presenter
                .present_landmarks(landmarks)
                .map(|points| points.len()),
            None => Ok(0),
        };
        report.image_updated = image?;
        report.landmarks = landmarks?;
        Ok(report)
    }

    /// Stop capture, close and drain the engine, then release it.
    ///
    /// Safe to call at any point and more than once. An engine that was
    /// never started is dropped without being closed or drained.
    pub fn stop(&mut self) -> Result<(), PipelineError> {
        if let Some(mut source) = self.source.take() {
            source.stop();
            log::debug!("capture stopped");
        }
        self.session = None;

        let Some(mut engine) = self.engine.take() else {
            return Ok(());
        };
        let result = if std::mem::take(&mut self.engine_started) {
            engine
                .close_input(&self.config.streams.input)
                .and_then(|()| engine.wait_until_done())
                .map_err(PipelineError::Teardown)
        } else {
            Ok(())
        };
        drop(engine);
        log::info!("pipeline stopped after {} ticks", self.ticks);
        result
    }
}

impl<E: Engine> Drop for Pipeline<E> {
    fn drop(&mut self) {
        if let Err(e) = self.stop() {
            log::error!("pipeline teardown: {}", e);
        }
    }
}

async fn wait_for_size(
    source: &dyn FrameSource,
    timeout: Duration,
    poll: Duration,
) -> Result<Vec2<usize>, PipelineError> {
    let started = Instant::now();
    loop {
        let size = source.size();
        if size.x > MIN_VALID_SIZE && size.y > MIN_VALID_SIZE {
            return Ok(size);
        }
        if started.elapsed() >= timeout {
            return Err(PipelineError::SizeTimeout(timeout));
        }
        tokio::time::sleep(poll).await;
    }
}
