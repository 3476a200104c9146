mod draw;

use draw::draw_skeleton;
use minifb::{Key, Window, WindowOptions};
use pose_graph::{EngineSetup, GraphError, LoopbackEngine};
use pose_pipeline::{Pipeline, PipelineConfig, PipelineError};
use pose_video::convert::rgba_to_argb_u32;
use pose_video::{CaptureBackend, PatternBackend, V4l2Backend};
use std::env;

const WINDOW_TITLE: &str = "Pose Tracking - ESC to exit";

/// `POSE_CONFIG` names a JSON config file; `POSE_GRAPH` and `POSE_ASSETS`
/// override the graph file and asset directory it (or the default) names.
fn load_config() -> Result<PipelineConfig, PipelineError> {
    let mut config = match env::var("POSE_CONFIG") {
        Ok(path) => PipelineConfig::from_json_file(path)?,
        Err(_) => PipelineConfig::default(),
    };
    if let Ok(graph) = env::var("POSE_GRAPH") {
        config.graph_path = graph.into();
    }
    if let Ok(assets) = env::var("POSE_ASSETS") {
        config.asset_dir = assets.into();
    }
    Ok(config)
}

fn capture_backend() -> Box<dyn CaptureBackend> {
    match env::var("POSE_SOURCE").as_deref() {
        Ok("pattern") => Box::new(PatternBackend::default()),
        _ => Box::new(V4l2Backend),
    }
}

fn run(pipeline: &mut Pipeline<LoopbackEngine>) -> Result<(), Box<dyn std::error::Error>> {
    let size = pipeline.frame_size().ok_or(PipelineError::NotStarted)?;
    let mut window = Window::new(WINDOW_TITLE, size.x, size.y, WindowOptions::default())?;
    window.set_target_fps(pipeline.config().fps as usize);

    let mut argb = Vec::with_capacity(size.area());
    while window.is_open() && !window.is_key_down(Key::Escape) {
        let report = match pipeline.tick() {
            Ok(report) => report,
            Err(PipelineError::Present(msg)) => {
                log::warn!("skipping output: {}", msg);
                window.update();
                continue;
            }
            Err(e) => return Err(e.into()),
        };

        let Some(presenter) = pipeline.presenter_mut() else {
            break;
        };
        if presenter.texture_mut().take_dirty() || report.landmarks > 0 {
            rgba_to_argb_u32(presenter.texture().pixels(), &mut argb);
            draw_skeleton(&mut argb, size.x, size.y, presenter.landmarks());
            window.update_with_buffer(&argb, size.x, size.y)?;
        } else {
            window.update();
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    match env::var("POSE_LOG_DIR") {
        Ok(dir) => pose_base::init_file_logger(dir)?,
        Err(_) => pose_base::init_stdout_logger(),
    }

    let config = load_config()?;
    log::info!(
        "pose tracking: {}x{}@{}, graph {}, assets {}",
        config.width,
        config.height,
        config.fps,
        config.graph_path.display(),
        config.asset_dir.display()
    );

    let streams = config.streams.clone();
    let backend = capture_backend();
    let mut pipeline = Pipeline::new(config);
    pipeline
        .start(&*backend, |setup: EngineSetup| {
            log::info!(
                "graph declares outputs {:?}, {} assets loaded",
                setup.config.outputs(),
                setup.assets.len()
            );
            Ok::<_, GraphError>(LoopbackEngine::new(streams))
        })
        .await?;

    let result = run(&mut pipeline);
    pipeline.stop()?;
    log::info!("exiting");
    result
}
