use anyhow::Context;
use std::time::Duration;
use tilescope::prelude::*;

const FRAME: Duration = Duration::from_millis(16);
const STATUS_EVERY: u64 = 60;

/// Scripted input: (tick, event) pairs sorted by tick
fn demo_script(width: f64, height: f64) -> Vec<(u64, InputEvent)> {
    let center = Point::new(width / 2.0, height / 2.0);
    let mut script = vec![(1, InputEvent::Resize { width, height })];

    // Zoom in a couple of levels around the centre
    script.extend((0..16).map(|i| {
        (
            120 + i * 2,
            InputEvent::Wheel {
                delta: 1.0,
                position: center,
            },
        )
    }));

    // Drag to the right and down
    script.push((200, InputEvent::DragStart { position: center }));
    script.extend((1..=30).map(|i| {
        let step = i as f64 * 8.0;
        (200 + i, InputEvent::DragMove { position: Point::new(center.x + step, center.y + step / 2.0) })
    }));
    script.push((231, InputEvent::DragEnd));

    script.push((300, InputEvent::ClearCache));

    // And back out to the fitted view
    script.extend((0..20).map(|i| {
        (
            360 + i,
            InputEvent::Wheel {
                delta: -1.0,
                position: Point::new(width * 0.25, height * 0.75),
            },
        )
    }));
    script
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = match std::env::args_os().nth(1) {
        Some(path) => {
            let path = PathBuf::from(path);
            ViewerConfig::from_json_file(&path).with_context(|| format!("loading config {}", path.display()))?
        }
        None => ViewerConfig::from_env().context("reading TILESCOPE_* environment")?,
    };
    log::info!("viewing tiles under {}", config.tiles_root.display());

    let spawner = TokioSpawner::current().context("starting worker spawner")?;
    let mut controller = ViewportController::new(
        config,
        Arc::new(FsAssetSource),
        Arc::new(ImageCrateDecoder),
        Arc::new(spawner),
        HeadlessSurface::new(),
    )?;

    let mut script = demo_script(1280.0, 720.0).into_iter().peekable();
    let last_tick = 420;

    let mut interval = tokio::time::interval(FRAME);
    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    loop {
        tokio::select! {
            _ = interval.tick() => {}
            _ = &mut ctrl_c => {
                log::info!("interrupted");
                break;
            }
        }

        let tick = controller.tick_count() + 1;
        while let Some((_, event)) = script.next_if(|(at, _)| *at <= tick) {
            controller.handle_input(event);
        }

        if let TickOutcome::Reloaded { requested, ready } = controller.tick() {
            log::debug!("tick {}: requested {} tiles, {} from cache", tick, requested, ready);
        }

        if tick % STATUS_EVERY == 0 {
            match controller.status() {
                Some(status) => log::info!("{}", status),
                None => log::info!("waiting for {}", controller.layout().probe_path().display()),
            }
        }

        if tick >= last_tick {
            break;
        }
    }

    let surface = controller.surface();
    log::info!(
        "done after {} ticks: {} placeholders ({} drawn), {} allocated, {} released, {} cached tiles",
        controller.tick_count(),
        surface.len(),
        surface.drawn_count(),
        surface.allocated_total(),
        surface.released_total(),
        controller.loader().cache().len()
    );
    Ok(())
}
