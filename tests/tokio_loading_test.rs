use std::path::Path;
use std::time::Duration;
use tilescope::prelude::*;

/// Loading real PNG tiles from disk on the tokio blocking pool.
#[cfg(all(test, feature = "tokio-runtime", feature = "image-decode"))]
mod tokio_loading_tests {
    use super::*;

    fn write_png(path: &Path, width: u32, height: u32) {
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        let img = image::RgbaImage::from_pixel(width, height, image::Rgba([20, 40, 80, 255]));
        img.save_with_format(path, image::ImageFormat::Png).unwrap();
    }

    /// Levels 0 and 1 of a `width`x`height` world
    fn write_pyramid(root: &Path, width: u32, height: u32) {
        let layout = TileLayout::new(root, "png");
        write_png(&layout.probe_path(), width, height);
        for key in TileRange::new(0, 0, 1, 1).keys(1) {
            write_png(&layout.tile_path(key), width / 2, height / 2);
        }
    }

    fn controller(root: &Path) -> ViewportController<HeadlessSurface> {
        let config = ViewerConfig {
            tile_extension: "png".into(),
            max_zoom_level: 1,
            ..ViewerConfig::for_testing().with_tiles_root(root)
        };
        let mut controller = ViewportController::new(
            config,
            Arc::new(FsAssetSource),
            Arc::new(ImageCrateDecoder),
            Arc::new(TokioSpawner::current().unwrap()),
            HeadlessSurface::new(),
        )
        .unwrap();
        controller.resize(320.0, 240.0);
        controller
    }

    /// Ticks at roughly 200Hz until `done` holds or two seconds pass
    async fn tick_until<F>(c: &mut ViewportController<HeadlessSurface>, done: F) -> bool
    where
        F: Fn(&ViewportController<HeadlessSurface>) -> bool,
    {
        for _ in 0..400 {
            c.tick();
            if done(&*c) {
                return true;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
        false
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_world_and_tiles_load_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        write_pyramid(dir.path(), 64, 32);

        let mut c = controller(dir.path());
        assert!(tick_until(&mut c, |c| c.surface().drawn_count() == 1).await);
        assert_eq!(c.world_size(), Some(WorldSize::new(64, 32)));
        assert_eq!(c.viewport().scale, 5.0);
        assert_eq!(c.loader().cache().len(), 1);

        let status = c.status().unwrap();
        assert_eq!(status.to_string(), "Level: 0 | Tiles: 1 | (32, 16) | 0_0");
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_zoom_in_loads_next_level() {
        let dir = tempfile::tempdir().unwrap();
        write_pyramid(dir.path(), 64, 32);

        let mut c = controller(dir.path());
        assert!(tick_until(&mut c, |c| c.surface().drawn_count() == 1).await);

        for _ in 0..8 {
            c.handle_input(InputEvent::Wheel {
                delta: 1.0,
                position: Point::new(160.0, 120.0),
            });
        }
        assert!(tick_until(&mut c, |c| c.zoom_level() == 1 && c.surface().drawn_count() == 4).await);
        assert!(c.active_tiles().keys().all(|k| k.zoom == 1));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_switching_roots_probes_the_new_world() {
        let first = tempfile::tempdir().unwrap();
        let second = tempfile::tempdir().unwrap();
        write_pyramid(first.path(), 64, 32);
        write_pyramid(second.path(), 48, 48);

        let mut c = controller(first.path());
        assert!(tick_until(&mut c, |c| c.surface().drawn_count() == 1).await);

        c.handle_input(InputEvent::RootChanged {
            root: second.path().to_path_buf(),
        });
        assert!(c.loader().cache().is_empty());
        assert!(c.surface().is_empty());

        assert!(tick_until(&mut c, |c| c.surface().drawn_count() == 1).await);
        assert_eq!(c.world_size(), Some(WorldSize::new(48, 48)));
        assert_eq!(c.viewport().scale, 5.0);
    }

    #[tokio::test]
    async fn test_missing_tile_root_keeps_waiting() {
        let dir = tempfile::tempdir().unwrap();
        let mut c = controller(&dir.path().join("nowhere"));
        for _ in 0..20 {
            assert_eq!(c.tick(), TickOutcome::WaitingForWorld);
            tokio::time::sleep(Duration::from_millis(1)).await;
        }
        assert!(c.status().is_none());
    }
}
