use crate::{
    core::{
        config::ViewerConfig,
        geo::{Point, Size, TileRange, WorldSize},
        range::visible_tile_range,
        scheduler::{DirtyFlags, FramePlan, FrameScheduler},
        status::ViewStatus,
        transform::{center_tile, TileGeometry},
        viewport::Viewport,
        zoom::desired_zoom_level,
    },
    input::InputEvent,
    prelude::{Arc, HashSet, PathBuf},
    rendering::surface::RenderSurface,
    runtime::AsyncSpawner,
    tiles::{
        active::ActiveTileSet,
        cache::TileCache,
        decode::ImageDecoder,
        loader::{TileLoader, TileRequest},
        source::{AssetSource, TileLayout},
        world::WorldSizeProbe,
    },
    Result,
};

/// What a call to [`ViewportController::tick`] did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// The world size is not known yet
    WaitingForWorld,
    /// Nothing was stale
    Idle,
    /// Existing tiles were moved; the tile set is unchanged
    Repositioned,
    /// A reload is pending until the next throttle boundary
    Throttled,
    /// The active set was reconciled and every needed tile requested
    Reloaded { requested: usize, ready: usize },
}

/// Drives the tile engine one host frame at a time.
///
/// The controller owns the view state, the active tile set and the surface,
/// and is only touched from the thread calling [`tick`](Self::tick). Tile
/// fetches and the world probe run on the configured spawner and come back
/// through channels drained at the start of each tick.
pub struct ViewportController<S: RenderSurface> {
    config: ViewerConfig,
    layout: TileLayout,
    viewport: Viewport,
    flags: DirtyFlags,
    fit_pending: bool,
    first_fit: bool,
    zoom: u8,
    last_range: Option<TileRange>,
    last_zoom: Option<u8>,
    drag_anchor: Option<Point>,
    world: Option<WorldSize>,
    scheduler: FrameScheduler,
    probe: WorldSizeProbe,
    active: ActiveTileSet,
    loader: TileLoader,
    source: Arc<dyn AssetSource>,
    decoder: Arc<dyn ImageDecoder>,
    spawner: Arc<dyn AsyncSpawner>,
    surface: S,
}

impl<S: RenderSurface> ViewportController<S> {
    /// Creates a controller; fails when `config` does not validate
    pub fn new(
        config: ViewerConfig,
        source: Arc<dyn AssetSource>,
        decoder: Arc<dyn ImageDecoder>,
        spawner: Arc<dyn AsyncSpawner>,
        surface: S,
    ) -> Result<Self> {
        config.validate()?;

        let layout = TileLayout::new(config.tiles_root.clone(), config.tile_extension.clone());
        let loader = TileLoader::new(
            TileCache::new(config.cache_capacity),
            Arc::clone(&source),
            Arc::clone(&decoder),
            Arc::clone(&spawner),
        );

        let mut flags = DirtyFlags::default();
        flags.mark_tiles();

        Ok(Self {
            viewport: Viewport::new(config.min_scale_floor),
            scheduler: FrameScheduler::new(config.throttle_interval),
            layout,
            flags,
            fit_pending: true,
            first_fit: true,
            zoom: 0,
            last_range: None,
            last_zoom: None,
            drag_anchor: None,
            world: None,
            probe: WorldSizeProbe::new(),
            active: ActiveTileSet::new(),
            loader,
            source,
            decoder,
            spawner,
            surface,
            config,
        })
    }

    /// Runs one frame of the update loop
    pub fn tick(&mut self) -> TickOutcome {
        self.scheduler.advance();
        self.apply_completed();

        let probe_path = self.layout.probe_path();
        let Some(world) = self
            .probe
            .poll(&self.source, &self.decoder, self.spawner.as_ref(), &probe_path)
        else {
            return TickOutcome::WaitingForWorld;
        };

        if self.world != Some(world) {
            self.world = Some(world);
            self.fit_pending = true;
            self.flags.mark_tiles();
        }

        if self.fit_pending && self.viewport.canvas.is_valid() && self.viewport.fit_to_view(world, self.first_fit) {
            self.first_fit = false;
            self.fit_pending = false;
            self.flags.mark_transform();
        }

        self.update_zoom_level();

        let range = self.visible_range(world);
        if range != self.last_range || self.last_zoom != Some(self.zoom) {
            self.last_range = range;
            self.last_zoom = Some(self.zoom);
            self.flags.mark_tiles();
        }

        match self.scheduler.plan(&self.flags) {
            FramePlan::Idle => TickOutcome::Idle,
            FramePlan::Reposition => {
                self.place_tiles(world);
                self.flags.transform = false;
                TickOutcome::Repositioned
            }
            FramePlan::Throttled => {
                // Keep what is already on screen in step with the view.
                if self.flags.transform {
                    self.place_tiles(world);
                }
                TickOutcome::Throttled
            }
            FramePlan::Reload => self.reload(world, range),
        }
    }

    fn apply_completed(&mut self) {
        for result in self.loader.drain_completed() {
            match result.tile {
                Some(tile) => {
                    self.active.show_content(&result.key, tile, &mut self.surface);
                }
                None => self.active.mark_unavailable(&result.key, &mut self.surface),
            }
        }
    }

    fn update_zoom_level(&mut self) {
        let desired = desired_zoom_level(
            self.viewport.scale,
            self.viewport.min_scale,
            self.config.max_zoom_level,
            self.zoom,
            self.config.zoom_epsilon,
        );
        if desired != self.zoom {
            log::debug!("zoom level {} -> {}", self.zoom, desired);
            self.zoom = desired;
            // Keys of different levels must never share the active set.
            self.active.clear(&mut self.surface);
            self.flags.force_immediate = true;
            self.flags.mark_tiles();
        }
    }

    fn visible_range(&self, world: WorldSize) -> Option<TileRange> {
        visible_tile_range(
            self.viewport.canvas,
            self.viewport.offset,
            self.viewport.scale,
            self.zoom,
            Some(world),
            self.config.tile_padding,
        )
    }

    fn geometry(&self, world: WorldSize) -> TileGeometry {
        TileGeometry::new(
            world,
            self.zoom,
            self.viewport.offset,
            self.viewport.scale,
            self.config.device_pixel_ratio,
        )
    }

    fn place_tiles(&mut self, world: WorldSize) {
        let geometry = self.geometry(world);
        self.active.place_all(&geometry, &mut self.surface);
    }

    fn reload(&mut self, world: WorldSize, range: Option<TileRange>) -> TickOutcome {
        self.flags.clear();

        let needed: HashSet<_> = range.map(|r| r.keys(self.zoom).collect()).unwrap_or_default();
        self.active.reconcile(&needed, &mut self.surface);
        self.place_tiles(world);

        let mut ready = 0;
        for key in &needed {
            match self.loader.request(*key, self.layout.tile_path(*key)) {
                TileRequest::Ready(tile) => {
                    self.active.show_content(key, tile, &mut self.surface);
                    ready += 1;
                }
                // Tiles that already show content stay visible until replaced.
                TileRequest::Queued | TileRequest::InFlight => {}
            }
        }

        log::debug!(
            "reload at level {}: {} tiles, {} ready, {} pending",
            self.zoom,
            needed.len(),
            ready,
            self.loader.pending_count()
        );
        TickOutcome::Reloaded {
            requested: needed.len(),
            ready,
        }
    }

    /// Wheel zoom about `cursor`; ignored until the world size is known
    pub fn zoom_at(&mut self, wheel_delta: f64, cursor: Point) -> bool {
        if self.world.is_none() || wheel_delta == 0.0 || !wheel_delta.is_finite() {
            return false;
        }
        let factor = if wheel_delta > 0.0 {
            self.config.zoom_step
        } else {
            1.0 / self.config.zoom_step
        };
        let changed = self.viewport.zoom_about(cursor, factor);
        if changed {
            self.flags.mark_transform();
        }
        changed
    }

    pub fn drag_start(&mut self, position: Point) {
        self.drag_anchor = Some(position);
    }

    /// Pans by the pointer movement since the previous drag position
    pub fn drag_move(&mut self, position: Point) {
        if let Some(last) = self.drag_anchor {
            self.drag_anchor = Some(position);
            let delta = position.subtract(&last);
            self.pan(delta.x, delta.y);
        }
    }

    pub fn drag_end(&mut self) {
        self.drag_anchor = None;
    }

    pub fn pan(&mut self, dx: f64, dy: f64) {
        if dx == 0.0 && dy == 0.0 {
            return;
        }
        self.viewport.pan(Point::new(dx, dy));
        self.flags.mark_transform();
    }

    pub fn resize(&mut self, width: f64, height: f64) {
        self.viewport.set_canvas_size(Size::new(width, height));
        self.fit_pending = true;
        self.flags.mark_tiles();
    }

    /// Switches to another tile set.
    ///
    /// Everything tied to the old set is dropped before this returns, so no
    /// request made afterwards can be answered from it.
    pub fn set_tiles_root(&mut self, root: impl Into<PathBuf>) {
        let root = root.into();
        log::info!("switching tile root to {}", root.display());

        self.loader.clear();
        self.active.clear(&mut self.surface);
        self.probe.reset();
        self.world = None;

        self.viewport.reset(self.config.min_scale_floor);
        self.first_fit = true;
        self.fit_pending = true;
        self.zoom = 0;
        self.last_range = None;
        self.last_zoom = None;
        self.drag_anchor = None;

        self.flags.clear();
        self.flags.mark_tiles();

        self.layout.set_root(root.clone());
        self.config.tiles_root = root;
    }

    /// Drops every cached tile and reloads what is visible
    pub fn clear_cache(&mut self) {
        log::info!("clearing tile cache ({} tiles)", self.loader.cache().len());
        self.loader.clear();
        self.active.clear(&mut self.surface);
        self.flags.mark_tiles();
    }

    pub fn handle_input(&mut self, event: InputEvent) {
        match event {
            InputEvent::Wheel { delta, position } => {
                self.zoom_at(delta, position);
            }
            InputEvent::DragStart { position } => self.drag_start(position),
            InputEvent::DragMove { position } => self.drag_move(position),
            InputEvent::DragEnd => self.drag_end(),
            InputEvent::Resize { width, height } => self.resize(width, height),
            InputEvent::RootChanged { root } => self.set_tiles_root(root),
            InputEvent::ClearCache => self.clear_cache(),
        }
    }

    /// Status line data; `None` until the world is known and the canvas usable
    pub fn status(&self) -> Option<ViewStatus> {
        let world = self.world?;
        let center_tile = center_tile(
            self.viewport.canvas,
            self.viewport.offset,
            self.viewport.scale,
            self.zoom,
            world,
        )?;
        Some(ViewStatus {
            level: self.zoom,
            active_tiles: self.active.len(),
            center: self.viewport.center_world(),
            center_tile,
        })
    }

    pub fn config(&self) -> &ViewerConfig {
        &self.config
    }

    pub fn layout(&self) -> &TileLayout {
        &self.layout
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn zoom_level(&self) -> u8 {
        self.zoom
    }

    pub fn world_size(&self) -> Option<WorldSize> {
        self.world
    }

    pub fn visible_tiles(&self) -> Option<TileRange> {
        self.last_range
    }

    pub fn active_tiles(&self) -> &ActiveTileSet {
        &self.active
    }

    pub fn loader(&self) -> &TileLoader {
        &self.loader
    }

    pub fn tick_count(&self) -> u64 {
        self.scheduler.tick_count()
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }
}
