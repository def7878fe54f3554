//! Glyph engine - lifecycle, object API and frame rendering
//!
//! [`GlyphEngine`] owns everything: the per-mode [`Storage`], the object
//! table and the configuration. It replaces process-wide state with an
//! explicit context, but keeps the single-instance rule: only one engine may
//! be alive in the process at a time, and the type is neither `Send` nor
//! `Sync`.
//!
//! # State machine
//!
//! ```text
//! Uninitialized --init(mode)--> Active(mode)
//! Active(a) --change_mode(b)--> Active(b)     all handles invalidated
//! Active(a) --reset_all()-----> Active(a)     all handles invalidated
//! Active(_) --cleanup()-------> Uninitialized
//! ```
//!
//! # Errors
//!
//! Capacity exhaustion is logged at warn level and returned. Contract
//! violations are logged at error level, then either panic (when
//! [`EngineConfig::halt_on_contract_violation`] is set) or are returned.
//! No failing call leaves partially written state behind.
//!
//! # Example
//!
//! ```
//! use flappy_ascii_core::{EngineConfig, GlyphEngine, RecordingSink};
//! use flappy_ascii_core::types::{Color, RenderMode, Vec2};
//!
//! let mut engine = GlyphEngine::with_mode(EngineConfig::default(), RenderMode::TwoD).unwrap();
//! let abc = engine
//!     .create_object(
//!         &[Vec2::new(0.0, 0.0), Vec2::new(10.0, 0.0), Vec2::new(20.0, 0.0)],
//!         None,
//!         &[65, 66, 67],
//!     )
//!     .unwrap();
//! engine.move_object(abc, Vec2::new(0.0, 5.0)).unwrap();
//!
//! let mut sink = RecordingSink::new();
//! let stats = engine.render_frame(&mut sink, Color::BLACK, true, false).unwrap();
//! assert_eq!(stats.drawn, 3);
//! assert_eq!(sink.positions(), vec![(0, 5), (10, 5), (20, 5)]);
//! ```

use std::iter;
use std::marker::PhantomData;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::arena::Arena;
use crate::compositor::{submit, FrameStats, GlyphSink, RenderBuffer};
use crate::config::EngineConfig;
use crate::error::{EngineError, Result};
use crate::glyph::{Glyph, GlyphInfo, Position};
use crate::layer::{object_glyphs, Layer, Storage};
use crate::registry::{Backing, GlyphObject, ObjectHandle, ObjectTable};
use crate::types::{Color, GlyphId, RenderMode, GLYPH_ID_MIN, OBJECT_TABLE_SIZE};

/// Set while an engine exists anywhere in the process.
static ENGINE_ACTIVE: AtomicBool = AtomicBool::new(false);

/// Run `$body` against the active layer, whatever its glyph type.
/// Evaluates to `None` while uninitialized.
macro_rules! with_layer {
    ($storage:expr, $layer:ident => $body:expr) => {
        match $storage {
            Storage::TwoD($layer) => Some($body),
            Storage::ThreeD($layer) => Some($body),
            Storage::Uninitialized => None,
        }
    };
}

/// Arena slot of a standalone glyph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GlyphIndex(pub usize);

/// Occupancy snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct EngineStats {
    pub mode: Option<RenderMode>,
    pub arena_capacity: usize,
    pub arena_used: usize,
    pub arena_cursor: usize,
    pub arena_fragmented: bool,
    pub objects: usize,
    pub object_cursor: usize,
    pub objects_fragmented: bool,
    pub standalone_glyphs: usize,
    pub pages: usize,
    pub page_bytes: usize,
    pub staged: usize,
    pub staging_capacity: usize,
}

pub struct GlyphEngine {
    config: EngineConfig,
    storage: Storage,
    objects: ObjectTable,
    /// Occupied arena slots that belong to no object.
    standalone: usize,
    _not_send: PhantomData<*const ()>,
}

impl GlyphEngine {
    /// Create an uninitialized engine.
    ///
    /// Fails with [`EngineError::AlreadyActive`] while another engine is alive
    /// anywhere in the process.
    pub fn new(config: EngineConfig) -> Result<Self> {
        if ENGINE_ACTIVE
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            tracing::error!("glyph engine already active in this process");
            return Err(EngineError::AlreadyActive);
        }

        Ok(Self {
            config,
            storage: Storage::Uninitialized,
            objects: ObjectTable::new(),
            standalone: 0,
            _not_send: PhantomData,
        })
    }

    /// Create and initialize in one step.
    pub fn with_mode(config: EngineConfig, mode: RenderMode) -> Result<Self> {
        let mut engine = Self::new(config)?;
        engine.init(mode)?;
        Ok(engine)
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Active render mode, `None` while uninitialized.
    pub fn mode(&self) -> Option<RenderMode> {
        self.storage.mode()
    }

    pub fn is_initialized(&self) -> bool {
        self.mode().is_some()
    }

    /// Allocate buffers for `mode`.
    pub fn init(&mut self, mode: RenderMode) -> Result<()> {
        if let Some(active) = self.mode() {
            return self.violation(EngineError::AlreadyInitialized(active));
        }
        self.storage = Storage::new(mode, &self.config);
        self.objects.clear();
        self.standalone = 0;
        tracing::debug!(%mode, "glyph engine initialized");
        Ok(())
    }

    /// Release every buffer and page. Safe to call more than once.
    pub fn cleanup(&mut self) {
        if let Some(mode) = self.mode() {
            tracing::debug!(%mode, "glyph engine cleaned up");
        }
        self.storage = Storage::Uninitialized;
        self.objects.clear();
        self.standalone = 0;
    }

    /// Zero all buffers and free all pages, staying in the current mode.
    /// Every outstanding handle becomes stale.
    pub fn reset_all(&mut self) -> Result<()> {
        self.require_init()?;
        with_layer!(&mut self.storage, layer => layer.reset());
        self.objects.clear();
        self.standalone = 0;
        tracing::debug!("glyph engine reset");
        Ok(())
    }

    /// Reinitialize in `mode`. Every outstanding handle becomes stale.
    /// Switching to the active mode does nothing.
    pub fn change_mode(&mut self, mode: RenderMode) -> Result<()> {
        let active = self.require_init()?;
        if active == mode {
            tracing::debug!(%mode, "render mode unchanged");
            return Ok(());
        }

        self.storage = Storage::new(mode, &self.config);
        self.objects.clear();
        self.standalone = 0;
        tracing::debug!(from = %active, to = %mode, "render mode changed");
        Ok(())
    }

    pub fn stats(&self) -> EngineStats {
        let mut stats = EngineStats {
            mode: self.mode(),
            objects: self.objects.live(),
            object_cursor: self.objects.cursor(),
            objects_fragmented: self.objects.is_fragmented(),
            standalone_glyphs: self.standalone,
            ..EngineStats::default()
        };
        with_layer!(&self.storage, layer => {
            stats.arena_capacity = layer.arena.capacity();
            stats.arena_used = layer.arena.used();
            stats.arena_cursor = layer.arena.cursor();
            stats.arena_fragmented = layer.arena.is_fragmented();
            stats.pages = layer.pages.len();
            stats.page_bytes = layer.pages.bytes();
            stats.staged = layer.staging.len();
            stats.staging_capacity = layer.staging.capacity();
        });
        stats
    }

    /// Create an object of `positions.len()` glyphs.
    ///
    /// `colors` defaults every glyph to [`Color::WHITE`]. The object lives in
    /// the arena when a large enough run is free, otherwise in a new overflow
    /// page.
    pub fn create_object<P: Position>(
        &mut self,
        positions: &[P],
        colors: Option<&[Color]>,
        glyph_ids: &[GlyphId],
    ) -> Result<ObjectHandle> {
        self.require_mode(P::MODE)?;
        let len = positions.len();
        if glyph_ids.len() != len {
            return self.violation(EngineError::LengthMismatch {
                expected: len,
                got: glyph_ids.len(),
            });
        }
        if let Some(colors) = colors.filter(|c| c.len() != len) {
            return self.violation(EngineError::LengthMismatch {
                expected: len,
                got: colors.len(),
            });
        }

        self.build_object(len, glyph_ids.iter().copied(), |i| {
            let color = colors.map_or(Color::WHITE, |c| c[i]);
            P::Glyph::new(positions[i], color, glyph_ids[i])
        })
    }

    /// Create an object from a static glyph table.
    pub fn create_object_from_info<P: Position>(
        &mut self,
        info: &[GlyphInfo<P>],
    ) -> Result<ObjectHandle> {
        self.build_object(info.len(), info.iter().map(|g| g.id), |i| {
            P::Glyph::new(info[i].pos, info[i].color, info[i].id)
        })
    }

    fn build_object<G: Glyph>(
        &mut self,
        len: usize,
        mut ids: impl Iterator<Item = GlyphId>,
        init: impl FnMut(usize) -> G,
    ) -> Result<ObjectHandle> {
        self.require_mode(G::MODE)?;
        if len == 0 {
            return self.violation(EngineError::EmptyObject);
        }
        if let Some(id) = ids.find(|&id| id < GLYPH_ID_MIN) {
            return self.violation(EngineError::ReservedGlyphId(id));
        }

        let Some(index) = self.objects.find_free() else {
            return self.exhausted(EngineError::ObjectTableFull(OBJECT_TABLE_SIZE));
        };

        let backing = match self.layer_mut::<G>()?.allocate(len, init) {
            Ok(backing) => backing,
            Err(err) => return self.exhausted(err),
        };

        let handle = self.objects.insert(index, G::MODE, len, backing);
        tracing::debug!(
            object = index,
            glyphs = len,
            paged = matches!(backing, Backing::Paged(_)),
            "glyph object created"
        );
        Ok(handle)
    }

    /// Free an object's glyphs and its table entry.
    pub fn remove_object(&mut self, handle: ObjectHandle) -> Result<()> {
        let object = self.object(handle)?;
        with_layer!(&mut self.storage, layer => layer.release(&object));
        self.objects.remove(handle);
        tracing::debug!(object = handle.index(), glyphs = object.len, "glyph object removed");
        Ok(())
    }

    /// Whether `handle` still refers to a live object.
    pub fn is_live(&self, handle: ObjectHandle) -> bool {
        self.objects.get(handle).is_some()
    }

    pub fn object_len(&self, handle: ObjectHandle) -> Result<usize> {
        Ok(self.object(handle)?.len)
    }

    /// Whether the object lives in an overflow page.
    pub fn is_paged(&self, handle: ObjectHandle) -> Result<bool> {
        Ok(self.object(handle)?.is_paged())
    }

    /// Add `delta` to every glyph of the object.
    pub fn move_object<P: Position>(&mut self, handle: ObjectHandle, delta: P) -> Result<()> {
        for glyph in self.object_glyphs_mut::<P::Glyph>(handle)? {
            glyph.translate(delta);
        }
        Ok(())
    }

    /// Place glyph `i` at `global + local[i]`.
    pub fn set_object_position<P: Position>(
        &mut self,
        handle: ObjectHandle,
        local: &[P],
        global: P,
    ) -> Result<()> {
        let object = self.typed_object::<P::Glyph>(handle)?;
        if local.len() != object.len {
            return self.violation(EngineError::LengthMismatch {
                expected: object.len,
                got: local.len(),
            });
        }
        for (glyph, &offset) in self.object_glyphs_mut::<P::Glyph>(handle)?.iter_mut().zip(local) {
            glyph.set_pos(global + offset);
        }
        Ok(())
    }

    /// Set the translation applied when the object is staged or drawn.
    /// Glyph positions are not touched.
    pub fn set_object_offset<P: Position>(&mut self, handle: ObjectHandle, offset: P) -> Result<()> {
        self.typed_object::<P::Glyph>(handle)?;
        if let Some(object) = self.objects.get_mut(handle) {
            object.offset = offset.to_vec3();
        }
        Ok(())
    }

    pub fn object_offset<P: Position>(&self, handle: ObjectHandle) -> Result<P> {
        Ok(P::from_vec3(self.typed_object::<P::Glyph>(handle)?.offset))
    }

    /// Hidden objects are skipped by the automatic staging pass of
    /// [`render_frame`](Self::render_frame).
    pub fn set_object_visible(&mut self, handle: ObjectHandle, visible: bool) -> Result<()> {
        self.object(handle)?;
        if let Some(object) = self.objects.get_mut(handle) {
            object.visible = visible;
        }
        Ok(())
    }

    pub fn is_object_visible(&self, handle: ObjectHandle) -> Result<bool> {
        Ok(self.object(handle)?.visible)
    }

    /// Borrow the object's glyphs.
    pub fn object_glyphs<G: Glyph>(&self, handle: ObjectHandle) -> Result<&[G]> {
        let object = self.typed_object::<G>(handle)?;
        G::layer(&self.storage)
            .and_then(|layer| layer.glyphs(&object))
            .ok_or(EngineError::StaleHandle)
    }

    /// Mutably borrow the object's glyphs, e.g. to animate single glyphs.
    pub fn object_glyphs_mut<G: Glyph>(&mut self, handle: ObjectHandle) -> Result<&mut [G]> {
        let object = self.typed_object::<G>(handle)?;
        G::layer_mut(&mut self.storage)
            .and_then(|layer| layer.glyphs_mut(&object))
            .ok_or(EngineError::StaleHandle)
    }

    /// Recolor glyph `i` of the object.
    pub fn recolor_object_glyph(&mut self, handle: ObjectHandle, i: usize, color: Color) -> Result<()> {
        let object = self.object(handle)?;
        if i >= object.len {
            return self.violation(EngineError::IndexOutOfRange {
                index: i,
                len: object.len,
            });
        }
        with_layer!(&mut self.storage, layer => {
            if let Some(glyph) = layer.glyphs_mut(&object).and_then(|g| g.get_mut(i)) {
                glyph.set_color(color);
            }
        });
        Ok(())
    }

    /// Put a single glyph into the arena. Standalone glyphs are never paged.
    pub fn place_glyph<P: Position>(&mut self, pos: P, color: Color, id: GlyphId) -> Result<GlyphIndex> {
        self.require_mode(P::MODE)?;
        if id < GLYPH_ID_MIN {
            return self.violation(EngineError::ReservedGlyphId(id));
        }

        let Some(slot) = self
            .layer_mut::<P::Glyph>()?
            .arena
            .alloc(1, |_| P::Glyph::new(pos, color, id))
        else {
            return self.exhausted(EngineError::ArenaFull);
        };

        self.standalone += 1;
        Ok(GlyphIndex(slot))
    }

    /// Copy of the glyph in slot `index`.
    pub fn glyph_at<G: Glyph>(&self, index: GlyphIndex) -> Result<G> {
        self.require_mode(G::MODE)?;
        match G::layer(&self.storage).and_then(|layer| layer.arena.get(index.0)) {
            Some(glyph) => Ok(*glyph),
            None => self.violation(EngineError::IndexOutOfRange {
                index: index.0,
                len: self.arena_capacity(),
            }),
        }
    }

    pub fn move_glyph<P: Position>(&mut self, index: GlyphIndex, delta: P) -> Result<()> {
        self.require_mode(P::MODE)?;
        self.check_standalone(index.0, 1)?;
        self.require_occupied(index.0)?;
        if let Some(glyph) = self.layer_mut::<P::Glyph>()?.arena.get_mut(index.0) {
            glyph.translate(delta);
        }
        Ok(())
    }

    pub fn recolor_instance(&mut self, index: GlyphIndex, color: Color) -> Result<()> {
        self.require_init()?;
        self.check_standalone(index.0, 1)?;
        self.require_occupied(index.0)?;
        with_layer!(&mut self.storage, layer => {
            if let Some(glyph) = layer.arena.get_mut(index.0) {
                glyph.set_color(color);
            }
        });
        Ok(())
    }

    /// Zero one standalone slot. Returns `false` if it was already free.
    pub fn remove_instance(&mut self, index: GlyphIndex) -> Result<bool> {
        Ok(self.remove_instances(index, 1)? == 1)
    }

    /// Zero `count` standalone slots starting at `start`. Returns how many
    /// held a glyph.
    pub fn remove_instances(&mut self, start: GlyphIndex, count: usize) -> Result<usize> {
        self.require_init()?;
        self.check_standalone(start.0, count)?;
        let freed = with_layer!(&mut self.storage, layer => layer.arena.release(start.0, count))
            .unwrap_or(0);
        self.standalone -= freed;
        Ok(freed)
    }

    /// Copy the object into the staging buffer with its offset applied,
    /// ignoring its visibility flag. Returns `false` (and drops the whole
    /// object) when the buffer cannot take it.
    pub fn stage_object(&mut self, handle: ObjectHandle) -> Result<bool> {
        let object = self.object(handle)?;
        let staged = with_layer!(&mut self.storage, layer => stage(layer, &object)).unwrap_or(false);
        if !staged {
            tracing::warn!(object = handle.index(), glyphs = object.len, "render buffer full, object dropped");
        }
        Ok(staged)
    }

    /// Set the object's offset, then stage it.
    pub fn stage_object_at<P: Position>(&mut self, handle: ObjectHandle, offset: P) -> Result<bool> {
        self.set_object_offset(handle, offset)?;
        self.stage_object(handle)
    }

    /// Draw one frame.
    ///
    /// Clears the target when `clear_screen` is set, stages every visible
    /// object in table order (followed by standalone glyphs) unless the
    /// previous frame preserved its buffer, then submits every drawable
    /// staged glyph. With `preserve_buffer` the staged glyphs are kept for
    /// the next frame; otherwise the buffer is emptied.
    pub fn render_frame<S: GlyphSink + ?Sized>(
        &mut self,
        sink: &mut S,
        background: Color,
        clear_screen: bool,
        preserve_buffer: bool,
    ) -> Result<FrameStats> {
        self.require_init()?;
        if clear_screen {
            sink.clear_screen(background);
        }

        let scale = self.config.render_scale;
        let objects = &self.objects;
        let standalone = self.standalone;
        let stats = with_layer!(
            &mut self.storage,
            layer => composite(layer, objects, standalone, sink, scale, preserve_buffer)
        )
        .unwrap_or_default();

        if stats.dropped > 0 {
            tracing::warn!(dropped = stats.dropped, staged = stats.staged, "render buffer full, objects dropped");
        }
        Ok(stats)
    }

    /// Draw the object right away, bypassing the staging buffer.
    /// Returns the number of draw calls issued.
    pub fn draw_object_direct<S: GlyphSink + ?Sized>(
        &self,
        handle: ObjectHandle,
        sink: &mut S,
    ) -> Result<usize> {
        let object = self.object(handle)?;
        let scale = self.config.render_scale;
        let mut stats = FrameStats::default();
        with_layer!(&self.storage, layer => {
            if let Some(glyphs) = layer.glyphs(&object) {
                submit(glyphs, Position::from_vec3(object.offset), scale, sink, &mut stats);
            }
        });
        Ok(stats.drawn)
    }

    fn violation<T>(&self, err: EngineError) -> Result<T> {
        tracing::error!(error = %err, "glyph engine contract violation");
        if self.config.halt_on_contract_violation {
            panic!("glyph engine contract violation: {err}");
        }
        Err(err)
    }

    fn exhausted<T>(&self, err: EngineError) -> Result<T> {
        tracing::warn!(error = %err, "glyph engine capacity exhausted");
        Err(err)
    }

    fn require_init(&self) -> Result<RenderMode> {
        match self.mode() {
            Some(mode) => Ok(mode),
            None => self.violation(EngineError::NotInitialized),
        }
    }

    fn require_mode(&self, requested: RenderMode) -> Result<()> {
        let active = self.require_init()?;
        if active != requested {
            return self.violation(EngineError::ModeMismatch { requested, active });
        }
        Ok(())
    }

    fn layer_mut<G: Glyph>(&mut self) -> Result<&mut Layer<G>> {
        self.require_mode(G::MODE)?;
        G::layer_mut(&mut self.storage).ok_or(EngineError::NotInitialized)
    }

    fn object(&self, handle: ObjectHandle) -> Result<GlyphObject> {
        self.require_init()?;
        match self.objects.get(handle) {
            Some(object) => Ok(*object),
            None => self.violation(EngineError::StaleHandle),
        }
    }

    fn typed_object<G: Glyph>(&self, handle: ObjectHandle) -> Result<GlyphObject> {
        self.require_mode(G::MODE)?;
        self.object(handle)
    }

    fn arena_capacity(&self) -> usize {
        with_layer!(&self.storage, layer => layer.arena.capacity()).unwrap_or(0)
    }

    /// Slots `start..start + count` exist and belong to no object.
    fn check_standalone(&self, start: usize, count: usize) -> Result<()> {
        let capacity = self.arena_capacity();
        let end = start.saturating_add(count);
        if count == 0 || end > capacity {
            return self.violation(EngineError::IndexOutOfRange {
                index: end.saturating_sub(1),
                len: capacity,
            });
        }
        if let Some(owner) = self.objects.arena_owner(start, end) {
            let slot = self
                .objects
                .get(owner)
                .and_then(GlyphObject::arena_range)
                .map_or(start, |range| range.start.max(start));
            return self.violation(EngineError::SlotOwnedByObject(slot));
        }
        Ok(())
    }

    fn require_occupied(&self, index: usize) -> Result<()> {
        let free = with_layer!(&self.storage, layer => {
            layer.arena.get(index).map_or(true, |g| g.is_free())
        })
        .unwrap_or(true);
        if free {
            return self.violation(EngineError::EmptySlot(index));
        }
        Ok(())
    }
}

impl Drop for GlyphEngine {
    fn drop(&mut self) {
        ENGINE_ACTIVE.store(false, Ordering::Release);
    }
}

impl std::fmt::Debug for GlyphEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GlyphEngine")
            .field("config", &self.config)
            .field("stats", &self.stats())
            .finish()
    }
}

fn stage<G: Glyph>(layer: &mut Layer<G>, object: &GlyphObject) -> bool {
    let Layer {
        arena,
        pages,
        staging,
    } = layer;
    match object_glyphs(arena, pages, object) {
        Some(glyphs) => staging.push(glyphs, G::Pos::from_vec3(object.offset)),
        None => false,
    }
}

fn composite<G: Glyph, S: GlyphSink + ?Sized>(
    layer: &mut Layer<G>,
    objects: &ObjectTable,
    standalone: usize,
    sink: &mut S,
    scale: f32,
    preserve_buffer: bool,
) -> FrameStats {
    let mut stats = FrameStats::default();
    let Layer {
        arena,
        pages,
        staging,
    } = layer;

    if !staging.is_retained() {
        for (_, object) in objects.iter().filter(|(_, o)| o.visible) {
            let Some(glyphs) = object_glyphs(arena, pages, object) else {
                continue;
            };
            if !staging.push(glyphs, G::Pos::from_vec3(object.offset)) {
                stats.dropped += 1;
            }
        }
        if standalone > 0 {
            stage_standalone(arena, objects, staging, &mut stats);
        }
    }

    stats.staged = staging.len();
    submit(staging.as_slice(), G::Pos::ZERO, scale, sink, &mut stats);

    if preserve_buffer {
        staging.set_retained(true);
    } else {
        staging.clear();
    }
    stats
}

/// Stage occupied arena slots outside every object run, in slot order.
/// The walk covers the whole capacity once the arena is fragmented.
fn stage_standalone<G: Glyph>(
    arena: &Arena<G>,
    objects: &ObjectTable,
    staging: &mut RenderBuffer<G>,
    stats: &mut FrameStats,
) {
    let bound = if arena.is_fragmented() {
        arena.capacity()
    } else {
        arena.cursor()
    };

    let mut runs = [(0usize, 0usize); OBJECT_TABLE_SIZE];
    let mut n = 0;
    for range in objects.iter().filter_map(|(_, o)| o.arena_range()) {
        runs[n] = (range.start, range.end);
        n += 1;
    }
    let runs = &mut runs[..n];
    runs.sort_unstable();

    let mut at = 0;
    for &(start, end) in runs.iter().chain(iter::once(&(bound, bound))) {
        let from = at.min(bound);
        for glyph in &arena.slots()[from..start.clamp(from, bound)] {
            if glyph.is_free() {
                continue;
            }
            if !staging.push(std::slice::from_ref(glyph), G::Pos::ZERO) {
                stats.dropped += 1;
            }
        }
        at = at.max(end);
    }
}
