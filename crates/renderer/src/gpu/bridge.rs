//! Streams host-drawn view content into a GPU-sampled texture.
//!
//! The producer side (the host UI) draws RGBA8 pixels into a CPU staging
//! frame between `begin_frame` and `end_frame`; the consumer side (the lens
//! renderer) calls `sample_update` once per render frame to upload the latest
//! committed frame before drawing. The staging frame sits behind a `Mutex`
//! because producing and rendering may run on different threads; this is the
//! one shared-mutable handoff in the whole pipeline.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard};

use tracing::warn;

const BYTES_PER_PIXEL: u32 = 4;

/// Capability interface the lens renderer consumes, keeping it independent
/// of how the sampled content is produced on a given platform.
pub trait TextureSource {
    fn texture_view(&self) -> &wgpu::TextureView;
    /// Pulls the latest produced content into the texture. Re-samples the
    /// previous content when nothing new was committed.
    fn sample_update(&self, queue: &wgpu::Queue);
    /// True once at least one produced frame has reached the texture.
    fn has_frame(&self) -> bool;
}

struct StagingFrame {
    pixels: Vec<u8>,
    width: u32,
    height: u32,
    committed: u64,
}

/// CPU half of the bridge: the mutex-guarded staging frame plus the
/// commit/upload bookkeeping. Split out from the GPU objects so the handoff
/// protocol is testable without a device.
struct FrameStore {
    frame: Mutex<StagingFrame>,
    uploaded: AtomicU64,
}

impl FrameStore {
    fn new(width: u32, height: u32) -> Self {
        Self {
            frame: Mutex::new(StagingFrame {
                pixels: vec![0; (width * height * BYTES_PER_PIXEL) as usize],
                width,
                height,
                committed: 0,
            }),
            uploaded: AtomicU64::new(0),
        }
    }

    fn begin(&self) -> Option<MutexGuard<'_, StagingFrame>> {
        let guard = match self.frame.lock() {
            Ok(guard) => guard,
            Err(poisoned) => {
                warn!("staging frame mutex poisoned; recovering");
                poisoned.into_inner()
            }
        };
        if guard.width == 0 || guard.height == 0 {
            warn!("staging frame has no backing surface; skipping frame");
            return None;
        }
        Some(guard)
    }

    /// Invokes `upload` with the pixel data only when a commit newer than the
    /// last upload exists, then records the upload.
    fn with_dirty(&self, upload: impl FnOnce(&[u8], u32, u32)) {
        let guard = match self.frame.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        if guard.committed == 0 || guard.committed == self.uploaded.load(Ordering::Acquire) {
            return;
        }
        upload(&guard.pixels, guard.width, guard.height);
        self.uploaded.store(guard.committed, Ordering::Release);
    }

    fn has_content(&self) -> bool {
        self.uploaded.load(Ordering::Acquire) > 0
    }
}

/// Exclusive write access to the staging frame for one produced frame.
/// Dropping it without [`ViewToTextureBridge::end_frame`] discards the frame.
pub struct FrameCanvas<'a> {
    guard: MutexGuard<'a, StagingFrame>,
}

impl FrameCanvas<'_> {
    pub fn width(&self) -> u32 {
        self.guard.width
    }

    pub fn height(&self) -> u32 {
        self.guard.height
    }

    /// RGBA8 pixels, row-major, `width * height * 4` bytes.
    pub fn pixels_mut(&mut self) -> &mut [u8] {
        &mut self.guard.pixels
    }
}

pub struct ViewToTextureBridge {
    texture: wgpu::Texture,
    view: wgpu::TextureView,
    size: (u32, u32),
    store: FrameStore,
}

impl ViewToTextureBridge {
    pub fn new(device: &wgpu::Device, width: u32, height: u32) -> Self {
        let (texture, view) = create_texture(device, width.max(1), height.max(1));
        Self {
            texture,
            view,
            size: (width.max(1), height.max(1)),
            store: FrameStore::new(width.max(1), height.max(1)),
        }
    }

    /// Reallocates texture and staging frame for a new surface size.
    /// Idempotent for repeated same-size calls; zero dimensions are ignored.
    /// After a real resize the owner must rebind programs sampling
    /// [`Self::texture_view`], and the texture reads as empty again until the
    /// next commit.
    pub fn resize(&mut self, device: &wgpu::Device, width: u32, height: u32) {
        if width == 0 || height == 0 || (width, height) == self.size {
            return;
        }
        let (texture, view) = create_texture(device, width, height);
        self.texture = texture;
        self.view = view;
        self.size = (width, height);
        self.store = FrameStore::new(width, height);
        tracing::debug!(width, height, "bridge texture reallocated");
    }

    /// Opens the staging frame for drawing. Best-effort: `None` (logged)
    /// when no usable backing surface exists, in which case the visual frame
    /// is simply skipped.
    pub fn begin_frame(&self) -> Option<FrameCanvas<'_>> {
        self.store.begin().map(|guard| FrameCanvas { guard })
    }

    /// Commits the drawn frame. Must be called exactly once per successful
    /// [`Self::begin_frame`].
    pub fn end_frame(&self, mut canvas: FrameCanvas<'_>) {
        canvas.guard.committed += 1;
    }
}

impl TextureSource for ViewToTextureBridge {
    fn texture_view(&self) -> &wgpu::TextureView {
        &self.view
    }

    fn sample_update(&self, queue: &wgpu::Queue) {
        let texture = &self.texture;
        self.store.with_dirty(|pixels, width, height| {
            queue.write_texture(
                wgpu::TexelCopyTextureInfo {
                    texture,
                    mip_level: 0,
                    origin: wgpu::Origin3d::ZERO,
                    aspect: wgpu::TextureAspect::All,
                },
                pixels,
                wgpu::TexelCopyBufferLayout {
                    offset: 0,
                    bytes_per_row: Some(width * BYTES_PER_PIXEL),
                    rows_per_image: Some(height),
                },
                wgpu::Extent3d {
                    width,
                    height,
                    depth_or_array_layers: 1,
                },
            );
        });
    }

    fn has_frame(&self) -> bool {
        self.store.has_content()
    }
}

fn create_texture(device: &wgpu::Device, width: u32, height: u32) -> (wgpu::Texture, wgpu::TextureView) {
    let texture = device.create_texture(&wgpu::TextureDescriptor {
        label: Some("bridge texture"),
        size: wgpu::Extent3d {
            width,
            height,
            depth_or_array_layers: 1,
        },
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format: wgpu::TextureFormat::Rgba8Unorm,
        usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
        view_formats: &[],
    });
    let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
    (texture, view)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn upload_runs_only_after_a_commit() {
        let store = FrameStore::new(4, 4);
        let mut uploads = 0;
        store.with_dirty(|_, _, _| uploads += 1);
        assert_eq!(uploads, 0);
        assert!(!store.has_content());

        let mut guard = store.begin().unwrap();
        guard.pixels[0] = 0xff;
        guard.committed += 1;
        drop(guard);

        store.with_dirty(|pixels, width, height| {
            assert_eq!(pixels[0], 0xff);
            assert_eq!((width, height), (4, 4));
            uploads += 1;
        });
        assert_eq!(uploads, 1);
        assert!(store.has_content());
    }

    #[test]
    fn unchanged_frame_is_not_reuploaded() {
        let store = FrameStore::new(2, 2);
        let mut guard = store.begin().unwrap();
        guard.committed += 1;
        drop(guard);

        let mut uploads = 0;
        store.with_dirty(|_, _, _| uploads += 1);
        store.with_dirty(|_, _, _| uploads += 1);
        assert_eq!(uploads, 1);
    }

    #[test]
    fn zero_sized_store_refuses_frames() {
        let store = FrameStore::new(0, 0);
        assert!(store.begin().is_none());
    }

    #[test]
    fn abandoned_frame_is_discarded() {
        let store = FrameStore::new(2, 2);
        let guard = store.begin().unwrap();
        // Dropped without bumping the commit counter.
        drop(guard);
        let mut uploads = 0;
        store.with_dirty(|_, _, _| uploads += 1);
        assert_eq!(uploads, 0);
    }
}
