//! Asynchronous fetching and decoding of images, vector graphics and documents.
//!
//! Loads run off the UI thread and post their outcome into an inbox. The
//! editor drains the inbox on its own thread, so the scene is only ever
//! touched from one place.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use futures::future::{BoxFuture, FutureExt};
use parking_lot::Mutex;
use thiserror::Error;

use crate::element::ImageData;
use crate::id_generator::ElementId;

/// Errors raised while fetching or decoding an asset
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AssetError {
    #[error("Failed to read {source_name}: {message}")]
    Io { source_name: String, message: String },

    #[error("Unsupported asset source: {0}")]
    UnsupportedSource(String),

    #[error("Failed to decode image: {0}")]
    Decode(String),

    #[error("Asset is not valid UTF-8 text")]
    InvalidText,
}

impl From<image::ImageError> for AssetError {
    fn from(err: image::ImageError) -> Self {
        AssetError::Decode(err.to_string())
    }
}

/// What an asset decodes into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AssetKind {
    /// PNG or JPEG bitmap
    Image,
    /// SVG markup
    Vector,
    /// Serialized scene
    Document,
}

impl AssetKind {
    /// Accepted media types. Anything else is rejected.
    pub fn from_mime(mime: &str) -> Option<Self> {
        let essence = mime.split(';').next().unwrap_or_default().trim();
        match essence.to_ascii_lowercase().as_str() {
            "image/png" | "image/jpeg" => Some(AssetKind::Image),
            "image/svg+xml" => Some(AssetKind::Vector),
            "application/json" => Some(AssetKind::Document),
            _ => None,
        }
    }

    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "png" | "jpg" | "jpeg" => Some(AssetKind::Image),
            "svg" => Some(AssetKind::Vector),
            "json" => Some(AssetKind::Document),
            _ => None,
        }
    }

    /// Guess from a path or URL by its extension.
    pub fn from_path(path: &str) -> Option<Self> {
        let path = path.split(['?', '#']).next().unwrap_or_default();
        Path::new(path)
            .extension()
            .and_then(|ext| ext.to_str())
            .and_then(Self::from_extension)
    }
}

/// Where an asset's bytes come from.
#[derive(Debug, Clone, PartialEq)]
pub enum AssetSource {
    Path(PathBuf),
    Url(String),
    /// Bytes already in memory, e.g. a dropped file without a path
    Bytes { name: String, bytes: Arc<[u8]> },
}

impl AssetSource {
    /// Reference stored in the image element's `src`.
    pub fn label(&self) -> String {
        match self {
            AssetSource::Path(path) => path.display().to_string(),
            AssetSource::Url(url) => url.clone(),
            AssetSource::Bytes { name, .. } => name.clone(),
        }
    }

    /// Build a source from a persisted `src`: URLs stay URLs, anything else is a path.
    pub fn from_src(src: &str) -> Self {
        if src.contains("://") {
            AssetSource::Url(src.to_owned())
        } else {
            AssetSource::Path(PathBuf::from(src))
        }
    }
}

/// What to do with a decoded asset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssetTarget {
    /// Insert a new element (or load the document)
    Insert,
    /// Restore the payload of an image element loaded from a document
    Rehydrate(ElementId),
}

#[derive(Debug, Clone, PartialEq)]
pub struct AssetRequest {
    pub source: AssetSource,
    pub kind: AssetKind,
    pub target: AssetTarget,
}

impl AssetRequest {
    pub fn new(source: AssetSource, kind: AssetKind) -> Self {
        Self {
            source,
            kind,
            target: AssetTarget::Insert,
        }
    }

    /// A request for a file of the given media type, or `None` if the type is not accepted.
    pub fn from_mime(source: AssetSource, mime: &str) -> Option<Self> {
        AssetKind::from_mime(mime).map(|kind| Self::new(source, kind))
    }

    /// Reload the payload of image `id` from its persisted `src`.
    pub fn rehydrate(id: ElementId, src: &str) -> Option<Self> {
        let kind = AssetKind::from_path(src)?;
        if kind == AssetKind::Document {
            return None;
        }
        Some(Self {
            source: AssetSource::from_src(src),
            kind,
            target: AssetTarget::Rehydrate(id),
        })
    }
}

/// A decoded asset, ready to be applied to the scene.
#[derive(Debug, Clone, PartialEq)]
pub enum DecodedAsset {
    Image(ImageData),
    Document(String),
}

/// Outcome of one load, posted to the inbox.
#[derive(Debug, Clone)]
pub struct AssetCompletion {
    /// `src` for the element that will reference this asset
    pub src: String,
    pub target: AssetTarget,
    /// Scene generation at the time the load was requested
    pub generation: u64,
    pub result: Result<DecodedAsset, AssetError>,
}

/// Source of asset bytes. Swappable so hosts can plug in their own transport.
pub trait Fetch: Send + Sync {
    fn fetch(&self, source: &AssetSource) -> BoxFuture<'static, Result<Vec<u8>, AssetError>>;
}

/// Reads local paths and `file://` URLs.
#[derive(Debug, Clone, Copy, Default)]
pub struct FsFetcher;

impl Fetch for FsFetcher {
    fn fetch(&self, source: &AssetSource) -> BoxFuture<'static, Result<Vec<u8>, AssetError>> {
        let path = match source {
            AssetSource::Bytes { bytes, .. } => {
                let bytes = bytes.to_vec();
                return async move { Ok(bytes) }.boxed();
            }
            AssetSource::Path(path) => path.clone(),
            AssetSource::Url(url) => match url.strip_prefix("file://") {
                Some(path) => PathBuf::from(path),
                None => {
                    let err = AssetError::UnsupportedSource(url.clone());
                    return async move { Err(err) }.boxed();
                }
            },
        };
        async move {
            std::fs::read(&path).map_err(|err| AssetError::Io {
                source_name: path.display().to_string(),
                message: err.to_string(),
            })
        }
        .boxed()
    }
}

/// Longest edge, in pixels, of the bitmap an SVG is rasterized into.
pub const VECTOR_RASTER_EDGE: f32 = 512.0;

/// Decode fetched bytes according to the asset kind.
pub fn decode(kind: AssetKind, bytes: Vec<u8>) -> Result<DecodedAsset, AssetError> {
    match kind {
        AssetKind::Image => {
            let rgba = image::load_from_memory(&bytes)?.to_rgba8();
            let (width, height) = rgba.dimensions();
            log::debug!("Decoded bitmap {}x{}", width, height);
            Ok(DecodedAsset::Image(ImageData::Bitmap {
                width,
                height,
                rgba: Arc::from(rgba.into_raw()),
            }))
        }
        AssetKind::Vector => rasterize_svg(&bytes).map(DecodedAsset::Image),
        AssetKind::Document => {
            let text = String::from_utf8(bytes).map_err(|_| AssetError::InvalidText)?;
            Ok(DecodedAsset::Document(text))
        }
    }
}

/// Parse SVG markup and render it so its longest edge is [`VECTOR_RASTER_EDGE`] pixels.
///
/// The intrinsic size comes from the root's width/height, falling back to its viewBox.
pub fn rasterize_svg(bytes: &[u8]) -> Result<ImageData, AssetError> {
    let tree = usvg::Tree::from_data(bytes, &usvg::Options::default())
        .map_err(|err| AssetError::Decode(err.to_string()))?;
    let size = tree.size();
    let scale = VECTOR_RASTER_EDGE / size.width().max(size.height());
    let raster = size
        .to_int_size()
        .scale_by(scale)
        .ok_or_else(|| AssetError::Decode(format!("SVG too large to rasterize: {:?}", size)))?;
    let mut pixmap = tiny_skia::Pixmap::new(raster.width(), raster.height())
        .ok_or_else(|| AssetError::Decode("SVG has an empty canvas".to_owned()))?;

    let transform = tiny_skia::Transform::from_scale(
        raster.width() as f32 / size.width(),
        raster.height() as f32 / size.height(),
    );
    resvg::render(&tree, transform, &mut pixmap.as_mut());
    log::debug!(
        "Rasterized SVG {}x{} into {}x{} pixels",
        size.width(),
        size.height(),
        raster.width(),
        raster.height()
    );

    let rgba: Vec<u8> = pixmap
        .pixels()
        .iter()
        .flat_map(|pixel| {
            let color = pixel.demultiply();
            [color.red(), color.green(), color.blue(), color.alpha()]
        })
        .collect();
    Ok(ImageData::Vector {
        width: size.width(),
        height: size.height(),
        raster: [raster.width(), raster.height()],
        rgba: Arc::from(rgba),
    })
}

/// Fetches and decodes assets in the background.
#[derive(Clone)]
pub struct AssetLoader {
    fetcher: Arc<dyn Fetch>,
    inbox: Arc<Mutex<Vec<AssetCompletion>>>,
    in_flight: Arc<AtomicUsize>,
    on_complete: Option<Arc<dyn Fn() + Send + Sync>>,
}

impl std::fmt::Debug for AssetLoader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AssetLoader")
            .field("in_flight", &self.in_flight.load(Ordering::Relaxed))
            .field("queued", &self.inbox.lock().len())
            .finish_non_exhaustive()
    }
}

impl Default for AssetLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl AssetLoader {
    pub fn new() -> Self {
        Self::with_fetcher(Arc::new(FsFetcher))
    }

    pub fn with_fetcher(fetcher: Arc<dyn Fetch>) -> Self {
        Self {
            fetcher,
            inbox: Arc::new(Mutex::new(Vec::new())),
            in_flight: Arc::new(AtomicUsize::new(0)),
            on_complete: None,
        }
    }

    /// Called from the loading thread after each completion, e.g. to request a repaint.
    pub fn set_on_complete(&mut self, callback: Arc<dyn Fn() + Send + Sync>) {
        self.on_complete = Some(callback);
    }

    /// Future that fetches and decodes `request`, then posts the outcome to the inbox.
    ///
    /// `generation` is the scene generation at request time; the editor uses
    /// it to discard completions that arrive after the scene was cleared or
    /// replaced.
    pub fn load(&self, request: AssetRequest, generation: u64) -> BoxFuture<'static, ()> {
        let fetch = self.fetcher.fetch(&request.source);
        let inbox = Arc::clone(&self.inbox);
        let in_flight = Arc::clone(&self.in_flight);
        let on_complete = self.on_complete.clone();
        in_flight.fetch_add(1, Ordering::SeqCst);

        async move {
            let src = request.source.label();
            let result = match fetch.await {
                Ok(bytes) => decode(request.kind, bytes),
                Err(err) => Err(err),
            };
            if let Err(err) = &result {
                log::warn!("Loading {} failed: {}", src, err);
            }
            inbox.lock().push(AssetCompletion {
                src,
                target: request.target,
                generation,
                result,
            });
            in_flight.fetch_sub(1, Ordering::SeqCst);
            if let Some(callback) = on_complete {
                callback();
            }
        }
        .boxed()
    }

    /// Run [`load`](Self::load) on a background thread.
    pub fn spawn(&self, request: AssetRequest, generation: u64) {
        let label = request.source.label();
        let task = self.load(request, generation);
        let spawned = std::thread::Builder::new()
            .name("asset-loader".to_owned())
            .spawn(move || futures::executor::block_on(task));
        if let Err(err) = spawned {
            self.in_flight.fetch_sub(1, Ordering::SeqCst);
            log::error!("Failed to start loader for {}: {}", label, err);
        }
    }

    /// Take every completion posted so far, oldest first.
    pub fn drain(&self) -> Vec<AssetCompletion> {
        std::mem::take(&mut *self.inbox.lock())
    }

    /// Loads started but not yet posted.
    pub fn in_flight(&self) -> usize {
        self.in_flight.load(Ordering::SeqCst)
    }
}
