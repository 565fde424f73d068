//! Image pre-insertion pipeline.
//!
//! Uploaded, pasted and dropped images are decoded, downscaled to fit within
//! the configured bounds and re-encoded as JPEG before they reach the scene.
//! Assets are only probed for their natural size.
//!
//! Work is queued and completed on the editor's tick in submission order, so
//! overlapping inserts land in the order the user started them.

use crate::error::{PipelineError, PipelineResult};
use crate::objects::{Asset, Image, ImageFormat, SceneObject};
use image::codecs::jpeg::JpegEncoder;
use image::imageops::FilterType;
use image::{GenericImageView, ImageReader};
use std::collections::{HashMap, VecDeque};
use std::io::Cursor;
use std::path::{Component, Path, PathBuf};

/// Downscale bounds and JPEG quality for prepared images.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResizeOptions {
    pub max_width: u32,
    pub max_height: u32,
    pub quality: u8,
}

impl Default for ResizeOptions {
    fn default() -> Self {
        Self {
            max_width: 512,
            max_height: 512,
            quality: 80,
        }
    }
}

/// An image that is ready to be inserted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreparedImage {
    pub format: ImageFormat,
    pub bytes: Vec<u8>,
    pub width: u32,
    pub height: u32,
}

impl PreparedImage {
    pub fn into_image(self) -> Image {
        Image::new(&self.bytes, self.width, self.height, self.format)
    }
}

/// Where an image payload came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageIntent {
    Upload,
    Clipboard,
    Drop,
}

impl ImageIntent {
    /// Clipboard and drop payloads are filtered by MIME type; uploads are not.
    pub fn is_mime_gated(&self) -> bool {
        matches!(self, ImageIntent::Clipboard | ImageIntent::Drop)
    }
}

/// Whether a MIME type may enter the pipeline from the clipboard or a drop.
pub fn is_supported_mime(mime: &str) -> bool {
    ImageFormat::from_mime(mime).is_some()
}

/// Decode, downscale (never upscale) and re-encode as JPEG.
pub fn prepare_image(bytes: &[u8], options: &ResizeOptions) -> PipelineResult<PreparedImage> {
    let decoded = image::load_from_memory(bytes).map_err(PipelineError::Decode)?;

    let max_width = options.max_width.max(1);
    let max_height = options.max_height.max(1);
    let decoded = if decoded.width() > max_width || decoded.height() > max_height {
        decoded.resize(max_width, max_height, FilterType::Triangle)
    } else {
        decoded
    };

    let (width, height) = decoded.dimensions();
    let rgb = decoded.to_rgb8();
    let mut out = Vec::new();
    JpegEncoder::new_with_quality(&mut out, options.quality.clamp(1, 100))
        .encode_image(&rgb)
        .map_err(PipelineError::Encode)?;

    Ok(PreparedImage {
        format: ImageFormat::Jpeg,
        bytes: out,
        width,
        height,
    })
}

/// Read only the header to get an encoded image's dimensions.
pub fn probe_dimensions(bytes: &[u8]) -> PipelineResult<(u32, u32)> {
    let reader = ImageReader::new(Cursor::new(bytes)).with_guessed_format()?;
    reader.into_dimensions().map_err(PipelineError::Decode)
}

/// Resolves asset source references to encoded image bytes.
pub trait AssetResolver {
    fn fetch(&self, source: &str) -> PipelineResult<Vec<u8>>;
}

/// Resolves assets as paths under a base directory.
#[derive(Debug, Clone, Default)]
pub struct FileAssetResolver {
    root: PathBuf,
}

impl FileAssetResolver {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl AssetResolver for FileAssetResolver {
    fn fetch(&self, source: &str) -> PipelineResult<Vec<u8>> {
        if source.starts_with("http://") || source.starts_with("https://") {
            return Err(PipelineError::AssetUnavailable {
                reference: source.to_string(),
                reason: "remote assets are not fetched".to_string(),
            });
        }
        let relative = Path::new(source.trim_start_matches('/'));
        if relative.components().any(|c| !matches!(c, Component::Normal(_) | Component::CurDir)) {
            return Err(PipelineError::AssetUnavailable {
                reference: source.to_string(),
                reason: "path escapes the asset root".to_string(),
            });
        }
        let path = self.root.join(relative);
        std::fs::read(&path).map_err(|e| PipelineError::AssetUnavailable {
            reference: source.to_string(),
            reason: e.to_string(),
        })
    }
}

/// In-memory asset table, for hosts that bundle their assets and for tests.
#[derive(Debug, Clone, Default)]
pub struct MemoryAssetResolver {
    assets: HashMap<String, Vec<u8>>,
}

impl MemoryAssetResolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, source: impl Into<String>, bytes: Vec<u8>) {
        self.assets.insert(source.into(), bytes);
    }
}

impl AssetResolver for MemoryAssetResolver {
    fn fetch(&self, source: &str) -> PipelineResult<Vec<u8>> {
        self.assets
            .get(source)
            .cloned()
            .ok_or_else(|| PipelineError::AssetUnavailable {
                reference: source.to_string(),
                reason: "not found".to_string(),
            })
    }
}

/// A queued insertion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageJob {
    Image {
        intent: ImageIntent,
        mime_type: Option<String>,
        bytes: Vec<u8>,
    },
    Asset { source: String },
}

impl ImageJob {
    pub fn upload(bytes: Vec<u8>) -> Self {
        ImageJob::Image {
            intent: ImageIntent::Upload,
            mime_type: None,
            bytes,
        }
    }

    pub fn asset(source: impl Into<String>) -> Self {
        ImageJob::Asset {
            source: source.into(),
        }
    }

    fn describe(&self) -> String {
        match self {
            ImageJob::Image { intent, bytes, .. } => format!("{:?} image ({} bytes)", intent, bytes.len()),
            ImageJob::Asset { source } => format!("asset {}", source),
        }
    }
}

/// A finished job: the object to insert and the contain-fit multiplier to apply.
#[derive(Debug, Clone, PartialEq)]
pub struct Completed {
    pub object: SceneObject,
    pub fit_multiplier: f64,
}

/// FIFO queue of pending insertions.
#[derive(Debug, Clone)]
pub struct ImagePipeline {
    options: ResizeOptions,
    image_fit_multiplier: f64,
    asset_fit_multiplier: f64,
    jobs: VecDeque<ImageJob>,
}

impl ImagePipeline {
    pub fn new(options: ResizeOptions, image_fit_multiplier: f64, asset_fit_multiplier: f64) -> Self {
        Self {
            options,
            image_fit_multiplier,
            asset_fit_multiplier,
            jobs: VecDeque::new(),
        }
    }

    pub fn options(&self) -> &ResizeOptions {
        &self.options
    }

    /// Queue a job. Gated payloads with an unsupported MIME type are refused.
    pub fn submit(&mut self, job: ImageJob) -> PipelineResult<()> {
        if let ImageJob::Image {
            intent, mime_type, ..
        } = &job
        {
            let mime = mime_type.as_deref().unwrap_or("");
            if intent.is_mime_gated() && !is_supported_mime(mime) {
                return Err(PipelineError::UnsupportedType(mime.to_string()));
            }
        }
        self.jobs.push_back(job);
        Ok(())
    }

    /// Number of queued jobs.
    pub fn pending(&self) -> usize {
        self.jobs.len()
    }

    pub fn is_idle(&self) -> bool {
        self.jobs.is_empty()
    }

    /// Drop every queued job.
    pub fn cancel_all(&mut self) -> usize {
        let cancelled = self.jobs.len();
        self.jobs.clear();
        cancelled
    }

    /// Complete all queued jobs in submission order.
    pub fn run(&mut self, resolver: &dyn AssetResolver) -> Vec<PipelineResult<Completed>> {
        let mut results = Vec::with_capacity(self.jobs.len());
        while let Some(job) = self.jobs.pop_front() {
            let description = job.describe();
            let result = self.complete(job, resolver);
            if let Err(e) = &result {
                log::error!("Dropping {}: {}", description, e);
            }
            results.push(result);
        }
        results
    }

    fn complete(&self, job: ImageJob, resolver: &dyn AssetResolver) -> PipelineResult<Completed> {
        match job {
            ImageJob::Image { bytes, .. } => {
                let prepared = prepare_image(&bytes, &self.options)?;
                Ok(Completed {
                    object: prepared.into_image().into(),
                    fit_multiplier: self.image_fit_multiplier,
                })
            }
            ImageJob::Asset { source } => {
                let bytes = resolver.fetch(&source)?;
                let (width, height) = probe_dimensions(&bytes)?;
                Ok(Completed {
                    object: Asset::new(source, width, height).into(),
                    fit_multiplier: self.asset_fit_multiplier,
                })
            }
        }
    }
}
