//! Image lookup, scaling and placement.
//!
//! Lookups go through the [`ResourceProvider`] rooted at the document root.
//! Anything that keeps a file from being read or decoded degrades to a
//! placeholder line; only images that decode to something unusable fail the
//! block.

use super::BlockContext;
use crate::config::ImageConfig;
use crate::elements::{ImageElement, LayoutElement, RasterImage};
use crate::error::LayoutError;
use crate::flow::Flow;
use crate::style::TextStyle;
use crate::text::{draw_line, draw_text, lines_height, wrap, Line, Piece};
use image::{DynamicImage, ImageReader};
use postpress_resource::ResourceProvider;
use postpress_types::Color;
use std::collections::HashMap;
use std::io::Cursor;
use std::sync::Arc;

pub const IMAGE_SPACE_BEFORE: f32 = 3.0;
pub const CAPTION_GAP: f32 = 2.0;
pub const IMAGE_SPACE_AFTER: f32 = 5.0;
pub const PLACEHOLDER_SPACE_AFTER: f32 = 2.0;

const CAPTION_COLOR: Color = Color::gray(100);
const PLACEHOLDER_COLOR: Color = Color::gray(150);
const SOURCE_HINT_COLOR: Color = Color::rgb(200, 100, 100);

/// Where and how large a resolved image is drawn.
#[derive(Debug, Clone, PartialEq)]
pub struct ImagePlacement {
    pub resolved_path: Option<String>,
    pub display_width: f32,
    pub display_height: f32,
    pub caption: Option<String>,
}

/// Result of scaling an image into its box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Fit {
    pub width: f32,
    pub height: f32,
    pub scale: f32,
}

/// Converts pixel dimensions to millimetres and scales them into
/// `max_width` x `max_height`, keeping the aspect ratio.
pub fn fit_to_box(
    width_px: u32,
    height_px: u32,
    config: &ImageConfig,
    max_width: f32,
    max_height: f32,
) -> Option<Fit> {
    if width_px == 0 || height_px == 0 {
        return None;
    }
    let natural_width = width_px as f32 * config.px_to_mm;
    let natural_height = height_px as f32 * config.px_to_mm;
    let mut scale = (max_width / natural_width).min(max_height / natural_height);
    if !config.allow_upscale {
        scale = scale.min(1.0);
    }
    Some(Fit {
        width: natural_width * scale,
        height: natural_height * scale,
        scale,
    })
}

/// The box an image may occupy on a page with `content_width` available.
pub fn max_box(config: &ImageConfig, content_width: f32) -> (f32, f32) {
    let width = config
        .max_width
        .min(content_width - 2.0 * config.side_inset)
        .max(1.0);
    (width, config.max_height)
}

/// `true` for sources that name another host: `scheme://…` or `//host/…`.
pub fn is_remote(src: &str) -> bool {
    if src.starts_with("//") {
        return true;
    }
    match src.find("://") {
        Some(pos) => {
            let scheme = &src[..pos];
            scheme.starts_with(|c: char| c.is_ascii_alphabetic())
                && scheme
                    .chars()
                    .all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
        }
        None => false,
    }
}

/// Last path segment of `src`, ignoring any query or fragment.
pub fn basename(src: &str) -> &str {
    let path = src.split(['?', '#']).next().unwrap_or(src);
    path.trim_end_matches('/')
        .rsplit('/')
        .next()
        .unwrap_or(path)
}

/// Root-relative lookup paths for a local `src`, in resolution order.
pub fn candidate_paths(src: &str) -> Vec<String> {
    let name = basename(src);
    let mut candidates = match src.strip_prefix('/') {
        Some(rooted) => vec![
            rooted.to_string(),
            format!("uploads/images/{}", name),
        ],
        None => vec![
            src.trim_start_matches("./").to_string(),
            format!("uploads/images/{}", name),
            format!("uploads/files/{}", name),
        ],
    };
    let mut seen = Vec::with_capacity(candidates.len());
    candidates.retain(|c| {
        let fresh = !c.is_empty() && !seen.contains(c);
        if fresh {
            seen.push(c.clone());
        }
        fresh
    });
    candidates
}

/// Loads, decodes and caches images for one render. Each resolved path is
/// decoded at most once.
#[derive(Debug)]
pub struct ImageLoader<'a> {
    resources: &'a dyn ResourceProvider,
    config: ImageConfig,
    cache: HashMap<String, Arc<RasterImage>>,
}

impl<'a> ImageLoader<'a> {
    pub fn new(resources: &'a dyn ResourceProvider, config: ImageConfig) -> Self {
        Self {
            resources,
            config,
            cache: HashMap::new(),
        }
    }

    /// First readable candidate for `src`.
    pub fn resolve(&self, src: &str) -> Option<String> {
        candidate_paths(src).into_iter().find(|path| {
            let readable = self.resources.is_readable(path);
            log::debug!(
                "Image candidate '{}' via {}: {}",
                path,
                self.resources.name(),
                if readable { "found" } else { "missing" }
            );
            readable
        })
    }

    /// `Ok(None)` when the file cannot be read or decoded; the caller shows a
    /// placeholder. Dimension problems are errors for the whole block.
    pub fn load(&mut self, path: &str) -> Result<Option<Arc<RasterImage>>, LayoutError> {
        if let Some(image) = self.cache.get(path) {
            return Ok(Some(Arc::clone(image)));
        }

        let bytes = match self.resources.load(path) {
            Ok(bytes) => bytes,
            Err(e) => {
                log::warn!("Could not read image '{}': {}", path, e);
                return Ok(None);
            }
        };

        let (width, height) = match probe_dimensions(&bytes) {
            Ok(dims) => dims,
            Err(e) => {
                log::warn!("Could not read image header of '{}': {}", path, e);
                return Ok(None);
            }
        };
        if width == 0 || height == 0 {
            return Err(LayoutError::DegenerateImage {
                path: path.to_string(),
                width,
                height,
            });
        }
        let pixels = u64::from(width) * u64::from(height);
        if pixels > self.config.max_pixels {
            return Err(LayoutError::ImageTooLarge {
                path: path.to_string(),
                pixels,
                limit: self.config.max_pixels,
            });
        }

        let decoded = match image::load_from_memory(&bytes) {
            Ok(decoded) => decoded,
            Err(e) => {
                log::warn!("Could not decode image '{}': {}", path, e);
                return Ok(None);
            }
        };

        let raster = Arc::new(RasterImage {
            key: path.to_string(),
            width_px: decoded.width(),
            height_px: decoded.height(),
            rgb: flatten_onto_white(&decoded),
        });
        self.cache.insert(path.to_string(), Arc::clone(&raster));
        Ok(Some(raster))
    }

    /// Number of distinct images decoded so far.
    pub fn cached(&self) -> usize {
        self.cache.len()
    }
}

fn probe_dimensions(bytes: &[u8]) -> Result<(u32, u32), String> {
    ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .map_err(|e| e.to_string())?
        .into_dimensions()
        .map_err(|e| e.to_string())
}

fn flatten_onto_white(image: &DynamicImage) -> Vec<u8> {
    let rgba = image.to_rgba8();
    let mut rgb = Vec::with_capacity(rgba.width() as usize * rgba.height() as usize * 3);
    for pixel in rgba.pixels() {
        let [r, g, b, a] = pixel.0;
        let alpha = u16::from(a);
        for channel in [r, g, b] {
            let blended = (u16::from(channel) * alpha + 255 * (255 - alpha) + 127) / 255;
            rgb.push(blended as u8);
        }
    }
    rgb
}

pub fn layout_image(
    flow: &mut Flow,
    ctx: &BlockContext<'_>,
    loader: &mut ImageLoader<'_>,
    src: &str,
    alt: &str,
) -> Result<(), LayoutError> {
    let (src, alt) = (src.trim(), alt.trim());

    if src.is_empty() {
        draw_placeholder(flow, ctx, "[Image - no source]", None);
        return Ok(());
    }
    if is_remote(src) {
        log::debug!("Not fetching remote image {}", src);
        draw_placeholder(flow, ctx, &format!("[External Image: {}]", basename(src)), None);
        return Ok(());
    }

    let loaded = match loader.resolve(src) {
        Some(path) => loader.load(&path)?.map(|image| (path, image)),
        None => {
            log::warn!("No readable file found for image '{}'", src);
            None
        }
    };

    let Some((path, image)) = loaded else {
        let label = if alt.is_empty() {
            "[Image]".to_string()
        } else {
            format!("[Image: {}]", alt)
        };
        let hint = ctx
            .config
            .images
            .show_source_hint
            .then(|| format!("Original src: {}", src));
        draw_placeholder(flow, ctx, &label, hint.as_deref());
        return Ok(());
    };

    let (max_width, max_height) = max_box(&ctx.config.images, flow.content_width());
    let fit = fit_to_box(image.width_px, image.height_px, &ctx.config.images, max_width, max_height)
        .ok_or_else(|| LayoutError::DegenerateImage {
            path: path.clone(),
            width: image.width_px,
            height: image.height_px,
        })?;

    let placement = ImagePlacement {
        resolved_path: Some(path),
        display_width: fit.width,
        display_height: fit.height,
        caption: (!alt.is_empty()).then(|| alt.to_string()),
    };
    draw_image(flow, ctx, &placement, image);
    Ok(())
}

/// Caption lines wrapped to `content_width`.
fn caption_lines(ctx: &BlockContext<'_>, caption: &str, content_width: f32) -> Vec<Line> {
    wrap(&[Piece::new(caption, caption_style(ctx))], content_width)
}

/// Total vertical space an image block takes on a page with `content_width`
/// available, spacing and every caption line included.
pub fn block_height(ctx: &BlockContext<'_>, placement: &ImagePlacement, content_width: f32) -> f32 {
    let caption = match &placement.caption {
        Some(caption) => {
            let factor = ctx.line_factor();
            let fallback = caption_style(ctx).line_height(factor);
            CAPTION_GAP + lines_height(&caption_lines(ctx, caption, content_width), factor, fallback)
        }
        None => 0.0,
    };
    IMAGE_SPACE_BEFORE + placement.display_height + caption + IMAGE_SPACE_AFTER
}

fn caption_style(ctx: &BlockContext<'_>) -> TextStyle {
    ctx.body.sized(9.0).italic().colored(CAPTION_COLOR)
}

fn draw_image(flow: &mut Flow, ctx: &BlockContext<'_>, placement: &ImagePlacement, image: Arc<RasterImage>) {
    let left = flow.content_left();
    let content_width = flow.content_width();

    let needed = ctx
        .config
        .images
        .page_break_reserve
        .max(block_height(ctx, placement, content_width));
    flow.ensure_room(needed);
    flow.gap(IMAGE_SPACE_BEFORE);

    let x = left + (content_width - placement.display_width) / 2.0;
    let y = flow.y();
    flow.push(
        x,
        y,
        placement.display_width,
        placement.display_height,
        LayoutElement::Image(ImageElement { image }),
    );
    flow.advance(placement.display_height);

    if let Some(caption) = &placement.caption {
        flow.advance(CAPTION_GAP);
        let factor = ctx.line_factor();
        let fallback = caption_style(ctx).line_height(factor);
        // Only a block taller than a whole page breaks inside its caption.
        for line in caption_lines(ctx, caption, content_width) {
            let height = line.height(factor, fallback);
            flow.ensure_room(height);
            draw_line(flow, &line, left + (content_width - line.width) / 2.0, height);
            flow.advance(height);
        }
    }
    flow.gap(IMAGE_SPACE_AFTER);
}

fn draw_placeholder(flow: &mut Flow, ctx: &BlockContext<'_>, label: &str, hint: Option<&str>) {
    let factor = ctx.line_factor();
    let label_style = ctx.body.sized(10.0).italic().colored(PLACEHOLDER_COLOR);
    draw_text(flow, label, &label_style, factor);
    if let Some(hint) = hint {
        let hint_style = TextStyle {
            italic: false,
            ..ctx.body.sized(8.0).colored(SOURCE_HINT_COLOR)
        };
        draw_text(flow, hint, &hint_style, factor);
    }
    flow.gap(PLACEHOLDER_SPACE_AFTER);
}
