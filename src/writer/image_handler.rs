//! Images as XObjects.
//!
//! Decoding is not done here. The layout engine reaches images through the
//! [`ImageProvider`] trait; [`ImageRegistry`] is the built-in provider and
//! accepts JPEG files (embedded as-is with `DCTDecode`) or raw samples with
//! known dimensions (Flate-compressed on embedding).
//!
//! An image becomes an XObject the first time it is drawn. Later uses share
//! that object.

use std::collections::HashMap;
use std::fmt;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use super::object_serializer::ObjectSerializer as Obj;
use super::object_writer::ObjectWriter;
use super::render_context::RenderContext;
use crate::error::{Error, Result};
use crate::layout::InlineObject;

/// An embedded image as seen by page content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageInfo {
    /// XObject id
    pub object_id: u32,
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
    /// Resource label (`Im1`)
    pub resource_name: String,
}

/// Source of images for the layout engine.
pub trait ImageProvider: fmt::Debug {
    /// Pixel size of an image without embedding it.
    fn dimensions(&self, alias: &str) -> Option<(u32, u32)>;

    /// Embed the image if needed and describe it.
    fn get_image(&mut self, alias: &str, writer: &mut ObjectWriter) -> Option<ImageInfo>;

    /// Accept a new image under `alias`. Providers backed by an external
    /// store refuse.
    fn register(&mut self, alias: &str, image: ImageData) -> Result<()> {
        let _ = image;
        Err(Error::InvalidImage {
            alias: alias.to_string(),
            reason: "image provider does not accept new images".to_string(),
        })
    }
}

/// Color space of image samples.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorSpace {
    /// Grayscale (1 component per pixel)
    DeviceGray,
    /// RGB color (3 components per pixel)
    DeviceRGB,
    /// CMYK color (4 components per pixel)
    DeviceCMYK,
}

impl ColorSpace {
    /// Number of color components.
    pub fn components(&self) -> u8 {
        match self {
            ColorSpace::DeviceGray => 1,
            ColorSpace::DeviceRGB => 3,
            ColorSpace::DeviceCMYK => 4,
        }
    }

    /// PDF name for this color space.
    pub fn pdf_name(&self) -> &'static str {
        match self {
            ColorSpace::DeviceGray => "DeviceGray",
            ColorSpace::DeviceRGB => "DeviceRGB",
            ColorSpace::DeviceCMYK => "DeviceCMYK",
        }
    }
}

/// How the sample bytes are stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageEncoding {
    /// JPEG file, embedded unchanged
    Jpeg,
    /// Uncompressed samples, 8 bits per component
    Raw,
}

/// Image bytes plus what is needed to describe them.
#[derive(Debug, Clone)]
pub struct ImageData {
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
    /// Color space of the samples
    pub color_space: ColorSpace,
    /// Storage of `data`
    pub encoding: ImageEncoding,
    /// JPEG file or raw samples
    pub data: Vec<u8>,
}

impl ImageData {
    /// A JPEG file. Size and color space come from its frame header.
    pub fn jpeg(data: Vec<u8>) -> std::result::Result<Self, String> {
        let (width, height, color_space) = parse_jpeg_header(&data)?;
        Ok(Self {
            width,
            height,
            color_space,
            encoding: ImageEncoding::Jpeg,
            data,
        })
    }

    /// Raw 8-bit samples, row by row.
    pub fn raw(
        width: u32,
        height: u32,
        color_space: ColorSpace,
        data: Vec<u8>,
    ) -> std::result::Result<Self, String> {
        let expected = width as usize * height as usize * color_space.components() as usize;
        if width == 0 || height == 0 {
            return Err("image has no pixels".to_string());
        }
        if data.len() != expected {
            return Err(format!("expected {} sample bytes, got {}", expected, data.len()));
        }
        Ok(Self {
            width,
            height,
            color_space,
            encoding: ImageEncoding::Raw,
            data,
        })
    }

    /// Width over height.
    pub fn aspect_ratio(&self) -> f32 {
        self.width as f32 / self.height as f32
    }

    /// Complete XObject body.
    pub fn xobject_body(&self) -> Vec<u8> {
        let mut entries = vec![
            ("Type", Obj::name("XObject")),
            ("Subtype", Obj::name("Image")),
            ("Width", Obj::integer(self.width as i64)),
            ("Height", Obj::integer(self.height as i64)),
            ("ColorSpace", Obj::name(self.color_space.pdf_name())),
            ("BitsPerComponent", Obj::integer(8)),
        ];
        if self.encoding == ImageEncoding::Jpeg {
            entries.push(("Filter", Obj::name("DCTDecode")));
            if self.color_space == ColorSpace::DeviceCMYK {
                // Adobe writes inverted CMYK JPEGs
                entries.push((
                    "Decode",
                    Obj::array([1, 0, 1, 0, 1, 0, 1, 0].into_iter().map(Obj::integer).collect()),
                ));
            }
        }
        let dict = Obj::serialize_to_string(&Obj::dict(entries));
        match self.encoding {
            ImageEncoding::Jpeg => ObjectWriter::stream_body(Some(&dict), &self.data),
            ImageEncoding::Raw => ObjectWriter::encoded_stream_body(Some(&dict), &self.data, true),
        }
    }
}

/// Find the frame header of a JPEG file.
fn parse_jpeg_header(data: &[u8]) -> std::result::Result<(u32, u32, ColorSpace), String> {
    if data.len() < 4 || data[0] != 0xFF || data[1] != 0xD8 {
        return Err("not a JPEG file".to_string());
    }

    let mut pos = 2;
    while pos + 1 < data.len() {
        if data[pos] != 0xFF {
            pos += 1;
            continue;
        }
        let marker = data[pos + 1];
        pos += 2;

        match marker {
            0xFF | 0x00 | 0x01 | 0xD0..=0xD7 => continue,
            0xC0..=0xCF if !matches!(marker, 0xC4 | 0xC8 | 0xCC) => {
                let header = data
                    .get(pos..pos + 8)
                    .ok_or_else(|| "truncated frame header".to_string())?;
                let height = u16::from_be_bytes([header[3], header[4]]) as u32;
                let width = u16::from_be_bytes([header[5], header[6]]) as u32;
                let color_space = match header[7] {
                    1 => ColorSpace::DeviceGray,
                    4 => ColorSpace::DeviceCMYK,
                    _ => ColorSpace::DeviceRGB,
                };
                if width == 0 || height == 0 {
                    return Err("frame header has zero size".to_string());
                }
                return Ok((width, height, color_space));
            },
            _ => {
                let length = data
                    .get(pos..pos + 2)
                    .map(|b| u16::from_be_bytes([b[0], b[1]]) as usize)
                    .ok_or_else(|| "truncated segment".to_string())?;
                pos += length;
            },
        }
    }

    Err("no frame header found".to_string())
}

/// Built-in [`ImageProvider`] holding images in memory.
#[derive(Debug, Default)]
pub struct ImageRegistry {
    images: IndexMap<String, ImageData>,
    embedded: HashMap<String, ImageInfo>,
    embedded_count: u32,
}

impl ImageRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register prepared image data.
    pub fn add(&mut self, alias: impl Into<String>, image: ImageData) {
        let alias = alias.into();
        log::debug!(
            "Registered image '{}' ({}x{} {})",
            alias,
            image.width,
            image.height,
            image.color_space.pdf_name()
        );
        self.embedded.remove(&alias);
        self.images.insert(alias, image);
    }

    /// Register a JPEG file.
    pub fn add_jpeg(&mut self, alias: impl Into<String>, data: Vec<u8>) -> Result<()> {
        let alias = alias.into();
        let image = ImageData::jpeg(data).map_err(|reason| Error::InvalidImage {
            alias: alias.clone(),
            reason,
        })?;
        self.add(alias, image);
        Ok(())
    }

    /// Register raw 8-bit samples.
    pub fn add_raw(
        &mut self,
        alias: impl Into<String>,
        width: u32,
        height: u32,
        color_space: ColorSpace,
        data: Vec<u8>,
    ) -> Result<()> {
        let alias = alias.into();
        let image =
            ImageData::raw(width, height, color_space, data).map_err(|reason| Error::InvalidImage {
                alias: alias.clone(),
                reason,
            })?;
        self.add(alias, image);
        Ok(())
    }

    /// Whether an alias is registered.
    pub fn contains(&self, alias: &str) -> bool {
        self.images.contains_key(alias)
    }

    /// Number of registered images.
    pub fn len(&self) -> usize {
        self.images.len()
    }

    /// Whether nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }
}

impl ImageProvider for ImageRegistry {
    fn register(&mut self, alias: &str, image: ImageData) -> Result<()> {
        self.add(alias, image);
        Ok(())
    }

    fn dimensions(&self, alias: &str) -> Option<(u32, u32)> {
        self.images.get(alias).map(|image| (image.width, image.height))
    }

    fn get_image(&mut self, alias: &str, writer: &mut ObjectWriter) -> Option<ImageInfo> {
        if let Some(info) = self.embedded.get(alias) {
            return Some(info.clone());
        }
        let image = self.images.get(alias)?;
        let object_id = writer.add_object(image.xobject_body());
        self.embedded_count += 1;
        let info = ImageInfo {
            object_id,
            width: image.width,
            height: image.height,
            resource_name: format!("Im{}", self.embedded_count),
        };
        self.embedded.insert(alias.to_string(), info.clone());
        Some(info)
    }
}

/// Horizontal placement of an image block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageAlign {
    #[default]
    Left,
    Center,
    Right,
}

/// Options for [`add_image_block`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImageOptions {
    /// Display width in points; defaults to one point per pixel
    pub width: Option<f32>,
    /// Display height; defaults to keeping the aspect ratio
    pub height: Option<f32>,
    pub align: ImageAlign,
    pub space_before: f32,
    pub space_after: f32,
}

/// Requested widths below this are suspicious but honored.
const SUSPICIOUS_WIDTH: f32 = 10.0;

/// Place an image as a block of its own.
///
/// The image is scaled down to the region width keeping its aspect ratio
/// and is never split: a page break happens first if it does not fit.
pub fn add_image_block(ctx: &mut RenderContext, alias: &str, options: &ImageOptions) -> Result<()> {
    let (px_width, px_height) = ctx
        .images
        .dimensions(alias)
        .ok_or_else(|| Error::ImageNotFound(alias.to_string()))?;

    let available = ctx.layout.width();
    let mut width = options.width.unwrap_or(px_width as f32);
    if width < SUSPICIOUS_WIDTH && available > SUSPICIOUS_WIDTH {
        log::warn!(
            "Image '{}' requested at {:.2}pt wide in a {:.2}pt region; drawing as requested",
            alias,
            width,
            available
        );
    }
    let mut height = options
        .height
        .unwrap_or(width * px_height as f32 / px_width.max(1) as f32);
    if width > available && width > 0.0 {
        let scale = available / width;
        width = available;
        height *= scale;
    }

    ctx.layout.advance_cursor(options.space_before);
    ctx.check_page_break(height);

    let x = ctx.layout.x()
        + match options.align {
            ImageAlign::Left => 0.0,
            ImageAlign::Center => (available - width).max(0.0) / 2.0,
            ImageAlign::Right => (available - width).max(0.0),
        };
    let y = ctx.layout.cursor_y() - height;
    ctx.place_image(alias, x, y, width, height)?;
    ctx.layout.advance_cursor(height + options.space_after);
    Ok(())
}

/// An image drawn inside a line of text, bottom on the baseline.
#[derive(Debug, Clone, PartialEq)]
pub struct InlineImage {
    /// Image alias
    pub alias: String,
    /// Width in points
    pub width: f32,
    /// Height in points
    pub height: f32,
}

impl InlineImage {
    /// Inline image of the given display size.
    pub fn new(alias: impl Into<String>, width: f32, height: f32) -> Self {
        Self {
            alias: alias.into(),
            width,
            height,
        }
    }
}

impl InlineObject for InlineImage {
    fn width(&self) -> f32 {
        self.width
    }

    fn height(&self) -> f32 {
        self.height
    }

    fn draw(&self, ctx: &mut RenderContext, x: f32, baseline: f32) -> Result<()> {
        ctx.place_image(&self.alias, x, baseline, self.width, self.height)
    }
}
