//! Document configuration.

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Page dimensions in points.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PageSize {
    /// Width in points
    pub width: f32,
    /// Height in points
    pub height: f32,
}

impl PageSize {
    /// ISO A4 (210 x 297 mm).
    pub const A4: PageSize = PageSize {
        width: 595.28,
        height: 841.89,
    };

    /// US Letter (8.5 x 11 in).
    pub const LETTER: PageSize = PageSize {
        width: 612.0,
        height: 792.0,
    };

    /// Custom size.
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Swap width and height.
    pub fn landscape(self) -> Self {
        Self {
            width: self.height,
            height: self.width,
        }
    }
}

impl Default for PageSize {
    fn default() -> Self {
        Self::A4
    }
}

/// Page margins in points.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Margins {
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
    pub left: f32,
}

impl Margins {
    /// The same margin on every side.
    pub fn uniform(margin: f32) -> Self {
        Self {
            top: margin,
            right: margin,
            bottom: margin,
            left: margin,
        }
    }
}

impl Default for Margins {
    /// One inch all round.
    fn default() -> Self {
        Self::uniform(72.0)
    }
}

/// Configuration for document generation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DocumentConfig {
    /// PDF version written in the header
    pub pdf_version: String,
    /// Page size for every page
    pub page_size: PageSize,
    /// Page margins
    pub margins: Margins,
    /// FlateDecode content and font streams
    pub compress: bool,
    /// Document title
    pub title: Option<String>,
    /// Document author
    pub author: Option<String>,
    /// Document subject
    pub subject: Option<String>,
    /// Document keywords
    pub keywords: Option<String>,
    /// Creator application
    pub creator: Option<String>,
    /// Producing library
    pub producer: Option<String>,
    /// Creation date for the Info dictionary
    pub creation_date: Option<DateTime<Utc>>,
    /// Font files tried in order for the `"default"` alias
    pub default_font_candidates: Vec<PathBuf>,
    /// Size of the default font
    pub default_font_size: f32,
}

impl Default for DocumentConfig {
    fn default() -> Self {
        Self {
            pdf_version: "1.7".to_string(),
            page_size: PageSize::A4,
            margins: Margins::default(),
            compress: false,
            title: None,
            author: None,
            subject: None,
            keywords: None,
            creator: None,
            producer: Some(format!("pdf_scribe {}", env!("CARGO_PKG_VERSION"))),
            creation_date: None,
            default_font_candidates: Vec::new(),
            default_font_size: 12.0,
        }
    }
}

impl DocumentConfig {
    /// Set the page size.
    pub fn with_page_size(mut self, page_size: PageSize) -> Self {
        self.page_size = page_size;
        self
    }

    /// Set the page margins.
    pub fn with_margins(mut self, margins: Margins) -> Self {
        self.margins = margins;
        self
    }

    /// Enable or disable stream compression.
    ///
    /// When enabled, content streams, ToUnicode maps and embedded font
    /// programs are compressed using FlateDecode.
    pub fn with_compress(mut self, compress: bool) -> Self {
        self.compress = compress;
        self
    }

    /// Set document title.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Set document author.
    pub fn with_author(mut self, author: impl Into<String>) -> Self {
        self.author = Some(author.into());
        self
    }

    /// Set document subject.
    pub fn with_subject(mut self, subject: impl Into<String>) -> Self {
        self.subject = Some(subject.into());
        self
    }

    /// Set document keywords.
    pub fn with_keywords(mut self, keywords: impl Into<String>) -> Self {
        self.keywords = Some(keywords.into());
        self
    }

    /// Set the creator application.
    pub fn with_creator(mut self, creator: impl Into<String>) -> Self {
        self.creator = Some(creator.into());
        self
    }

    /// Set the creation date.
    pub fn with_creation_date(mut self, date: DateTime<Utc>) -> Self {
        self.creation_date = Some(date);
        self
    }

    /// Add a candidate file for the default font.
    pub fn with_default_font_candidate(mut self, path: impl Into<PathBuf>) -> Self {
        self.default_font_candidates.push(path.into());
        self
    }

    /// Set the default font size.
    pub fn with_default_font_size(mut self, size: f32) -> Self {
        self.default_font_size = size;
        self
    }

    /// Reject geometry that leaves no room for content.
    pub fn validate(&self) -> Result<()> {
        let PageSize { width, height } = self.page_size;
        if !(width > 0.0 && height > 0.0) {
            return Err(Error::InvalidConfiguration(format!(
                "page size must be positive, got {}x{}",
                width, height
            )));
        }
        let m = &self.margins;
        if m.left + m.right >= width || m.top + m.bottom >= height {
            return Err(Error::InvalidConfiguration(
                "margins leave no room for content".to_string(),
            ));
        }
        if !(self.default_font_size > 0.0) {
            return Err(Error::InvalidConfiguration(format!(
                "default font size must be positive, got {}",
                self.default_font_size
            )));
        }
        Ok(())
    }
}

/// Format a date as a PDF date string (`D:YYYYMMDDHHmmSSZ`).
pub fn pdf_date(date: &DateTime<Utc>) -> String {
    format!("D:{}Z", date.format("%Y%m%d%H%M%S"))
}
