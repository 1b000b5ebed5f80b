//! Serialization of laid-out figures into vector documents.
//!
//! Every output format implements [`Renderer`]; callers pick one through
//! [`OutputFormat::renderer`] and never branch on the format themselves.

pub mod postscript;
pub mod svg;

use crate::config::PlotConfig;
use crate::layout::LayoutCell;
use crate::path::Path;
use serde::{Deserialize, Serialize};
use std::fmt;

pub use postscript::PostScriptRenderer;
pub use svg::SvgRenderer;

/// Title used for documents holding more than one sheet.
const BATCH_TITLE: &str = "Lindenmayer System Examples";

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Adobe DSC-conforming PostScript program.
    #[default]
    PostScript,
    /// HTML page with one inline `<svg>` element per sheet.
    Svg,
}

impl OutputFormat {
    pub fn media_type(self) -> &'static str {
        match self {
            Self::PostScript => "application/postscript",
            Self::Svg => "text/html",
        }
    }

    pub fn file_extension(self) -> &'static str {
        match self {
            Self::PostScript => "ps",
            Self::Svg => "html",
        }
    }

    /// Builds the renderer for this format.
    pub fn renderer(self, config: &PlotConfig) -> Box<dyn Renderer> {
        match self {
            Self::PostScript => Box::new(PostScriptRenderer::new(config)),
            Self::Svg => Box::new(SvgRenderer::new(config)),
        }
    }
}

/// One figure ready to draw: a path plus where it goes on the page.
#[derive(Clone, Debug, PartialEq)]
pub struct PlacedFigure {
    pub generation: u32,
    pub path: Path,
    pub cell: LayoutCell,
}

/// One page: a grammar's annotations and its placed figures, in draw order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Sheet {
    pub title: String,
    pub refs: Vec<String>,
    /// Rule listing printed beside the refs.
    pub header: Vec<String>,
    pub figures: Vec<PlacedFigure>,
}

/// A finished vector document.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Document {
    format: OutputFormat,
    pages: usize,
    text: String,
}

impl Document {
    pub fn new(format: OutputFormat, pages: usize, text: String) -> Self {
        Self {
            format,
            pages,
            text,
        }
    }

    pub fn format(&self) -> OutputFormat {
        self.format
    }

    pub fn pages(&self) -> usize {
        self.pages
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn into_string(self) -> String {
        self.text
    }

    pub fn media_type(&self) -> &'static str {
        self.format.media_type()
    }

    pub fn file_extension(&self) -> &'static str {
        self.format.file_extension()
    }
}

impl fmt::Display for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

/// A strategy that serializes sheets into one output format.
pub trait Renderer {
    fn format(&self) -> OutputFormat;

    /// Renders `sheets` in order, one page each.
    fn render(&self, sheets: &[Sheet]) -> Document;
}

/// Document-level title: the sheet title for single pages, a generic one otherwise.
fn document_title(sheets: &[Sheet]) -> &str {
    match sheets {
        [only] => &only.title,
        _ => BATCH_TITLE,
    }
}

/// Fixed-precision number without a negative zero.
fn fmt_num(value: f64, precision: usize) -> String {
    let s = format!("{value:.precision$}");
    if s.starts_with('-') && s[1..].chars().all(|c| c == '0' || c == '.') {
        s[1..].to_string()
    } else {
        s
    }
}
