//! Page, typography and pipeline configuration.

use crate::error::LsysError;
use crate::interpreter::InterpreterConfig;
use crate::render::OutputFormat;
use serde::{Deserialize, Serialize};

/// Points per inch, the PostScript user-space unit.
pub const POINTS_PER_INCH: f64 = 72.0;

/// Page dimensions in PostScript points.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct PageSize {
    pub width: f64,
    pub height: f64,
}

impl PageSize {
    /// US Letter, 8.5 x 11 inches.
    pub const LETTER: Self = Self {
        width: 8.5 * POINTS_PER_INCH,
        height: 11.0 * POINTS_PER_INCH,
    };

    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    pub fn validate(&self) -> Result<(), LsysError> {
        if !(self.width.is_finite() && self.width > 0.0) {
            return Err(LsysError::configuration(
                "page.width",
                format!("must be positive, got {}", self.width),
            ));
        }
        if !(self.height.is_finite() && self.height > 0.0) {
            return Err(LsysError::configuration(
                "page.height",
                format!("must be positive, got {}", self.height),
            ));
        }
        Ok(())
    }
}

impl Default for PageSize {
    fn default() -> Self {
        Self::LETTER
    }
}

/// How the figures of one grammar are arranged below the page header.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LayoutStyle {
    /// Uniform cells, `cells_per_row` columns, rows filled top to bottom.
    Grid { cells_per_row: usize },
    /// Small previews in a row above one large main figure (the last one).
    #[default]
    Showcase,
}

/// Treatment of whitespace found in `start` strings and rule bodies.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WhitespacePolicy {
    /// Remove whitespace while validating the grammar.
    #[default]
    Strip,
    /// Keep whitespace as literal symbols; the turtle ignores them.
    Inert,
}

/// Fonts and sizes for page annotations, in points.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Typography {
    pub title_font: String,
    pub title_size: f64,
    pub attr_font: String,
    pub attr_size: f64,
}

impl Default for Typography {
    fn default() -> Self {
        Self {
            title_font: "Times-Bold".to_string(),
            title_size: 30.0,
            attr_font: "Helvetica".to_string(),
            attr_size: 12.0,
        }
    }
}

/// Top-level configuration for a plotting batch.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlotConfig {
    pub page: PageSize,
    /// Blank border around the page, as a fraction of each page dimension.
    pub page_margin: f64,
    /// Share of the printable height reserved for title, refs and rules.
    pub header_fraction: f64,
    /// Stroke width in points, independent of figure scale.
    pub line_width: f64,
    /// Fraction of a cell a figure may fill. Must lie in (0, 1].
    pub margin_factor: f64,
    pub layout: LayoutStyle,
    pub format: OutputFormat,
    /// Decimal places for emitted coordinates.
    pub precision: usize,
    /// Upper bound on the length of any expanded symbol string.
    pub max_symbols: u64,
    /// Generations to draw when a grammar's `order` is empty.
    pub default_order: Vec<u32>,
    /// Subtract one generation when `start` already draws, so that
    /// generation 1 is the simplest non-trivial figure.
    pub offset_drawing_start: bool,
    pub whitespace: WhitespacePolicy,
    pub typography: Typography,
    pub interpreter: InterpreterConfig,
}

impl Default for PlotConfig {
    fn default() -> Self {
        Self {
            page: PageSize::LETTER,
            page_margin: 0.05,
            header_fraction: 0.2,
            line_width: 1.0,
            margin_factor: 0.9,
            layout: LayoutStyle::default(),
            format: OutputFormat::PostScript,
            precision: 3,
            max_symbols: 16 * 1024 * 1024,
            default_order: vec![1, 2, 3, 6],
            offset_drawing_start: false,
            whitespace: WhitespacePolicy::default(),
            typography: Typography::default(),
            interpreter: InterpreterConfig::default(),
        }
    }
}

impl PlotConfig {
    /// Parses a JSON object; missing fields take their defaults.
    pub fn from_json(text: &str) -> Result<Self, LsysError> {
        let config: Self = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Rejects values that would make layout or rendering meaningless.
    pub fn validate(&self) -> Result<(), LsysError> {
        self.page.validate()?;
        if !(0.0..0.5).contains(&self.page_margin) {
            return Err(LsysError::configuration(
                "page_margin",
                format!("must lie in [0, 0.5), got {}", self.page_margin),
            ));
        }
        if !(0.0..1.0).contains(&self.header_fraction) {
            return Err(LsysError::configuration(
                "header_fraction",
                format!("must lie in [0, 1), got {}", self.header_fraction),
            ));
        }
        if !(self.margin_factor > 0.0 && self.margin_factor <= 1.0) {
            return Err(LsysError::configuration(
                "margin_factor",
                format!("must lie in (0, 1], got {}", self.margin_factor),
            ));
        }
        if !(self.line_width.is_finite() && self.line_width > 0.0) {
            return Err(LsysError::configuration(
                "line_width",
                format!("must be positive, got {}", self.line_width),
            ));
        }
        if let LayoutStyle::Grid { cells_per_row: 0 } = self.layout {
            return Err(LsysError::configuration(
                "layout.cells_per_row",
                "must be at least 1",
            ));
        }
        if self.default_order.is_empty() {
            return Err(LsysError::configuration(
                "default_order",
                "must name at least one generation",
            ));
        }
        self.interpreter.validate()
    }
}
