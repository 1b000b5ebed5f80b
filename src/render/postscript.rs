//! PostScript output following the Adobe Document Structuring Conventions.
//!
//! Each sheet becomes one `%%Page`. Figures are emitted in absolute page
//! coordinates, one `moveto` per polyline run followed by `lineto`s, so the
//! program draws correctly without any transformation matrix tricks.

use super::{Document, OutputFormat, PlacedFigure, Renderer, Sheet, document_title, fmt_num};
use crate::config::{PageSize, PlotConfig, Typography};
use crate::layout::{HeaderPlacement, PageRegions, Rect};
use std::fmt::{self, Write};

const CREATOR: &str = concat!("lsys-plot ", env!("CARGO_PKG_VERSION"));

/// Defines `pdfmark` as a no-op on interpreters that lack it, so link
/// annotations degrade to plain text outside of PDF distillers.
const PROLOG: &str = "/pdfmark where { pop } { userdict /pdfmark /cleartomark load put } ifelse\n";

#[derive(Clone, Debug)]
pub struct PostScriptRenderer {
    page: PageSize,
    regions: PageRegions,
    typography: Typography,
    line_width: f64,
    precision: usize,
}

impl PostScriptRenderer {
    pub fn new(config: &PlotConfig) -> Self {
        Self {
            page: config.page,
            regions: PageRegions::new(config),
            typography: config.typography.clone(),
            line_width: config.line_width,
            precision: config.precision,
        }
    }

    fn num(&self, v: f64) -> String {
        fmt_num(v, self.precision)
    }

    fn write_document(&self, out: &mut String, sheets: &[Sheet]) -> fmt::Result {
        writeln!(out, "%!PS-Adobe-3.0")?;
        writeln!(out, "%%Title: {}", dsc_text(document_title(sheets)))?;
        writeln!(out, "%%Creator: {CREATOR}")?;
        writeln!(
            out,
            "%%BoundingBox: 0 0 {} {}",
            self.page.width.ceil(),
            self.page.height.ceil()
        )?;
        writeln!(out, "%%Pages: {}", sheets.len())?;
        writeln!(out, "%%EndComments")?;
        writeln!(out, "%%BeginProlog")?;
        out.push_str(PROLOG);
        writeln!(out, "%%EndProlog")?;

        for (i, sheet) in sheets.iter().enumerate() {
            writeln!(out)?;
            writeln!(out, "%%Page: {} {}", i + 1, sheets.len())?;
            self.write_header(out, sheet)?;
            for figure in &sheet.figures {
                self.write_figure(out, figure)?;
            }
            writeln!(out, "showpage")?;
        }

        writeln!(out)?;
        writeln!(out, "%%EOF")
    }

    fn write_header(&self, out: &mut String, sheet: &Sheet) -> fmt::Result {
        let header = self.regions.header;
        let t = &self.typography;
        let place = HeaderPlacement::new(header, t, sheet.refs.len(), sheet.header.len());

        writeln!(out, "%Title: {}", dsc_text(&sheet.title))?;
        writeln!(out, "gsave")?;

        // Title, centered.
        writeln!(out, "/{} findfont {} scalefont setfont", t.title_font, self.num(t.title_size))?;
        writeln!(
            out,
            "({}) dup stringwidth pop {} exch sub 2 div {} add {} moveto show",
            ps_string(&sheet.title),
            self.num(header.width()),
            self.num(header.min.x),
            self.num(place.title_y)
        )?;

        writeln!(out, "/{} findfont {} scalefont setfont", t.attr_font, self.num(t.attr_size))?;

        // References with link annotations, left column.
        for (i, reference) in sheet.refs.iter().enumerate() {
            let p = place.reference(i);
            writeln!(out, "%Ref: {}", dsc_text(reference))?;
            writeln!(out, "{} {} moveto", self.num(p.x), self.num(p.y))?;
            writeln!(out, "({}) show", ps_string(reference))?;
            self.write_link(out, p.x, p.y, reference)?;
        }

        // Rules, right half.
        for (i, line) in sheet.header.iter().enumerate() {
            let p = place.rule(i);
            writeln!(out, "{} {} moveto ({}) show", self.num(p.x), self.num(p.y), ps_string(line))?;
        }

        writeln!(out, "grestore")
    }

    fn write_link(&self, out: &mut String, x: f64, y: f64, link: &str) -> fmt::Result {
        let s = ps_string(link);
        writeln!(
            out,
            "[ /Rect [ {x0} {y0} {x0} ({s}) stringwidth pop add {y1} ]",
            x0 = self.num(x),
            y0 = self.num(y - 2.0),
            y1 = self.num(y + self.typography.attr_size - 2.0),
        )?;
        writeln!(out, "  /Action << /Subtype /URI /URI ({s}) >>")?;
        writeln!(out, "  /Border [0 0 1] /Color [0 0 1] /Subtype /Link")?;
        writeln!(out, "/ANN pdfmark")
    }

    fn write_figure(&self, out: &mut String, figure: &PlacedFigure) -> fmt::Result {
        let cell: Rect = figure.cell.cell;
        writeln!(
            out,
            "%Figure: generation {} segments {} cell [{} {} {} {}]",
            figure.generation,
            figure.path.len(),
            self.num(cell.min.x),
            self.num(cell.min.y),
            self.num(cell.max.x),
            self.num(cell.max.y)
        )?;
        writeln!(out, "gsave")?;
        writeln!(out, "{} setlinewidth 1 setlinejoin 1 setlinecap", self.num(self.line_width))?;
        writeln!(out, "newpath")?;
        for run in figure.path.runs() {
            let mut points = run.into_iter().map(|p| figure.cell.apply(p));
            if let Some(first) = points.next() {
                writeln!(out, "{} {} moveto", self.num(first.x), self.num(first.y))?;
            }
            for p in points {
                writeln!(out, "{} {} lineto", self.num(p.x), self.num(p.y))?;
            }
        }
        writeln!(out, "stroke")?;
        writeln!(out, "grestore")
    }
}

impl Renderer for PostScriptRenderer {
    fn format(&self) -> OutputFormat {
        OutputFormat::PostScript
    }

    fn render(&self, sheets: &[Sheet]) -> Document {
        let mut text = String::new();
        // Writing into a String cannot fail.
        let _ = self.write_document(&mut text, sheets);
        Document::new(OutputFormat::PostScript, sheets.len(), text)
    }
}

/// Escapes text for a PostScript string literal `( ... )`.
///
/// Non-ASCII characters are written as octal escapes of their UTF-8 bytes.
fn ps_string(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '\\' | '(' | ')' => {
                out.push('\\');
                out.push(c);
            }
            c if c.is_ascii() && !c.is_ascii_control() => out.push(c),
            c => {
                let mut buf = [0u8; 4];
                for b in c.encode_utf8(&mut buf).bytes() {
                    out.push_str(&format!("\\{b:03o}"));
                }
            }
        }
    }
    out
}

/// DSC comments end at the line break; keep them on one line.
fn dsc_text(text: &str) -> String {
    text.chars()
        .map(|c| if c.is_control() { ' ' } else { c })
        .collect()
}
