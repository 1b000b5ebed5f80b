//! SVG embedded in a standalone HTML page.

use super::{Document, OutputFormat, PlacedFigure, Renderer, Sheet, document_title, fmt_num};
use crate::config::{POINTS_PER_INCH, PageSize, PlotConfig, Typography};
use crate::layout::{HeaderPlacement, PageRegions};
use glam::DVec2;
use std::fmt::{self, Write};

#[derive(Clone, Debug)]
pub struct SvgRenderer {
    page: PageSize,
    regions: PageRegions,
    typography: Typography,
    line_width: f64,
    precision: usize,
}

impl SvgRenderer {
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

    /// Page space has Y up from the bottom edge; SVG has Y down from the top.
    fn flip(&self, p: DVec2) -> DVec2 {
        DVec2::new(p.x, self.page.height - p.y)
    }

    fn write_document(&self, out: &mut String, sheets: &[Sheet]) -> fmt::Result {
        writeln!(out, "<!DOCTYPE html>")?;
        writeln!(out, "<html lang=\"en\">")?;
        writeln!(out, "<head>")?;
        writeln!(out, "<meta charset=\"utf-8\">")?;
        writeln!(out, "<title>{}</title>", xml_escape(document_title(sheets)))?;
        writeln!(out, "</head>")?;
        writeln!(out, "<body>")?;
        for sheet in sheets {
            self.write_sheet(out, sheet)?;
        }
        writeln!(out, "</body>")?;
        writeln!(out, "</html>")
    }

    fn write_sheet(&self, out: &mut String, sheet: &Sheet) -> fmt::Result {
        writeln!(
            out,
            "<svg xmlns=\"http://www.w3.org/2000/svg\" version=\"1.1\" width=\"{}in\" height=\"{}in\" viewBox=\"0 0 {} {}\">",
            self.num(self.page.width / POINTS_PER_INCH),
            self.num(self.page.height / POINTS_PER_INCH),
            self.num(self.page.width),
            self.num(self.page.height),
        )?;
        writeln!(out, "<!-- {} -->", comment_text(&sheet.title))?;
        self.write_header(out, sheet)?;
        for figure in &sheet.figures {
            self.write_figure(out, figure)?;
        }
        writeln!(out, "</svg>")
    }

    fn write_header(&self, out: &mut String, sheet: &Sheet) -> fmt::Result {
        let header = self.regions.header;
        let t = &self.typography;
        let place = HeaderPlacement::new(header, t, sheet.refs.len(), sheet.header.len());
        let (title_family, title_weight) = font_attrs(&t.title_font);
        let (attr_family, attr_weight) = font_attrs(&t.attr_font);

        let anchor = self.flip(DVec2::new(header.center().x, place.title_y));
        writeln!(
            out,
            "<text x=\"{}\" y=\"{}\" font-family=\"{title_family}\" font-weight=\"{title_weight}\" font-size=\"{}\" text-anchor=\"middle\">{}</text>",
            self.num(anchor.x),
            self.num(anchor.y),
            self.num(t.title_size),
            xml_escape(&sheet.title),
        )?;

        let text_attrs = format!(
            "font-family=\"{attr_family}\" font-weight=\"{attr_weight}\" font-size=\"{}\"",
            self.num(t.attr_size)
        );

        for (i, reference) in sheet.refs.iter().enumerate() {
            let p = self.flip(place.reference(i));
            writeln!(
                out,
                "<a href=\"{href}\"><text x=\"{}\" y=\"{}\" {text_attrs} fill=\"blue\">{href}</text></a>",
                self.num(p.x),
                self.num(p.y),
                href = xml_escape(reference),
            )?;
        }

        for (i, line) in sheet.header.iter().enumerate() {
            let p = self.flip(place.rule(i));
            writeln!(
                out,
                "<text x=\"{}\" y=\"{}\" {text_attrs} xml:space=\"preserve\">{}</text>",
                self.num(p.x),
                self.num(p.y),
                xml_escape(line),
            )?;
        }
        Ok(())
    }

    fn write_figure(&self, out: &mut String, figure: &PlacedFigure) -> fmt::Result {
        writeln!(
            out,
            "<!-- generation {} segments {} -->",
            figure.generation,
            figure.path.len()
        )?;
        let mut d = String::new();
        for run in figure.path.runs() {
            for (i, p) in run.into_iter().enumerate() {
                let p = self.flip(figure.cell.apply(p));
                let op = if i == 0 { 'M' } else { 'L' };
                if !d.is_empty() {
                    d.push(' ');
                }
                write!(d, "{op}{} {}", self.num(p.x), self.num(p.y))?;
            }
        }
        writeln!(
            out,
            "<path d=\"{d}\" fill=\"none\" stroke=\"black\" stroke-width=\"{}\" stroke-linejoin=\"round\" stroke-linecap=\"round\"/>",
            self.num(self.line_width)
        )
    }
}

impl Renderer for SvgRenderer {
    fn format(&self) -> OutputFormat {
        OutputFormat::Svg
    }

    fn render(&self, sheets: &[Sheet]) -> Document {
        let mut text = String::new();
        // Writing into a String cannot fail.
        let _ = self.write_document(&mut text, sheets);
        Document::new(OutputFormat::Svg, sheets.len(), text)
    }
}

/// Splits a PostScript font name like `Times-Bold` into an SVG family and weight.
fn font_attrs(name: &str) -> (String, &'static str) {
    let (family, style) = name.split_once('-').unwrap_or((name, ""));
    let weight = if style.contains("Bold") { "bold" } else { "normal" };
    (xml_escape(family), weight)
}

fn xml_escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            c => out.push(c),
        }
    }
    out
}

/// `--` may not appear inside an XML comment.
fn comment_text(text: &str) -> String {
    let mut out = xml_escape(text);
    while out.contains("--") {
        out = out.replace("--", "- -");
    }
    out
}
