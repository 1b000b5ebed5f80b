// tests/layout_render.rs
use glam::DVec2;
use lsys_plot::{
    GrammarRecord, HeaderPlacement, LayoutCell, LayoutEngine, OutputFormat, PageRegions,
    PageSize, Path, PlotConfig, Plotter, Rect, Renderer, SymbolString, TurtleInterpreter,
    Typography, WhitespacePolicy, catalog,
};

const TOLERANCE: f64 = 1e-3;

fn walk(symbols: &str, angle: f64) -> Path {
    TurtleInterpreter::default()
        .walk(&SymbolString::from(symbols), angle)
        .unwrap()
}

/// Segments of `path` mapped to page space by `cell`.
fn placed_segments(path: &Path, cell: &LayoutCell) -> Vec<(DVec2, DVec2)> {
    path.segments
        .iter()
        .map(|s| (cell.apply(s.from), cell.apply(s.to)))
        .collect()
}

fn assert_same_segments(got: &[(DVec2, DVec2)], want: &[(DVec2, DVec2)]) {
    assert_eq!(got.len(), want.len(), "segment count");
    for (i, (g, w)) in got.iter().zip(want).enumerate() {
        assert!(
            g.0.distance(w.0) < TOLERANCE && g.1.distance(w.1) < TOLERANCE,
            "segment {i}: got {g:?}, want {w:?}"
        );
    }
}

/// Replays `moveto`/`lineto` inside each `newpath ... stroke` block.
fn replay_postscript(text: &str) -> Vec<Vec<(DVec2, DVec2)>> {
    let mut figures = Vec::new();
    let mut current: Option<Vec<(DVec2, DVec2)>> = None;
    let mut pen = DVec2::ZERO;
    for line in text.lines() {
        let tokens: Vec<&str> = line.split_whitespace().collect();
        match tokens.as_slice() {
            ["newpath"] => current = Some(Vec::new()),
            ["stroke"] => figures.extend(current.take()),
            [x, y, op] if current.is_some() => {
                let p = DVec2::new(x.parse().unwrap(), y.parse().unwrap());
                if *op == "lineto" {
                    current.as_mut().unwrap().push((pen, p));
                }
                pen = p;
            }
            _ => {}
        }
    }
    figures
}

/// Replays the `d` attribute of every `<path>`, flipping Y back to page space.
fn replay_svg(text: &str, page_height: f64) -> Vec<Vec<(DVec2, DVec2)>> {
    let mut figures = Vec::new();
    for chunk in text.split("<path d=\"").skip(1) {
        let d = &chunk[..chunk.find('"').unwrap()];
        let tokens: Vec<&str> = d.split_whitespace().collect();
        let mut segments = Vec::new();
        let mut pen = DVec2::ZERO;
        for pair in tokens.chunks(2) {
            let (op, x) = pair[0].split_at(1);
            let p = DVec2::new(x.parse().unwrap(), page_height - pair[1].parse::<f64>().unwrap());
            if op == "L" {
                segments.push((pen, p));
            }
            pen = p;
        }
        figures.push(segments);
    }
    figures
}

#[test]
fn test_grid_cells_fill_rows_top_down() {
    let paths = vec![walk("F", 90.0); 5];
    let page = PageSize::new(600.0, 800.0);
    let cells = LayoutEngine::new(1.0).grid(&paths, page, 2).unwrap();

    assert_eq!(cells.len(), 5);
    assert_eq!(cells[0].cell, Rect::new(0.0, 800.0 - 800.0 / 3.0, 300.0, 800.0));
    assert_eq!(cells[1].cell.min.x, 300.0);
    assert_eq!(cells[4].cell.min.x, 0.0);
    assert!(cells[4].cell.min.y.abs() < 1e-9);
}

#[test]
fn test_fit_preserves_aspect_and_centers() {
    // 2 wide, 1 tall.
    let path = walk("FF+F", 90.0);
    let cell = Rect::new(0.0, 0.0, 100.0, 100.0);
    let placed = LayoutEngine::new(0.9).fit(&path.bounds, cell);

    assert!((placed.scale - 45.0).abs() < 1e-9);
    let bbox = placed.apply_bounds(&path.bounds);
    assert!((bbox.center() - cell.center()).length() < 1e-9);
    assert!((bbox.width() - 90.0).abs() < 1e-9);
    assert!((bbox.height() - 45.0).abs() < 1e-9);
}

#[test]
fn test_degenerate_bounds() {
    let engine = LayoutEngine::new(1.0);
    let cell = Rect::new(0.0, 0.0, 100.0, 50.0);

    // Straight line: only the width constrains the scale.
    let line = walk("FFFF", 90.0);
    let placed = engine.fit(&line.bounds, cell);
    assert!((placed.scale - 25.0).abs() < 1e-9);
    assert!(placed.apply(line.bounds.center()).distance(cell.center()) < 1e-9);

    // A single point falls back to one unit.
    let point = walk("+-", 90.0);
    let placed = engine.fit(&point.bounds, cell);
    assert_eq!(placed.scale, 50.0);
    assert_eq!(placed.apply(DVec2::ZERO), cell.center());
}

#[test]
fn test_layout_rejects_bad_arguments() {
    let paths = vec![walk("F", 90.0)];
    let engine = LayoutEngine::default();
    assert!(engine.grid(&paths, PageSize::new(0.0, 100.0), 1).is_err());
    assert!(engine.grid(&paths, PageSize::new(100.0, 100.0), 0).is_err());
    assert!(LayoutEngine::new(1.5).grid(&paths, PageSize::LETTER, 1).is_err());
}

#[test]
fn test_showcase_gives_last_path_the_main_region() {
    let paths = vec![walk("F", 90.0), walk("F+F", 90.0), walk("F+F+F", 90.0)];
    let area = Rect::new(0.0, 0.0, 300.0, 1000.0);
    let cells = LayoutEngine::default().showcase(&paths, area).unwrap();

    assert_eq!(cells.len(), 3);
    assert_eq!(cells[0].cell.width(), 150.0);
    assert_eq!(cells[0].cell.max.y, 1000.0);
    let main = cells[2].cell;
    assert_eq!(main.min.y, 0.0);
    assert!(main.height() > cells[0].cell.height());
}

#[test]
fn test_header_lines_stay_inside_the_band() {
    let header = PageRegions::new(&PlotConfig::default()).header;
    let typography = Typography::default();
    let inside = |p: DVec2| header.contains(p, TOLERANCE);

    // Few rules: one column at the regular spacing.
    let short = HeaderPlacement::new(header, &typography, 1, 5);
    assert_eq!(short.rows(), 5);
    assert!((short.line_step - 14.4).abs() < TOLERANCE);
    assert!((0..5).all(|i| inside(short.rule(i))));
    assert_eq!(short.rule(4).x, short.rule(0).x);

    // Seven rules do not fit one column on Letter; they wrap into a second.
    let wrapped = HeaderPlacement::new(header, &typography, 2, 7);
    assert_eq!(wrapped.rows(), 4);
    assert!((0..7).all(|i| inside(wrapped.rule(i))));
    assert!(wrapped.rule(4).x > wrapped.rule(3).x);
    assert_eq!(wrapped.rule(4).y, wrapped.rule(0).y);

    // Far too many lines: the spacing shrinks instead of spilling.
    let crowded = HeaderPlacement::new(header, &typography, 12, 30);
    assert!(crowded.line_step < typography.attr_size * 1.2);
    assert!((0..30).all(|i| inside(crowded.rule(i))));
    assert!((0..12).all(|i| inside(crowded.reference(i))));
}

#[test]
fn test_rendered_rules_stay_above_the_figures() {
    let config = PlotConfig::default();
    let header = PageRegions::new(&config).header;
    let spec = catalog::by_name("gosper", WhitespacePolicy::Strip).unwrap();
    let sheet = Plotter::new(config.clone()).unwrap().plot_sheet(&spec).unwrap();
    let document = OutputFormat::PostScript.renderer(&config).render(&[sheet]);

    let rule_lines: Vec<DVec2> = document
        .as_str()
        .lines()
        .filter(|line| line.contains(" moveto (") && line.ends_with(") show"))
        .map(|line| {
            let mut parts = line.split_whitespace();
            let x: f64 = parts.next().unwrap().parse().unwrap();
            let y: f64 = parts.next().unwrap().parse().unwrap();
            DVec2::new(x, y)
        })
        .collect();
    assert_eq!(rule_lines.len(), 7);
    for p in rule_lines {
        assert!(header.contains(p, TOLERANCE), "rule line at {p} leaves the header");
    }
}

#[test]
fn test_postscript_round_trip() {
    let config = PlotConfig {
        format: OutputFormat::PostScript,
        ..Default::default()
    };
    let spec = catalog::by_name("plant-2", WhitespacePolicy::Strip).unwrap();
    let sheet = Plotter::new(config.clone()).unwrap().plot_sheet(&spec).unwrap();
    let document = OutputFormat::PostScript.renderer(&config).render(&[sheet.clone()]);

    let text = document.as_str();
    assert!(text.starts_with("%!PS-Adobe-3.0\n"));
    assert!(text.contains("%%Pages: 1\n"));
    assert!(text.contains("%%Page: 1 1\n"));
    assert!(text.contains("(Plant 2) dup stringwidth pop"));
    assert!(text.contains("/URI (https://www.cs.unh.edu/~charpov/programming-lsystems.html)"));
    assert!(text.trim_end().ends_with("%%EOF"));

    let replayed = replay_postscript(text);
    assert_eq!(replayed.len(), sheet.figures.len());
    for (got, figure) in replayed.iter().zip(&sheet.figures) {
        assert_same_segments(got, &placed_segments(&figure.path, &figure.cell));
    }
}

#[test]
fn test_svg_round_trip() {
    let config = PlotConfig {
        format: OutputFormat::Svg,
        ..Default::default()
    };
    let spec = catalog::by_name("dragon", WhitespacePolicy::Strip).unwrap();
    let sheet = Plotter::new(config.clone()).unwrap().plot_sheet(&spec).unwrap();
    let document = OutputFormat::Svg.renderer(&config).render(&[sheet.clone()]);

    let text = document.as_str();
    assert_eq!(document.media_type(), "text/html");
    assert!(text.starts_with("<!DOCTYPE html>"));
    assert!(text.contains("viewBox=\"0 0 612.000 792.000\""));
    assert!(text.contains(">Dragon Curve</text>"));

    let replayed = replay_svg(text, config.page.height);
    assert_eq!(replayed.len(), sheet.figures.len());
    for (got, figure) in replayed.iter().zip(&sheet.figures) {
        assert_same_segments(got, &placed_segments(&figure.path, &figure.cell));
    }
}

#[test]
fn test_svg_escapes_text() {
    let config = PlotConfig {
        format: OutputFormat::Svg,
        ..Default::default()
    };
    let spec = GrammarRecord::new("A <b> & \"c\"", 90.0, "F")
        .with_order([0])
        .validate(WhitespacePolicy::Strip)
        .unwrap();
    let report = Plotter::new(config).unwrap().run(&[spec]);
    let text = report.document.as_str();
    assert!(text.contains("A &lt;b&gt; &amp; &quot;c&quot;"));
    assert!(!text.contains("<b>"));
}

#[test]
fn test_branch_pops_split_polyline_runs() {
    let path = walk("F[+F]F", 90.0);
    let runs = path.runs();
    assert_eq!(runs.len(), 2);
    assert_eq!(runs[0], vec![DVec2::ZERO, DVec2::new(1.0, 0.0), DVec2::new(1.0, 1.0)]);
    assert_eq!(runs[1], vec![DVec2::new(1.0, 0.0), DVec2::new(2.0, 0.0)]);
}
