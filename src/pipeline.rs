//! Batch driver: grammar definitions in, one rendered [`Document`] out.
//!
//! Grammars, and the generations of each grammar, are independent and are
//! processed in parallel. Layout is the join point: a sheet is only laid out
//! once every one of its paths exists. Output order always follows input
//! order, regardless of scheduling.

use crate::config::PlotConfig;
use crate::error::{FigureError, LsysError};
use crate::grammar::{GrammarSpec, parse_records};
use crate::interpreter::TurtleInterpreter;
use crate::layout::{LayoutEngine, PageRegions};
use crate::path::Path;
use crate::render::{Document, PlacedFigure, Sheet};
use crate::rewrite::{expand, terminalize};
use rayon::prelude::*;
use tracing::{debug, warn};

/// Outcome of a batch: the document holding every figure that could be
/// drawn, and the reason each missing figure was left out.
#[derive(Clone, Debug)]
pub struct BatchReport {
    pub document: Document,
    pub failures: Vec<FigureError>,
}

impl BatchReport {
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Runs grammars through expansion, interpretation, layout and rendering.
#[derive(Clone, Debug)]
pub struct Plotter {
    config: PlotConfig,
    interpreter: TurtleInterpreter,
    layout: LayoutEngine,
}

impl Plotter {
    pub fn new(config: PlotConfig) -> Result<Self, LsysError> {
        config.validate()?;
        Ok(Self {
            interpreter: TurtleInterpreter::standard(config.interpreter.clone()),
            layout: LayoutEngine::new(config.margin_factor),
            config,
        })
    }

    pub fn config(&self) -> &PlotConfig {
        &self.config
    }

    /// Generations drawn for `spec`, in draw order.
    pub fn generations(&self, spec: &GrammarSpec) -> Vec<u32> {
        let order = if spec.order().is_empty() {
            &self.config.default_order
        } else {
            spec.order()
        };
        let offset = u32::from(self.config.offset_drawing_start && spec.start().contains('F'));
        order.iter().map(|n| n.saturating_sub(offset)).collect()
    }

    /// Expands, terminalizes and walks one generation of `spec`.
    pub fn plot_figure(&self, spec: &GrammarSpec, generation: u32) -> Result<Path, FigureError> {
        let context = |e: LsysError| FigureError::new(spec.title(), Some(generation), e);

        let expanded = expand(spec, generation, self.config.max_symbols).map_err(context)?;
        let terminal = terminalize(spec, expanded);
        let path = self
            .interpreter
            .walk(&terminal, spec.angle())
            .map_err(context)?;

        debug!(
            title = spec.title(),
            generation,
            symbols = terminal.len(),
            segments = path.len(),
            "figure walked"
        );
        Ok(path)
    }

    /// Plots every generation of `spec` and lays them out on one sheet.
    ///
    /// Fails as a whole if any generation fails; the first failure in draw
    /// order is reported.
    pub fn plot_sheet(&self, spec: &GrammarSpec) -> Result<Sheet, FigureError> {
        let (sheet, mut failures) = self.build_sheet(spec);
        match sheet {
            Some(sheet) if failures.is_empty() => Ok(sheet),
            _ => Err(failures.remove(0)),
        }
    }

    /// Like [`plot_sheet`](Self::plot_sheet), but keeps the generations that
    /// succeeded. The sheet is `None` only when nothing could be placed.
    fn build_sheet(&self, spec: &GrammarSpec) -> (Option<Sheet>, Vec<FigureError>) {
        let generations = self.generations(spec);
        let results = generations
            .par_iter()
            .map(|&g| self.plot_figure(spec, g).map(|path| (g, path)))
            .collect::<Vec<_>>();

        let mut failures = Vec::new();
        let mut drawn = Vec::with_capacity(results.len());
        for result in results {
            match result {
                Ok(figure) => drawn.push(figure),
                Err(e) => failures.push(e),
            }
        }
        if drawn.is_empty() {
            return (None, failures);
        }

        let (drawn_generations, paths): (Vec<u32>, Vec<Path>) = drawn.into_iter().unzip();
        let regions = PageRegions::new(&self.config);
        let cells = match self
            .layout
            .arrange(&paths, regions.figures, self.config.layout)
        {
            Ok(cells) => cells,
            Err(e) => {
                failures.push(FigureError::new(spec.title(), None, e));
                return (None, failures);
            }
        };

        let figures = drawn_generations
            .into_iter()
            .zip(paths)
            .zip(cells)
            .map(|((generation, path), cell)| {
                debug!(title = spec.title(), generation, scale = cell.scale, "figure placed");
                PlacedFigure {
                    generation,
                    path,
                    cell,
                }
            })
            .collect();

        let sheet = Sheet {
            title: spec.title().to_string(),
            refs: spec.refs().to_vec(),
            header: spec.describe(&generations),
            figures,
        };
        (Some(sheet), failures)
    }

    /// Renders one page per grammar, in input order.
    ///
    /// A failing generation drops only its own figure; a grammar with no
    /// drawable generation gets no page.
    pub fn run(&self, specs: &[GrammarSpec]) -> BatchReport {
        let results = specs
            .par_iter()
            .map(|spec| self.build_sheet(spec))
            .collect::<Vec<_>>();
        self.finish(results)
    }

    /// Parses a grammar record stream and runs every valid record.
    ///
    /// Records that fail to parse or validate are reported as failures
    /// titled by their position in the stream.
    pub fn run_records(&self, text: &str) -> BatchReport {
        let mut parse_failures = Vec::new();
        let mut positions = Vec::new();
        let mut specs = Vec::new();
        let records = parse_records(text, self.config.whitespace);
        for (i, record) in records.into_iter().enumerate() {
            match record {
                Ok(spec) => {
                    positions.push(i);
                    specs.push(spec);
                }
                Err(e) => {
                    let title = format!("record {}", i + 1);
                    parse_failures.push((i, FigureError::new(title, None, e)));
                }
            }
        }

        let plotted = specs
            .par_iter()
            .map(|spec| self.build_sheet(spec))
            .collect::<Vec<_>>();

        // Merge back into stream order so failures read top to bottom.
        let mut results: Vec<(usize, (Option<Sheet>, Vec<FigureError>))> = positions
            .into_iter()
            .zip(plotted)
            .chain(parse_failures.into_iter().map(|(i, e)| (i, (None, vec![e]))))
            .collect();
        results.sort_by_key(|(i, _)| *i);
        self.finish(results.into_iter().map(|(_, r)| r).collect())
    }

    fn finish(&self, results: Vec<(Option<Sheet>, Vec<FigureError>)>) -> BatchReport {
        let mut sheets = Vec::with_capacity(results.len());
        let mut failures = Vec::new();
        for (sheet, errors) in results {
            for e in errors {
                warn!(
                    title = %e.title,
                    generation = ?e.generation,
                    error = %e.source,
                    "figure dropped"
                );
                failures.push(e);
            }
            sheets.extend(sheet);
        }

        let document = self.config.format.renderer(&self.config).render(&sheets);
        debug!(
            pages = document.pages(),
            failures = failures.len(),
            format = ?document.format(),
            "batch rendered"
        );
        BatchReport { document, failures }
    }
}
