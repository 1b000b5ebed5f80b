//! # lsys-plot
//!
//! Expands deterministic, context-free L-System grammars and draws them as
//! vector figures: space-filling curves, snowflakes and branching plants.
//!
//! The pipeline runs in five stages, each a pure function of its input:
//!
//! 1. [`expand`] rewrites the start string for N generations.
//! 2. [`terminalize`] maps bookkeeping symbols to drawing symbols once.
//! 3. [`TurtleInterpreter::walk`] turns the terminal string into a [`Path`].
//! 4. [`LayoutEngine`] fits every path of a grammar into its page cell.
//! 5. A [`Renderer`] serializes the sheets into PostScript or SVG/HTML.
//!
//! [`Plotter`] drives the whole batch in parallel and reports per-figure
//! failures without aborting the other figures.

pub mod catalog;
pub mod config;
pub mod error;
pub mod grammar;
pub mod interpreter;
pub mod layout;
pub mod path;
pub mod pipeline;
pub mod render;
pub mod rewrite;
pub mod turtle;

pub use config::*;
pub use error::*;
pub use grammar::*;
pub use interpreter::*;
pub use layout::*;
pub use path::*;
pub use pipeline::*;
pub use render::{
    Document, OutputFormat, PlacedFigure, PostScriptRenderer, Renderer, Sheet, SvgRenderer,
};
pub use rewrite::*;
pub use turtle::*;
