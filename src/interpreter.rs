//! Interpreter that converts a terminal symbol string into a [`Path`].
//!
//! The entry point is [`TurtleInterpreter`]. Configure it with an
//! [`InterpreterConfig`], register symbol-to-operation mappings via
//! [`TurtleInterpreter::set_op`] or
//! [`TurtleInterpreter::populate_standard_symbols`], then call
//! [`TurtleInterpreter::walk`].

use crate::error::{LsysError, StackFault};
use crate::path::{Bounds, Path, Segment};
use crate::rewrite::SymbolString;
use crate::turtle::{TurtleOp, TurtleState};
use serde::{Deserialize, Serialize};

/// Configuration for turtle interpretation.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InterpreterConfig {
    /// Length of one `F`/`f` step in path space. Scaling to the page
    /// happens later, during layout.
    pub step_length: f64,
    /// Maximum nesting depth for push/pop operations.
    pub max_stack_depth: usize,
}

impl Default for InterpreterConfig {
    fn default() -> Self {
        Self {
            step_length: 1.0,
            max_stack_depth: 4096,
        }
    }
}

impl InterpreterConfig {
    pub fn validate(&self) -> Result<(), LsysError> {
        if !(self.step_length.is_finite() && self.step_length > 0.0) {
            return Err(LsysError::configuration(
                "interpreter.step_length",
                format!("must be positive, got {}", self.step_length),
            ));
        }
        Ok(())
    }
}

/// Number of directly indexed symbols; anything outside ASCII is ignored.
const OP_TABLE_LEN: usize = 128;

/// Interprets terminal strings as planar turtle drawings.
#[derive(Clone, Debug)]
pub struct TurtleInterpreter {
    op_map: Vec<TurtleOp>,
    config: InterpreterConfig,
}

impl Default for TurtleInterpreter {
    fn default() -> Self {
        Self::standard(InterpreterConfig::default())
    }
}

impl TurtleInterpreter {
    /// Creates a new interpreter with the given configuration and an empty symbol map.
    ///
    /// Register operations with [`set_op`](Self::set_op) or
    /// [`populate_standard_symbols`](Self::populate_standard_symbols) before calling
    /// [`walk`](Self::walk).
    pub fn new(config: InterpreterConfig) -> Self {
        Self {
            op_map: vec![TurtleOp::Ignore; OP_TABLE_LEN],
            config,
        }
    }

    /// Creates an interpreter with the standard alphabet already registered.
    pub fn standard(config: InterpreterConfig) -> Self {
        let mut interpreter = Self::new(config);
        interpreter.populate_standard_symbols();
        interpreter
    }

    /// Replaces the symbol-to-operation map for every listed symbol (builder pattern).
    pub fn with_map(mut self, map: impl IntoIterator<Item = (char, TurtleOp)>) -> Self {
        for (symbol, op) in map {
            self.set_op(symbol, op);
        }
        self
    }

    /// Assigns a single [`TurtleOp`] to a symbol.
    ///
    /// Symbols outside ASCII cannot be mapped and always act as [`TurtleOp::Ignore`].
    pub fn set_op(&mut self, symbol: char, op: TurtleOp) {
        if let Some(slot) = self.op_map.get_mut(symbol as usize) {
            *slot = op;
        }
    }

    pub fn op(&self, symbol: char) -> TurtleOp {
        self.op_map
            .get(symbol as usize)
            .copied()
            .unwrap_or(TurtleOp::Ignore)
    }

    pub fn config(&self) -> &InterpreterConfig {
        &self.config
    }

    /// Registers the conventional drawing alphabet.
    ///
    /// | symbol | op |
    /// |---|---|
    /// | `F` | [`TurtleOp::Draw`] |
    /// | `f` | [`TurtleOp::Move`] |
    /// | `+` / `-` | [`TurtleOp::Turn`] by `+1` / `-1` angle |
    /// | `\|` | [`TurtleOp::TurnAround`] |
    /// | `[` / `]` | [`TurtleOp::Push`] / [`TurtleOp::Pop`] |
    pub fn populate_standard_symbols(&mut self) {
        let mappings = [
            ('F', TurtleOp::Draw),
            ('f', TurtleOp::Move),
            ('+', TurtleOp::Turn(1.0)),
            ('-', TurtleOp::Turn(-1.0)),
            ('|', TurtleOp::TurnAround),
            ('[', TurtleOp::Push),
            (']', TurtleOp::Pop),
        ];

        for (sym, op) in mappings {
            self.set_op(sym, op);
        }
    }

    /// Interprets `symbols` with turning angle `angle` (degrees) and returns the drawn [`Path`].
    ///
    /// The turtle starts at the origin heading along `+X`. Symbols with no
    /// registered mapping are ignored.
    ///
    /// # Push / Pop
    ///
    /// `[` saves position and heading; `]` restores them without drawing.
    /// A `]` with nothing to restore fails with [`StackFault::Underflow`];
    /// nesting deeper than `max_stack_depth` fails with [`StackFault::Overflow`].
    /// Unclosed `[` at the end of the string are harmless and ignored.
    pub fn walk(&self, symbols: &SymbolString, angle: f64) -> Result<Path, LsysError> {
        let step = self.config.step_length;
        let mut turtle = TurtleState::default();
        let mut stack: Vec<TurtleState> = Vec::new();
        let mut bounds = Bounds::at(turtle.position);
        let mut segments = Vec::new();

        for (offset, symbol) in symbols.symbols().enumerate() {
            match self.op(symbol) {
                TurtleOp::Draw => {
                    let from = turtle.position;
                    let to = turtle.advance(step);
                    segments.push(Segment::new(from, to));
                    bounds.include(to);
                }
                TurtleOp::Move => {
                    bounds.include(turtle.advance(step));
                }
                TurtleOp::Turn(sign) => turtle.turn(angle * sign),
                TurtleOp::TurnAround => turtle.turn(180.0),
                TurtleOp::Push => {
                    if stack.len() >= self.config.max_stack_depth {
                        return Err(LsysError::MalformedPath {
                            offset,
                            fault: StackFault::Overflow,
                        });
                    }
                    stack.push(turtle);
                }
                TurtleOp::Pop => {
                    turtle = stack.pop().ok_or(LsysError::MalformedPath {
                        offset,
                        fault: StackFault::Underflow,
                    })?;
                }
                TurtleOp::Ignore => {}
            }
        }

        Ok(Path { segments, bounds })
    }
}
