// src/lang/parser.rs

//! Command script parser.
//!
//! A `Parser` is one parse session. Lines update a `ParserState`
//! accumulator; `finish` turns the accumulator into operations in a fixed
//! order and clears it:
//!
//! 1. `Reset`, if a `reset` line was seen
//! 2. the last `bgrect`
//! 3. the last background color
//! 4. every tracked figure, in `figure` order, at its current position
//! 5. `FrameReady`, if an `update` line was seen
//!
//! `move` is applied to tracked figures immediately, so step 4 emits
//! post-move positions.

use super::error::ParseError;
use crate::pipeline::{BackgroundColor, Operation};
use log::{debug, trace};
use std::io::BufRead;

/// Normalized point of a tracked figure.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FigurePos {
    pub x: f64,
    pub y: f64,
}

/// Normalized background rectangle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BgRect {
    pub x1: f64,
    pub y1: f64,
    pub x2: f64,
    pub y2: f64,
}

/// What a session has accumulated so far.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParserState {
    pub background: Option<BackgroundColor>,
    pub rect: Option<BgRect>,
    pub figures: Vec<FigurePos>,
    pub reset: bool,
    pub update: bool,
}

impl ParserState {
    pub fn is_empty(&self) -> bool {
        *self == ParserState::default()
    }

    /// Drops everything drawn so far. The reset itself is remembered.
    fn reset(&mut self) {
        *self = ParserState {
            reset: true,
            ..ParserState::default()
        };
    }

    fn translate(&mut self, dx: f64, dy: f64) {
        for fig in &mut self.figures {
            fig.x = clamp_unit(fig.x + dx);
            fig.y = clamp_unit(fig.y + dy);
        }
    }

    /// Consumes the accumulator into the emission order.
    fn take_operations(&mut self) -> Vec<Operation> {
        let state = std::mem::take(self);
        let mut ops = Vec::with_capacity(state.figures.len() + 4);

        if state.reset {
            ops.push(Operation::Reset);
        }
        if let Some(BgRect { x1, y1, x2, y2 }) = state.rect {
            ops.push(Operation::BackgroundRect { x1, y1, x2, y2 });
        }
        if let Some(color) = state.background {
            ops.push(Operation::BackgroundColor(color));
        }
        ops.extend(
            state
                .figures
                .into_iter()
                .map(|FigurePos { x, y }| Operation::Figure { x, y }),
        );
        if state.update {
            ops.push(Operation::FrameReady);
        }
        ops
    }
}

fn clamp_unit(v: f64) -> f64 {
    v.clamp(0.0, 1.0)
}

/// One parse session over a command script.
#[derive(Debug, Default)]
pub struct Parser {
    state: ParserState,
    line_no: usize,
}

impl Parser {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses every line from `input` and returns the session's operations.
    /// Stops at the first error; nothing is returned for a failed session.
    pub fn parse<R: BufRead>(mut self, input: R) -> Result<Vec<Operation>, ParseError> {
        for line in input.lines() {
            let line = line.map_err(|e| ParseError::Io {
                line: self.line_no + 1,
                kind: e.kind(),
                message: e.to_string(),
            })?;
            self.feed_line(&line)?;
        }
        Ok(self.finish())
    }

    /// Feeds one line into the session.
    ///
    /// After an error the accumulator is left as it was before the line, but
    /// callers following the one-error-aborts contract discard the session.
    pub fn feed_line(&mut self, line: &str) -> Result<(), ParseError> {
        self.line_no += 1;
        let mut tokens = line.split_whitespace();
        let Some(command) = tokens.next() else {
            return Ok(());
        };
        let args: Vec<&str> = tokens.collect();
        trace!("Parser: line {}: {} {:?}", self.line_no, command, args);

        match command {
            "white" => {
                self.expect_args(command, &args, 0)?;
                self.state.background = Some(BackgroundColor::White);
            }
            "green" => {
                self.expect_args(command, &args, 0)?;
                self.state.background = Some(BackgroundColor::Green);
            }
            "bgrect" => {
                let [x1, y1, x2, y2] = self.numbers::<4>(command, &args)?;
                self.state.rect = Some(BgRect { x1, y1, x2, y2 });
            }
            "figure" => {
                let [x, y] = self.numbers::<2>(command, &args)?;
                self.state.figures.push(FigurePos { x, y });
            }
            "move" => {
                let [dx, dy] = self.numbers::<2>(command, &args)?;
                self.state.translate(dx, dy);
            }
            "reset" => {
                self.expect_args(command, &args, 0)?;
                self.state.reset();
            }
            "update" => {
                self.expect_args(command, &args, 0)?;
                self.state.update = true;
            }
            _ => {
                return Err(ParseError::UnknownCommand {
                    line: self.line_no,
                    token: command.to_string(),
                })
            }
        }
        Ok(())
    }

    /// Ends the session, returning its operations and clearing the accumulator.
    pub fn finish(&mut self) -> Vec<Operation> {
        let ops = self.state.take_operations();
        debug!(
            "Parser: session finished after {} lines, {} operations",
            self.line_no,
            ops.len()
        );
        ops
    }

    pub fn state(&self) -> &ParserState {
        &self.state
    }

    fn expect_args(&self, command: &str, args: &[&str], expected: usize) -> Result<(), ParseError> {
        if args.len() != expected {
            return Err(ParseError::ArgumentCount {
                line: self.line_no,
                command: command.to_string(),
                expected,
                found: args.len(),
            });
        }
        Ok(())
    }

    fn numbers<const N: usize>(&self, command: &str, args: &[&str]) -> Result<[f64; N], ParseError> {
        self.expect_args(command, args, N)?;
        let mut out = [0.0; N];
        for (index, (slot, token)) in out.iter_mut().zip(args).enumerate() {
            *slot = token
                .parse::<f64>()
                .ok()
                .filter(|v| v.is_finite())
                .ok_or_else(|| ParseError::NumberFormat {
                    line: self.line_no,
                    command: command.to_string(),
                    index,
                    token: token.to_string(),
                })?;
        }
        Ok(out)
    }
}

/// Parses a whole script held in memory.
pub fn parse_str(input: &str) -> Result<Vec<Operation>, ParseError> {
    Parser::new().parse(input.as_bytes())
}
