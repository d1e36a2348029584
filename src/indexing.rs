//! Positional slicing expressions and the dispatcher that routes string
//! arguments of `iloc`-style accessors.
//!
//! Accepted forms are a bare position (`"3"`), a half-open range with optional
//! ends (`"1:3"`, `":2"`, `"4:"`, `":"`) and a comma list of positions
//! (`"0,2"`).

use regex::Regex;

use crate::error::{Error, Result};

lazy_static::lazy_static! {
    /// `start:stop` with both ends optional
    static ref RANGE_PATTERN: std::result::Result<Regex, regex::Error> =
        Regex::new(r"^(\d*):(\d*)$");
}

/// Parsed positional selection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Slice {
    Position(usize),
    Range {
        start: Option<usize>,
        stop: Option<usize>,
    },
    List(Vec<usize>),
}

fn parse_position(text: &str) -> Result<usize> {
    text.parse::<usize>()
        .map_err(|_| Error::InvalidInput(format!("'{}' is not a position", text)))
}

impl Slice {
    pub fn parse(expr: &str) -> Result<Slice> {
        if expr.contains(',') {
            let positions = expr
                .split(',')
                .map(parse_position)
                .collect::<Result<Vec<_>>>()?;
            return Ok(Slice::List(positions));
        }
        if !expr.contains(':') {
            return parse_position(expr).map(Slice::Position);
        }
        let pattern = RANGE_PATTERN.as_ref().map_err(|e| Error::from(e.clone()))?;
        let caps = pattern
            .captures(expr)
            .ok_or_else(|| Error::InvalidInput(format!("malformed slice '{}'", expr)))?;
        let bound = |i: usize| -> Result<Option<usize>> {
            match caps.get(i).map(|m| m.as_str()).filter(|s| !s.is_empty()) {
                Some(text) => parse_position(text).map(Some),
                None => Ok(None),
            }
        };
        Ok(Slice::Range {
            start: bound(1)?,
            stop: bound(2)?,
        })
    }

    /// True when the selection names a single position.
    pub fn is_scalar(&self) -> bool {
        matches!(self, Slice::Position(_))
    }

    /// Concrete positions for a container of length `len`.
    pub fn resolve(&self, len: usize) -> Result<Vec<usize>> {
        self.resolve_with(len, |p| p)
    }

    /// Like `resolve`, but each explicit bound is first passed through
    /// `lookup`, which lets callers map label matches to positions.
    pub fn resolve_with<F>(&self, len: usize, lookup: F) -> Result<Vec<usize>>
    where
        F: Fn(usize) -> usize,
    {
        let check = |p: usize| -> Result<usize> {
            if p < len {
                Ok(p)
            } else {
                Err(Error::IndexOutOfBounds { index: p, size: len })
            }
        };
        match self {
            Slice::Position(p) => Ok(vec![check(lookup(*p))?]),
            Slice::List(positions) => positions.iter().map(|p| check(lookup(*p))).collect(),
            Slice::Range { start, stop } => {
                let start = start.map(&lookup).unwrap_or(0);
                let stop = stop.map(&lookup).unwrap_or(len);
                if start > stop || stop > len {
                    return Err(Error::InvalidRange(format!(
                        "incorrect range {}:{} for length {}",
                        start, stop, len
                    )));
                }
                Ok((start..stop).collect())
            }
        }
    }
}

/// Result of dispatching a string argument.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Indexer {
    Slice(Slice),
    /// Expression naming a callable selector.
    Callable(String),
}

type Predicate = fn(&str) -> bool;
type Handler = fn(&str) -> Result<Indexer>;

fn is_slicing(expr: &str) -> bool {
    expr.chars().all(|c| c.is_ascii_digit() || c == ',' || c == ':')
}

fn slicing(expr: &str) -> Result<Indexer> {
    Slice::parse(expr).map(Indexer::Slice)
}

fn is_callable(_expr: &str) -> bool {
    false
}

fn callable(expr: &str) -> Result<Indexer> {
    Err(Error::NotImplemented(format!(
        "callable selector '{}'",
        expr
    )))
}

/// Recognizers tried in order; the first matching predicate wins.
const HANDLERS: [(Predicate, Handler); 2] = [(is_slicing, slicing), (is_callable, callable)];

/// Routes `expr` to the first handler whose predicate accepts it.
pub fn dispatch(expr: &str) -> Result<Indexer> {
    for (accepts, handle) in HANDLERS.iter() {
        if accepts(expr) {
            log::trace!("dispatching indexer '{}'", expr);
            return handle(expr);
        }
    }
    Err(Error::InvalidInput(format!(
        "invalid operator[] argument '{}'",
        expr
    )))
}

/// Dispatches `expr` and requires a positional slice.
pub fn parse_slice(expr: &str) -> Result<Slice> {
    match dispatch(expr)? {
        Indexer::Slice(slice) => Ok(slice),
        Indexer::Callable(name) => Err(Error::NotImplemented(format!(
            "callable selector '{}'",
            name
        ))),
    }
}
