// Copyright (c) 2025 Felix Kahle.
//
// Permission is hereby granted, free of charge, to any person obtaining
// a copy of this software and associated documentation files (the
// "Software"), to deal in the Software without restriction, including
// without limitation the rights to use, copy, modify, merge, publish,
// distribute, sublicense, and/or sell copies of the Software, and to
// permit persons to whom the Software is furnished to do so, subject to
// the following conditions:
//
// The above copyright notice and this permission notice shall be
// included in all copies or substantial portions of the Software.
//
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND,
// EXPRESS OR IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF
// MERCHANTABILITY, FITNESS FOR A PARTICULAR PURPOSE AND
// NONINFRINGEMENT. IN NO EVENT SHALL THE AUTHORS OR COPYRIGHT HOLDERS BE
// LIABLE FOR ANY CLAIM, DAMAGES OR OTHER LIABILITY, WHETHER IN AN ACTION
// OF CONTRACT, TORT OR OTHERWISE, ARISING FROM, OUT OF OR IN CONNECTION
// WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE SOFTWARE.


//! Port topology loader.
//!
//! Turns a whitespace-delimited text stream into a validated `PortTopology`.
//! The format lists the worker pool size, the number of docks, and then one
//! record per dock: its category followed by exactly `category` crane
//! capacities, in scan order.
//!
//! ```raw
//! W                  # number of authentication workers
//! D                  # number of docks
//! c_1 k_1 .. k_c_1   # dock 1: category, then one capacity per crane
//! ...
//! c_D k_1 .. k_c_D   # dock D
//! ```
//!
//! Tokens may be split across lines arbitrarily and `#` starts a comment that
//! runs to the end of the line. Parse errors report the offending token, the
//! type it was meant to be and the line it was found on.

use crate::topology::{PortTopology, PortTopologyBuilder, TopologyError};
use std::{
    collections::VecDeque,
    fs::File,
    io::{BufRead, BufReader, Read},
    path::Path,
    str::FromStr,
};

/// Details about a token that could not be parsed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("could not parse token '{token}' on line {line} as {type_name}")]
pub struct ParseTokenError {
    pub token: String,
    pub type_name: &'static str,
    pub line: usize,
}

/// The error type for the topology loading process.
#[derive(Debug, thiserror::Error)]
pub enum TopologyLoaderError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("unexpected end of input while reading {0}")]
    UnexpectedEof(&'static str),
    #[error("parse error: {0}")]
    Parse(#[from] ParseTokenError),
    #[error("invalid topology: {0}")]
    Topology(#[from] TopologyError),
}

/// Reads `PortTopology` values from text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TopologyLoader {
    worker_override: Option<usize>,
}

impl TopologyLoader {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Ignores the worker count found in the input and uses `workers` instead.
    #[inline]
    pub fn with_worker_override(mut self, workers: usize) -> Self {
        self.worker_override = Some(workers);
        self
    }

    /// Loads a topology from a type implementing `BufRead`.
    pub fn from_bufread<R: BufRead>(&self, rdr: R) -> Result<PortTopology, TopologyLoaderError> {
        let mut tokens = Tokens::new(rdr);

        let workers: usize = tokens.next("worker count")?;
        let num_docks: usize = tokens.next("dock count")?;

        let mut builder = PortTopologyBuilder::new(self.worker_override.unwrap_or(workers));
        for _ in 0..num_docks {
            let category: u32 = tokens.next("dock category")?;
            let mut cranes = Vec::with_capacity(category as usize);
            for _ in 0..category {
                cranes.push(tokens.next::<u32>("crane capacity")?);
            }
            builder.add_dock(category, cranes);
        }

        Ok(builder.build()?)
    }

    /// Loads a topology from a file path.
    #[inline]
    pub fn from_path<P: AsRef<Path>>(&self, path: P) -> Result<PortTopology, TopologyLoaderError> {
        let file = File::open(path)?;
        self.from_bufread(BufReader::new(file))
    }

    /// Loads a topology from a generic reader.
    #[inline]
    pub fn from_reader<R: Read>(&self, r: R) -> Result<PortTopology, TopologyLoaderError> {
        self.from_bufread(BufReader::new(r))
    }

    /// Loads a topology from a string slice.
    #[inline]
    pub fn from_str(&self, s: &str) -> Result<PortTopology, TopologyLoaderError> {
        self.from_bufread(s.as_bytes())
    }
}

/// Line-buffered tokenizer. Each refill strips the comment part of a line
/// and queues its whitespace separated words.
struct Tokens<R> {
    rdr: R,
    pending: VecDeque<String>,
    line: usize,
}

impl<R: BufRead> Tokens<R> {
    fn new(rdr: R) -> Self {
        Self {
            rdr,
            pending: VecDeque::new(),
            line: 0,
        }
    }

    /// Returns `Ok(false)` on end of input.
    fn refill(&mut self) -> Result<bool, TopologyLoaderError> {
        let mut buf = String::new();
        while self.pending.is_empty() {
            buf.clear();
            if self.rdr.read_line(&mut buf)? == 0 {
                return Ok(false);
            }
            self.line += 1;
            let content = buf.split('#').next().unwrap_or_default();
            self.pending
                .extend(content.split_whitespace().map(str::to_owned));
        }
        Ok(true)
    }

    fn next<T: FromStr>(&mut self, what: &'static str) -> Result<T, TopologyLoaderError> {
        if !self.refill()? {
            return Err(TopologyLoaderError::UnexpectedEof(what));
        }
        let token = self
            .pending
            .pop_front()
            .ok_or(TopologyLoaderError::UnexpectedEof(what))?;
        token.parse::<T>().map_err(|_| {
            TopologyLoaderError::Parse(ParseTokenError {
                token,
                type_name: std::any::type_name::<T>(),
                line: self.line,
            })
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index::DockIndex;

    const SMALL_PORT: &str = r#"
        3           # workers
        2           # docks
        2 5 10      # dock 0: category 2, cranes 5 and 10
        1           # dock 1: category 1 ...
        7           # ... with its single crane on the next line
    "#;

    #[test]
    fn test_loads_docks_and_cranes_in_order() {
        let topology = TopologyLoader::new()
            .from_str(SMALL_PORT)
            .expect("failed to load");

        assert_eq!(topology.num_workers(), 3);
        assert_eq!(topology.num_docks(), 2);
        assert_eq!(topology.dock(DockIndex::new(0)).category(), 2);
        assert_eq!(topology.dock(DockIndex::new(0)).cranes(), &[5, 10]);
        assert_eq!(topology.dock(DockIndex::new(1)).cranes(), &[7]);
    }

    #[test]
    fn test_worker_override() {
        let topology = TopologyLoader::new()
            .with_worker_override(8)
            .from_str(SMALL_PORT)
            .unwrap();
        assert_eq!(topology.num_workers(), 8);
    }

    #[test]
    fn test_parse_error_reports_token_and_line() {
        let data = "1\n1\n2 5 many";
        match TopologyLoader::new().from_str(data) {
            Err(TopologyLoaderError::Parse(e)) => {
                assert_eq!(e.token, "many");
                assert_eq!(e.line, 3);
                assert!(e.type_name.contains("u32"));
            }
            other => panic!("expected parse error, got {:?}", other),
        }
    }

    #[test]
    fn test_truncated_input() {
        let data = "1 1 3 5 10";
        match TopologyLoader::new().from_str(data) {
            Err(TopologyLoaderError::UnexpectedEof(what)) => assert_eq!(what, "crane capacity"),
            other => panic!("expected unexpected eof, got {:?}", other),
        }
    }

    #[test]
    fn test_invalid_topology_is_reported() {
        match TopologyLoader::new().from_str("0 1 1 4") {
            Err(TopologyLoaderError::Topology(TopologyError::NoWorkers)) => {}
            other => panic!("expected topology error, got {:?}", other),
        }
        match TopologyLoader::new().from_str("2 1 0") {
            Err(TopologyLoaderError::Topology(TopologyError::ZeroCategory(dock))) => {
                assert_eq!(dock, DockIndex::new(0))
            }
            other => panic!("expected topology error, got {:?}", other),
        }
    }
}
