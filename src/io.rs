//! Readers for the FIB and packet files, and the reporter of lookup results.
//!
//! The FIB holds one route per line, the prefix in CIDR notation followed by the interface:
//!
//! ```text
//! 10.0.0.0/8      2
//! 10.1.0.0/16     3
//! ```
//!
//! The packet file holds one dotted-quad destination address per line. Blank lines are skipped
//! in both files.

use std::io::{BufRead, Write};
use std::net::Ipv4Addr;
use std::time::Duration;

use crate::{Error, FibEntry, Interface, Ipv4Prefix, Lookup};

/// Iterator over the routes of a FIB file.
///
/// ```
/// # use fib_trie::*;
/// # use fib_trie::io::FibReader;
/// let input = "10.0.0.0/8 2\n\n10.1.0.0/16\t3\n";
/// let routes: Vec<_> = FibReader::new(input.as_bytes()).collect::<Result<_, _>>().unwrap();
/// assert_eq!(routes[1], FibEntry::new("10.1.0.0/16".parse().unwrap(), 3));
/// ```
pub struct FibReader<R> {
    lines: LineReader<R>,
}

impl<R: BufRead> FibReader<R> {
    /// Read routes from `reader`.
    pub fn new(reader: R) -> Self {
        Self {
            lines: LineReader::new(reader),
        }
    }
}

impl<R: BufRead> Iterator for FibReader<R> {
    type Item = Result<FibEntry, Error>;

    fn next(&mut self) -> Option<Self::Item> {
        let (line, text) = match self.lines.next()? {
            Ok(x) => x,
            Err(e) => return Some(Err(e)),
        };
        Some(parse_fib_line(&text).map_err(|reason| Error::MalformedRecord { line, reason }))
    }
}

fn parse_fib_line(text: &str) -> Result<FibEntry, String> {
    let mut fields = text.split_whitespace();
    let prefix = fields.next().ok_or("missing prefix")?;
    let interface = fields.next().ok_or("missing interface")?;
    if fields.next().is_some() {
        return Err("trailing fields".to_string());
    }
    let prefix: Ipv4Prefix = prefix.parse().map_err(|e: Error| e.to_string())?;
    let interface: Interface = interface
        .parse()
        .map_err(|_| format!("invalid interface `{interface}`"))?;
    Ok(FibEntry::new(prefix, interface))
}

/// Iterator over the destination addresses of a packet file.
///
/// ```
/// # use fib_trie::io::AddressReader;
/// let input = "10.1.2.3\n192.168.0.1\n";
/// let addrs: Vec<u32> = AddressReader::new(input.as_bytes()).collect::<Result<_, _>>().unwrap();
/// assert_eq!(addrs, [0x0a01_0203, 0xc0a8_0001]);
/// ```
pub struct AddressReader<R> {
    lines: LineReader<R>,
}

impl<R: BufRead> AddressReader<R> {
    /// Read addresses from `reader`.
    pub fn new(reader: R) -> Self {
        Self {
            lines: LineReader::new(reader),
        }
    }
}

impl<R: BufRead> Iterator for AddressReader<R> {
    type Item = Result<u32, Error>;

    fn next(&mut self) -> Option<Self::Item> {
        let (line, text) = match self.lines.next()? {
            Ok(x) => x,
            Err(e) => return Some(Err(e)),
        };
        Some(
            text.parse::<Ipv4Addr>()
                .map(u32::from)
                .map_err(|_| Error::MalformedAddress {
                    line,
                    reason: format!("invalid address `{text}`"),
                }),
        )
    }
}

/// Yields the trimmed, non-empty lines of a reader together with their line number.
struct LineReader<R> {
    reader: R,
    line: usize,
    buf: String,
}

impl<R: BufRead> LineReader<R> {
    fn new(reader: R) -> Self {
        Self {
            reader,
            line: 0,
            buf: String::new(),
        }
    }
}

impl<R: BufRead> Iterator for LineReader<R> {
    type Item = Result<(usize, String), Error>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            self.buf.clear();
            match self.reader.read_line(&mut self.buf) {
                Ok(0) => return None,
                Ok(_) => self.line += 1,
                Err(e) => return Some(Err(e.into())),
            }
            let text = self.buf.trim();
            if !text.is_empty() {
                return Some(Ok((self.line, text.to_string())));
            }
        }
    }
}

/// Running statistics over all lookups.
#[derive(Clone, Copy, PartialEq, Debug, Default)]
pub struct Summary {
    /// Number of nodes in the trie used for the lookups.
    pub nodes: usize,
    /// Number of processed addresses.
    pub packets: usize,
    /// Sum of all node accesses.
    pub total_accesses: u64,
    /// Sum of all lookup latencies.
    pub total_time: Duration,
}

impl Summary {
    /// Create an empty summary for a trie of `nodes` nodes.
    pub fn new(nodes: usize) -> Self {
        Self {
            nodes,
            ..Default::default()
        }
    }

    /// Account for a single lookup.
    pub fn record(&mut self, lookup: &Lookup, elapsed: Duration) {
        self.packets += 1;
        self.total_accesses += lookup.accesses as u64;
        self.total_time += elapsed;
    }

    /// Mean number of node accesses per lookup, or zero if nothing was looked up.
    pub fn mean_accesses(&self) -> f64 {
        if self.packets == 0 {
            0.0
        } else {
            self.total_accesses as f64 / self.packets as f64
        }
    }

    /// Mean lookup latency in nanoseconds, or zero if nothing was looked up.
    pub fn mean_latency_ns(&self) -> f64 {
        if self.packets == 0 {
            0.0
        } else {
            self.total_time.as_nanos() as f64 / self.packets as f64
        }
    }
}

/// Receives the result of every lookup, and a summary at the end.
pub trait LookupReporter {
    /// Report the lookup of `addr`, which took `elapsed`.
    fn record(&mut self, addr: u32, lookup: &Lookup, elapsed: Duration) -> Result<(), Error>;

    /// Report the final statistics.
    fn finish(&mut self, summary: &Summary) -> Result<(), Error>;
}

/// Reporter that writes one line per lookup and a summary block to a writer.
///
/// ```
/// # use std::time::Duration;
/// # use fib_trie::*;
/// # use fib_trie::io::{LookupReporter, OutputReporter, Summary};
/// let mut out = Vec::new();
/// let mut reporter = OutputReporter::new(&mut out);
/// let lookup = Lookup { interface: Some(3), accesses: 4 };
/// reporter.record(0x0a01_0203, &lookup, Duration::from_nanos(120)).unwrap();
/// reporter.record(0x0b00_0000, &Lookup { interface: None, accesses: 1 }, Duration::ZERO).unwrap();
/// assert_eq!(
///     String::from_utf8(out).unwrap(),
///     "10.1.2.3;3;4;120\n11.0.0.0;MISS;1;0\n"
/// );
/// ```
pub struct OutputReporter<W> {
    writer: W,
}

impl<W: Write> OutputReporter<W> {
    /// Write the report to `writer`.
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    /// Get back the writer.
    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> LookupReporter for OutputReporter<W> {
    fn record(&mut self, addr: u32, lookup: &Lookup, elapsed: Duration) -> Result<(), Error> {
        let addr = Ipv4Addr::from(addr);
        match lookup.interface {
            Some(iface) => writeln!(
                self.writer,
                "{addr};{iface};{};{}",
                lookup.accesses,
                elapsed.as_nanos()
            )?,
            None => writeln!(
                self.writer,
                "{addr};MISS;{};{}",
                lookup.accesses,
                elapsed.as_nanos()
            )?,
        }
        Ok(())
    }

    fn finish(&mut self, summary: &Summary) -> Result<(), Error> {
        writeln!(self.writer)?;
        writeln!(self.writer, "Number of nodes in the tree = {}", summary.nodes)?;
        writeln!(self.writer, "Packets processed = {}", summary.packets)?;
        writeln!(
            self.writer,
            "Average node accesses = {:.2}",
            summary.mean_accesses()
        )?;
        writeln!(
            self.writer,
            "Average packet processing time (nsecs) = {:.2}",
            summary.mean_latency_ns()
        )?;
        self.writer.flush()?;
        Ok(())
    }
}
