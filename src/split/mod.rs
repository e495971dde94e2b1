use std::fs::File;
use std::io::BufRead;
use std::io::BufReader;
use std::io::Read;
use std::path::Path;

use memchr::memmem::Finder;

use crate::error::SplitError;
use crate::Section;

/// Longest line accepted by default, terminator excluded.
pub const DEFAULT_MAX_LINE_LEN: usize = 64 * 1024;

/// Cuts a document into sections on a literal delimiter.
///
/// Lines are read one at a time, their terminator (`\n` or `\r\n`) replaced
/// by a single `\n`, and appended to a buffer. After every line the buffer is
/// searched for the delimiter; on a hit, the bytes before the first occurrence
/// become a section and the bytes after it stay buffered. The delimiter may
/// therefore span several lines.
#[derive(Debug, Clone)]
pub struct Splitter {
    finder: Finder<'static>,
    max_line_len: usize,
}

impl Splitter {
    pub fn new(delimiter: impl Into<Vec<u8>>) -> Result<Self, SplitError> {
        let delimiter = delimiter.into();
        if delimiter.is_empty() {
            return Err(SplitError::EmptyDelimiter);
        }

        Ok(Self {
            finder: Finder::new(&delimiter).into_owned(),
            max_line_len: DEFAULT_MAX_LINE_LEN,
        })
    }

    pub fn with_max_line_len(mut self, max_line_len: usize) -> Self {
        self.max_line_len = max_line_len;
        self
    }

    pub fn delimiter(&self) -> &[u8] {
        self.finder.needle()
    }

    /// Split the file at `path`.
    ///
    /// The file is closed before this returns, whatever the outcome.
    pub fn split_file(&self, path: impl AsRef<Path>) -> Result<Vec<Section>, SplitError> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| SplitError::Open {
            path: path.to_path_buf(),
            source,
        })?;

        tracing::debug!("splitting {}", path.display());
        self.split_reader(BufReader::new(file))
    }

    /// Split everything `reader` yields. Either all sections or an error.
    pub fn split_reader<R: BufRead>(&self, mut reader: R) -> Result<Vec<Section>, SplitError> {
        let mut buffer: Vec<u8> = Vec::new();
        let mut sections: Vec<Section> = Vec::new();
        let mut line = Vec::new();
        let mut line_no = 0;
        let mut cut_on_last_line = false;

        while self.read_line(&mut reader, &mut line, line_no + 1)? {
            line_no += 1;
            buffer.extend_from_slice(&line);
            buffer.push(b'\n');

            // One cut per line; later occurrences wait for the next line.
            cut_on_last_line = match self.cut(&mut buffer) {
                Some(section) => {
                    sections.push(section);
                    true
                }
                None => false,
            };
        }

        // Input is exhausted, so nothing else will resolve pending delimiters.
        while let Some(section) = self.cut(&mut buffer) {
            sections.push(section);
        }

        // A document ending on a delimiter leaves only that line's newline.
        if cut_on_last_line && buffer == b"\n" {
            buffer.clear();
        }

        if !buffer.is_empty() {
            sections.push(buffer);
        }

        tracing::debug!(lines = line_no, sections = sections.len(), "split done");
        Ok(sections)
    }

    /// Read the next line into `line` without its terminator.
    ///
    /// Returns `false` at end of input.
    fn read_line<R: BufRead>(
        &self,
        reader: &mut R,
        line: &mut Vec<u8>,
        line_no: usize,
    ) -> Result<bool, SplitError> {
        line.clear();

        // Room for the longest allowed line plus `\r\n`.
        let limit = self.max_line_len.saturating_add(2);
        let n = reader
            .by_ref()
            .take(limit as u64)
            .read_until(b'\n', line)
            .map_err(|source| SplitError::Read {
                line: line_no,
                source,
            })?;

        if n == 0 {
            return Ok(false);
        }

        if line.last() == Some(&b'\n') {
            line.pop();
        } else if n == limit {
            return Err(SplitError::LineTooLong {
                line: line_no,
                limit: self.max_line_len,
            });
        }

        if line.last() == Some(&b'\r') {
            line.pop();
        }

        if line.len() > self.max_line_len {
            return Err(SplitError::LineTooLong {
                line: line_no,
                limit: self.max_line_len,
            });
        }

        Ok(true)
    }

    /// Cut the buffer at the first delimiter: return what precedes it and
    /// keep what follows it.
    fn cut(&self, buffer: &mut Vec<u8>) -> Option<Section> {
        let pos = self.finder.find(buffer)?;

        let rest = buffer.split_off(pos + self.finder.needle().len());
        buffer.truncate(pos);
        let section = std::mem::replace(buffer, rest);

        tracing::trace!(len = section.len(), "section cut");
        Some(section)
    }
}

/// Split the file at `path` on `delimiter` with default limits.
pub fn split_file(path: impl AsRef<Path>, delimiter: &[u8]) -> Result<Vec<Section>, SplitError> {
    Splitter::new(delimiter)?.split_file(path)
}
