//! Parsed configuration files and byte-span to position mapping.

use crate::types::{Pos, SourceRange};
use hcl_edit::structure::Body;
use std::ops::Range;
use std::path::{Path, PathBuf};

use super::LoadError;

/// A parsed `.tf` or `.tfvars` file.
#[derive(Debug)]
pub(crate) struct SourceFile {
    pub path: PathBuf,
    pub content: String,
    pub body: Body,
    line_starts: Vec<usize>,
}

impl SourceFile {
    /// Parses `content` as an HCL body.
    pub fn parse(path: impl Into<PathBuf>, content: String) -> Result<Self, LoadError> {
        let path = path.into();
        let body = hcl_edit::parser::parse_body(&content).map_err(|e| LoadError::Parse {
            path: path.clone(),
            message: e.to_string(),
        })?;
        let line_starts = std::iter::once(0)
            .chain(content.match_indices('\n').map(|(i, _)| i + 1))
            .collect();

        Ok(Self {
            path,
            content,
            body,
            line_starts,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Converts a byte offset into a line/column position.
    pub fn pos(&self, byte: usize) -> Pos {
        let byte = byte.min(self.content.len());
        let line = self.line_starts.partition_point(|&start| start <= byte);
        let line_start = self.line_starts[line.saturating_sub(1)];
        let column = self
            .content
            .get(line_start..byte)
            .map_or(0, |s| s.chars().count())
            + 1;
        Pos::new(line, column, byte)
    }

    /// Converts a parser span into a range within this file.
    pub fn range(&self, span: Option<Range<usize>>) -> SourceRange {
        let span = span.unwrap_or(0..0);
        SourceRange::new(self.path.clone(), self.pos(span.start), self.pos(span.end))
    }
}
