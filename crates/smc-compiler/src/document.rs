//! Combined two-stage text format.
//!
//! ```text
//! //! VERTEX
//! <vertex source>
//! //! FRAGMENT
//! <fragment source>
//! ```

use alloc::{format, string::String, vec::Vec};

use thiserror::Error;

use crate::program::{ShaderProgram, Stage};

pub const VERTEX_MARKER: &str = "//! VERTEX";
pub const FRAGMENT_MARKER: &str = "//! FRAGMENT";

/// Sources of both stages, as read from or written to a document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ShaderDocument {
    pub vertex: String,
    pub fragment: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DocumentError {
    #[error("missing `{0}` marker line")]
    MissingMarker(&'static str),

    #[error("`//! FRAGMENT` marker appears before `//! VERTEX`")]
    MarkersOutOfOrder,

    #[error("line {line}: text before `//! VERTEX` marker")]
    TextBeforeVertex { line: usize },
}

impl ShaderDocument {
    /// Render the document text.
    pub fn to_text(&self) -> String {
        let mut text = String::new();
        for (marker, source) in [(VERTEX_MARKER, &self.vertex), (FRAGMENT_MARKER, &self.fragment)] {
            text.push_str(marker);
            text.push('\n');
            text.push_str(source);
            if !source.ends_with('\n') {
                text.push('\n');
            }
        }
        text
    }
}

/// Render both stages of `program` as a document.
pub fn render_document(program: &ShaderProgram, line_separator: &str) -> String {
    ShaderDocument {
        vertex: program.render(Stage::Vertex, line_separator),
        fragment: program.render(Stage::Fragment, line_separator),
    }
    .to_text()
}

/// Split document text into its stage sources.
///
/// Marker lines must match exactly apart from trailing whitespace. Only blank
/// lines may precede the vertex marker.
pub fn split_document(text: &str) -> Result<ShaderDocument, DocumentError> {
    let lines: Vec<&str> = text.lines().collect();
    let find = |marker: &'static str| {
        lines
            .iter()
            .position(|line| line.trim_end() == marker)
            .ok_or(DocumentError::MissingMarker(marker))
    };
    let vertex_at = find(VERTEX_MARKER)?;
    let fragment_at = find(FRAGMENT_MARKER)?;
    if fragment_at < vertex_at {
        return Err(DocumentError::MarkersOutOfOrder);
    }
    if let Some(line) = lines[..vertex_at].iter().position(|line| !line.trim().is_empty()) {
        return Err(DocumentError::TextBeforeVertex { line: line + 1 });
    }

    let section = |body: &[&str]| {
        let mut source = body.join("\n");
        if !source.is_empty() {
            source = format!("{}\n", source);
        }
        source
    };
    Ok(ShaderDocument {
        vertex: section(&lines[vertex_at + 1..fragment_at]),
        fragment: section(&lines[fragment_at + 1..]),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_document() {
        let text = "\n//! VERTEX\nvoid main(){}\n//! FRAGMENT\nprecision mediump float;\nvoid main(){}\n";
        let document = split_document(text).unwrap();
        assert_eq!(document.vertex, "void main(){}\n");
        assert_eq!(document.fragment, "precision mediump float;\nvoid main(){}\n");
        assert_eq!(split_document(&document.to_text()).unwrap(), document);
    }

    #[test]
    fn test_render_document() {
        let program = ShaderProgram::parse("void main(){}", "void main(){}").unwrap();
        assert_eq!(
            render_document(&program, ""),
            "//! VERTEX\nvoid main(){}\n//! FRAGMENT\nvoid main(){}\n"
        );
    }

    #[test]
    fn test_malformed_documents() {
        assert_eq!(
            split_document("//! VERTEX\nvoid main(){}\n"),
            Err(DocumentError::MissingMarker(FRAGMENT_MARKER))
        );
        assert_eq!(
            split_document("//! FRAGMENT\n//! VERTEX\n"),
            Err(DocumentError::MarkersOutOfOrder)
        );
        assert_eq!(
            split_document("float a;\n//! VERTEX\n//! FRAGMENT\n"),
            Err(DocumentError::TextBeforeVertex { line: 1 })
        );
    }

    #[test]
    fn test_empty_sections() {
        let document = split_document("//! VERTEX\n//! FRAGMENT\n").unwrap();
        assert_eq!(document, ShaderDocument::default());
    }
}
