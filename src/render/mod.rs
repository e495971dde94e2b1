pub mod concurrent;
pub mod engine;
pub mod heading_id;

pub use engine::MarkdownEngine;
use crate::error::ConvertError;
use crate::error::RenderError;
use crate::Fragment;
use crate::Section;

/// Turns the markdown source of one section into HTML.
pub trait Convert {
    fn convert(&self, source: &[u8]) -> Result<Vec<u8>, ConvertError>;
}

impl<C: Convert + ?Sized> Convert for &C {
    fn convert(&self, source: &[u8]) -> Result<Vec<u8>, ConvertError> {
        (**self).convert(source)
    }
}

/// Which markdown extensions and output conventions an engine uses.
///
/// The default enables everything: the GitHub-flavored bundle (autolink
/// literals, tables, strikethrough, task lists), the standalone table,
/// strikethrough and task-list switches, heading ids and XHTML void tags.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderOptions {
    pub gfm: bool,
    pub tables: bool,
    pub strikethrough: bool,
    pub task_lists: bool,
    /// Give every heading an `id` derived from its text.
    pub heading_ids: bool,
    /// Close void elements XHTML style: `<br />` rather than `<br>`.
    pub xhtml: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            gfm: true,
            tables: true,
            strikethrough: true,
            task_lists: true,
            heading_ids: true,
            xhtml: true,
        }
    }
}

/// Render every section in order, or fail on the first section that does
/// not convert. Nothing rendered before the failure is returned.
pub fn render_all<C>(sections: &[Section], converter: &C) -> Result<Vec<Fragment>, RenderError>
where
    C: Convert + ?Sized,
{
    let mut fragments = Vec::with_capacity(sections.len());

    for (index, section) in sections.iter().enumerate() {
        let html = converter
            .convert(section)
            .map_err(|source| RenderError::Section { index, source })?;

        tracing::trace!(index, len = html.len(), "section rendered");
        fragments.push(html);
    }

    tracing::debug!(fragments = fragments.len(), "render done");
    Ok(fragments)
}

/// Render every section independently; one failure does not affect others.
pub fn render_each<C>(sections: &[Section], converter: &C) -> Vec<Result<Fragment, ConvertError>>
where
    C: Convert + ?Sized,
{
    sections.iter().map(|section| converter.convert(section)).collect()
}

/// Build one engine from `options` and render all sections with it.
pub fn render_sections(
    sections: &[Section],
    options: &RenderOptions,
) -> Result<Vec<Fragment>, RenderError> {
    let engine = MarkdownEngine::new(options);
    render_all(sections, &engine)
}
