use markdown::CompileOptions;
use markdown::Constructs;
use markdown::Options;
use markdown::ParseOptions;

use crate::error::ConvertError;
use crate::render::heading_id;
use crate::render::Convert;
use crate::render::RenderOptions;

/// Markdown-to-HTML engine configured once from [`RenderOptions`].
#[derive(Debug, Clone)]
pub struct MarkdownEngine {
    constructs: Constructs,
    heading_ids: bool,
    xhtml: bool,
}

impl MarkdownEngine {
    pub fn new(options: &RenderOptions) -> Self {
        let mut constructs = Constructs::default();

        // Extension flags are a union: the bundle and the standalone switches
        // turn on the same constructs, each at most once.
        constructs.gfm_autolink_literal = options.gfm;
        constructs.gfm_table = options.gfm || options.tables;
        constructs.gfm_strikethrough = options.gfm || options.strikethrough;
        constructs.gfm_task_list_item = options.gfm || options.task_lists;

        Self {
            constructs,
            heading_ids: options.heading_ids,
            xhtml: options.xhtml,
        }
    }

    fn parse_options(&self) -> ParseOptions {
        ParseOptions {
            constructs: self.constructs.clone(),
            ..ParseOptions::default()
        }
    }

    fn options(&self) -> Options {
        Options {
            parse: self.parse_options(),
            compile: CompileOptions::default(),
        }
    }

    /// Render one markdown document to an HTML fragment.
    pub fn to_html(&self, source: &str) -> Result<String, ConvertError> {
        let mut html = markdown::to_html_with_options(source, &self.options())
            .map_err(|e| ConvertError::Markdown(e.to_string()))?;

        if self.heading_ids {
            let tree = markdown::to_mdast(source, &self.parse_options())
                .map_err(|e| ConvertError::Markdown(e.to_string()))?;
            html = heading_id::inject(&html, heading_id::collect(&tree));
        }

        if !self.xhtml {
            // Text and attribute values are escaped, so ` />` only closes void tags.
            html = html.replace(" />", ">");
        }

        Ok(html)
    }
}

impl Default for MarkdownEngine {
    fn default() -> Self {
        Self::new(&RenderOptions::default())
    }
}

impl Convert for MarkdownEngine {
    fn convert(&self, source: &[u8]) -> Result<Vec<u8>, ConvertError> {
        let source = std::str::from_utf8(source)?;
        Ok(self.to_html(source)?.into_bytes())
    }
}
