//! Split a markdown deck into slides on a literal delimiter and render each
//! slide to a standalone HTML fragment.
//!
//! ```no_run
//! use markslide::RenderOptions;
//!
//! let fragments = markslide::convert_file("deck.md", b"[end page]", &RenderOptions::default())?;
//! for html in &fragments {
//!     println!("{}", String::from_utf8_lossy(html));
//! }
//! # Ok::<(), markslide::Error>(())
//! ```

use std::path::Path;

pub mod error;
pub mod render;
pub mod split;

pub use error::ConvertError;
pub use error::Error;
pub use error::RenderError;
pub use error::SplitError;
pub use render::render_all;
pub use render::render_each;
pub use render::render_sections;
pub use render::Convert;
pub use render::RenderOptions;
pub use split::split_file;
pub use split::Splitter;

/// Markdown source of one slide.
pub type Section = Vec<u8>;

/// Rendered HTML of one slide.
pub type Fragment = Vec<u8>;

/// The delimiter the command line uses unless told otherwise.
pub const DEFAULT_DELIMITER: &str = "[end page]";

/// Split the file at `path` on `delimiter` and render every section with a
/// fresh engine configured from `options`.
pub fn convert_file(
    path: impl AsRef<Path>,
    delimiter: &[u8],
    options: &RenderOptions,
) -> Result<Vec<Fragment>, Error> {
    let sections = split_file(path, delimiter)?;
    let fragments = render_sections(&sections, options)?;
    Ok(fragments)
}
