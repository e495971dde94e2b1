use std::sync::Arc;

use tokio::task::JoinSet;

use crate::error::ConvertError;
use crate::error::RenderError;
use crate::render::Convert;
use crate::Fragment;
use crate::Section;

/// Render sections on tokio's blocking pool.
///
/// Fragments come back in section order. If any section fails, the failure
/// with the lowest index is reported and every fragment is discarded, the
/// same outcome [`render_all`](crate::render::render_all) gives.
pub async fn render_all_concurrent<C>(
    sections: Vec<Section>,
    converter: Arc<C>,
) -> Result<Vec<Fragment>, RenderError>
where
    C: Convert + Send + Sync + 'static,
{
    let count = sections.len();
    let mut tasks = JoinSet::new();

    for (index, section) in sections.into_iter().enumerate() {
        let converter = Arc::clone(&converter);
        tasks.spawn_blocking(move || (index, converter.convert(&section)));
    }

    let mut slots: Vec<Option<Fragment>> = vec![None; count];
    let mut first_error: Option<(usize, ConvertError)> = None;

    while let Some(joined) = tasks.join_next().await {
        let (index, result) = joined?;
        match result {
            Ok(html) => slots[index] = Some(html),
            Err(source) => {
                let earlier = first_error.as_ref().is_some_and(|(i, _)| *i < index);
                if !earlier {
                    first_error = Some((index, source));
                }
            }
        }
    }

    if let Some((index, source)) = first_error {
        return Err(RenderError::Section { index, source });
    }

    tracing::debug!(fragments = count, "concurrent render done");
    Ok(slots.into_iter().flatten().collect())
}
