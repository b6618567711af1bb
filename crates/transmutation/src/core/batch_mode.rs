//! Task-local flag marking conversions driven by a batch.
//!
//! Converters check [`is_batch_mode`] to decide whether CPU-heavy parsing
//! moves onto the blocking pool. Single conversions parse inline.

use std::cell::Cell;
use tokio::task_local;

task_local! {
    static BATCH_MODE: Cell<bool>;
}

/// `false` outside [`with_batch_mode`].
pub fn is_batch_mode() -> bool {
    BATCH_MODE.try_with(|cell| cell.get()).unwrap_or(false)
}

/// Run `future` with batch mode enabled.
pub async fn with_batch_mode<F, T>(future: F) -> T
where
    F: std::future::Future<Output = T>,
{
    BATCH_MODE.scope(Cell::new(true), future).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_not_set_by_default() {
        assert!(!is_batch_mode());
    }

    #[tokio::test]
    async fn test_scoped_to_future() {
        let inside = with_batch_mode(async { is_batch_mode() }).await;
        assert!(inside);
        assert!(!is_batch_mode());
    }

    #[tokio::test]
    async fn test_nested_scopes() {
        let (outer, inner) = with_batch_mode(async {
            let outer = is_batch_mode();
            let inner = with_batch_mode(async { is_batch_mode() }).await;
            (outer, inner)
        })
        .await;

        assert!(outer);
        assert!(inner);
    }
}
