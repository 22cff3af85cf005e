use std::future::Future;

use dtrack_core::AppResult;

/// One-based page request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    /// Page number, starting at 1.
    pub page_number: u32,
    /// Maximum items per page.
    pub page_size: u32,
}

impl PageRequest {
    /// Creates a request for the first page.
    #[must_use]
    pub fn first(page_size: u32) -> Self {
        Self {
            page_number: 1,
            page_size,
        }
    }
}

/// Page of items with the total count reported by the server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page<T> {
    /// Items on this page.
    pub items: Vec<T>,
    /// Total matching items across all pages.
    pub total: u64,
}

/// Walks pages in order and returns the first item accepted by `predicate`.
///
/// Stops at the first match, at an empty page, or once `total` items have
/// been seen. Fetch errors are returned unchanged.
pub async fn find_first<T, F, Fut, P>(
    page_size: u32,
    mut fetch_page: F,
    mut predicate: P,
) -> AppResult<Option<T>>
where
    F: FnMut(PageRequest) -> Fut,
    Fut: Future<Output = AppResult<Page<T>>>,
    P: FnMut(&T) -> bool,
{
    let mut request = PageRequest::first(page_size.max(1));
    let mut seen: u64 = 0;

    loop {
        let page = fetch_page(request).await?;
        let count = page.items.len() as u64;
        if let Some(found) = page.items.into_iter().find(|item| predicate(item)) {
            return Ok(Some(found));
        }

        seen += count;
        if count == 0 || seen >= page.total {
            return Ok(None);
        }

        request.page_number += 1;
    }
}

#[cfg(test)]
mod tests {
    use std::future::Future;
    use std::pin::Pin;
    use std::sync::Arc;

    use dtrack_core::{AppError, AppResult};
    use tokio::sync::Mutex;

    use super::{Page, PageRequest, find_first};

    type PageFuture = Pin<Box<dyn Future<Output = AppResult<Page<u32>>>>>;

    fn pages(
        values: Vec<u32>,
        calls: Arc<Mutex<Vec<PageRequest>>>,
    ) -> impl FnMut(PageRequest) -> PageFuture {
        move |request| {
            let values = values.clone();
            let calls = calls.clone();
            Box::pin(async move {
                calls.lock().await.push(request);
                let start = ((request.page_number - 1) * request.page_size) as usize;
                let items = values
                    .iter()
                    .copied()
                    .skip(start)
                    .take(request.page_size as usize)
                    .collect();
                Ok(Page {
                    items,
                    total: values.len() as u64,
                })
            })
        }
    }

    #[tokio::test]
    async fn stops_at_the_page_holding_the_match() {
        let calls = Arc::new(Mutex::new(Vec::new()));
        let found =
            find_first(2, pages((1..=9).collect(), calls.clone()), |value| *value == 4).await;

        assert!(matches!(found, Ok(Some(4))));
        assert_eq!(calls.lock().await.len(), 2);
    }

    #[tokio::test]
    async fn exhausts_all_pages_without_a_match() {
        let calls = Arc::new(Mutex::new(Vec::new()));
        let found =
            find_first(2, pages((1..=5).collect(), calls.clone()), |value| *value == 42).await;

        assert!(matches!(found, Ok(None)));
        let numbers: Vec<u32> = calls
            .lock()
            .await
            .iter()
            .map(|request| request.page_number)
            .collect();
        assert_eq!(numbers, vec![1, 2, 3]);
    }

    #[tokio::test]
    async fn fetch_errors_are_not_swallowed() {
        let found: AppResult<Option<u32>> = find_first(
            10,
            |_| async { Err(AppError::Transport("connection reset".to_owned())) },
            |_| true,
        )
        .await;

        assert!(matches!(found, Err(AppError::Transport(_))));
    }
}
