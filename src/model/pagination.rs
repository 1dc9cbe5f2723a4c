/******************************************************************************
   Author: Hub Sync Contributors
   Date: 19/10/26
******************************************************************************/

//! `$top`/`$skip` pagination
//!
//! A [`Paginator`] drives any fetch function that answers
//! `{ <search_key>: [ ... ] }` for a page of query parameters, and yields the
//! elements one by one in server order. A run ends when a page's length is
//! not exactly `$top`, when the search key is missing from a response, or
//! after the first error. It cannot be restarted.
//!
//! # Example
//! ```ignore
//! let mut users = client.paginate::<HubUser>("/api/rest/users", RequestOptions::new(), "users", 100)?;
//! while let Some(user) = users.next().await {
//!     println!("{}", user?.login.unwrap_or_default());
//! }
//! ```

use crate::constants::{SKIP_PARAM, TOP_PARAM};
use crate::error::{AppError, AppResult};
use crate::model::http::QueryParams;
use futures::Stream;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::collections::VecDeque;
use std::future::Future;
use std::marker::PhantomData;
use std::pin::Pin;
use tracing::{debug, warn};

/// Future returned by a page fetch
pub type PageFuture<'a> = Pin<Box<dyn Future<Output = AppResult<Value>> + Send + 'a>>;

/// Boxed page fetch function
pub type PageFetcher<'a> = Box<dyn FnMut(QueryParams) -> PageFuture<'a> + Send + 'a>;

/// Position of a pagination run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageCursor {
    /// Offset of the next page
    pub skip: u64,
    /// Page size, constant for the whole run
    pub top: u32,
    /// Field of the response body holding the page's elements
    pub search_key: String,
}

impl PageCursor {
    /// A cursor at offset 0; `top` must be positive
    pub fn new(top: u32, search_key: impl Into<String>) -> AppResult<Self> {
        if top == 0 {
            return Err(AppError::InvalidInput(format!(
                "{TOP_PARAM} must be positive"
            )));
        }
        Ok(Self {
            skip: 0,
            top,
            search_key: search_key.into(),
        })
    }

    /// A cursor whose page size is read from the `$top` entry of `params`
    pub fn from_params(params: &QueryParams, search_key: impl Into<String>) -> AppResult<Self> {
        let top = params
            .get(TOP_PARAM)
            .ok_or_else(|| AppError::InvalidInput(format!("{TOP_PARAM} is missing")))?
            .parse::<u32>()
            .map_err(|e| AppError::InvalidInput(format!("{TOP_PARAM}: {e}")))?;
        Self::new(top, search_key)
    }

    /// Query parameters for the current page: `base` plus `$top` and `$skip`
    #[must_use]
    pub fn page_params(&self, base: &QueryParams) -> QueryParams {
        let mut params = base.clone();
        params.insert(TOP_PARAM.to_string(), self.top.to_string());
        params.insert(SKIP_PARAM.to_string(), self.skip.to_string());
        params
    }

    /// Moves to the next page
    pub fn advance(&mut self) {
        self.skip += u64::from(self.top);
    }

    /// Whether a page of `len` elements asks for another fetch
    ///
    /// Only a length of exactly `top` continues; an oversized page ends the
    /// run just like a short one.
    #[must_use]
    pub fn wants_more(&self, len: usize) -> bool {
        len == self.top as usize
    }
}

/// One page as read from a response body
#[derive(Debug, Clone, PartialEq)]
pub enum Page<T> {
    /// The search key was present and held these elements
    Items(Vec<T>),
    /// The search key was absent, or not a list
    Missing,
}

impl Page<Value> {
    /// Extracts the list under `search_key` from `body`
    #[must_use]
    pub fn from_body(body: Value, search_key: &str) -> Self {
        match body {
            Value::Object(mut map) => match map.remove(search_key) {
                Some(Value::Array(items)) => Page::Items(items),
                _ => Page::Missing,
            },
            _ => Page::Missing,
        }
    }
}

impl<T> Page<T> {
    /// Number of elements; zero for a missing page
    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            Page::Items(items) => items.len(),
            Page::Missing => 0,
        }
    }

    /// Whether the page holds no element
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Lazy, finite, non-restartable walk over a paginated collection
pub struct Paginator<'a, T> {
    fetch: PageFetcher<'a>,
    base_params: QueryParams,
    cursor: PageCursor,
    buffer: VecDeque<Value>,
    finished: bool,
    pages_fetched: usize,
    _item: PhantomData<fn() -> T>,
}

impl<'a, T: DeserializeOwned> Paginator<'a, T> {
    /// Creates a run whose page size is the `$top` entry of `params`
    ///
    /// # Arguments
    /// * `fetch` - called with `params` plus the current `$skip` for each page
    /// * `params` - query parameters shared by every page, including `$top`
    /// * `search_key` - field of the response body holding the page's elements
    pub fn new<F, Fut>(fetch: F, params: QueryParams, search_key: &str) -> AppResult<Self>
    where
        F: FnMut(QueryParams) -> Fut + Send + 'a,
        Fut: Future<Output = AppResult<Value>> + Send + 'a,
    {
        let cursor = PageCursor::from_params(&params, search_key)?;
        Ok(Self::from_parts(fetch, params, cursor))
    }

    /// Creates a run with an explicit page size
    pub fn with_top<F, Fut>(
        fetch: F,
        params: QueryParams,
        search_key: &str,
        top: u32,
    ) -> AppResult<Self>
    where
        F: FnMut(QueryParams) -> Fut + Send + 'a,
        Fut: Future<Output = AppResult<Value>> + Send + 'a,
    {
        let cursor = PageCursor::new(top, search_key)?;
        Ok(Self::from_parts(fetch, params, cursor))
    }

    fn from_parts<F, Fut>(mut fetch: F, params: QueryParams, cursor: PageCursor) -> Self
    where
        F: FnMut(QueryParams) -> Fut + Send + 'a,
        Fut: Future<Output = AppResult<Value>> + Send + 'a,
    {
        Self {
            fetch: Box::new(move |page_params| -> PageFuture<'a> { Box::pin(fetch(page_params)) }),
            base_params: params,
            cursor,
            buffer: VecDeque::new(),
            finished: false,
            pages_fetched: 0,
            _item: PhantomData,
        }
    }

    /// Current cursor
    pub fn cursor(&self) -> &PageCursor {
        &self.cursor
    }

    /// Number of pages requested so far
    pub fn pages_fetched(&self) -> usize {
        self.pages_fetched
    }

    /// Next element, fetching a new page when the current one is used up
    ///
    /// Returns `None` once the run is over. An error ends the run.
    pub async fn next(&mut self) -> Option<AppResult<T>> {
        loop {
            if let Some(value) = self.buffer.pop_front() {
                return match serde_json::from_value(value) {
                    Ok(item) => Some(Ok(item)),
                    Err(e) => {
                        self.stop();
                        Some(Err(AppError::Json(e)))
                    }
                };
            }
            if self.finished {
                return None;
            }
            if let Err(e) = self.fetch_page().await {
                self.stop();
                return Some(Err(e));
            }
        }
    }

    /// Drains the run into a vector, stopping at the first error
    pub async fn collect_all(mut self) -> AppResult<Vec<T>> {
        let mut items = Vec::new();
        while let Some(item) = self.next().await {
            items.push(item?);
        }
        Ok(items)
    }

    /// Turns the run into a [`Stream`]
    pub fn into_stream(self) -> impl Stream<Item = AppResult<T>> + 'a
    where
        T: 'a,
    {
        futures::stream::unfold(self, |mut paginator| async move {
            paginator.next().await.map(|item| (item, paginator))
        })
    }

    async fn fetch_page(&mut self) -> AppResult<()> {
        let params = self.cursor.page_params(&self.base_params);
        debug!(
            "Fetching page {} of '{}' ({}={}, {}={})",
            self.pages_fetched + 1,
            self.cursor.search_key,
            TOP_PARAM,
            self.cursor.top,
            SKIP_PARAM,
            self.cursor.skip
        );

        let body = (self.fetch)(params).await?;
        self.pages_fetched += 1;
        self.cursor.advance();

        match Page::from_body(body, &self.cursor.search_key) {
            Page::Items(items) => {
                if !self.cursor.wants_more(items.len()) {
                    self.finished = true;
                }
                self.buffer.extend(items);
            }
            Page::Missing => {
                warn!(
                    "Response has no '{}' list, ending pagination",
                    self.cursor.search_key
                );
                self.finished = true;
            }
        }
        Ok(())
    }

    fn stop(&mut self) {
        self.finished = true;
        self.buffer.clear();
    }
}
