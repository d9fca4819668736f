//! Pagination state for one Einstein@Home host crawl

use crate::url::pager_page_url;
use std::collections::{HashSet, VecDeque};

/// A page the HTML crawler should fetch next
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRequest {
    pub url: String,

    /// Whether pager links on this page should be followed
    pub discover_pager: bool,
}

/// Queue of task pages still to visit for one host
///
/// The first page is always visited first and is the only page whose pager
/// links are enqueued. Every additional page URL is the first page URL plus
/// the pager link's query suffix; a URL is enqueued at most once.
#[derive(Debug, Clone)]
pub struct HtmlCursor {
    first_page_url: String,
    started: bool,
    pending: VecDeque<String>,
    seen: HashSet<String>,
}

impl HtmlCursor {
    /// Creates a cursor positioned before the first page
    pub fn new(first_page_url: impl Into<String>) -> Self {
        let first_page_url = first_page_url.into();
        let mut seen = HashSet::new();
        seen.insert(first_page_url.clone());

        Self {
            first_page_url,
            started: false,
            pending: VecDeque::new(),
            seen,
        }
    }

    /// Returns the next page to fetch, or `None` when the crawl is done
    pub fn next_page(&mut self) -> Option<PageRequest> {
        if !self.started {
            self.started = true;
            return Some(PageRequest {
                url: self.first_page_url.clone(),
                discover_pager: true,
            });
        }

        self.pending.pop_front().map(|url| PageRequest {
            url,
            discover_pager: false,
        })
    }

    /// Enqueues additional pages from pager query suffixes
    ///
    /// Returns the number of newly enqueued pages.
    pub fn enqueue_queries<I, S>(&mut self, queries: I) -> usize
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut added = 0;
        for query in queries {
            let url = pager_page_url(&self.first_page_url, query.as_ref());
            if self.seen.insert(url.clone()) {
                self.pending.push_back(url);
                added += 1;
            }
        }
        added
    }

    /// Number of pages still queued
    pub fn pending(&self) -> usize {
        self.pending.len()
    }
}
