// ABOUTME: Offset pagination for search and record listings
// ABOUTME: Computes page offsets and whether another page follows
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use serde::{Deserialize, Serialize};

use crate::constants::limits::{DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};

/// Zero-based page request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRequest {
    /// Page index
    pub page: usize,
    /// Items per page (1..=`MAX_PAGE_SIZE`)
    pub size: usize,
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: 0,
            size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl PageRequest {
    /// Build from optional query values, clamping the size
    #[must_use]
    pub fn new(page: Option<usize>, size: Option<usize>) -> Self {
        Self {
            page: page.unwrap_or(0),
            size: size.unwrap_or(DEFAULT_PAGE_SIZE).clamp(1, MAX_PAGE_SIZE),
        }
    }

    /// Items skipped before this page
    #[must_use]
    pub const fn offset(&self) -> usize {
        self.page.saturating_mul(self.size)
    }

    /// Whether items remain after this page
    #[must_use]
    pub const fn has_next(&self, total: usize) -> bool {
        self.offset().saturating_add(self.size) < total
    }

    /// Cut this page out of a full result set
    #[must_use]
    pub fn slice<T>(&self, items: Vec<T>) -> (Vec<T>, bool) {
        let has_next = self.has_next(items.len());
        let page = items
            .into_iter()
            .skip(self.offset())
            .take(self.size)
            .collect();
        (page, has_next)
    }
}
