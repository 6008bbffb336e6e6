use serde::Serialize;

/// Validated page coordinates, both 1-based and positive
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: usize,
    pub limit: usize,
}

impl PageRequest {
    pub fn new(page: usize, limit: usize) -> Self {
        Self { page, limit }
    }

    pub fn start_index(&self) -> usize {
        self.page.saturating_sub(1).saturating_mul(self.limit)
    }

    pub fn end_index(&self) -> usize {
        self.page.saturating_mul(self.limit)
    }

    /// Slices `items` to this page. Pages past the end come back empty.
    pub fn slice<'s, T>(&self, items: &'s [T]) -> &'s [T] {
        let start = self.start_index().min(items.len());
        let end = self.end_index().min(items.len());
        &items[start..end]
    }

    pub fn metadata(&self, total_flights: usize) -> Pagination {
        Pagination {
            total_flights,
            total_pages: total_flights.div_ceil(self.limit.max(1)),
            current_page: self.page,
            flights_per_page: self.limit,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub total_flights: usize,
    pub total_pages: usize,
    pub current_page: usize,
    pub flights_per_page: usize,
}
