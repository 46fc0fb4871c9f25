//! Page-number pagination.
//!
//! The [`Paginator`] only knows the total row count and the page size; the
//! caller fetches the rows for a page with [`Paginator::offset`] and wraps
//! them in a [`Page`].

use serde::Serialize;

/// Why a requested page number was rejected
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PaginatorError {
	#[error("That page number is not an integer")]
	PageNotAnInteger,
	#[error("That page number is less than 1")]
	EmptyPageBelowOne,
	#[error("That page contains no results")]
	EmptyPage,
}

/// Splits `count` rows into pages of `per_page`
#[derive(Debug, Clone, Copy)]
pub struct Paginator {
	count: usize,
	per_page: usize,
}

impl Paginator {
	/// # Examples
	///
	/// ```
	/// use visitcard_core::pagination::Paginator;
	///
	/// let paginator = Paginator::new(25, 10);
	/// assert_eq!(paginator.num_pages(), 3);
	///
	/// // An empty result set still has one (empty) page
	/// assert_eq!(Paginator::new(0, 10).num_pages(), 1);
	/// ```
	pub fn new(count: usize, per_page: usize) -> Self {
		Self {
			count,
			per_page: per_page.max(1),
		}
	}

	pub fn count(&self) -> usize {
		self.count
	}

	pub fn per_page(&self) -> usize {
		self.per_page
	}

	pub fn num_pages(&self) -> usize {
		if self.count == 0 {
			1
		} else {
			self.count.div_ceil(self.per_page)
		}
	}

	/// Validate a raw page number
	///
	/// # Examples
	///
	/// ```
	/// use visitcard_core::pagination::{Paginator, PaginatorError};
	///
	/// let paginator = Paginator::new(25, 10);
	/// assert_eq!(paginator.validate_number("2"), Ok(2));
	/// assert_eq!(paginator.validate_number("x"), Err(PaginatorError::PageNotAnInteger));
	/// assert_eq!(paginator.validate_number("0"), Err(PaginatorError::EmptyPageBelowOne));
	/// assert_eq!(paginator.validate_number("4"), Err(PaginatorError::EmptyPage));
	/// ```
	pub fn validate_number(&self, raw: &str) -> Result<usize, PaginatorError> {
		let number: i64 = raw
			.trim()
			.parse()
			.map_err(|_| PaginatorError::PageNotAnInteger)?;
		if number < 1 {
			return Err(PaginatorError::EmptyPageBelowOne);
		}
		let number = number as usize;
		if number > self.num_pages() {
			return Err(PaginatorError::EmptyPage);
		}
		Ok(number)
	}

	/// Resolve a page number, falling back to page 1 on any error
	///
	/// # Examples
	///
	/// ```
	/// use visitcard_core::pagination::Paginator;
	///
	/// let paginator = Paginator::new(25, 10);
	/// assert_eq!(paginator.page_number_or_first(Some("3")), 3);
	/// assert_eq!(paginator.page_number_or_first(Some("99")), 1);
	/// assert_eq!(paginator.page_number_or_first(Some("abc")), 1);
	/// assert_eq!(paginator.page_number_or_first(None), 1);
	/// ```
	pub fn page_number_or_first(&self, raw: Option<&str>) -> usize {
		raw.and_then(|raw| self.validate_number(raw).ok())
			.unwrap_or(1)
	}

	/// Row offset of the first item on `number`
	pub fn offset(&self, number: usize) -> usize {
		number.saturating_sub(1) * self.per_page
	}

	/// Wrap the rows fetched for `number` into a [`Page`]
	pub fn page<T>(&self, object_list: Vec<T>, number: usize) -> Page<T> {
		Page::new(
			object_list,
			number,
			self.num_pages(),
			self.count,
			self.per_page,
		)
	}
}

/// Represents a single page of results
#[derive(Debug, Clone, Serialize)]
pub struct Page<T> {
	/// Items in this page
	pub object_list: Vec<T>,
	/// Current page number (1-indexed)
	pub number: usize,
	/// Total number of pages
	pub num_pages: usize,
	/// Total number of items across all pages
	pub count: usize,
	/// Items per page
	pub page_size: usize,
}

impl<T> Page<T> {
	pub fn new(
		object_list: Vec<T>,
		number: usize,
		num_pages: usize,
		count: usize,
		page_size: usize,
	) -> Self {
		Self {
			object_list,
			number,
			num_pages,
			count,
			page_size,
		}
	}

	pub fn has_next(&self) -> bool {
		self.number < self.num_pages
	}

	pub fn has_previous(&self) -> bool {
		self.number > 1
	}

	pub fn has_other_pages(&self) -> bool {
		self.has_next() || self.has_previous()
	}

	pub fn next_page_number(&self) -> Option<usize> {
		self.has_next().then(|| self.number + 1)
	}

	pub fn previous_page_number(&self) -> Option<usize> {
		self.has_previous().then(|| self.number - 1)
	}

	/// Template-friendly navigation summary
	pub fn navigation(&self) -> serde_json::Value {
		serde_json::json!({
			"number": self.number,
			"num_pages": self.num_pages,
			"count": self.count,
			"has_next": self.has_next(),
			"has_previous": self.has_previous(),
			"has_other_pages": self.has_other_pages(),
			"next_page_number": self.next_page_number(),
			"previous_page_number": self.previous_page_number(),
		})
	}
}
