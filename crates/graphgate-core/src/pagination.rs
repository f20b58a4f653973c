use serde::{Deserialize, Serialize};

use crate::errors::{ClassifiedError, ErrorCode};

/// Largest page any query may request
pub const MAX_PAGE_SIZE: u32 = 100;
pub const DEFAULT_PAGE_SIZE: u32 = 10;

/// 1-based page request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub page_number: u32,
    pub page_size: u32,
}

impl Pagination {
    pub fn new(page_number: u32, page_size: u32) -> Self {
        Self {
            page_number,
            page_size,
        }
    }

    /// Check `page_number >= 1` and `1 <= page_size <= max_page_size`
    ///
    /// # Errors
    ///
    /// `BAD_USER_INPUT` naming the offending argument.
    pub fn validate(&self, max_page_size: u32) -> Result<(), ClassifiedError> {
        if self.page_number < 1 {
            return Err(ClassifiedError::new(ErrorCode::BadUserInput)
                .with_field("pageNumber")
                .with_message("pageNumber must be at least 1"));
        }
        if self.page_size < 1 || self.page_size > max_page_size {
            return Err(ClassifiedError::new(ErrorCode::BadUserInput)
                .with_field("pageSize")
                .with_message(format!(
                    "pageSize must be between 1 and {}",
                    max_page_size
                )));
        }
        Ok(())
    }

    /// Rows to skip: `(page_number - 1) * page_size`
    pub fn offset(&self) -> u64 {
        u64::from(self.page_number.saturating_sub(1)) * u64::from(self.page_size)
    }

    pub fn limit(&self) -> u64 {
        u64::from(self.page_size)
    }
}

impl Default for Pagination {
    fn default() -> Self {
        Self::new(1, DEFAULT_PAGE_SIZE)
    }
}
