//! Product Resolver
//!
//! Lists the downloadable files of an observation and reduces their total
//! size to a short human-readable magnitude.
//!
//! Only the first page of the products service is requested. Observations
//! with more products than one page holds are silently truncated.

use std::fmt;

use tracing::{debug, warn};

use crate::app::client::ArchiveService;
use crate::app::models::{total_size, ProductRecord};
use crate::app::query::{parse_rows, SearchRequest};
use crate::constants::size;
use crate::errors::{ProductError, ProductResult, QueryResult};

/// Display unit of a reduced size
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SizeUnit {
    Kilobytes,
    Megabytes,
    Gigabytes,
}

impl SizeUnit {
    /// Unit for the number of reductions applied after the first one
    fn from_extra_divisions(n: u32) -> Option<Self> {
        match n {
            0 => Some(Self::Kilobytes),
            1 => Some(Self::Megabytes),
            2 => Some(Self::Gigabytes),
            _ => None,
        }
    }

    /// Short label
    pub fn label(&self) -> &'static str {
        match self {
            Self::Kilobytes => "kB",
            Self::Megabytes => "MB",
            Self::Gigabytes => "GB",
        }
    }
}

/// Total size reduced to at most three digits and a unit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DisplaySize {
    /// Truncated magnitude in `unit`
    pub value: u64,
    pub unit: SizeUnit,
    /// Total number of divisions by 1000 applied to the byte count
    pub divisions: u32,
}

impl DisplaySize {
    /// Reduce a byte total for display
    ///
    /// The byte count is divided by 1000 once (to kB), then again while the
    /// value has more than three decimal digits. Each extra division steps
    /// the unit up to MB and then GB.
    ///
    /// # Errors
    ///
    /// Returns [`ProductError::SizeOverflow`] when GB is not enough, i.e.
    /// for totals of 10^12 bytes and above.
    pub fn from_bytes(total_bytes: u64) -> ProductResult<Self> {
        let mut value = total_bytes / size::UNIT_STEP;
        let mut extra = 0u32;

        while value.to_string().len() > size::MAX_DISPLAY_DIGITS {
            value /= size::UNIT_STEP;
            extra += 1;
        }

        let unit = SizeUnit::from_extra_divisions(extra)
            .ok_or(ProductError::SizeOverflow { total_bytes })?;

        Ok(Self {
            value,
            unit,
            divisions: extra + 1,
        })
    }
}

impl fmt::Display for DisplaySize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "~{} {}", self.value, self.unit.label())
    }
}

/// Products of one observation with their aggregated size
#[derive(Debug, Clone, PartialEq)]
pub struct ProductSet {
    pub obsid: String,
    pub products: Vec<ProductRecord>,
    pub total_bytes: u64,
    pub display_size: DisplaySize,
}

impl ProductSet {
    /// Number of products found
    pub fn len(&self) -> usize {
        self.products.len()
    }

    /// Whether the observation has no products
    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    /// Status line shown to the operator
    pub fn summary_line(&self) -> String {
        format!(
            "Found {} files associated with {} ({} total file size)",
            self.len(),
            self.obsid,
            self.display_size
        )
    }
}

/// Query the products service for an observation (page 1 only)
pub async fn resolve_products(
    service: &dyn ArchiveService,
    obsid: &str,
    page_size: u32,
) -> QueryResult<Vec<ProductRecord>> {
    let request = SearchRequest::products(obsid, page_size);
    let body = service.submit(&request).await?;
    let products: Vec<ProductRecord> = parse_rows(&body)?;

    debug!("Observation {} has {} products", obsid, products.len());
    if products.len() as u64 >= u64::from(page_size) {
        warn!(
            "Observation {} returned a full page of {} products; further pages are not fetched",
            obsid, page_size
        );
    }

    Ok(products)
}

/// Resolve products and compute their display size
pub async fn summarize_products(
    service: &dyn ArchiveService,
    obsid: &str,
    page_size: u32,
) -> ProductResult<ProductSet> {
    let products = resolve_products(service, obsid, page_size).await?;
    let total_bytes = total_size(&products);
    let display_size = DisplaySize::from_bytes(total_bytes)?;

    Ok(ProductSet {
        obsid: obsid.to_string(),
        products,
        total_bytes,
        display_size,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_size_units() {
        // Test unit selection across the supported range
        let kb = DisplaySize::from_bytes(999_999).unwrap();
        assert_eq!((kb.value, kb.unit, kb.divisions), (999, SizeUnit::Kilobytes, 1));

        let mb = DisplaySize::from_bytes(2_300_000).unwrap();
        assert_eq!(mb.to_string(), "~2 MB");
        assert_eq!(mb.divisions, 2);

        let gb = DisplaySize::from_bytes(5_500_000_000).unwrap();
        assert_eq!(gb.to_string(), "~5 GB");
        assert_eq!(gb.divisions, 3);
    }

    #[test]
    fn test_display_size_small_totals() {
        assert_eq!(DisplaySize::from_bytes(0).unwrap().to_string(), "~0 kB");
        assert_eq!(DisplaySize::from_bytes(999).unwrap().to_string(), "~0 kB");
    }

    #[test]
    fn test_display_size_overflow_boundary() {
        // Test the boundary at 10^12 bytes
        let largest = DisplaySize::from_bytes(999_000_000_000).unwrap();
        assert_eq!(largest.to_string(), "~999 GB");
        assert!(largest.divisions <= 3);

        assert!(DisplaySize::from_bytes(999_999_999_999).is_ok());

        assert!(matches!(
            DisplaySize::from_bytes(1_000_000_000_000),
            Err(ProductError::SizeOverflow {
                total_bytes: 1_000_000_000_000
            })
        ));
        assert!(DisplaySize::from_bytes(u64::MAX).is_err());
    }

    #[test]
    fn test_divisions_bounded_below_threshold() {
        for total in [1, 1_000, 123_456_789, 10_u64.pow(11), 10_u64.pow(12) - 1] {
            let size = DisplaySize::from_bytes(total).unwrap();
            assert!(size.divisions <= 3, "{} took {} divisions", total, size.divisions);
        }
    }

    #[test]
    fn test_summary_line() {
        let set = ProductSet {
            obsid: "2003839997".to_string(),
            products: Vec::new(),
            total_bytes: 2_300_000,
            display_size: DisplaySize::from_bytes(2_300_000).unwrap(),
        };
        assert_eq!(
            set.summary_line(),
            "Found 0 files associated with 2003839997 (~2 MB total file size)"
        );
    }
}
