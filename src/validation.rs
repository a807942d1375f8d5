//! Input validation and sanitization

use std::collections::HashSet;
use std::path::Path;

use crate::error::{ReviewCompareError, Result};
use crate::models::Product;

/// Validation utilities for inputs and reference data
#[derive(Debug, Copy, Clone)]
pub struct InputValidator;

impl InputValidator {
    /// Validate a product identifier.
    pub fn validate_product_id(product_id: &str) -> Result<()> {
        if product_id.trim().is_empty() {
            return Err(ReviewCompareError::InvalidInput(
                "Product id cannot be empty".to_string(),
            ));
        }

        if product_id.len() > 100 {
            return Err(ReviewCompareError::InvalidInput(
                "Product id too long (max 100 characters)".to_string(),
            ));
        }

        if product_id.contains('\0') || product_id.contains('\r') || product_id.contains('\n') {
            return Err(ReviewCompareError::InvalidInput(
                "Product id contains invalid characters".to_string(),
            ));
        }

        Ok(())
    }

    /// Validate the loaded product reference table: non-empty, sane ids,
    /// no duplicates.
    pub fn validate_product_table(products: &[Product]) -> Result<()> {
        if products.is_empty() {
            return Err(ReviewCompareError::InvalidInput(
                "Product table is empty".to_string(),
            ));
        }

        let mut seen: HashSet<&str> = HashSet::new();
        for product in products {
            Self::validate_product_id(&product.product_id)?;
            if !seen.insert(&product.product_id) {
                return Err(ReviewCompareError::InvalidInput(format!(
                    "Duplicate product id in product table: {}",
                    product.product_id
                )));
            }
        }

        Ok(())
    }

    /// Validate an output directory path.
    pub fn validate_output_dir(path: &Path) -> Result<()> {
        let path_str = path.to_string_lossy();
        if path_str.is_empty() {
            return Err(ReviewCompareError::InvalidInput(
                "Output path cannot be empty".to_string(),
            ));
        }

        // Reject path traversal
        if path_str.contains("..") {
            return Err(ReviewCompareError::InvalidInput(
                "Output path must not contain '..'".to_string(),
            ));
        }

        Ok(())
    }
}
