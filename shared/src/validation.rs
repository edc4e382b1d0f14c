//! Validation utilities for the Stock Management Platform

use rust_decimal::Decimal;

// ============================================================================
// Product Validations
// ============================================================================

/// Validate a product name is non-blank
pub fn validate_product_name(name: &str) -> Result<(), &'static str> {
    if name.trim().is_empty() {
        return Err("Product name cannot be empty");
    }
    if name.len() > 200 {
        return Err("Product name must be at most 200 characters");
    }
    Ok(())
}

/// Validate a unit label is non-blank
pub fn validate_unit(unit: &str) -> Result<(), &'static str> {
    if unit.trim().is_empty() {
        return Err("Unit cannot be empty");
    }
    Ok(())
}

/// Validate the minimum-stock threshold
pub fn validate_min_stock(min_stock: i64) -> Result<(), &'static str> {
    if min_stock < 0 {
        return Err("Minimum stock cannot be negative");
    }
    Ok(())
}

/// Validate a unit price
pub fn validate_price(price: Decimal) -> Result<(), &'static str> {
    if price < Decimal::ZERO {
        return Err("Price cannot be negative");
    }
    Ok(())
}

/// Validate optional consumption parameters
///
/// Both must be supplied together; a unit with a non-positive rate is
/// rejected rather than silently excluded from the forecast.
pub fn validate_consumption_params(
    unit: Option<&str>,
    rate: Option<Decimal>,
) -> Result<(), &'static str> {
    match (unit, rate) {
        (None, None) => Ok(()),
        (Some(u), Some(r)) => {
            if u.trim().is_empty() {
                return Err("Consumption unit cannot be empty");
            }
            if r <= Decimal::ZERO {
                return Err("Consumption rate must be positive");
            }
            Ok(())
        }
        _ => Err("Consumption unit and rate must be provided together"),
    }
}

// ============================================================================
// Movement Validations
// ============================================================================

/// Validate a movement quantity
pub fn validate_quantity(quantity: i64) -> Result<(), &'static str> {
    if quantity <= 0 {
        return Err("Quantity must be positive");
    }
    Ok(())
}

/// Validate a supplier name for a stock entry
pub fn validate_supplier(supplier: &str) -> Result<(), &'static str> {
    if supplier.trim().is_empty() {
        return Err("Supplier cannot be empty");
    }
    Ok(())
}

/// Validate the monthly forecast value
pub fn validate_monthly_forecast(forecast: i64) -> Result<(), &'static str> {
    if forecast < 0 {
        return Err("Monthly forecast cannot be negative");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_product_name() {
        assert!(validate_product_name("Luva Nitrílica").is_ok());
        assert!(validate_product_name("").is_err());
        assert!(validate_product_name("   ").is_err());
        assert!(validate_product_name(&"x".repeat(201)).is_err());
    }

    #[test]
    fn test_validate_min_stock() {
        assert!(validate_min_stock(0).is_ok());
        assert!(validate_min_stock(50).is_ok());
        assert!(validate_min_stock(-1).is_err());
    }

    #[test]
    fn test_validate_price() {
        assert!(validate_price(Decimal::ZERO).is_ok());
        assert!(validate_price(Decimal::from(10)).is_ok());
        assert!(validate_price(Decimal::from(-1)).is_err());
    }

    #[test]
    fn test_validate_consumption_params() {
        assert!(validate_consumption_params(None, None).is_ok());
        assert!(validate_consumption_params(Some("paciente"), Some(Decimal::from(2))).is_ok());
        assert!(validate_consumption_params(Some("paciente"), None).is_err());
        assert!(validate_consumption_params(None, Some(Decimal::from(2))).is_err());
        assert!(validate_consumption_params(Some("paciente"), Some(Decimal::ZERO)).is_err());
        assert!(validate_consumption_params(Some(" "), Some(Decimal::from(2))).is_err());
    }

    #[test]
    fn test_validate_quantity() {
        assert!(validate_quantity(1).is_ok());
        assert!(validate_quantity(0).is_err());
        assert!(validate_quantity(-5).is_err());
    }

    #[test]
    fn test_validate_supplier() {
        assert!(validate_supplier("Medic Distribuidora").is_ok());
        assert!(validate_supplier("").is_err());
    }

    #[test]
    fn test_validate_monthly_forecast() {
        assert!(validate_monthly_forecast(0).is_ok());
        assert!(validate_monthly_forecast(120).is_ok());
        assert!(validate_monthly_forecast(-1).is_err());
    }
}
