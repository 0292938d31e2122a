use super::instruction::Expression;
use crate::error::{CheckoutError, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// The answer of the purchase endpoint, kept as received.
///
/// Only `expression` is interpreted; the rest of the body is carried along
/// untouched so callers get the original payload back.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PurchaseResponse {
    pub status: u16,
    pub body: Value,
}

impl PurchaseResponse {
    pub fn new(status: u16, body: Value) -> Self {
        Self { status, body }
    }

    /// Extracts the server instruction from the body.
    pub fn expression(&self) -> Result<Expression> {
        let raw = self.body.get("expression").ok_or_else(|| {
            CheckoutError::MalformedResponse("missing field `expression`".to_string())
        })?;
        Expression::deserialize(raw)
            .map_err(|e| CheckoutError::MalformedResponse(format!("invalid `expression`: {e}")))
    }
}

/// Body of a purchase the shop refused (HTTP 422).
#[derive(Debug, Deserialize)]
pub struct RejectedPurchase {
    pub purchasing_error_message: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_expression_extraction() {
        let response = PurchaseResponse::new(200, json!({"expression": "window.__x = 42"}));
        assert_eq!(
            response.expression().unwrap(),
            Expression::Script("window.__x = 42".to_string())
        );
    }

    #[test]
    fn test_missing_expression() {
        let response = PurchaseResponse::new(200, json!({}));
        assert!(matches!(
            response.expression(),
            Err(CheckoutError::MalformedResponse(_))
        ));
    }

    #[test]
    fn test_non_string_expression() {
        let response = PurchaseResponse::new(200, json!({"expression": 12}));
        assert!(matches!(
            response.expression(),
            Err(CheckoutError::MalformedResponse(_))
        ));

        let response = PurchaseResponse::new(200, json!("window.__x = 1"));
        assert!(response.expression().is_err());
    }
}
