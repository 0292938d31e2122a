use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A page effect the server asks for once a purchase went through.
///
/// This is the closed set of things a purchase response may do to the page.
/// Anything outside it is rejected instead of being run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Instruction {
    /// Navigate the page to another address (usually the order detail page).
    Redirect { url: String },
    /// Show a message to the customer.
    Notify { message: String },
    /// Set a named value in the page's global state.
    Assign { name: String, value: Value },
    /// Reload the current page.
    Reload,
    Noop,
}

/// The `expression` field of a purchase response.
///
/// Older endpoints send a script snippet; newer ones send one tagged
/// instruction or a list of them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Expression {
    Script(String),
    Single(Instruction),
    Sequence(Vec<Instruction>),
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_tagged_instruction_deserialization() {
        let instruction: Instruction =
            serde_json::from_value(json!({"kind": "redirect", "url": "/shop/order/7"})).unwrap();
        assert_eq!(
            instruction,
            Instruction::Redirect {
                url: "/shop/order/7".to_string()
            }
        );

        let instruction: Instruction = serde_json::from_value(json!({"kind": "reload"})).unwrap();
        assert_eq!(instruction, Instruction::Reload);
    }

    #[test]
    fn test_expression_forms() {
        let expression: Expression = serde_json::from_value(json!("alert('hi')")).unwrap();
        assert_eq!(expression, Expression::Script("alert('hi')".to_string()));

        let expression: Expression =
            serde_json::from_value(json!({"kind": "notify", "message": "Thanks"})).unwrap();
        assert!(matches!(expression, Expression::Single(Instruction::Notify { .. })));

        let expression: Expression = serde_json::from_value(json!([
            {"kind": "assign", "name": "orderId", "value": 7},
            {"kind": "noop"}
        ]))
        .unwrap();
        assert!(matches!(expression, Expression::Sequence(ref list) if list.len() == 2));
    }

    #[test]
    fn test_unknown_kind_is_rejected() {
        let result: Result<Expression, _> =
            serde_json::from_value(json!({"kind": "eval", "code": "1"}));
        assert!(result.is_err());
        assert!(serde_json::from_value::<Expression>(json!(42)).is_err());
    }
}
