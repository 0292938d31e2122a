use serde::{Deserialize, Serialize};

/// The "cart is empty" signal handed over by the page.
///
/// Templates render booleans as text, so the flag may arrive as a native
/// boolean, as a string, or not at all. Only boolean `true` and the exact
/// string `"true"` mean the cart is empty.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CartEmptyFlag {
    #[default]
    Absent,
    Bool(bool),
    Text(String),
}

impl CartEmptyFlag {
    pub fn is_truthy(&self) -> bool {
        match self {
            CartEmptyFlag::Bool(value) => *value,
            CartEmptyFlag::Text(text) => text == "true",
            CartEmptyFlag::Absent => false,
        }
    }
}

impl From<bool> for CartEmptyFlag {
    fn from(value: bool) -> Self {
        CartEmptyFlag::Bool(value)
    }
}

impl From<&str> for CartEmptyFlag {
    fn from(value: &str) -> Self {
        CartEmptyFlag::Text(value.to_string())
    }
}

impl From<String> for CartEmptyFlag {
    fn from(value: String) -> Self {
        CartEmptyFlag::Text(value)
    }
}

impl<T: Into<CartEmptyFlag>> From<Option<T>> for CartEmptyFlag {
    fn from(value: Option<T>) -> Self {
        value.map_or(CartEmptyFlag::Absent, Into::into)
    }
}
