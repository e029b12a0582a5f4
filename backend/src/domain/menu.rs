//! Menu items owned by a place.
//!
//! Menus are submitted as a JSON array of `{category, dish_name, price}`
//! objects, either inline or as text inside a form field. Documents that are
//! not JSON arrays are tolerated as an empty menu; individual entries that
//! are present but malformed are rejected with their position.

use std::fmt;

use serde_json::Value;
use tracing::debug;

/// Maximum length of a dish name or menu section label.
pub const MENU_TEXT_MAX: usize = 200;

/// Reasons a single menu entry can be rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MenuEntryProblem {
    /// Entry is not a JSON object.
    NotAnObject,
    /// `category` is missing or not a string.
    MissingCategory,
    /// `dish_name` is missing, blank or not a string.
    MissingDishName,
    /// A text field exceeds [`MENU_TEXT_MAX`] characters.
    TextTooLong {
        /// Character limit.
        max: usize,
    },
    /// `price` is missing or not a number.
    MissingPrice,
    /// `price` is below zero.
    NegativePrice,
    /// `price` is NaN or infinite.
    NonFinitePrice,
}

impl fmt::Display for MenuEntryProblem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotAnObject => write!(f, "entry must be an object"),
            Self::MissingCategory => write!(f, "category must be a string"),
            Self::MissingDishName => write!(f, "dish_name must be a non-empty string"),
            Self::TextTooLong { max } => write!(f, "text fields must be at most {max} characters"),
            Self::MissingPrice => write!(f, "price must be a number"),
            Self::NegativePrice => write!(f, "price must not be negative"),
            Self::NonFinitePrice => write!(f, "price must be finite"),
        }
    }
}

/// A rejected menu entry and its zero-based index in the submitted list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuValidationError {
    /// Zero-based position of the entry.
    pub index: usize,
    /// What was wrong with it.
    pub problem: MenuEntryProblem,
}

impl fmt::Display for MenuValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "menu entry {}: {}", self.index, self.problem)
    }
}

impl std::error::Error for MenuValidationError {}

/// Non-negative, finite price.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct Price(f64);

impl Price {
    /// Validate a raw price.
    pub fn new(value: f64) -> Result<Self, MenuEntryProblem> {
        if !value.is_finite() {
            return Err(MenuEntryProblem::NonFinitePrice);
        }
        if value < 0.0 {
            return Err(MenuEntryProblem::NegativePrice);
        }
        Ok(Self(value))
    }

    /// Price as a float.
    #[must_use]
    pub fn value(self) -> f64 {
        self.0
    }
}

/// One dish on a place's menu.
#[derive(Debug, Clone, PartialEq)]
pub struct MenuItem {
    category: String,
    dish_name: String,
    price: Price,
}

impl MenuItem {
    /// Validate a menu item from its parts.
    pub fn new(
        section: impl Into<String>,
        dish: impl Into<String>,
        price: f64,
    ) -> Result<Self, MenuEntryProblem> {
        let category = section.into();
        let dish_name = dish.into();
        if dish_name.trim().is_empty() {
            return Err(MenuEntryProblem::MissingDishName);
        }
        if category.chars().count() > MENU_TEXT_MAX || dish_name.chars().count() > MENU_TEXT_MAX {
            return Err(MenuEntryProblem::TextTooLong { max: MENU_TEXT_MAX });
        }
        Ok(Self {
            category,
            dish_name,
            price: Price::new(price)?,
        })
    }

    /// Section label the dish is listed under, e.g. "Bebidas".
    #[must_use]
    pub fn category(&self) -> &str {
        &self.category
    }

    /// Dish name as submitted.
    #[must_use]
    pub fn dish_name(&self) -> &str {
        &self.dish_name
    }

    /// Validated price.
    #[must_use]
    pub fn price(&self) -> Price {
        self.price
    }

    fn from_entry(entry: &Value) -> Result<Self, MenuEntryProblem> {
        let object = entry.as_object().ok_or(MenuEntryProblem::NotAnObject)?;
        let category = object
            .get("category")
            .and_then(Value::as_str)
            .ok_or(MenuEntryProblem::MissingCategory)?;
        let dish_name = object
            .get("dish_name")
            .and_then(Value::as_str)
            .ok_or(MenuEntryProblem::MissingDishName)?;
        let price = object
            .get("price")
            .and_then(Value::as_f64)
            .ok_or(MenuEntryProblem::MissingPrice)?;
        Self::new(category, dish_name, price)
    }
}

/// Parse menu text from a form field.
///
/// Text that is not JSON, or JSON that is not an array, yields an empty menu.
///
/// # Examples
/// ```
/// use cuceifoods::domain::parse_menu_text;
///
/// let menu = parse_menu_text(r#"[{"category": "Tortas", "dish_name": "Ahogada", "price": 55}]"#)
///     .unwrap();
/// assert_eq!(menu.len(), 1);
/// assert!(parse_menu_text("nonsense").unwrap().is_empty());
/// ```
pub fn parse_menu_text(raw: &str) -> Result<Vec<MenuItem>, MenuValidationError> {
    match serde_json::from_str::<Value>(raw) {
        Ok(value) => parse_menu_value(&value),
        Err(error) => {
            debug!(%error, "unparseable menu replaced with empty list");
            Ok(Vec::new())
        }
    }
}

/// Parse a menu supplied as a JSON value. Strings are treated as embedded
/// JSON text.
pub fn parse_menu_value(value: &Value) -> Result<Vec<MenuItem>, MenuValidationError> {
    match value {
        Value::String(text) => parse_menu_text(text),
        Value::Array(entries) => entries
            .iter()
            .enumerate()
            .map(|(index, entry)| {
                MenuItem::from_entry(entry).map_err(|problem| MenuValidationError { index, problem })
            })
            .collect(),
        _ => Ok(Vec::new()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use serde_json::json;

    #[rstest]
    #[case("")]
    #[case("{")]
    #[case(r#"{"category": "x"}"#)]
    #[case("12")]
    fn tolerated_documents_become_empty(#[case] raw: &str) {
        assert!(parse_menu_text(raw).expect("tolerated").is_empty());
    }

    #[test]
    fn keeps_submission_order() {
        let menu = parse_menu_value(&json!([
            {"category": "Comidas", "dish_name": "Chilaquiles", "price": 45.5},
            {"category": "Bebidas", "dish_name": "Café", "price": 20}
        ]))
        .expect("valid menu");
        let names: Vec<_> = menu.iter().map(MenuItem::dish_name).collect();
        assert_eq!(names, ["Chilaquiles", "Café"]);
        assert_eq!(menu.first().map(|item| item.price().value()), Some(45.5));
    }

    #[rstest]
    #[case(json!([1]), MenuEntryProblem::NotAnObject)]
    #[case(json!([{"dish_name": "x", "price": 1}]), MenuEntryProblem::MissingCategory)]
    #[case(json!([{"category": "c", "dish_name": "  ", "price": 1}]), MenuEntryProblem::MissingDishName)]
    #[case(json!([{"category": "c", "dish_name": "x"}]), MenuEntryProblem::MissingPrice)]
    #[case(json!([{"category": "c", "dish_name": "x", "price": "12"}]), MenuEntryProblem::MissingPrice)]
    #[case(json!([{"category": "c", "dish_name": "x", "price": -1}]), MenuEntryProblem::NegativePrice)]
    fn malformed_entries_report_their_problem(
        #[case] value: Value,
        #[case] expected: MenuEntryProblem,
    ) {
        let err = parse_menu_value(&value).expect_err("must fail");
        assert_eq!(err.index, 0);
        assert_eq!(err.problem, expected);
    }

    #[test]
    fn reports_index_of_later_entries() {
        let err = parse_menu_value(&json!([
            {"category": "c", "dish_name": "ok", "price": 1},
            {"category": "c", "dish_name": "bad", "price": -3}
        ]))
        .expect_err("must fail");
        assert_eq!(err.index, 1);
    }

    #[test]
    fn non_finite_prices_are_rejected() {
        assert_eq!(Price::new(f64::NAN), Err(MenuEntryProblem::NonFinitePrice));
    }
}
