//! Place aggregate: a food venue with its menu, schedule and rating.

use std::fmt;
use std::str::FromStr;

use super::identifier::define_uuid_id;
use super::{MenuItem, PlaceRating, Schedule};

define_uuid_id! {
    /// Stable place identifier stored as a UUID.
    PlaceId
}

/// Venue category. Labels are the exact strings clients send and receive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PlaceCategory {
    /// `Desayunos y Comidas`.
    BreakfastAndMeals,
    /// `Bebidas y Cafetería`.
    DrinksAndCoffee,
    /// `Snacks`.
    Snacks,
}

impl PlaceCategory {
    /// Every category, in display order.
    pub const ALL: [Self; 3] = [Self::BreakfastAndMeals, Self::DrinksAndCoffee, Self::Snacks];

    /// Label used on the wire and in storage.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::BreakfastAndMeals => "Desayunos y Comidas",
            Self::DrinksAndCoffee => "Bebidas y Cafetería",
            Self::Snacks => "Snacks",
        }
    }
}

impl fmt::Display for PlaceCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Raised when a category label is not one of [`PlaceCategory::ALL`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownCategory(pub String);

impl fmt::Display for UnknownCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown category: {}", self.0)
    }
}

impl std::error::Error for UnknownCategory {}

impl FromStr for PlaceCategory {
    type Err = UnknownCategory;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        Self::ALL
            .into_iter()
            .find(|category| category.label() == trimmed)
            .ok_or_else(|| UnknownCategory(trimmed.to_owned()))
    }
}

/// Filter applied when listing places.
///
/// # Examples
/// ```
/// use cuceifoods::domain::{CategoryFilter, PlaceCategory};
///
/// assert_eq!(CategoryFilter::parse(None), CategoryFilter::All);
/// assert_eq!(CategoryFilter::parse(Some("ALL")), CategoryFilter::All);
/// assert_eq!(
///     CategoryFilter::parse(Some("Snacks")),
///     CategoryFilter::Only(PlaceCategory::Snacks)
/// );
/// assert!(!CategoryFilter::parse(Some("Tacos")).matches(PlaceCategory::Snacks));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CategoryFilter {
    /// No filtering.
    #[default]
    All,
    /// Places in exactly this category.
    Only(PlaceCategory),
    /// A label naming no category; nothing matches.
    Unknown,
}

impl CategoryFilter {
    /// Interpret the optional `category` query parameter. Absent, blank and
    /// any casing of `all` disable filtering; labels outside
    /// [`PlaceCategory::ALL`] select nothing.
    #[must_use]
    pub fn parse(raw: Option<&str>) -> Self {
        match raw.map(str::trim) {
            None | Some("") => Self::All,
            Some(value) if value.eq_ignore_ascii_case("all") => Self::All,
            Some(value) => value.parse().map_or(Self::Unknown, Self::Only),
        }
    }

    /// Whether a place in `category` passes the filter.
    #[must_use]
    pub fn matches(self, category: PlaceCategory) -> bool {
        match self {
            Self::All => true,
            Self::Only(expected) => expected == category,
            Self::Unknown => false,
        }
    }
}

/// Validation errors for place fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlaceValidationError {
    /// Name was empty after trimming.
    EmptyName,
    /// Name longer than [`PLACE_NAME_MAX`] characters.
    NameTooLong {
        /// Character limit.
        max: usize,
    },
    /// Image location longer than [`IMAGE_URL_MAX`] characters.
    ImageUrlTooLong {
        /// Character limit.
        max: usize,
    },
}

impl fmt::Display for PlaceValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyName => write!(f, "name must not be empty"),
            Self::NameTooLong { max } => write!(f, "name must be at most {max} characters"),
            Self::ImageUrlTooLong { max } => {
                write!(f, "image_url must be at most {max} characters")
            }
        }
    }
}

impl std::error::Error for PlaceValidationError {}

/// Maximum length of a place name.
pub const PLACE_NAME_MAX: usize = 200;
/// Maximum length of an image reference.
pub const IMAGE_URL_MAX: usize = 300;

/// Non-empty venue name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaceName(String);

impl PlaceName {
    /// Trim and validate a place name.
    pub fn new(raw: impl Into<String>) -> Result<Self, PlaceValidationError> {
        let name: String = raw.into();
        let trimmed = name.trim();
        if trimmed.is_empty() {
            return Err(PlaceValidationError::EmptyName);
        }
        if trimmed.chars().count() > PLACE_NAME_MAX {
            return Err(PlaceValidationError::NameTooLong {
                max: PLACE_NAME_MAX,
            });
        }
        Ok(Self(trimmed.to_owned()))
    }
}

impl AsRef<str> for PlaceName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PlaceName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Normalise an image reference: blank means "no image".
pub fn normalise_image_url(raw: &str) -> Result<Option<String>, PlaceValidationError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    if trimmed.chars().count() > IMAGE_URL_MAX {
        return Err(PlaceValidationError::ImageUrlTooLong { max: IMAGE_URL_MAX });
    }
    Ok(Some(trimmed.to_owned()))
}

/// A food venue as stored, with its menu in submission order.
#[derive(Debug, Clone, PartialEq)]
pub struct Place {
    /// Place identifier.
    pub id: PlaceId,
    /// Display name.
    pub name: PlaceName,
    /// Venue category.
    pub category: PlaceCategory,
    /// Image location, if any.
    pub image_url: Option<String>,
    /// Opening hours, stored verbatim.
    pub schedule: Schedule,
    /// Menu in submission order.
    pub menu: Vec<MenuItem>,
    /// Aggregate of comment ratings.
    pub rating: PlaceRating,
}

/// Listing entry: a place plus the text of its most recent comment.
#[derive(Debug, Clone, PartialEq)]
pub struct PlaceSummary {
    /// The place itself.
    pub place: Place,
    /// Text of the newest comment, if any.
    pub latest_comment: Option<String>,
}

/// Data required to create a place.
#[derive(Debug, Clone, PartialEq)]
pub struct NewPlace {
    /// Display name.
    pub name: PlaceName,
    /// Venue category.
    pub category: PlaceCategory,
    /// Image location, if any.
    pub image_url: Option<String>,
    /// Opening hours.
    pub schedule: Schedule,
    /// Menu in submission order.
    pub menu: Vec<MenuItem>,
}

/// Patch applied by a place update. `None` leaves a field untouched.
///
/// `image_url: Some(None)` clears the image. `menu: Some(items)` replaces the
/// whole menu with `items`.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PlacePatch {
    /// New name.
    pub name: Option<PlaceName>,
    /// New category.
    pub category: Option<PlaceCategory>,
    /// New image location; `Some(None)` clears it.
    pub image_url: Option<Option<String>>,
    /// New opening hours.
    pub schedule: Option<Schedule>,
    /// Replacement menu.
    pub menu: Option<Vec<MenuItem>>,
}

impl PlacePatch {
    /// Apply the patch to an in-memory place.
    pub fn apply_to(self, place: &mut Place) {
        if let Some(name) = self.name {
            place.name = name;
        }
        if let Some(category) = self.category {
            place.category = category;
        }
        if let Some(image_url) = self.image_url {
            place.image_url = image_url;
        }
        if let Some(schedule) = self.schedule {
            place.schedule = schedule;
        }
        if let Some(menu) = self.menu {
            place.menu = menu;
        }
    }
}

/// Number of places per category plus the overall total.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PlaceCounts {
    breakfast_and_meals: u64,
    drinks_and_coffee: u64,
    snacks: u64,
}

impl PlaceCounts {
    /// Build counts from `(category, count)` pairs; repeated categories add up.
    #[must_use]
    pub fn from_grouped(groups: impl IntoIterator<Item = (PlaceCategory, u64)>) -> Self {
        let mut counts = Self::default();
        for (category, count) in groups {
            *counts.slot(category) += count;
        }
        counts
    }

    fn slot(&mut self, category: PlaceCategory) -> &mut u64 {
        match category {
            PlaceCategory::BreakfastAndMeals => &mut self.breakfast_and_meals,
            PlaceCategory::DrinksAndCoffee => &mut self.drinks_and_coffee,
            PlaceCategory::Snacks => &mut self.snacks,
        }
    }

    /// Places in `category`.
    #[must_use]
    pub const fn count(&self, category: PlaceCategory) -> u64 {
        match category {
            PlaceCategory::BreakfastAndMeals => self.breakfast_and_meals,
            PlaceCategory::DrinksAndCoffee => self.drinks_and_coffee,
            PlaceCategory::Snacks => self.snacks,
        }
    }

    /// Places across every category.
    #[must_use]
    pub const fn all(&self) -> u64 {
        self.breakfast_and_meals + self.drinks_and_coffee + self.snacks
    }
}
