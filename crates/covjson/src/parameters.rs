//! Parameter metadata types.
//!
//! A parameter describes what a coverage range measures: the observed
//! property, its unit and, for classified data, the set of categories.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A parameter (measured quantity) of a coverage.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Parameter {
    /// The type of parameter (always "Parameter").
    #[serde(rename = "type", default = "parameter_type")]
    pub type_: String,

    /// Optional identifier of the parameter itself.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    /// Human-readable label.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<I18nString>,

    /// Multi-language description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<I18nString>,

    /// The observed property.
    #[serde(rename = "observedProperty")]
    pub observed_property: ObservedProperty,

    /// Unit of measurement.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unit: Option<Unit>,

    /// Mapping from category id to the range values encoding it.
    #[serde(rename = "categoryEncoding", skip_serializing_if = "Option::is_none")]
    pub category_encoding: Option<HashMap<String, CategoryCode>>,
}

fn parameter_type() -> String {
    "Parameter".to_string()
}

impl Parameter {
    /// Create a new parameter for an observed property.
    pub fn new(observed_property: ObservedProperty) -> Self {
        Self {
            type_: parameter_type(),
            id: None,
            label: None,
            description: None,
            observed_property,
            unit: None,
            category_encoding: None,
        }
    }

    /// Set the parameter id.
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Set the unit.
    pub fn with_unit(mut self, unit: Unit) -> Self {
        self.unit = Some(unit);
        self
    }

    /// Set the categories of the observed property.
    pub fn with_categories(mut self, categories: Vec<Category>) -> Self {
        self.observed_property.categories = Some(categories);
        self
    }

    /// Categories of the observed property, if this is categorical data.
    pub fn categories(&self) -> Option<&[Category]> {
        self.observed_property.categories.as_deref()
    }

    /// Best available label: the parameter's own label, else the observed property's.
    pub fn display_label(&self) -> Option<&str> {
        self.label
            .as_ref()
            .or(self.observed_property.label.as_ref())
            .map(I18nString::text)
    }
}

/// Encoded range value(s) for one category.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum CategoryCode {
    /// A single integer code.
    Single(i64),
    /// Several codes mapping to the same category.
    Multiple(Vec<i64>),
}

/// Internationalized string supporting multiple languages.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum I18nString {
    /// Simple string (assumes English).
    Simple(String),
    /// Map of language codes to strings.
    Localized(HashMap<String, String>),
}

impl I18nString {
    /// Create an English-only i18n string.
    pub fn english(s: &str) -> Self {
        let mut map = HashMap::new();
        map.insert("en".to_string(), s.to_string());
        I18nString::Localized(map)
    }

    /// Get the English text, else the text of the smallest language tag.
    pub fn text(&self) -> &str {
        match self {
            I18nString::Simple(s) => s,
            I18nString::Localized(map) => map
                .get("en")
                .or_else(|| map.iter().min_by(|a, b| a.0.cmp(b.0)).map(|(_, text)| text))
                .map(String::as_str)
                .unwrap_or(""),
        }
    }
}

/// The observed property being measured.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ObservedProperty {
    /// URI identifier for the property.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    /// Human-readable label.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<I18nString>,

    /// Description of the property.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<I18nString>,

    /// Categories for categorical data.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub categories: Option<Vec<Category>>,
}

impl ObservedProperty {
    /// Create a new observed property with a label.
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            id: None,
            label: Some(I18nString::english(&label.into())),
            description: None,
            categories: None,
        }
    }

    /// Set the ID.
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }
}

/// A category for categorical observed properties.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Category {
    /// Category identifier.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    /// Human-readable label.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<I18nString>,

    /// Description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<I18nString>,

    /// Suggested legend color, e.g. "#00ff00".
    #[serde(rename = "preferredColor", skip_serializing_if = "Option::is_none")]
    pub preferred_color: Option<String>,
}

impl Category {
    /// Create a category with an id and English label.
    pub fn new(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            id: Some(id.into()),
            label: Some(I18nString::english(&label.into())),
            description: None,
            preferred_color: None,
        }
    }

    /// Set the preferred color.
    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.preferred_color = Some(color.into());
        self
    }
}

/// Unit of measurement.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Unit {
    /// Unit identifier URI.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    /// Human-readable label for the unit.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<I18nString>,

    /// Symbol or abbreviation.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub symbol: Option<UnitSymbol>,
}

impl Unit {
    /// Create a unit from a symbol string.
    pub fn from_symbol(symbol: impl Into<String>) -> Self {
        Self {
            id: None,
            label: None,
            symbol: Some(UnitSymbol::Simple(symbol.into())),
        }
    }

    /// Create a unit with label and symbol.
    pub fn new(label: impl Into<String>, symbol: impl Into<String>) -> Self {
        Self {
            id: None,
            label: Some(I18nString::english(&label.into())),
            symbol: Some(UnitSymbol::Simple(symbol.into())),
        }
    }

    /// Set the unit id.
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn kelvin() -> Self {
        Self::new("Kelvin", "K")
    }

    pub fn celsius() -> Self {
        Self::new("Celsius", "°C")
    }

    pub fn practical_salinity() -> Self {
        Self::new("Practical salinity unit", "psu")
    }
}

/// Unit symbol representation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum UnitSymbol {
    /// Simple string symbol.
    Simple(String),
    /// Structured symbol with type and value.
    Structured {
        /// Symbol value.
        value: String,
        /// Symbol type (e.g., "<http://www.opengis.net/def/uom/UCUM/>").
        #[serde(rename = "type")]
        type_: Option<String>,
    },
}

impl UnitSymbol {
    /// Get the symbol string.
    pub fn value(&self) -> &str {
        match self {
            UnitSymbol::Simple(s) => s,
            UnitSymbol::Structured { value, .. } => value,
        }
    }
}
