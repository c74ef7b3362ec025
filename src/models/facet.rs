//! Facet definitions and the filter / facet-count clauses derived from them.
//!
//! A facet owns its selection state and keeps two derived strings in sync with
//! it: the `facet_clause` sent in the facet-count list of a request, and the
//! `filter_clause` that restricts results to the selected values. Every
//! mutation goes through a method that recomputes both, so `filter_clause` is
//! empty exactly when nothing is selected.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::models::response::FacetValue;

/// Default number of distinct values requested for a checkbox facet
pub const DEFAULT_CHECKBOX_COUNT: u32 = 5;

/// Data type of the field behind a checkbox facet
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    Default,
    strum::Display,
    strum::EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum FacetDataType {
    /// Single-valued string field
    #[default]
    String,
    /// Single-valued numeric field
    Number,
    /// Collection of strings
    Collection,
}

impl FacetDataType {
    /// Convert `term` to the form stored for this field type. Non-numeric text
    /// has no form on a number field.
    pub fn coerce(&self, term: &FacetTerm) -> Option<FacetTerm> {
        match (self, term) {
            (FacetDataType::Number, FacetTerm::Number(_)) => Some(term.clone()),
            (FacetDataType::Number, FacetTerm::Text(s)) => s
                .trim()
                .parse::<f64>()
                .ok()
                .filter(|n| n.is_finite())
                .map(FacetTerm::Number),
            (_, FacetTerm::Text(_)) => Some(term.clone()),
            (_, FacetTerm::Number(n)) => Some(FacetTerm::Text(n.to_string())),
        }
    }

    /// Render a term as a filter-expression literal for this field type
    pub fn literal(&self, term: &FacetTerm) -> String {
        match self {
            FacetDataType::Number => term.to_string(),
            FacetDataType::String | FacetDataType::Collection => {
                format!("'{}'", term.to_string().replace('\'', "''"))
            }
        }
    }
}

/// A discrete facet value, either text or numeric
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FacetTerm {
    Number(f64),
    Text(String),
}

impl FacetTerm {
    /// Convert a raw JSON facet value into a term
    pub fn from_json(value: &serde_json::Value) -> Option<Self> {
        match value {
            serde_json::Value::String(s) => Some(FacetTerm::Text(s.clone())),
            serde_json::Value::Number(n) => n.as_f64().map(FacetTerm::Number),
            serde_json::Value::Bool(b) => Some(FacetTerm::Text(b.to_string())),
            _ => None,
        }
    }
}

impl fmt::Display for FacetTerm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FacetTerm::Number(n) => write!(f, "{}", n),
            FacetTerm::Text(s) => write!(f, "{}", s),
        }
    }
}

impl From<&str> for FacetTerm {
    fn from(value: &str) -> Self {
        FacetTerm::Text(value.to_string())
    }
}

impl From<String> for FacetTerm {
    fn from(value: String) -> Self {
        FacetTerm::Text(value)
    }
}

impl From<f64> for FacetTerm {
    fn from(value: f64) -> Self {
        FacetTerm::Number(value)
    }
}

impl From<i64> for FacetTerm {
    fn from(value: i64) -> Self {
        FacetTerm::Number(value as f64)
    }
}

/// One known value of a checkbox facet
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckboxValue {
    pub value: FacetTerm,
    pub count: u64,
    pub selected: bool,
}

/// Chosen sub-range of a range facet (inclusive bounds)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RangeSelection {
    pub lower: f64,
    pub upper: f64,
}

/// Filter value applied to a facet
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FacetFilter {
    /// Select exactly these checkbox values
    Values(Vec<FacetTerm>),
    /// Restrict a range facet to `[lower, upper]`
    Range { lower: f64, upper: f64 },
    /// Drop every selection on the facet
    Clear,
}

/// Discrete-valued facet rendered as a list of checkboxes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckboxFacet {
    pub name: String,
    pub data_type: FacetDataType,
    pub multi_select: bool,
    /// Number of distinct values requested from the service
    pub count: u32,
    pub values: Vec<CheckboxValue>,
    pub facet_clause: String,
    pub filter_clause: String,
}

impl CheckboxFacet {
    pub fn new(name: impl Into<String>, data_type: FacetDataType, multi_select: bool) -> Self {
        let mut facet = Self {
            name: name.into(),
            data_type,
            multi_select,
            count: DEFAULT_CHECKBOX_COUNT,
            values: Vec::new(),
            facet_clause: String::new(),
            filter_clause: String::new(),
        };
        facet.refresh_clauses();
        facet
    }

    /// Set the number of distinct values requested
    pub fn with_count(mut self, count: u32) -> Self {
        self.count = count;
        self.refresh_clauses();
        self
    }

    pub fn selected(&self) -> impl Iterator<Item = &FacetTerm> {
        self.values.iter().filter(|v| v.selected).map(|v| &v.value)
    }

    /// Replace the selection with `terms`, coerced to the facet's data type.
    /// Single-select facets keep only the first term.
    pub fn select(&mut self, terms: &[FacetTerm]) {
        let data_type = self.data_type;
        let mut terms: Vec<FacetTerm> = terms.iter().filter_map(|t| data_type.coerce(t)).collect();
        if !self.multi_select {
            terms.truncate(1);
        }

        for value in &mut self.values {
            value.selected = terms.contains(&value.value);
        }
        for term in &terms {
            if !self.values.iter().any(|v| &v.value == term) {
                self.values.push(CheckboxValue {
                    value: term.clone(),
                    count: 0,
                    selected: true,
                });
            }
        }
        self.refresh_clauses();
    }

    /// Flip the selection of one value
    pub fn toggle(&mut self, term: &FacetTerm) {
        let Some(term) = self.data_type.coerce(term) else {
            return;
        };
        let currently = self
            .values
            .iter()
            .any(|v| v.value == term && v.selected);

        if currently {
            for value in self.values.iter_mut().filter(|v| v.value == term) {
                value.selected = false;
            }
            self.refresh_clauses();
            return;
        }

        let mut terms: Vec<FacetTerm> = if self.multi_select {
            self.selected().cloned().collect()
        } else {
            Vec::new()
        };
        terms.push(term);
        self.select(&terms);
    }

    pub fn clear(&mut self) {
        for value in &mut self.values {
            value.selected = false;
        }
        self.refresh_clauses();
    }

    /// Replace known values with the counts reported by the service, keeping
    /// selections. Selected values the service did not report stay with a
    /// zero count.
    pub fn update_counts(&mut self, entries: &[FacetValue]) {
        let selected: Vec<FacetTerm> = self.selected().cloned().collect();
        let data_type = self.data_type;

        let mut values: Vec<CheckboxValue> = entries
            .iter()
            .filter_map(|entry| {
                let term = entry.value.as_ref().and_then(FacetTerm::from_json)?;
                let term = data_type.coerce(&term)?;
                Some(CheckboxValue {
                    selected: selected.contains(&term),
                    value: term,
                    count: entry.count,
                })
            })
            .collect();

        for term in selected {
            if !values.iter().any(|v| v.value == term) {
                values.push(CheckboxValue {
                    value: term,
                    count: 0,
                    selected: true,
                });
            }
        }

        self.values = values;
        self.refresh_clauses();
    }

    fn refresh_clauses(&mut self) {
        self.facet_clause = format!("{},count:{},sort:count", self.name, self.count);

        let selected: Vec<&FacetTerm> = self.selected().collect();
        self.filter_clause = if selected.is_empty() {
            String::new()
        } else {
            match self.data_type {
                FacetDataType::Collection => {
                    let terms = selected
                        .iter()
                        .map(|t| format!("t eq {}", self.data_type.literal(t)))
                        .collect::<Vec<_>>()
                        .join(" or ");
                    format!("{}/any(t: {})", self.name, terms)
                }
                FacetDataType::String | FacetDataType::Number => {
                    let terms = selected
                        .iter()
                        .map(|t| format!("{} eq {}", self.name, self.data_type.literal(t)))
                        .collect::<Vec<_>>()
                        .join(" or ");
                    format!("({})", terms)
                }
            }
        };
    }
}

/// Numeric facet filtered by a sub-range of `[min, max]`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RangeFacet {
    pub name: String,
    pub min: f64,
    pub max: f64,
    pub selection: Option<RangeSelection>,
    /// Documents below `min`
    pub lower_bucket_count: u64,
    /// Documents inside `[min, max)`
    pub middle_bucket_count: u64,
    /// Documents at or above `max`
    pub upper_bucket_count: u64,
    pub facet_clause: String,
    pub filter_clause: String,
}

impl RangeFacet {
    pub fn new(name: impl Into<String>, min: f64, max: f64) -> Self {
        let mut facet = Self {
            name: name.into(),
            min,
            max,
            selection: None,
            lower_bucket_count: 0,
            middle_bucket_count: 0,
            upper_bucket_count: 0,
            facet_clause: String::new(),
            filter_clause: String::new(),
        };
        facet.refresh_clauses();
        facet
    }

    /// Choose `[lower, upper]`; swapped bounds are reordered
    pub fn set_range(&mut self, lower: f64, upper: f64) {
        let (lower, upper) = if lower <= upper {
            (lower, upper)
        } else {
            (upper, lower)
        };
        self.selection = Some(RangeSelection { lower, upper });
        self.refresh_clauses();
    }

    pub fn clear(&mut self) {
        self.selection = None;
        self.refresh_clauses();
    }

    /// Record the three bucket counts returned for `field,values:min|max`
    pub fn update_counts(&mut self, entries: &[FacetValue]) {
        self.lower_bucket_count = 0;
        self.middle_bucket_count = 0;
        self.upper_bucket_count = 0;

        for entry in entries {
            match (entry.from, entry.to) {
                (None, Some(_)) => self.lower_bucket_count = entry.count,
                (Some(_), Some(_)) => self.middle_bucket_count = entry.count,
                (Some(_), None) => self.upper_bucket_count = entry.count,
                (None, None) => {}
            }
        }
    }

    fn refresh_clauses(&mut self) {
        self.facet_clause = format!("{},values:{}|{}", self.name, self.min, self.max);
        self.filter_clause = match self.selection {
            Some(RangeSelection { lower, upper }) => {
                format!("{} ge {} and {} le {}", self.name, lower, self.name, upper)
            }
            None => String::new(),
        };
    }
}

/// A facet of either kind, keyed by its field name in `FacetsState`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FacetDefinition {
    Checkbox(CheckboxFacet),
    Range(RangeFacet),
}

impl FacetDefinition {
    pub fn name(&self) -> &str {
        match self {
            FacetDefinition::Checkbox(f) => &f.name,
            FacetDefinition::Range(f) => &f.name,
        }
    }

    pub fn facet_clause(&self) -> &str {
        match self {
            FacetDefinition::Checkbox(f) => &f.facet_clause,
            FacetDefinition::Range(f) => &f.facet_clause,
        }
    }

    pub fn filter_clause(&self) -> &str {
        match self {
            FacetDefinition::Checkbox(f) => &f.filter_clause,
            FacetDefinition::Range(f) => &f.filter_clause,
        }
    }

    pub fn is_filtered(&self) -> bool {
        !self.filter_clause().is_empty()
    }

    /// Apply a filter value. Returns `false`, leaving the facet untouched, when
    /// the filter kind does not match the facet kind.
    pub fn apply_filter(&mut self, filter: &FacetFilter) -> bool {
        match (self, filter) {
            (FacetDefinition::Checkbox(f), FacetFilter::Values(terms)) => {
                f.select(terms);
                true
            }
            (FacetDefinition::Range(f), FacetFilter::Range { lower, upper }) => {
                f.set_range(*lower, *upper);
                true
            }
            (facet, FacetFilter::Clear) => {
                facet.clear();
                true
            }
            _ => false,
        }
    }

    pub fn clear(&mut self) {
        match self {
            FacetDefinition::Checkbox(f) => f.clear(),
            FacetDefinition::Range(f) => f.clear(),
        }
    }

    pub fn update_counts(&mut self, entries: &[FacetValue]) {
        match self {
            FacetDefinition::Checkbox(f) => f.update_counts(entries),
            FacetDefinition::Range(f) => f.update_counts(entries),
        }
    }
}
