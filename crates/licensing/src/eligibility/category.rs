use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

/// License category codes issued by the registry.
///
/// Variant order is the canonical order: sets of codes sort the same way everywhere they
/// are compared or rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum CategoryCode {
    /// Light motorcycle.
    A1,
    /// Motorcycle.
    A,
    /// Light vehicle (car).
    B,
    /// Medium goods vehicle.
    C1,
    /// Heavy goods vehicle.
    C,
    /// Bus.
    D,
    /// Vehicle with trailer combination.
    BE,
}

impl CategoryCode {
    pub const ALL: [CategoryCode; 7] = [
        CategoryCode::A1,
        CategoryCode::A,
        CategoryCode::B,
        CategoryCode::C1,
        CategoryCode::C,
        CategoryCode::D,
        CategoryCode::BE,
    ];

    pub fn code(self) -> &'static str {
        match self {
            CategoryCode::A1 => "A1",
            CategoryCode::A => "A",
            CategoryCode::B => "B",
            CategoryCode::C1 => "C1",
            CategoryCode::C => "C",
            CategoryCode::D => "D",
            CategoryCode::BE => "BE",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            CategoryCode::A1 => "light motorcycle",
            CategoryCode::A => "motorcycle",
            CategoryCode::B => "light vehicle",
            CategoryCode::C1 => "medium vehicle",
            CategoryCode::C => "heavy vehicle",
            CategoryCode::D => "bus",
            CategoryCode::BE => "trailer combination",
        }
    }

    /// Parse a short code such as `"c1"` or `" BE "`.
    pub fn parse(raw: &str) -> Option<Self> {
        let normalized = raw.trim().to_ascii_uppercase();
        Self::ALL
            .into_iter()
            .find(|category| category.code() == normalized)
    }

    pub fn domain() -> BTreeSet<CategoryCode> {
        Self::ALL.into_iter().collect()
    }
}

impl fmt::Display for CategoryCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Caller-supplied category codes split into the ones the rule table knows and the ones it
/// does not.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CategoryRequest {
    recognized: BTreeSet<CategoryCode>,
    unrecognized: Vec<String>,
}

impl CategoryRequest {
    pub fn parse<I, S>(raw_codes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut request = Self::default();
        for raw in raw_codes {
            let raw = raw.as_ref();
            match CategoryCode::parse(raw) {
                Some(category) => {
                    request.recognized.insert(category);
                }
                None => {
                    let trimmed = raw.trim().to_string();
                    if !request.unrecognized.contains(&trimmed) {
                        request.unrecognized.push(trimmed);
                    }
                }
            }
        }
        request
    }

    pub fn recognized(&self) -> &BTreeSet<CategoryCode> {
        &self.recognized
    }

    pub fn unrecognized(&self) -> &[String] {
        &self.unrecognized
    }

    pub fn is_empty(&self) -> bool {
        self.recognized.is_empty() && self.unrecognized.is_empty()
    }
}

impl FromIterator<CategoryCode> for CategoryRequest {
    fn from_iter<T: IntoIterator<Item = CategoryCode>>(iter: T) -> Self {
        Self {
            recognized: iter.into_iter().collect(),
            unrecognized: Vec::new(),
        }
    }
}

/// Render a set of codes as `"B, C1"`.
pub fn join_codes<'a, I>(categories: I) -> String
where
    I: IntoIterator<Item = &'a CategoryCode>,
{
    categories
        .into_iter()
        .map(|category| category.code())
        .collect::<Vec<_>>()
        .join(", ")
}
