use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use super::category::CategoryCode;

/// How a category's prerequisite is satisfied.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", content = "categories", rename_all = "snake_case")]
pub enum Prerequisite {
    None,
    /// The single listed base must be held or requested.
    Exact(CategoryCode),
    /// Any one of the listed bases suffices; the first entry is the suggested fix.
    AnyOf(Vec<CategoryCode>),
}

impl Prerequisite {
    pub fn categories(&self) -> Vec<CategoryCode> {
        match self {
            Prerequisite::None => Vec::new(),
            Prerequisite::Exact(base) => vec![*base],
            Prerequisite::AnyOf(bases) => bases.clone(),
        }
    }

    pub fn is_satisfied_by(&self, available: &BTreeSet<CategoryCode>) -> bool {
        match self {
            Prerequisite::None => true,
            Prerequisite::Exact(base) => available.contains(base),
            Prerequisite::AnyOf(bases) => bases.iter().any(|base| available.contains(base)),
        }
    }

    /// Category to report when the prerequisite is not met.
    pub fn suggested_fix(&self) -> Option<CategoryCode> {
        match self {
            Prerequisite::None => None,
            Prerequisite::Exact(base) => Some(*base),
            Prerequisite::AnyOf(bases) => bases.first().copied(),
        }
    }
}

/// Learner's permit requirement attached to a category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LearnerPermitScope {
    NotRequired,
    /// Any permit covering a member of the shared group satisfies every member.
    SharedGroup,
    /// Only a permit naming this exact category satisfies it.
    ExactCategory,
}

/// Per-category issuing rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryRule {
    pub minimum_age: u8,
    pub prerequisite: Prerequisite,
    pub learner_permit: LearnerPermitScope,
}

impl CategoryRule {
    pub fn participates_in_learner_group(&self) -> bool {
        self.learner_permit != LearnerPermitScope::NotRequired
    }
}

/// Category sets that may be requested together.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CombinationWhitelist {
    entries: Vec<BTreeSet<CategoryCode>>,
}

impl CombinationWhitelist {
    pub fn new<I, E>(entries: I) -> Self
    where
        I: IntoIterator<Item = E>,
        E: IntoIterator<Item = CategoryCode>,
    {
        Self {
            entries: entries
                .into_iter()
                .map(|entry| entry.into_iter().collect())
                .collect(),
        }
    }

    pub fn entries(&self) -> &[BTreeSet<CategoryCode>] {
        &self.entries
    }

    pub fn contains(&self, categories: &BTreeSet<CategoryCode>) -> bool {
        self.entries.iter().any(|entry| entry == categories)
    }

    /// Single-category requests never need a whitelist entry.
    pub fn permits(&self, categories: &BTreeSet<CategoryCode>) -> bool {
        categories.len() <= 1 || self.contains(categories)
    }
}

/// Invariant violations detected while assembling a [`RuleBook`].
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum RuleBookError {
    #[error("no rule defined for category {0}")]
    MissingRule(CategoryCode),
    #[error("prerequisite cycle through category {0}")]
    PrerequisiteCycle(CategoryCode),
    #[error("base category {0} is missing its single-category whitelist entry")]
    MissingBaseEntry(CategoryCode),
}

/// Immutable rule table plus combination whitelist.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleBook {
    rules: BTreeMap<CategoryCode, CategoryRule>,
    whitelist: CombinationWhitelist,
}

impl RuleBook {
    pub fn new(
        rules: BTreeMap<CategoryCode, CategoryRule>,
        whitelist: CombinationWhitelist,
    ) -> Result<Self, RuleBookError> {
        if let Some(missing) = CategoryCode::ALL
            .into_iter()
            .find(|category| !rules.contains_key(category))
        {
            return Err(RuleBookError::MissingRule(missing));
        }

        for category in rules.keys() {
            let mut trail = Vec::new();
            if has_cycle(&rules, *category, &mut trail) {
                return Err(RuleBookError::PrerequisiteCycle(*category));
            }
        }

        for (category, rule) in &rules {
            if rule.prerequisite == Prerequisite::None
                && !whitelist.contains(&BTreeSet::from([*category]))
            {
                return Err(RuleBookError::MissingBaseEntry(*category));
            }
        }

        Ok(Self { rules, whitelist })
    }

    /// Statutory rule table used by the service.
    pub fn standard() -> Self {
        use CategoryCode::*;

        let rule = |minimum_age, prerequisite, learner_permit| CategoryRule {
            minimum_age,
            prerequisite,
            learner_permit,
        };

        let rules = BTreeMap::from([
            (A1, rule(16, Prerequisite::None, LearnerPermitScope::SharedGroup)),
            (A, rule(18, Prerequisite::None, LearnerPermitScope::SharedGroup)),
            (B, rule(18, Prerequisite::None, LearnerPermitScope::SharedGroup)),
            (C1, rule(18, Prerequisite::Exact(B), LearnerPermitScope::NotRequired)),
            (C, rule(21, Prerequisite::Exact(B), LearnerPermitScope::NotRequired)),
            (D, rule(24, Prerequisite::Exact(B), LearnerPermitScope::NotRequired)),
            (
                BE,
                rule(
                    18,
                    Prerequisite::AnyOf(vec![B, C1, D]),
                    LearnerPermitScope::NotRequired,
                ),
            ),
        ]);

        let singles = CategoryCode::ALL.into_iter().map(|category| vec![category]);
        let combinations = vec![
            vec![A1, B],
            vec![A, B],
            vec![B, C1],
            vec![B, C],
            vec![B, D],
            vec![B, BE],
            vec![B, C1, BE],
            vec![B, C, BE],
            vec![B, D, BE],
            vec![A, B, C1],
            vec![A, B, C],
            vec![A, B, BE],
        ];
        let whitelist = CombinationWhitelist::new(singles.chain(combinations));

        Self { rules, whitelist }
    }

    pub fn rule(&self, category: CategoryCode) -> Option<&CategoryRule> {
        self.rules.get(&category)
    }

    pub fn rules(&self) -> impl Iterator<Item = (CategoryCode, &CategoryRule)> {
        self.rules.iter().map(|(category, rule)| (*category, rule))
    }

    pub fn whitelist(&self) -> &CombinationWhitelist {
        &self.whitelist
    }

    /// Categories that `held` unlocks and that are not already in `held`.
    pub fn upgrades_from(&self, held: &BTreeSet<CategoryCode>) -> BTreeSet<CategoryCode> {
        self.rules()
            .filter(|(category, rule)| {
                !held.contains(category)
                    && rule.prerequisite != Prerequisite::None
                    && rule.prerequisite.is_satisfied_by(held)
            })
            .map(|(category, _)| category)
            .collect()
    }
}

impl Default for RuleBook {
    fn default() -> Self {
        Self::standard()
    }
}

fn has_cycle(
    rules: &BTreeMap<CategoryCode, CategoryRule>,
    category: CategoryCode,
    trail: &mut Vec<CategoryCode>,
) -> bool {
    if trail.contains(&category) {
        return true;
    }
    let Some(rule) = rules.get(&category) else {
        return false;
    };

    trail.push(category);
    let cyclic = rule
        .prerequisite
        .categories()
        .into_iter()
        .any(|base| has_cycle(rules, base, trail));
    trail.pop();
    cyclic
}
