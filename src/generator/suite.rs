//! Scenario suite: the ordered, append-only list of generated test cases

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::runtime::Assignment;

/// One generated test case
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TestCase {
    /// Monotonic identifier
    pub id: u64,
    /// Group tag (`Cond. OK`, a variable name, `Norm NK`, ...)
    pub category: String,
    /// Human-readable intent
    pub description: String,
    /// Externally suppliable inputs, zeros dropped
    pub inputs: Assignment,
    /// Expected outcome as shown to the reviewer
    pub expected: String,
}

/// Number of cases in one category
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryCount {
    /// Category tag
    pub category: String,
    /// Cases in that category
    pub count: usize,
}

/// Ordered suite of test cases
///
/// Cases are never modified once pushed; ids increase by one from
/// `base + 1`. Order is significant for reviewers: entry-condition cases,
/// then per-variable cases, then norm cases.
#[derive(Debug, Clone, Default)]
pub struct ScenarioSuite {
    last_id: u64,
    cases: Vec<TestCase>,
    warnings: Vec<Error>,
}

#[derive(Serialize)]
struct SuiteDump<'a> {
    cases: &'a [TestCase],
    summary: Vec<CategoryCount>,
    warnings: Vec<String>,
}

impl ScenarioSuite {
    /// Empty suite whose first case gets id `base + 1`
    pub fn new(base: u64) -> Self {
        Self {
            last_id: base,
            cases: Vec::new(),
            warnings: Vec::new(),
        }
    }

    /// Append a case and return its id
    pub fn push(
        &mut self,
        category: impl Into<String>,
        description: impl Into<String>,
        inputs: Assignment,
        expected: impl Into<String>,
    ) -> u64 {
        self.last_id += 1;
        let case = TestCase {
            id: self.last_id,
            category: category.into(),
            description: description.into(),
            inputs,
            expected: expected.into(),
        };
        tracing::debug!("case {} [{}] {}", case.id, case.category, case.description);
        self.cases.push(case);
        self.last_id
    }

    /// Record a recoverable problem met while building
    pub fn push_warning(&mut self, warning: Error) {
        self.warnings.push(warning);
    }

    /// Cases in generation order
    pub fn cases(&self) -> &[TestCase] {
        &self.cases
    }

    /// Consume the suite, keeping the cases
    pub fn into_cases(self) -> Vec<TestCase> {
        self.cases
    }

    /// Recoverable problems met while building
    pub fn warnings(&self) -> &[Error] {
        &self.warnings
    }

    /// Number of cases
    pub fn len(&self) -> usize {
        self.cases.len()
    }

    /// True if no case was generated
    pub fn is_empty(&self) -> bool {
        self.cases.is_empty()
    }

    /// Cases of one category
    pub fn by_category<'a>(&'a self, category: &'a str) -> impl Iterator<Item = &'a TestCase> + 'a {
        self.cases.iter().filter(move |c| c.category == category)
    }

    /// Case count per category, in order of first appearance
    pub fn summary(&self) -> Vec<CategoryCount> {
        let mut counts: Vec<CategoryCount> = Vec::new();
        for case in &self.cases {
            match counts.iter_mut().find(|c| c.category == case.category) {
                Some(entry) => entry.count += 1,
                None => counts.push(CategoryCount {
                    category: case.category.clone(),
                    count: 1,
                }),
            }
        }
        counts
    }

    /// Pretty JSON dump of cases, summary and warnings
    pub fn to_json(&self) -> Result<String> {
        let dump = SuiteDump {
            cases: &self.cases,
            summary: self.summary(),
            warnings: self.warnings.iter().map(|w| w.to_string()).collect(),
        };
        Ok(serde_json::to_string_pretty(&dump)?)
    }
}
