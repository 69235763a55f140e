use serde::{Deserialize, Serialize};

/// Outcome of running one advice against a target.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdviceResult {
    pub advice_name: String,
    pub success: bool,

    /// True when the advice changed at least one project.
    #[serde(default)]
    pub modified: bool,

    /// Branch the changes were pushed to (apply mode with changes only).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub branch_name: Option<String>,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub message: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub error: String,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub next_steps: Vec<String>,
}

impl AdviceResult {
    pub fn succeeded(
        advice_name: impl Into<String>,
        modified: bool,
        message: impl Into<String>,
    ) -> Self {
        Self {
            advice_name: advice_name.into(),
            success: true,
            modified,
            branch_name: None,
            message: message.into(),
            error: String::new(),
            next_steps: Vec::new(),
        }
    }

    pub fn failed(advice_name: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            advice_name: advice_name.into(),
            success: false,
            modified: false,
            branch_name: None,
            message: String::new(),
            error: error.into(),
            next_steps: Vec::new(),
        }
    }

    pub fn with_branch(mut self, branch: impl Into<String>) -> Self {
        self.branch_name = Some(branch.into());
        self
    }

    pub fn with_next_steps(mut self, steps: Vec<String>) -> Self {
        self.next_steps = steps;
        self
    }
}

/// Ordered advice name → result mapping.
///
/// Insertion order is execution order. Inserting a name twice replaces the
/// earlier result in place.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RunResults {
    results: Vec<AdviceResult>,
}

impl RunResults {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, result: AdviceResult) {
        match self
            .results
            .iter_mut()
            .find(|r| r.advice_name == result.advice_name)
        {
            Some(existing) => *existing = result,
            None => self.results.push(result),
        }
    }

    pub fn get(&self, advice_name: &str) -> Option<&AdviceResult> {
        self.results.iter().find(|r| r.advice_name == advice_name)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, AdviceResult> {
        self.results.iter()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.results.iter().map(|r| r.advice_name.as_str())
    }

    pub fn len(&self) -> usize {
        self.results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    pub fn any_failed(&self) -> bool {
        self.results.iter().any(|r| !r.success)
    }
}

impl<'a> IntoIterator for &'a RunResults {
    type Item = &'a AdviceResult;
    type IntoIter = std::slice::Iter<'a, AdviceResult>;

    fn into_iter(self) -> Self::IntoIter {
        self.results.iter()
    }
}

impl IntoIterator for RunResults {
    type Item = AdviceResult;
    type IntoIter = std::vec::IntoIter<AdviceResult>;

    fn into_iter(self) -> Self::IntoIter {
        self.results.into_iter()
    }
}

impl FromIterator<AdviceResult> for RunResults {
    fn from_iter<T: IntoIterator<Item = AdviceResult>>(iter: T) -> Self {
        let mut out = RunResults::new();
        for r in iter {
            out.insert(r);
        }
        out
    }
}
