/// Append-only buffer of post-merge instructions emitted while an advice runs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NextSteps(Vec<String>);

impl NextSteps {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, step: impl Into<String>) {
        self.0.push(step.into());
    }

    pub fn extend<I, S>(&mut self, steps: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.0.extend(steps.into_iter().map(Into::into));
    }

    pub fn iter(&self) -> std::slice::Iter<'_, String> {
        self.0.iter()
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }

    /// Drain the buffer, leaving it empty.
    pub fn take(&mut self) -> Vec<String> {
        std::mem::take(&mut self.0)
    }
}

impl<'a> IntoIterator for &'a NextSteps {
    type Item = &'a String;
    type IntoIter = std::slice::Iter<'a, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
