use adviser_api::AdviceMeta;
use adviser_types::Confidence;
use regex::Regex;
use tracing::debug;

/// Pure predicate deciding which advice takes part in a run or listing.
#[derive(Debug, Clone, Default)]
pub struct Filter {
    /// Minimum confidence.
    pub confidence: Confidence,
    /// Admit preview advice.
    pub preview: bool,
    /// Admit manual advice. Set when advice is selected by name.
    pub include_manual: bool,
    names: Option<Regex>,
}

impl Filter {
    pub fn new(confidence: Confidence, preview: bool) -> Self {
        Self {
            confidence,
            preview,
            include_manual: false,
            names: None,
        }
    }

    /// Everything: any confidence, previews and manual advice.
    pub fn all() -> Self {
        Self {
            confidence: Confidence::Unset,
            preview: true,
            include_manual: true,
            names: None,
        }
    }

    /// Restrict to the named advice (and anything nested under them).
    ///
    /// Naming advice explicitly also admits manual advice. An empty slice
    /// leaves the filter unchanged.
    pub fn with_names<S: AsRef<str>>(mut self, names: &[S]) -> Result<Self, regex::Error> {
        if names.is_empty() {
            return Ok(self);
        }
        self.names = Some(name_pattern(names)?);
        self.include_manual = true;
        Ok(self)
    }

    pub fn include(&self, name: &str, meta: &AdviceMeta) -> bool {
        if let Some(re) = &self.names
            && !re.is_match(name)
        {
            debug!(advice = name, "name does not match, skip");
            return false;
        }
        if meta.confidence < self.confidence {
            debug!(
                advice = name,
                confidence = %meta.confidence,
                threshold = %self.confidence,
                "below confidence threshold, skip"
            );
            return false;
        }
        if meta.preview && !self.preview {
            debug!(advice = name, "preview not allowed, skip");
            return false;
        }
        if meta.manual && !self.include_manual {
            debug!(advice = name, "manual advice not selected by name, skip");
            return false;
        }
        debug!(advice = name, "include");
        true
    }
}

/// Anchored pattern matching each name exactly or as a `/`-separated prefix.
///
/// `foo` matches `foo` and `foo/bar`, never `foobar` or `barfoo`.
pub fn name_pattern<S: AsRef<str>>(names: &[S]) -> Result<Regex, regex::Error> {
    let alternatives: Vec<String> = names
        .iter()
        .map(|name| {
            let escaped = regex::escape(name.as_ref().trim_end_matches('/'));
            format!("{escaped}|{escaped}/.*")
        })
        .collect();
    Regex::new(&format!("^(?:{})$", alternatives.join("|")))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn meta(confidence: Confidence) -> AdviceMeta {
        AdviceMeta {
            confidence,
            ..AdviceMeta::default()
        }
    }

    #[test]
    fn name_pattern_is_a_full_match() {
        let re = name_pattern(&["foo"]).unwrap();
        assert!(re.is_match("foo"));
        assert!(re.is_match("foo/bar"));
        assert!(!re.is_match("foobar"));
        assert!(!re.is_match("barfoo"));
        assert!(!re.is_match("bar/foo"));
    }

    #[test]
    fn name_pattern_escapes_metacharacters() {
        let re = name_pattern(&["a.b", "c+"]).unwrap();
        assert!(re.is_match("a.b"));
        assert!(!re.is_match("axb"));
        assert!(re.is_match("c+/x"));
        assert!(!re.is_match("cc"));
    }

    #[test]
    fn confidence_threshold_is_inclusive() {
        let filter = Filter::new(Confidence::Yellow, false);
        assert!(!filter.include("a", &meta(Confidence::Red)));
        assert!(filter.include("a", &meta(Confidence::Yellow)));
        assert!(filter.include("a", &meta(Confidence::Green)));
    }

    #[test]
    fn preview_requires_opt_in() {
        let m = AdviceMeta {
            preview: true,
            ..AdviceMeta::default()
        };
        assert!(!Filter::new(Confidence::Unset, false).include("p", &m));
        assert!(Filter::new(Confidence::Unset, true).include("p", &m));
    }

    #[test]
    fn manual_needs_selection_by_name() {
        let m = AdviceMeta {
            manual: true,
            ..AdviceMeta::default()
        };
        let everything = Filter::new(Confidence::Unset, true);
        assert!(!everything.include("bump", &m));

        let named = Filter::new(Confidence::Unset, false)
            .with_names(&["bump"])
            .unwrap();
        assert!(named.include("bump", &m));
        assert!(!named.include("other", &AdviceMeta::default()));
    }
}
