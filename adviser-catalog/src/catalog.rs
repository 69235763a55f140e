use crate::error::CatalogError;
use crate::filter::Filter;
use crate::registry::Registry;
use adviser_api::{ADVICE_MANIFEST, Advice, AdviceManifest, AdviceMeta, AdviceSource, NextSteps};
use anyhow::{Context, anyhow};
use camino::{Utf8Path, Utf8PathBuf};
use fs_err as fs;
use tracing::{debug, info};
use walkdir::{DirEntry, WalkDir};

/// Fixture directory holding the tree an advice starts from.
const FIXTURE_BEFORE: &str = "a";

/// One advice, built and ready to run, plus its descriptor.
pub struct LoadedAdvice {
    name: String,
    dir: Utf8PathBuf,
    kind: String,
    meta: AdviceMeta,
    next_steps: Vec<String>,
    advice: Box<dyn Advice>,
}

impl std::fmt::Debug for LoadedAdvice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoadedAdvice")
            .field("name", &self.name)
            .field("dir", &self.dir)
            .field("kind", &self.kind)
            .field("meta", &self.meta)
            .finish_non_exhaustive()
    }
}

impl LoadedAdvice {
    pub fn new(
        name: impl Into<String>,
        dir: impl Into<Utf8PathBuf>,
        kind: impl Into<String>,
        meta: AdviceMeta,
        advice: Box<dyn Advice>,
    ) -> Self {
        Self {
            name: name.into(),
            dir: dir.into(),
            kind: kind.into(),
            meta,
            next_steps: Vec::new(),
            advice,
        }
    }

    /// Steps appended to the buffer whenever this advice applies.
    pub fn with_next_steps(mut self, steps: Vec<String>) -> Self {
        self.next_steps = steps;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn dir(&self) -> &Utf8Path {
        &self.dir
    }

    pub fn kind(&self) -> &str {
        &self.kind
    }

    pub fn meta(&self) -> &AdviceMeta {
        &self.meta
    }

    pub fn has_fixture(&self) -> bool {
        self.dir.join(FIXTURE_BEFORE).is_dir()
    }

    fn push_manifest_steps(&self, next_steps: &mut NextSteps) {
        for step in &self.next_steps {
            if !next_steps.iter().any(|s| s == step) {
                next_steps.push(step.clone());
            }
        }
    }
}

impl Advice for LoadedAdvice {
    fn check(&self, project: &Utf8Path) -> anyhow::Result<bool> {
        self.advice.check(project)
    }

    fn apply(&self, workdir: &Utf8Path, next_steps: &mut NextSteps) -> anyhow::Result<()> {
        self.advice.apply(workdir, next_steps)?;
        self.push_manifest_steps(next_steps);
        Ok(())
    }

    fn run(&self, workdir: &Utf8Path, next_steps: &mut NextSteps) -> anyhow::Result<bool> {
        let ran = self.advice.run(workdir, next_steps)?;
        if ran {
            self.push_manifest_steps(next_steps);
        }
        Ok(ran)
    }
}

/// Every advice under one advice root, in name order.
#[derive(Debug)]
pub struct Catalog {
    root: Utf8PathBuf,
    advices: Vec<LoadedAdvice>,
}

impl Catalog {
    /// Walk `root` and build every advice found.
    ///
    /// Any advice that fails to load fails the whole catalog.
    pub fn load(root: &Utf8Path, registry: &Registry) -> Result<Self, CatalogError> {
        if !root.is_dir() {
            return Err(CatalogError::NotADirectory(root.to_path_buf()));
        }

        let mut advices = Vec::new();
        let mut walker = WalkDir::new(root)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|e| e.depth() == 0 || !is_hidden(e));

        while let Some(entry) = walker.next() {
            let entry = entry.map_err(|source| CatalogError::Walk {
                root: root.to_path_buf(),
                source,
            })?;
            if entry.depth() == 0 || !entry.file_type().is_dir() {
                continue;
            }
            if !entry.path().join(ADVICE_MANIFEST).is_file() {
                continue;
            }
            walker.skip_current_dir();

            let dir = Utf8PathBuf::from_path_buf(entry.path().to_path_buf())
                .map_err(CatalogError::NonUtf8Path)?;
            let name = display_name(root, &dir)?;
            debug!(advice = %name, "loading");
            let loaded = load_one(&name, &dir, registry)
                .map_err(|source| CatalogError::Load { name, source })?;
            advices.push(loaded);
        }

        info!(root = %root, count = advices.len(), "advice catalog loaded");
        Ok(Self {
            root: root.to_path_buf(),
            advices,
        })
    }

    /// Catalog from advice built elsewhere.
    pub fn from_advices(root: impl Into<Utf8PathBuf>, mut advices: Vec<LoadedAdvice>) -> Self {
        advices.sort_by(|a, b| a.name.cmp(&b.name));
        Self {
            root: root.into(),
            advices,
        }
    }

    pub fn root(&self) -> &Utf8Path {
        &self.root
    }

    pub fn len(&self) -> usize {
        self.advices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.advices.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, LoadedAdvice> {
        self.advices.iter()
    }

    pub fn get(&self, name: &str) -> Option<&LoadedAdvice> {
        self.advices.iter().find(|a| a.name == name)
    }

    /// Advice admitted by `filter`, sorted by `(order, name)`.
    ///
    /// This is both the listing order and the execution order.
    pub fn order(&self, filter: &Filter) -> Vec<&LoadedAdvice> {
        let mut selected: Vec<&LoadedAdvice> = self
            .advices
            .iter()
            .filter(|a| filter.include(&a.name, &a.meta))
            .collect();
        selected.sort_by(|a, b| {
            a.meta
                .order
                .cmp(&b.meta.order)
                .then_with(|| a.name.cmp(&b.name))
        });
        selected
    }
}

fn is_hidden(entry: &DirEntry) -> bool {
    entry.file_type().is_dir() && entry.file_name().to_string_lossy().starts_with('.')
}

fn display_name(root: &Utf8Path, dir: &Utf8Path) -> Result<String, CatalogError> {
    let rel = dir
        .strip_prefix(root)
        .map_err(|_| CatalogError::NonUtf8Path(dir.as_std_path().to_path_buf()))?;
    Ok(rel
        .components()
        .map(|c| c.as_str())
        .collect::<Vec<_>>()
        .join("/"))
}

fn load_one(name: &str, dir: &Utf8Path, registry: &Registry) -> anyhow::Result<LoadedAdvice> {
    let manifest_path = dir.join(ADVICE_MANIFEST);
    let text = fs::read_to_string(&manifest_path)?;
    let manifest =
        AdviceManifest::parse(&text).with_context(|| format!("parse {manifest_path}"))?;

    let factory = registry.get(&manifest.kind).ok_or_else(|| {
        let known: Vec<&str> = registry.kinds().collect();
        anyhow!(
            "unknown advice kind '{}' (known: {})",
            manifest.kind,
            known.join(", ")
        )
    })?;
    let advice = factory(&AdviceSource {
        name,
        dir,
        params: &manifest.params,
    })
    .with_context(|| format!("build advice of kind '{}'", manifest.kind))?;

    Ok(
        LoadedAdvice::new(name, dir, manifest.kind.as_str(), manifest.meta(), advice)
            .with_next_steps(manifest.next_steps.clone()),
    )
}
