//! Static data feed: profile links, projects and the carousel tuning
//! sub-document.
//!
//! Both documents are bundled into the binary; a data directory can replace
//! them at runtime.  Each record is validated on its own: a record with a
//! missing or mistyped required field is skipped, never fatal.  A document
//! that fails to load at all degrades to an empty list.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

use crate::core::animate::StageTuning;
use crate::core::search::{CandidateKind, SearchCandidate};

const BUNDLED_SOCIALS: &str = include_str!("../../data/socials.yaml");
const BUNDLED_PROJECTS: &str = include_str!("../../data/projects.yaml");

pub const SOCIALS_FILE: &str = "socials.yaml";
pub const PROJECTS_FILE: &str = "projects.yaml";

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("cannot read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("invalid YAML: {0}")]
    Parse(#[from] serde_yaml::Error),
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SocialLink {
    pub id: String,
    pub name: String,
    pub username: String,
    pub icon: String,
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Project {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub image: Option<String>,
    pub url: String,
    #[serde(default)]
    pub tech: Vec<String>,
}

/// Text shown by the content and name sections.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Profile {
    pub name: String,
    pub greeting: String,
    pub phrase: String,
    pub headline: Vec<String>,
    pub tags: String,
}

impl Default for Profile {
    fn default() -> Self {
        Self {
            name: String::new(),
            greeting: "Hi! I am...".into(),
            phrase: "Build Value Together With AI".into(),
            headline: Vec::new(),
            tags: String::new(),
        }
    }
}

/// Card size for the projects carousel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CardTuning {
    pub item_height: f64,
    pub gap: f64,
}

impl CardTuning {
    pub fn from_item_height(item_height: f64) -> Self {
        Self {
            item_height,
            gap: (item_height / 4.0).round(),
        }
    }
}

impl Default for CardTuning {
    fn default() -> Self {
        Self::from_item_height(180.0)
    }
}

/// Everything loaded from the data feed.
#[derive(Debug, Clone, PartialEq)]
pub struct Catalog {
    pub profile: Profile,
    pub socials: Vec<SocialLink>,
    pub projects: Vec<Project>,
    pub cards: CardTuning,
    pub stage: StageTuning,
}

impl Default for Catalog {
    fn default() -> Self {
        let cards = CardTuning::default();
        Self {
            profile: Profile::default(),
            socials: Vec::new(),
            projects: Vec::new(),
            cards,
            stage: StageTuning::with_gap(cards.gap),
        }
    }
}

// ── raw document shapes ─────────────────────────────────────────

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct SocialsDoc {
    profile: Option<serde_yaml::Value>,
    items: Vec<serde_yaml::Value>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ProjectsDoc {
    ui: Option<serde_yaml::Value>,
    projects: Vec<serde_yaml::Value>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct UiDoc {
    fourth_right: StageDoc,
    cards: CardsDoc,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct StageDoc {
    base: BaseDoc,
    exit: ExitDoc,
    scroll: ScrollDoc,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct BaseDoc {
    opacity: Option<f64>,
    translate_y: Option<f64>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct ExitDoc {
    translate_y: Option<f64>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct ScrollDoc {
    fade_out_start: Option<f64>,
    fade_out_window: Option<f64>,
    move_out_px: Option<f64>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct CardsDoc {
    item_min_height: Option<f64>,
}

impl Catalog {
    /// Load the bundled documents, or the ones under `dir` when given.
    pub fn load(dir: Option<&Path>) -> Self {
        let socials = read_document(dir, SOCIALS_FILE, BUNDLED_SOCIALS);
        let projects = read_document(dir, PROJECTS_FILE, BUNDLED_PROJECTS);
        Self::from_sources(socials.as_deref(), projects.as_deref())
    }

    /// Build from raw document text; `None` means the document was missing.
    pub fn from_sources(socials: Option<&str>, projects: Option<&str>) -> Self {
        let mut catalog = Catalog::default();

        match socials.map(serde_yaml::from_str::<SocialsDoc>) {
            Some(Ok(doc)) => {
                catalog.socials = parse_records(doc.items, "social link");
                if let Some(profile) = doc.profile {
                    match serde_yaml::from_value(profile) {
                        Ok(profile) => catalog.profile = profile,
                        Err(e) => tracing::warn!("ignoring malformed profile: {e}"),
                    }
                }
            }
            Some(Err(e)) => tracing::warn!("{}", CatalogError::from(e)),
            None => {}
        }

        match projects.map(serde_yaml::from_str::<ProjectsDoc>) {
            Some(Ok(doc)) => {
                catalog.projects = parse_records(doc.projects, "project");
                let ui = doc
                    .ui
                    .map(serde_yaml::from_value::<UiDoc>)
                    .transpose()
                    .unwrap_or_else(|e| {
                        tracing::warn!("ignoring malformed ui tuning: {e}");
                        None
                    })
                    .unwrap_or_default();
                catalog.apply_ui(&ui);
            }
            Some(Err(e)) => tracing::warn!("{}", CatalogError::from(e)),
            None => {}
        }

        tracing::info!(
            socials = catalog.socials.len(),
            projects = catalog.projects.len(),
            "catalog loaded"
        );
        catalog
    }

    fn apply_ui(&mut self, ui: &UiDoc) {
        if let Some(h) = ui.cards.item_min_height.filter(|h| *h > 0.0) {
            self.cards = CardTuning::from_item_height(h);
        }
        let stage = &ui.fourth_right;
        let mut tuning = StageTuning::with_gap(self.cards.gap);
        if let Some(v) = stage.base.opacity {
            tuning.base_opacity = v.clamp(0.0, 1.0);
        }
        if let Some(v) = stage.base.translate_y {
            tuning.base_translate = v;
        }
        if let Some(v) = stage.exit.translate_y {
            tuning.exit_translate = v;
        }
        if let Some(v) = stage.scroll.fade_out_start {
            tuning.fade_out_start = v;
        }
        if let Some(v) = stage.scroll.fade_out_window.filter(|w| *w > 0.0) {
            tuning.fade_out_window = v;
        }
        if let Some(v) = stage.scroll.move_out_px {
            tuning.move_out_px = v;
        }
        self.stage = tuning;
    }

    /// Every searchable entry: socials first, then projects.  Ids are unique.
    pub fn candidates(&self) -> Vec<SearchCandidate> {
        let mut taken = HashSet::new();
        let mut out = Vec::with_capacity(self.socials.len() + self.projects.len());

        for s in &self.socials {
            if !taken.insert(s.id.clone()) {
                tracing::warn!("skipping duplicate social id {:?}", s.id);
                continue;
            }
            out.push(SearchCandidate {
                id: s.id.clone(),
                name: s.name.clone(),
                secondary_label: s.username.clone(),
                icon_key: s.icon.clone(),
                url: s.url.clone(),
                kind: CandidateKind::Social,
                description: None,
                tech: Vec::new(),
            });
        }

        for p in &self.projects {
            let base = format!("project-{}", slug(&p.name));
            let mut id = base.clone();
            let mut n = 2;
            while !taken.insert(id.clone()) {
                id = format!("{base}-{n}");
                n += 1;
            }
            out.push(SearchCandidate {
                id,
                name: p.name.clone(),
                secondary_label: p.tech.first().cloned().unwrap_or_default(),
                icon_key: "project".into(),
                url: p.url.clone(),
                kind: CandidateKind::Project,
                description: p.description.clone(),
                tech: p.tech.clone(),
            });
        }
        out
    }
}

fn read_document(dir: Option<&Path>, file: &str, bundled: &str) -> Option<String> {
    let Some(dir) = dir else {
        return Some(bundled.to_string());
    };
    let path = dir.join(file);
    match std::fs::read_to_string(&path) {
        Ok(text) => Some(text),
        Err(source) => {
            tracing::warn!("{}", CatalogError::Read { path, source });
            None
        }
    }
}

fn parse_records<T: serde::de::DeserializeOwned>(values: Vec<serde_yaml::Value>, what: &str) -> Vec<T> {
    values
        .into_iter()
        .enumerate()
        .filter_map(|(i, value)| match serde_yaml::from_value::<T>(value) {
            Ok(record) => Some(record),
            Err(e) => {
                tracing::warn!("skipping {what} #{i}: {e}");
                None
            }
        })
        .collect()
}

/// Lower-case ASCII slug: alphanumerics kept, runs of anything else become
/// one `-`.
pub fn slug(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    for ch in name.chars() {
        if ch.is_ascii_alphanumeric() {
            out.push(ch.to_ascii_lowercase());
        } else if !out.is_empty() && !out.ends_with('-') {
            out.push('-');
        }
    }
    while out.ends_with('-') {
        out.pop();
    }
    if out.is_empty() {
        out.push_str("item");
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bundled_data_loads() {
        let catalog = Catalog::load(None);
        assert!(!catalog.socials.is_empty());
        assert!(!catalog.projects.is_empty());
        assert_eq!(catalog.cards.item_height, 180.0);
        assert_eq!(catalog.cards.gap, 45.0);
        assert_eq!(catalog.stage.exit_translate, -135.0);
    }

    #[test]
    fn malformed_records_are_skipped() {
        let socials = r#"
items:
  - id: gh
    name: GitHub
    username: "@me"
    icon: github
    url: https://github.com/me
  - id: broken
    name: Missing Url
    username: "@me"
    icon: x
  - just a string
"#;
        let projects = r#"
projects:
  - name: Ok
    url: https://example.com
  - description: no name or url
  - name: Tagged
    url: https://example.com/t
    tech: [Rust, Go]
"#;
        let catalog = Catalog::from_sources(Some(socials), Some(projects));
        assert_eq!(catalog.socials.len(), 1);
        assert_eq!(catalog.socials[0].id, "gh");
        assert_eq!(catalog.projects.len(), 2);
        assert_eq!(catalog.projects[1].tech, vec!["Rust", "Go"]);
    }

    #[test]
    fn broken_documents_degrade_to_empty() {
        let catalog = Catalog::from_sources(Some("items: [unclosed"), None);
        assert!(catalog.socials.is_empty());
        assert!(catalog.projects.is_empty());
        assert_eq!(catalog.cards, CardTuning::default());
    }

    #[test]
    fn missing_directory_degrades_to_empty() {
        let dir = tempfile::tempdir().expect("tempdir");
        let catalog = Catalog::load(Some(dir.path()));
        assert!(catalog.candidates().is_empty());
    }

    #[test]
    fn data_directory_overrides_bundled() {
        let dir = tempfile::tempdir().expect("tempdir");
        std::fs::write(
            dir.path().join(SOCIALS_FILE),
            "items:\n  - {id: a, name: A, username: u, icon: i, url: \"https://a\"}\n",
        )
        .expect("write");
        let catalog = Catalog::load(Some(dir.path()));
        assert_eq!(catalog.socials.len(), 1);
        assert!(catalog.projects.is_empty());
    }

    #[test]
    fn ui_tuning_overrides_defaults() {
        let projects = r#"
ui:
  fourthRight:
    base: { opacity: 0.8, translateY: 4 }
    exit: { translateY: -10 }
    scroll: { fadeOutStart: 1.0, fadeOutWindow: 0.5, moveOutPx: 20 }
  cards: { itemMinHeight: 120 }
projects: []
"#;
        let catalog = Catalog::from_sources(None, Some(projects));
        assert_eq!(catalog.cards, CardTuning { item_height: 120.0, gap: 30.0 });
        assert_eq!(catalog.stage.base_opacity, 0.8);
        assert_eq!(catalog.stage.base_translate, 4.0);
        assert_eq!(catalog.stage.exit_translate, -10.0);
        assert_eq!(catalog.stage.fade_out_start, 1.0);
        assert_eq!(catalog.stage.fade_out_window, 0.5);
        assert_eq!(catalog.stage.move_out_px, 20.0);
    }

    #[test]
    fn candidate_ids_are_unique() {
        let projects = r#"
projects:
  - { name: "Hello, World!", url: "https://a" }
  - { name: "hello world", url: "https://b" }
"#;
        let catalog = Catalog::from_sources(None, Some(projects));
        let ids: Vec<String> = catalog.candidates().into_iter().map(|c| c.id).collect();
        assert_eq!(ids, vec!["project-hello-world", "project-hello-world-2"]);
    }

    #[test]
    fn slug_collapses_separators() {
        assert_eq!(slug("  Prompt  Shelf!! "), "prompt-shelf");
        assert_eq!(slug("***"), "item");
    }
}
