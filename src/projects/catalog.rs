//! Project catalog views
//!
//! Text filter, sort orders and the home page showcase split, applied to a
//! list fetched once.

use std::cmp::Ordering;
use std::collections::HashSet;
use std::str::FromStr;

use crate::error::LiveDataError;
use crate::models::Project;

const RECENT_COUNT: usize = 3;
const FEATURED_COUNT: usize = 6;

// == Filter ==

/// Case-insensitive substring match on name, description or language.
///
/// An empty query keeps everything. Whitespace is part of the query and is
/// matched literally.
pub fn filter_projects<'a>(projects: &'a [Project], query: &str) -> Vec<&'a Project> {
    let needle = query.to_lowercase();
    projects
        .iter()
        .filter(|p| needle.is_empty() || matches_query(p, &needle))
        .collect()
}

fn matches_query(project: &Project, needle: &str) -> bool {
    let contains = |s: &str| s.to_lowercase().contains(needle);
    contains(&project.name)
        || project.description.as_deref().is_some_and(contains)
        || project.language.as_deref().is_some_and(contains)
}

// == Sort ==

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ProjectSort {
    /// Most recently updated first
    #[default]
    Latest,
    Oldest,
    /// Most stars first
    Stars,
    /// Alphabetical, case-insensitive
    Name,
}

impl FromStr for ProjectSort {
    type Err = LiveDataError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "latest" => Ok(ProjectSort::Latest),
            "oldest" => Ok(ProjectSort::Oldest),
            "stars" => Ok(ProjectSort::Stars),
            "name" => Ok(ProjectSort::Name),
            other => Err(LiveDataError::Parse(format!("unknown sort order: {}", other))),
        }
    }
}

impl ProjectSort {
    fn compare(self, a: &Project, b: &Project) -> Ordering {
        match self {
            ProjectSort::Latest => b.updated_at.cmp(&a.updated_at),
            ProjectSort::Oldest => a.updated_at.cmp(&b.updated_at),
            ProjectSort::Stars => b.stargazers_count.cmp(&a.stargazers_count),
            ProjectSort::Name => a
                .name
                .to_lowercase()
                .cmp(&b.name.to_lowercase())
                .then_with(|| a.name.cmp(&b.name)),
        }
    }
}

/// Stable sort in place.
pub fn sort_projects<P: AsRef<Project>>(projects: &mut [P], order: ProjectSort) {
    projects.sort_by(|a, b| order.compare(a.as_ref(), b.as_ref()));
}

impl AsRef<Project> for Project {
    fn as_ref(&self) -> &Project {
        self
    }
}

/// Filters then sorts, as the projects page does.
pub fn browse<'a>(projects: &'a [Project], query: &str, order: ProjectSort) -> Vec<&'a Project> {
    let mut found = filter_projects(projects, query);
    found.sort_by(|a, b| order.compare(a, b));
    found
}

// == Language Categories ==

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LanguageCategory {
    #[default]
    All,
    Web,
    Mobile,
    Backend,
}

impl LanguageCategory {
    pub fn matches(self, project: &Project) -> bool {
        let language = project.language.as_deref();
        match self {
            LanguageCategory::All => true,
            LanguageCategory::Web => matches!(language, Some("JavaScript" | "TypeScript")),
            LanguageCategory::Mobile => matches!(language, Some("Java" | "Swift")),
            LanguageCategory::Backend => matches!(language, Some("Python" | "Node.js")),
        }
    }
}

impl FromStr for LanguageCategory {
    type Err = LiveDataError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "all" => Ok(LanguageCategory::All),
            "web" => Ok(LanguageCategory::Web),
            "mobile" => Ok(LanguageCategory::Mobile),
            "backend" => Ok(LanguageCategory::Backend),
            other => Err(LiveDataError::Parse(format!("unknown category: {}", other))),
        }
    }
}

// == Showcase ==

/// Home page split: latest work plus the most starred of the rest.
#[derive(Debug, Clone, Default)]
pub struct Showcase<'a> {
    pub recent: Vec<&'a Project>,
    pub featured: Vec<&'a Project>,
}

impl<'a> Showcase<'a> {
    /// Featured projects in the given language category.
    pub fn featured_in(&self, category: LanguageCategory) -> Vec<&'a Project> {
        self.featured
            .iter()
            .copied()
            .filter(|p| category.matches(p))
            .collect()
    }
}

pub fn showcase(projects: &[Project]) -> Showcase<'_> {
    let mut by_recent: Vec<&Project> = projects.iter().collect();
    sort_projects(&mut by_recent, ProjectSort::Latest);
    by_recent.truncate(RECENT_COUNT);

    let recent_ids: HashSet<u64> = by_recent.iter().map(|p| p.id).collect();
    let mut by_stars: Vec<&Project> = projects
        .iter()
        .filter(|p| !recent_ids.contains(&p.id))
        .collect();
    sort_projects(&mut by_stars, ProjectSort::Stars);
    by_stars.truncate(FEATURED_COUNT);

    Showcase {
        recent: by_recent,
        featured: by_stars,
    }
}
