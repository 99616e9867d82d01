use crate::Result;
use crate::devops::models::Repository;
use ohno::IntoAppError;
use regex::{Regex, RegexBuilder};

const LOG_TARGET: &str = "    filter";

/// Whether matching repositories are kept or dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterMode {
    Include,
    Exclude,
}

/// The outcome of running one repository name through the filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterDecision<'a> {
    /// Kept, either because a pattern matched in include mode or nothing matched in exclude mode.
    Keep(Option<&'a str>),

    /// Dropped, either because a pattern matched in exclude mode or nothing matched in include mode.
    Drop(Option<&'a str>),
}

impl FilterDecision<'_> {
    #[must_use]
    pub const fn is_keep(&self) -> bool {
        matches!(self, Self::Keep(_))
    }
}

/// Ordered, case-insensitive repository name patterns.
///
/// Patterns are tried in order and the first match decides. A repository no pattern matches is
/// dropped in include mode and kept in exclude mode.
#[derive(Debug, Clone)]
pub struct RepositoryFilter {
    patterns: Vec<Regex>,
    mode: FilterMode,
}

impl RepositoryFilter {
    /// Compile patterns, discarding blank ones.
    ///
    /// A filter left with no patterns matches nothing.
    pub fn new<I, S>(patterns: I, mode: FilterMode) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let patterns = patterns
            .into_iter()
            .map(|p| p.as_ref().trim().to_string())
            .filter(|p| !p.is_empty())
            .map(|p| {
                RegexBuilder::new(&p)
                    .case_insensitive(true)
                    .build()
                    .into_app_err_with(|| format!("invalid repository filter pattern '{p}'"))
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self { patterns, mode })
    }

    /// Compile a comma-separated pattern list.
    pub fn parse(patterns: &str, mode: FilterMode) -> Result<Self> {
        Self::new(patterns.split(','), mode)
    }

    #[must_use]
    pub fn decide(&self, name: &str) -> FilterDecision<'_> {
        let matched = self.patterns.iter().find(|re| re.is_match(name)).map(Regex::as_str);

        match (self.mode, matched) {
            (FilterMode::Include, Some(p)) => FilterDecision::Keep(Some(p)),
            (FilterMode::Include, None) => FilterDecision::Drop(None),
            (FilterMode::Exclude, Some(p)) => FilterDecision::Drop(Some(p)),
            (FilterMode::Exclude, None) => FilterDecision::Keep(None),
        }
    }
}

/// Sort repositories by name and apply the optional filter.
#[must_use]
pub fn filter_repositories(mut repositories: Vec<Repository>, filter: Option<&RepositoryFilter>) -> Vec<Repository> {
    repositories.sort_by(|a, b| {
        a.name
            .to_lowercase()
            .cmp(&b.name.to_lowercase())
            .then_with(|| a.name.cmp(&b.name))
    });

    let Some(filter) = filter else {
        return repositories;
    };

    repositories
        .into_iter()
        .filter(|repo| match filter.decide(&repo.name) {
            FilterDecision::Keep(Some(pattern)) => {
                log::info!(target: LOG_TARGET, "Including {} per filter: {pattern}", repo.name);
                true
            }
            FilterDecision::Keep(None) => true,
            FilterDecision::Drop(Some(pattern)) => {
                log::info!(target: LOG_TARGET, "Removing {} per filter: {pattern}", repo.name);
                false
            }
            FilterDecision::Drop(None) => {
                log::info!(target: LOG_TARGET, "Removing {}: no filter matched", repo.name);
                false
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::devops::models::ProjectReference;

    fn repo(name: &str) -> Repository {
        Repository {
            id: format!("id-{name}"),
            name: name.to_string(),
            default_branch: Some("refs/heads/main".to_string()),
            is_disabled: None,
            project: ProjectReference::default(),
            remote_url: None,
            ssh_url: None,
            url: None,
            web_url: None,
            size: None,
        }
    }

    fn names(repos: &[Repository]) -> Vec<&str> {
        repos.iter().map(|r| r.name.as_str()).collect()
    }

    fn sample() -> Vec<Repository> {
        vec![repo("beta-lib"), repo("alpha-svc")]
    }

    #[test]
    fn test_no_filter_sorts_by_name() {
        let result = filter_repositories(vec![repo("zeta"), repo("Alpha"), repo("beta")], None);
        assert_eq!(names(&result), ["Alpha", "beta", "zeta"]);
    }

    #[test]
    fn test_sort_ignores_case_then_breaks_ties_ordinally() {
        let result = filter_repositories(vec![repo("Zeta"), repo("beta"), repo("alpha"), repo("Alpha")], None);
        assert_eq!(names(&result), ["Alpha", "alpha", "beta", "Zeta"]);
    }

    #[test]
    fn test_exclude_mode_drops_match() {
        let filter = RepositoryFilter::parse("alpha", FilterMode::Exclude).unwrap();
        let result = filter_repositories(sample(), Some(&filter));
        assert_eq!(names(&result), ["beta-lib"]);
    }

    #[test]
    fn test_include_mode_keeps_match() {
        let filter = RepositoryFilter::parse("alpha", FilterMode::Include).unwrap();
        let result = filter_repositories(sample(), Some(&filter));
        assert_eq!(names(&result), ["alpha-svc"]);
    }

    #[test]
    fn test_patterns_are_case_insensitive() {
        let filter = RepositoryFilter::parse("ALPHA", FilterMode::Include).unwrap();
        assert!(filter.decide("alpha-svc").is_keep());
    }

    #[test]
    fn test_first_match_wins() {
        let filter = RepositoryFilter::parse("svc,alpha", FilterMode::Exclude).unwrap();
        assert_eq!(filter.decide("alpha-svc"), FilterDecision::Drop(Some("svc")));
    }

    #[test]
    fn test_no_match_is_asymmetric() {
        let include = RepositoryFilter::parse("gamma", FilterMode::Include).unwrap();
        let exclude = RepositoryFilter::parse("gamma", FilterMode::Exclude).unwrap();

        assert_eq!(include.decide("alpha-svc"), FilterDecision::Drop(None));
        assert_eq!(exclude.decide("alpha-svc"), FilterDecision::Keep(None));

        assert!(filter_repositories(sample(), Some(&include)).is_empty());
        assert_eq!(filter_repositories(sample(), Some(&exclude)).len(), 2);
    }

    #[test]
    fn test_single_match_is_complementary() {
        let include = RepositoryFilter::parse("lib$", FilterMode::Include).unwrap();
        let exclude = RepositoryFilter::parse("lib$", FilterMode::Exclude).unwrap();

        for name in ["alpha-svc", "beta-lib"] {
            assert_ne!(include.decide(name).is_keep(), exclude.decide(name).is_keep(), "{name}");
        }
    }

    #[test]
    fn test_blank_patterns_match_nothing() {
        let include = RepositoryFilter::parse(" , ,", FilterMode::Include).unwrap();
        let exclude = RepositoryFilter::parse("", FilterMode::Exclude).unwrap();

        assert!(filter_repositories(sample(), Some(&include)).is_empty());
        assert_eq!(names(&filter_repositories(sample(), Some(&exclude))), ["alpha-svc", "beta-lib"]);
    }

    #[test]
    fn test_invalid_pattern_is_an_error() {
        let err = RepositoryFilter::parse("alpha,(unclosed", FilterMode::Include).unwrap_err();
        assert!(format!("{err:#}").contains("(unclosed"));
    }

    #[test]
    fn test_filter_is_idempotent() {
        let filter = RepositoryFilter::parse("^a,^b", FilterMode::Include).unwrap();
        let input = vec![repo("c-tool"), repo("b-two"), repo("a-one"), repo("b-one")];

        let once = filter_repositories(input, Some(&filter));
        let twice = filter_repositories(once.clone(), Some(&filter));

        assert_eq!(names(&once), ["a-one", "b-one", "b-two"]);
        assert_eq!(names(&once), names(&twice));
    }
}
