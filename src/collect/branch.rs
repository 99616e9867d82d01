const HEADS_PREFIX: &str = "refs/heads/";

/// How a branch is spelled in a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefForm {
    /// `main`, as the commits endpoint expects.
    Short,

    /// `refs/heads/main`, as the pushes and pull request endpoints expect.
    Full,
}

/// Pick the branch to collect for a repository.
///
/// An explicit override wins over the repository's default branch, and the result is normalized
/// to the requested form.
#[must_use]
pub fn resolve_branch(override_branch: Option<&str>, default_branch: &str, form: RefForm) -> String {
    let branch = override_branch.map_or(default_branch, str::trim);

    match form {
        RefForm::Short => branch.strip_prefix(HEADS_PREFIX).unwrap_or(branch).to_string(),
        RefForm::Full if branch.starts_with("refs/") => branch.to_string(),
        RefForm::Full => format!("{HEADS_PREFIX}{branch}"),
    }
}
