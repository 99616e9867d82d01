use crate::Result;
use core::fmt::{Display, Formatter};
use ohno::{IntoAppError, bail};
use percent_encoding::percent_decode_str;
use url::Url;

/// A project URL such as `https://dev.azure.com/contoso/Fabrikam`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ProjectRef {
    url: Box<str>,
    name: Box<str>,
}

impl ProjectRef {
    pub fn parse(text: &str) -> Result<Self> {
        let text = text.trim();
        let url = Url::parse(text).into_app_err_with(|| format!("invalid project URL '{text}'"))?;

        if url.cannot_be_a_base() {
            bail!("invalid project URL '{text}': not a hierarchical URL");
        }

        let Some(last) = url.path_segments().and_then(|segments| segments.filter(|s| !s.is_empty()).last()) else {
            bail!("invalid project URL '{text}': no project name in path");
        };

        let name = percent_decode_str(last)
            .decode_utf8()
            .into_app_err_with(|| format!("invalid project URL '{text}': project name is not UTF-8"))?;

        Ok(Self {
            url: Box::from(text.trim_end_matches('/')),
            name: Box::from(name.as_ref()),
        })
    }

    /// Parse a comma-separated list of project URLs, ignoring blank entries.
    pub fn parse_list(text: &str) -> Result<Vec<Self>> {
        let projects: Vec<_> = text
            .split(',')
            .filter(|s| !s.trim().is_empty())
            .map(Self::parse)
            .collect::<Result<_>>()?;

        if projects.is_empty() {
            bail!("no project URL given");
        }

        Ok(projects)
    }

    /// The URL as given, without a trailing slash.
    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }

    /// The project name, taken from the last path segment.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl Display for ProjectRef {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", self.url)
    }
}
