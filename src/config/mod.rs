//! Run configuration resolved from arguments, git remotes and hub config.
//!
//! Precedence, highest first:
//!
//! - owner and repo: arguments, then the git remote
//! - token: `--token` / `GITHUB_TOKEN`, hub `oauth_token`
//!
//! A remote only fills in the repository name for an explicit owner when
//! it belongs to that owner. Discovery failures are logged and treated as
//! "no default"; only a missing or mismatched repository ends the run.

pub mod hub;
pub mod remote;

use std::collections::BTreeSet;
use std::path::PathBuf;

use reqwest::Url;
use tracing::{debug, warn};

use crate::cli::Cli;
use crate::context::ServiceContext;
use crate::endpoints::{self, DEFAULT_API_URL};
use crate::error::LockifyError;
use crate::filter::{days, FilterCriteria};
use crate::model::{Credential, LockReason};

use self::hub::HubConfig;
use self::remote::{infer_slug, RepoSlug};

/// Everything a lock run needs, fully resolved.
#[derive(Debug, Clone)]
pub struct RunConfig {
    /// API root all endpoints are built under.
    pub api_base: Url,
    /// Repository owner.
    pub owner: String,
    /// Repository name.
    pub repo: String,
    /// Token sent with every call, if any.
    pub credential: Option<Credential>,
    /// Which closed issues qualify.
    pub criteria: FilterCriteria,
    /// Reason sent with each lock call.
    pub lock_reason: LockReason,
    /// Whether locking was requested rather than a dry run.
    pub commit: bool,
}

/// The web host matching an API root: `github.com` for the public API,
/// otherwise the API's own host.
#[must_use]
pub fn web_host(api_base: &Url) -> String {
    match api_base.host_str() {
        Some("api.github.com") | None => "github.com".to_string(),
        Some(host) => host.to_string(),
    }
}

/// Turns parsed arguments into a [`RunConfig`].
pub struct Resolver<'a> {
    ctx: &'a ServiceContext,
    hub_path: Option<PathBuf>,
}

impl<'a> Resolver<'a> {
    /// Creates a resolver reading hub config from its usual location.
    #[must_use]
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx, hub_path: hub::default_path() }
    }

    /// Overrides where hub config is read from; `None` disables it.
    #[must_use]
    pub fn with_hub_path(mut self, path: Option<PathBuf>) -> Self {
        self.hub_path = path;
        self
    }

    fn remote_slug(&self, host: &str) -> Option<RepoSlug> {
        match self.ctx.git.remotes() {
            Ok(remotes) => {
                let slug = infer_slug(&remotes, host);
                if slug.is_none() {
                    debug!(host, remotes = remotes.len(), "no git remote points at host");
                }
                slug
            }
            Err(err) => {
                warn!("could not read git remotes: {err}");
                None
            }
        }
    }

    fn hub_config(&self) -> Option<HubConfig> {
        let path = self.hub_path.as_deref()?;
        match HubConfig::load(self.ctx.fs.as_ref(), path) {
            Ok(config) => config,
            Err(err) => {
                warn!("{err}");
                None
            }
        }
    }

    /// Fills a missing owner or repository from the git remote.
    ///
    /// The remote's repository name is only borrowed for an owner given on
    /// the command line when the remote belongs to that same owner.
    fn complete_from_remote(
        &self,
        host: &str,
        owner: Option<String>,
        repo: Option<String>,
    ) -> Result<(String, String), LockifyError> {
        let Some(slug) = self.remote_slug(host) else {
            return Err(match owner {
                None => LockifyError::Usage(
                    "no repository given and none could be inferred from git remotes".to_string(),
                ),
                Some(owner) => LockifyError::Usage(format!(
                    "no repository name given for owner {owner:?} and none could be inferred from git remotes"
                )),
            });
        };
        debug!(owner = %slug.owner, repo = %slug.repo, "inferred repository from git remote");

        match (owner, repo) {
            (Some(owner), _) if !owner.eq_ignore_ascii_case(&slug.owner) => Err(LockifyError::Usage(format!(
                "owner {owner:?} does not match the git remote {}/{}; pass the repository name too",
                slug.owner, slug.repo
            ))),
            (owner, repo) => Ok((owner.unwrap_or(slug.owner), repo.unwrap_or(slug.repo))),
        }
    }

    /// Resolves the run configuration.
    ///
    /// Git remotes are only consulted when owner or repository is missing,
    /// and hub config only when no token was given.
    ///
    /// # Errors
    ///
    /// Returns [`LockifyError::InvalidApiUrl`] for a bad `--api-url` and
    /// [`LockifyError::Usage`] when owner or repository cannot be determined
    /// or an explicit owner disagrees with the git remote.
    pub fn resolve(&self, cli: &Cli) -> Result<RunConfig, LockifyError> {
        let api_base = endpoints::parse_api_base(&cli.api_url)?;
        let host = web_host(&api_base);
        if cli.api_url != DEFAULT_API_URL {
            debug!(%api_base, host, "using custom API root");
        }

        let non_empty = |value: &Option<String>| value.clone().filter(|v| !v.is_empty());
        let mut owner = non_empty(&cli.owner);
        let mut repo = non_empty(&cli.repo);
        if repo.is_none() {
            if let Some(slug) = owner.as_deref().filter(|o| o.contains('/')).and_then(RepoSlug::parse) {
                owner = Some(slug.owner);
                repo = Some(slug.repo);
            }
        }

        let (owner, repo) = match (owner, repo) {
            (Some(owner), Some(repo)) => (owner, repo),
            (owner, repo) => self.complete_from_remote(&host, owner, repo)?,
        };

        let mut token = non_empty(&cli.token);
        if token.is_none() {
            if let Some(hub) = self.hub_config() {
                token = hub.token(&host).map(str::to_string);
            }
        }

        Ok(RunConfig {
            api_base,
            owner,
            repo,
            credential: token.map(Credential::new),
            criteria: criteria_from(cli),
            lock_reason: cli.lock_reason,
            commit: cli.do_it,
        })
    }
}

fn criteria_from(cli: &Cli) -> FilterCriteria {
    FilterCriteria {
        updated_age_min: cli.updated_age.map(days),
        closed_age_min: cli.closed_age.map(days),
        created_age_min: cli.created_age.map(days),
        labels: cli.labels.iter().filter(|l| !l.is_empty()).cloned().collect::<BTreeSet<_>>(),
        assignee: cli.assignee.clone(),
        creator: cli.creator.clone().filter(|c| !c.is_empty()),
    }
}
