use crate::core::{
    config::RevlocConfig,
    error::{Result, RevlocError},
    git::GitBackend,
    locator::{Locator, LocatorScheme},
    print_field,
    revision_uri::RevisionUri,
};

const LABEL_WIDTH: usize = 12;

pub fn execute_decode(input: &str) -> Result<()> {
    let config = RevlocConfig::load_or_default()?;
    let backend = GitBackend::new();

    let locator = Locator::parse(input)?;
    let mut uri = RevisionUri::from_locator(&locator, &backend)?;
    if uri.scheme() == LocatorScheme::Plain {
        uri = match uri.clone().resolve_repo_path(&backend) {
            Ok(resolved) => resolved,
            Err(RevlocError::RepositoryNotFound { path }) => {
                log::debug!("No repository contains {path}");
                uri
            }
            Err(e) => return Err(e),
        };
    }

    print_field("Scheme", locator.scheme(), LABEL_WIDTH);
    print_field("Path", uri.path(), LABEL_WIDTH);
    print_field("Repository", uri.repo_path().unwrap_or("-"), LABEL_WIDTH);
    print_field(
        "Revision",
        uri.sha().unwrap_or("working copy"),
        LABEL_WIDTH,
    );
    print_field(
        "Display",
        &uri.formatted_path(Some(&config.path_separator), None),
        LABEL_WIDTH,
    );
    Ok(())
}
