use crate::error::{FilterError, Result};
use tracing_subscriber::EnvFilter;

const DEFAULT_LEVEL: &str = "ownerfi_filter=info,ownerfi_common=warn";
const VERBOSE_LEVEL: &str = "ownerfi_filter=debug,ownerfi_common=debug";

/// Install the global subscriber. `RUST_LOG` wins over `verbose`.
///
/// Logs go to stderr so `classify` output stays pipeable.
pub fn init(verbose: bool) -> Result<()> {
    let env_filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(default_directives(verbose))
            .map_err(|e| FilterError::Config(format!("invalid log filter: {}", e)))?,
    };

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .try_init()
        .map_err(|e| FilterError::Config(format!("logging already initialized: {}", e)))
}

fn default_directives(verbose: bool) -> &'static str {
    if verbose {
        VERBOSE_LEVEL
    } else {
        DEFAULT_LEVEL
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_directives_parse() {
        assert!(EnvFilter::try_new(default_directives(false)).is_ok());
        assert!(EnvFilter::try_new(default_directives(true)).is_ok());
    }
}
