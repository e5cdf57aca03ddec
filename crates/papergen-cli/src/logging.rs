// Logging and verbosity control

use tracing_subscriber::EnvFilter;

/// Verbosity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum VerbosityLevel {
    /// Quiet mode - errors only
    Quiet,
    /// Normal mode - warnings and progress
    Normal,
    /// Verbose mode - debug output
    Verbose,
}

impl VerbosityLevel {
    pub fn from_flags(verbose: bool, quiet: bool) -> Self {
        if quiet {
            VerbosityLevel::Quiet
        } else if verbose {
            VerbosityLevel::Verbose
        } else {
            VerbosityLevel::Normal
        }
    }

    /// Default filter directive for this level
    pub fn directive(&self) -> &'static str {
        match self {
            VerbosityLevel::Quiet => "error",
            VerbosityLevel::Normal => "warn,papergen=info",
            VerbosityLevel::Verbose => "debug,hyper=info,reqwest=info",
        }
    }
}

/// Initialize logging based on CLI flags
///
/// `RUST_LOG` takes precedence over the flags. Logs go to stderr so the
/// generated paper can be piped from stdout.
pub fn init_logging(verbose: bool, quiet: bool) {
    let level = VerbosityLevel::from_flags(verbose, quiet);
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level.directive()));

    // Already installed when called twice (tests)
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(level == VerbosityLevel::Verbose)
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_flags() {
        assert_eq!(VerbosityLevel::from_flags(false, false), VerbosityLevel::Normal);
        assert_eq!(VerbosityLevel::from_flags(true, false), VerbosityLevel::Verbose);
        // Quiet wins
        assert_eq!(VerbosityLevel::from_flags(true, true), VerbosityLevel::Quiet);
    }

    #[test]
    fn test_directives_parse() {
        for level in [
            VerbosityLevel::Quiet,
            VerbosityLevel::Normal,
            VerbosityLevel::Verbose,
        ] {
            assert!(EnvFilter::try_new(level.directive()).is_ok());
        }
    }

    #[test]
    fn test_init_logging_twice() {
        init_logging(false, true);
        init_logging(true, false);
    }
}
