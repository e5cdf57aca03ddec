// Output formatting and styling

use std::io::IsTerminal;

use colored::Colorize;

/// Output styling configuration
pub struct OutputStyle {
    pub use_colors: bool,
}

impl Default for OutputStyle {
    fn default() -> Self {
        Self {
            use_colors: std::io::stdout().is_terminal(),
        }
    }
}

impl OutputStyle {
    pub fn plain() -> Self {
        Self { use_colors: false }
    }

    /// Format success message
    pub fn success(&self, msg: &str) -> String {
        if self.use_colors {
            format!("{} {}", "✓".green().bold(), msg)
        } else {
            format!("✓ {}", msg)
        }
    }

    /// Format error message
    pub fn error(&self, msg: &str) -> String {
        if self.use_colors {
            format!("{} {}", "✗".red().bold(), msg)
        } else {
            format!("✗ {}", msg)
        }
    }

    /// Format warning message
    pub fn warning(&self, msg: &str) -> String {
        if self.use_colors {
            format!("{} {}", "⚠".yellow(), msg)
        } else {
            format!("⚠ {}", msg)
        }
    }

    /// Format info message
    pub fn info(&self, msg: &str) -> String {
        if self.use_colors {
            format!("{} {}", "ℹ".blue(), msg)
        } else {
            format!("ℹ {}", msg)
        }
    }

    /// Format header
    pub fn header(&self, title: &str) -> String {
        if self.use_colors {
            title.bold().underline().to_string()
        } else {
            title.to_string()
        }
    }

    /// Format a `key: value` line
    pub fn key_value(&self, key: &str, value: &str) -> String {
        if self.use_colors {
            format!("{}: {}", key.bold(), value)
        } else {
            format!("{}: {}", key, value)
        }
    }
}

/// Print an error to stderr
pub fn print_error(msg: &str) {
    let style = OutputStyle {
        use_colors: std::io::stderr().is_terminal(),
    };
    eprintln!("{}", style.error(msg));
}

/// Print a success message to stderr
pub fn print_success(msg: &str) {
    let style = OutputStyle {
        use_colors: std::io::stderr().is_terminal(),
    };
    eprintln!("{}", style.success(msg));
}

/// Print a warning to stderr
pub fn print_warning(msg: &str) {
    let style = OutputStyle {
        use_colors: std::io::stderr().is_terminal(),
    };
    eprintln!("{}", style.warning(msg));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_formatting() {
        let style = OutputStyle::plain();
        assert_eq!(style.success("done"), "✓ done");
        assert_eq!(style.error("failed"), "✗ failed");
        assert_eq!(style.warning("careful"), "⚠ careful");
        assert_eq!(style.info("note"), "ℹ note");
        assert_eq!(style.key_value("Owner", "octo"), "Owner: octo");
    }

    #[test]
    fn test_colored_keeps_message() {
        let style = OutputStyle { use_colors: true };
        assert!(style.success("done").contains("done"));
        assert!(style.header("Title").contains("Title"));
    }
}
