//! One-button landing page pointing at the explorer dashboard.

use std::path::Path;

use crate::error::{NetworkError, Result};

pub const DASHBOARD_TITLE: &str = "Animated Policy Explorer";
pub const BUTTON_LABEL: &str = "View Dashboard";
pub const LINK_TEXT: &str = "Click here to open the funding explorer";
pub const DASHBOARD_URL: &str = "http://localhost:8501";

/// The hyperlink emitted when the button is pressed, as markdown.
pub fn dashboard_link() -> String {
    format!("[{LINK_TEXT}]({DASHBOARD_URL})")
}

pub fn landing_page() -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>{DASHBOARD_TITLE}</title>
</head>
<body>
<h1>{DASHBOARD_TITLE}</h1>
<button type="button" onclick="document.getElementById('dashboard-link').hidden = false">{BUTTON_LABEL}</button>
<p id="dashboard-link" hidden><a href="{DASHBOARD_URL}">{LINK_TEXT}</a></p>
</body>
</html>
"#
    )
}

pub fn write_landing_page(path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    std::fs::write(path, landing_page()).map_err(|e| NetworkError::io(path, e))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dashboard_link() {
        assert_eq!(
            dashboard_link(),
            "[Click here to open the funding explorer](http://localhost:8501)"
        );
    }

    #[test]
    fn test_landing_page() {
        let page = landing_page();
        assert!(page.contains("<h1>Animated Policy Explorer</h1>"));
        assert!(page.contains(">View Dashboard</button>"));
        assert!(page.contains("href=\"http://localhost:8501\""));
        assert!(page.contains("hidden>"));
    }
}
