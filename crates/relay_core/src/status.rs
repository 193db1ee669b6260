/// Service state shown in the status embed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServiceState {
    Online,
    Maintenance,
    Down,
}

impl ServiceState {
    /// Embed color as a decimal RGB value.
    pub fn color(self) -> u32 {
        match self {
            ServiceState::Online => 0x2ECC71,
            ServiceState::Maintenance => 0x3498DB,
            ServiceState::Down => 0xE74C3C,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusReport {
    pub state: ServiceState,
    pub text: String,
}

/// Classifies a status page by the phrases it contains.
pub fn classify_status_page(html: &str) -> StatusReport {
    if html.contains("Ongoing maintenance") {
        StatusReport {
            state: ServiceState::Maintenance,
            text: "We are currently undergoing maintenance.".to_string(),
        }
    } else if html.contains("All services are online") {
        StatusReport {
            state: ServiceState::Online,
            text: "All services are online.".to_string(),
        }
    } else {
        StatusReport {
            state: ServiceState::Down,
            text: "Some services may be down or the status page changed.".to_string(),
        }
    }
}

/// Report used when the status page itself could not be fetched.
pub fn unreachable_report(error: &str) -> StatusReport {
    StatusReport {
        state: ServiceState::Down,
        text: format!("Error fetching status page: {error}"),
    }
}

/// Embed description: status text plus a link to the full page.
pub fn status_description(report: &StatusReport, status_url: &str) -> String {
    format!(
        "{}\n\n[Click here for full status details]({status_url})",
        report.text
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maintenance_wins_over_online() {
        let report = classify_status_page("All services are online. Ongoing maintenance");
        assert_eq!(report.state, ServiceState::Maintenance);
        assert_eq!(report.state.color(), 0x3498DB);
    }

    #[test]
    fn unknown_page_is_down() {
        let report = classify_status_page("<html>502</html>");
        assert_eq!(report.state, ServiceState::Down);
        assert!(status_description(&report, "https://s").ends_with("(https://s)"));
    }
}
