/// Which markdown headings count as a post's headline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeadlineStyle {
    /// `# Title` only. Lines are trimmed before matching.
    TopLevel,
    /// `# Title` or `## Title`, starting in the first column.
    UpToSecondLevel,
}

/// Returns the first headline in `raw`, or `None` when there is none.
pub fn extract_headline(raw: &str, style: HeadlineStyle) -> Option<String> {
    match style {
        HeadlineStyle::TopLevel => raw
            .lines()
            .find_map(|line| heading_text(line.trim(), &["#"]))
            .filter(|title| !title.is_empty()),
        HeadlineStyle::UpToSecondLevel => raw
            .lines()
            .find_map(|line| heading_text(line, &["##", "#"]))
            .filter(|title| !title.is_empty()),
    }
}

fn heading_text(line: &str, markers: &[&str]) -> Option<String> {
    markers.iter().find_map(|marker| {
        let rest = line.strip_prefix(marker)?;
        if rest.starts_with(char::is_whitespace) {
            Some(rest.trim().to_string())
        } else {
            None
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn top_level_ignores_second_level_and_leading_space() {
        let raw = "intro\n## Minor\n   #   Major news  \n# Later";
        assert_eq!(
            extract_headline(raw, HeadlineStyle::TopLevel).as_deref(),
            Some("Major news")
        );
    }

    #[test]
    fn second_level_requires_first_column() {
        let raw = "  # Indented\n### Too deep\n## Patch notes\n# After";
        assert_eq!(
            extract_headline(raw, HeadlineStyle::UpToSecondLevel).as_deref(),
            Some("Patch notes")
        );
    }

    #[test]
    fn hash_without_space_is_not_a_heading() {
        assert_eq!(extract_headline("#hashtag\n", HeadlineStyle::TopLevel), None);
        assert_eq!(
            extract_headline("#hashtag\n", HeadlineStyle::UpToSecondLevel),
            None
        );
    }

    #[test]
    fn empty_heading_yields_none() {
        assert_eq!(extract_headline("#   \nbody", HeadlineStyle::UpToSecondLevel), None);
    }
}
