use std::path::Path;

/// Extension a file must carry to be treated as a template
pub const TEMPLATE_EXTENSION: &str = "md";

/// Derive the template identifier from a file name.
///
/// Returns `None` for names that are not templates: other extensions,
/// hidden files, and names that are not valid UTF-8.
pub fn template_identifier(path: &Path) -> Option<String> {
    if path.extension().and_then(|s| s.to_str()) != Some(TEMPLATE_EXTENSION) {
        return None;
    }
    let stem = path.file_stem().and_then(|s| s.to_str())?;
    if stem.is_empty() || stem.starts_with('.') {
        return None;
    }
    Some(stem.to_string())
}

/// First ATX heading of a Markdown document, outside fenced and indented
/// code blocks.
pub fn extract_title(body: &str) -> Option<String> {
    let mut in_fence = false;

    for line in body.lines() {
        let trimmed = line.trim_start_matches(' ');
        // Four columns of indentation make an indented code block
        if line.len() - trimmed.len() > 3 || trimmed.starts_with('\t') {
            continue;
        }

        if trimmed.starts_with("```") || trimmed.starts_with("~~~") {
            in_fence = !in_fence;
            continue;
        }
        if in_fence || !trimmed.starts_with('#') {
            continue;
        }

        let level = trimmed.chars().take_while(|c| *c == '#').count();
        let rest = &trimmed[level..];
        // "#hashtag" is not a heading; "#" alone is an empty one.
        if level > 6 || !(rest.is_empty() || rest.starts_with(char::is_whitespace)) {
            continue;
        }

        let text = rest.trim().trim_end_matches('#').trim_end();
        if !text.is_empty() {
            return Some(text.to_string());
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identifier_from_file_name() {
        assert_eq!(
            template_identifier(Path::new("/t/bugfix.md")),
            Some("bugfix".to_string())
        );
        assert_eq!(
            template_identifier(Path::new("Feature-Request.md")),
            Some("Feature-Request".to_string())
        );
        assert_eq!(template_identifier(Path::new("notes.txt")), None);
        assert_eq!(template_identifier(Path::new("README.MD")), None);
        assert_eq!(template_identifier(Path::new(".draft.md")), None);
        assert_eq!(template_identifier(Path::new("noext")), None);
    }

    #[test]
    fn test_title_first_heading() {
        let body = "Intro text\n\n# Bug Fix: [Brief Description]\n\n## Summary\n";
        assert_eq!(
            extract_title(body),
            Some("Bug Fix: [Brief Description]".to_string())
        );
    }

    #[test]
    fn test_title_strips_closing_hashes() {
        assert_eq!(extract_title("## Feature ##\n"), Some("Feature".to_string()));
    }

    #[test]
    fn test_title_skips_code_fences_and_hashtags() {
        let body = "```sh\n# not a heading\n```\n#hashtag\n### Real Title\n";
        assert_eq!(extract_title(body), Some("Real Title".to_string()));
    }

    #[test]
    fn test_title_missing() {
        assert_eq!(extract_title("no headings here\n- [ ] item\n"), None);
        assert_eq!(extract_title("#\n"), None);
    }

    #[test]
    fn test_title_ignores_indented_code() {
        assert_eq!(
            extract_title("    # not a title\n   # Real\n"),
            Some("Real".to_string())
        );
        assert_eq!(extract_title("\t# tabbed\n"), None);
    }
}
