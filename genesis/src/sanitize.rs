//! Response sanitation for generated artifacts.
//!
//! Generation backends frequently wrap document output in Markdown code
//! fences even when told not to. This module is the single home for
//! fence-stripping; both the pipeline's ui stage and the single-shot
//! generation path go through [`sanitize`].

/// Strips code-fence wrapping from generated text.
///
/// Removes a leading fence line (three backticks plus an optional language
/// tag) and a trailing line that is exactly three backticks, repeating until
/// the text is stable, then trims surrounding whitespace. Idempotent:
/// `sanitize(sanitize(x)) == sanitize(x)` for every input.
///
/// ```
/// use genesis_engine::sanitize::sanitize;
///
/// assert_eq!(sanitize("```html\n<p>a</p>\n```"), "<p>a</p>");
/// assert_eq!(sanitize("no fences"), "no fences");
/// ```
#[must_use]
pub fn sanitize(text: &str) -> String {
    let mut current = text.trim().to_string();
    loop {
        let stripped = strip_outer_fences(&current);
        if stripped == current {
            return current;
        }
        current = stripped;
    }
}

fn strip_outer_fences(text: &str) -> String {
    let mut lines: Vec<&str> = text.lines().collect();

    if lines.first().is_some_and(|line| is_opening_fence(line)) {
        lines.remove(0);
    }
    if lines.last().is_some_and(|line| *line == "```") {
        lines.pop();
    }

    lines.join("\n").trim().to_string()
}

/// An opening fence is three backticks followed by nothing or a language tag.
fn is_opening_fence(line: &str) -> bool {
    line.strip_prefix("```").is_some_and(|tag| {
        tag.chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '+' | '.'))
    })
}
