use std::sync::LazyLock;

use regex::Regex;

static UNSAFE_CHARS_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[^A-Za-z0-9_.\s-]").expect("unsafe chars regex must compile")
});

static SEPARATOR_RUN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[-\s]+").expect("separator regex must compile"));

/// turns an arbitrary title into a filesystem-safe name.
///
/// drops everything outside ascii alphanumerics, `_`, `.`, whitespace and `-`,
/// folds whitespace/hyphen runs into a single `.` and trims `_`/`-` from both
/// ends. the output is a fixed point: `slugify(slugify(x)) == slugify(x)`.
pub fn slugify(value: &str) -> String {
    let kept = UNSAFE_CHARS_RE.replace_all(value, "");
    let dotted = SEPARATOR_RUN_RE.replace_all(&kept, ".");
    dotted.trim_matches(['-', '_']).to_string()
}

#[cfg(test)]
mod tests {
    use super::slugify;

    #[test]
    fn strips_punctuation_and_dots_spaces() {
        assert_eq!(slugify("Hello, World!"), "Hello.World");
    }

    #[test]
    fn collapses_mixed_separator_runs() {
        assert_eq!(slugify("Episode  1 - The Start"), "Episode.1.The.Start");
    }

    #[test]
    fn trims_underscores_and_hyphens() {
        assert_eq!(slugify("__My_Show__"), "My_Show");
        assert_eq!(slugify("-lead"), "lead");
    }

    #[test]
    fn drops_non_ascii() {
        assert_eq!(slugify("Love 爱 Story"), "Love.Story");
        assert_eq!(slugify("爱情"), "");
    }

    #[test]
    fn is_idempotent() {
        let inputs = [
            "Hello, World!",
            "  spaced  out  ",
            "_ x",
            "a_ ",
            "Ep.01 - Pilot (Uncut)",
            "--__--",
            "The Journey: Part 2/3",
        ];

        for input in inputs {
            let once = slugify(input);
            assert_eq!(slugify(&once), once, "input: {input:?}");
        }
    }
}
