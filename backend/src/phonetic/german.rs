//! German phonetic normalization.
//!
//! Rewrites a raw name into a lowercase surface form where spelling variants
//! of the same pronunciation coincide (`Meyer`, `Maier`, `Mayer` → `meier`).
//!
//! The rules in [`GERMAN_RULES`] run in a fixed order. `sch` and `ch` are
//! swapped for reserved private-use characters while the `c` rules run, and
//! restored by the last two rules. Those reserved characters are removed from
//! the input before anything else, so every guard in the output comes from a
//! real digraph.
//!
//! Non-letter characters pass through untouched; the encoder filters them.

use super::rules::Context::*;
use super::rules::{apply_rules, trace_rules, RewriteRule, TraceStep};

/// Stands in for `sch` between protection and restoration.
pub const SCH_GUARD: char = '\u{E000}';
/// Stands in for `ch` between protection and restoration.
pub const CH_GUARD: char = '\u{E001}';

const SCH_GUARD_STR: &str = "\u{E000}";
const CH_GUARD_STR: &str = "\u{E001}";

/// Letters after which `ch`/`c` sounds soft.
const SOFT: &[char] = &['e', 'i', 'ä', 'ö', 'ü', 'y'];
/// Letters after which `ch`/`c` sounds hard.
const HARD: &[char] = &['a', 'o', 'u', 'l', 'r'];
const VOWELS: &[char] = &['a', 'e', 'i', 'o', 'u', 'y'];

/// Ordered rule table. Order is load-bearing.
pub const GERMAN_RULES: &[RewriteRule] = &[
    // umlauts and eszett
    RewriteRule::literal("ä → ae", &["ä"], "ae", Anywhere),
    RewriteRule::literal("ö → oe", &["ö"], "oe", Anywhere),
    RewriteRule::literal("ü → ue", &["ü"], "ue", Anywhere),
    RewriteRule::literal("ß → ss", &["ß"], "ss", Anywhere),
    RewriteRule::literal("ph → f", &["ph"], "f", Anywhere),
    RewriteRule::literal("th → t", &["th"], "t", Anywhere),
    // initial ch
    RewriteRule::literal("^ch (soft) → sch", &["ch"], "sch", InitialBefore(SOFT)),
    RewriteRule::literal("^ch (hard) → k", &["ch"], "k", InitialBefore(HARD)),
    RewriteRule::literal("protect sch", &["sch"], SCH_GUARD_STR, Anywhere),
    RewriteRule::literal("^st → scht", &["st"], "scht", Initial),
    RewriteRule::literal("^sp → schp", &["sp"], "schp", Initial),
    RewriteRule::literal("protect ch", &["ch"], CH_GUARD_STR, Anywhere),
    RewriteRule::literal("qu → kw", &["qu"], "kw", Anywhere),
    // c
    RewriteRule::literal("^c (hard) → k", &["c"], "k", InitialBefore(HARD)),
    RewriteRule::literal("^c (soft) → z", &["c"], "z", InitialBefore(SOFT)),
    RewriteRule::literal(
        "c (hard) → k",
        &["c"],
        "k",
        Interior {
            followed_by: HARD,
            unless_after: 's',
        },
    ),
    RewriteRule::literal(
        "c (soft) → z",
        &["c"],
        "z",
        Interior {
            followed_by: SOFT,
            unless_after: 's',
        },
    ),
    // consonant shifts; v → f must run before w → v
    RewriteRule::literal("v → f", &["v"], "f", Anywhere),
    RewriteRule::literal("w → v", &["w"], "v", Anywhere),
    RewriteRule::literal("z → ts", &["z"], "ts", Anywhere),
    RewriteRule::literal("y → i", &["y"], "i", Anywhere),
    RewriteRule::literal("ck → k", &["ck"], "k", Anywhere),
    RewriteRule::literal("-ig → -ich", &["ig"], "ich", Final),
    RewriteRule::literal("^s (vowel) → z", &["s"], "z", InitialBefore(VOWELS)),
    // diphthongs
    RewriteRule::literal("ai|ey|ay → ei", &["ai", "ey", "ay"], "ei", Anywhere),
    RewriteRule::literal(
        "eu|äu|euy|uy|ui → eu",
        &["eu", "äu", "euy", "uy", "ui"],
        "eu",
        Anywhere,
    ),
    RewriteRule::literal("restore sch", &[SCH_GUARD_STR], "sch", Anywhere),
    RewriteRule::literal("restore ch", &[CH_GUARD_STR], "ch", Anywhere),
];

fn is_guard(c: char) -> bool {
    c == SCH_GUARD || c == CH_GUARD
}

/// Lowercase `word` and drop reserved guard characters.
fn prepare(word: &str) -> String {
    word.chars()
        .filter(|c| !is_guard(*c))
        .collect::<String>()
        .to_lowercase()
}

/// Normalize a raw word into its German phonetic surface form.
///
/// Total for every input; never contains a guard character.
///
/// ```
/// use soundex_csv::phonetic::normalize;
///
/// assert_eq!(normalize("Meyer"), "meier");
/// assert_eq!(normalize("Stefan"), "schtefan");
/// ```
pub fn normalize(word: &str) -> String {
    apply_rules(&prepare(word), GERMAN_RULES)
}

/// Normalize and return every step that changed the word.
///
/// The first step, when present, is the lowercasing.
pub fn normalize_trace(word: &str) -> (String, Vec<TraceStep>) {
    let prepared = prepare(word);
    let mut steps = Vec::new();
    if prepared != word {
        steps.push(TraceStep {
            rule: "lowercase",
            before: word.to_string(),
            after: prepared.clone(),
        });
    }

    let (normalized, rule_steps) = trace_rules(&prepared, GERMAN_RULES);
    steps.extend(rule_steps);
    (normalized, steps)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn no_guards(s: &str) -> bool {
        !s.chars().any(is_guard)
    }

    #[test]
    fn test_trace_agrees_with_normalize() {
        for word in ["Schmidt", "Christoph", "Jörg", "Graf von Bülow", "\u{E000}ch"] {
            assert_eq!(normalize_trace(word).0, normalize(word));
        }
    }

    #[test]
    fn test_umlauts_and_eszett() {
        assert_eq!(normalize("Müller"), "mueller");
        assert_eq!(normalize("Weiß"), "veiss");
        assert_eq!(normalize("Ölmüller"), "oelmueller");
    }

    #[test]
    fn test_spelling_variants_converge() {
        for name in ["Meyer", "Maier", "Mayer", "Meier"] {
            assert_eq!(normalize(name), "meier", "{}", name);
        }
        assert_eq!(normalize("König"), normalize("Koenig"));
        assert_eq!(normalize("Vogel"), normalize("Fogel"));
    }

    #[test]
    fn test_initial_ch() {
        assert_eq!(normalize("Chemnitz"), "schemnitts");
        assert_eq!(normalize("Chor"), "kor");
        assert_eq!(normalize("Christoph"), "kristof");
        assert_eq!(normalize("Chlodwig"), "klodvich");
    }

    #[test]
    fn test_initial_clusters() {
        assert_eq!(normalize("Stefan"), "schtefan");
        assert_eq!(normalize("Spitzer"), "schpittser");
        assert_eq!(normalize("Straße"), "schtrasse");
    }

    #[test]
    fn test_sch_and_ch_survive_c_rules() {
        assert_eq!(normalize("Schmidt"), "schmidt");
        assert_eq!(normalize("Fuchs"), "fuchs");
        assert_eq!(normalize("Lüdenscheid"), "luedenscheid");
    }

    #[test]
    fn test_c_rules() {
        assert_eq!(normalize("Carl"), "karl");
        assert_eq!(normalize("Cäsar"), "kaesar");
        assert_eq!(normalize("Marcel"), "martsel");
        assert_eq!(normalize("Lucia"), "lutsia");
        assert_eq!(normalize("Becker"), "beker");
    }

    #[test]
    fn test_interior_c_characterization() {
        // non-overlapping windows: the second c keeps its spelling
        assert_eq!(normalize("acaca"), "akaca");
        assert_eq!(normalize("Francesca"), "frantsesca");
        assert_eq!(normalize("Ccr"), "kr");
    }

    #[test]
    fn test_consonant_shift_order() {
        assert_eq!(normalize("Wolf"), "volf");
        assert_eq!(normalize("Wagner"), "vagner");
        assert_eq!(normalize("Graf von Bülow"), "graf fon buelov");
    }

    #[test]
    fn test_suffix_and_initial_s() {
        assert_eq!(normalize("Ludwig"), "ludvich");
        assert_eq!(normalize("Seidel"), "zeidel");
        assert_eq!(normalize("Sepp"), "zepp");
    }

    #[test]
    fn test_diphthongs() {
        assert_eq!(normalize("Huy"), "heu");
        assert_eq!(normalize("Häuser"), "haeuser");
        assert_eq!(normalize("Schnyder"), "schnider");
    }

    #[test]
    fn test_total_on_odd_input() {
        for input in ["", "   ", "---", "12345", "O'Brien", "日本語", "\u{E000}ch\u{E001}"] {
            let out = normalize(input);
            assert!(no_guards(&out), "{:?} -> {:?}", input, out);
        }
        assert_eq!(normalize("O'Brien"), "o'brien");
        assert_eq!(normalize("\u{E000}Bach"), "bach");
    }

    #[test]
    fn test_trace_names_steps() {
        let (out, steps) = normalize_trace("Philipp");
        assert_eq!(out, "filipp");
        assert_eq!(steps[0].rule, "lowercase");
        assert!(steps.iter().any(|s| s.rule == "ph → f"));
    }
}
