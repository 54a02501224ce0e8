//! Rewrite-rule interpreter.
//!
//! A [`RewriteRule`] is a literal pattern (or an ordered list of alternative
//! patterns), a replacement, and a [`Context`] restricting where the pattern
//! may match. Rules are pure string-to-string functions; a rule set is applied
//! strictly in order, each rule seeing the full output of the previous one.
//!
//! ```text
//! "chor" --InitialBefore(aoulr)--> "kor"
//! "akac" --Interior{c before e,i..}--> unchanged (no following vowel)
//! ```

/// Where a rule is allowed to match.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Context {
    /// Every non-overlapping occurrence, scanning left to right.
    Anywhere,
    /// Only at the start of the word.
    Initial,
    /// Only at the end of the word.
    Final,
    /// At the start of the word, when the next character is one of the set.
    InitialBefore(&'static [char]),
    /// Inside the word: a preceding character, the pattern, then one of
    /// `followed_by`. The three-character window is consumed whether or not
    /// it is rewritten, so windows never overlap. Nothing is rewritten when
    /// the preceding character is `unless_after`.
    Interior {
        followed_by: &'static [char],
        unless_after: char,
    },
}

/// A single rewrite step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RewriteRule {
    /// Short name shown in traces
    pub name: &'static str,
    /// Alternatives tried in order at each position; the first match wins.
    pub patterns: &'static [&'static str],
    pub replacement: &'static str,
    pub context: Context,
}

impl RewriteRule {
    /// Rule matching a single literal pattern.
    pub const fn literal(
        name: &'static str,
        patterns: &'static [&'static str],
        replacement: &'static str,
        context: Context,
    ) -> Self {
        Self {
            name,
            patterns,
            replacement,
            context,
        }
    }

    /// Apply this rule to `word`, returning the rewritten word.
    pub fn apply(&self, word: &str) -> String {
        match self.context {
            Context::Anywhere => self.apply_anywhere(word),
            Context::Initial => self.apply_initial(word, None),
            Context::InitialBefore(set) => self.apply_initial(word, Some(set)),
            Context::Final => self.apply_final(word),
            Context::Interior {
                followed_by,
                unless_after,
            } => self.apply_interior(word, followed_by, unless_after),
        }
    }

    fn match_at<'p>(&'p self, rest: &str) -> Option<&'p str> {
        self.patterns
            .iter()
            .copied()
            .find(|p| !p.is_empty() && rest.starts_with(p))
    }

    fn apply_anywhere(&self, word: &str) -> String {
        let mut out = String::with_capacity(word.len());
        let mut rest = word;

        while let Some(c) = rest.chars().next() {
            match self.match_at(rest) {
                Some(p) => {
                    out.push_str(self.replacement);
                    rest = &rest[p.len()..];
                }
                None => {
                    out.push(c);
                    rest = &rest[c.len_utf8()..];
                }
            }
        }

        out
    }

    fn apply_initial(&self, word: &str, before: Option<&[char]>) -> String {
        let Some(p) = self.match_at(word) else {
            return word.to_string();
        };
        let tail = &word[p.len()..];

        if let Some(set) = before {
            match tail.chars().next() {
                Some(next) if set.contains(&next) => {}
                _ => return word.to_string(),
            }
        }

        format!("{}{}", self.replacement, tail)
    }

    fn apply_final(&self, word: &str) -> String {
        match self
            .patterns
            .iter()
            .find(|p| !p.is_empty() && word.ends_with(*p))
        {
            Some(p) => format!("{}{}", &word[..word.len() - p.len()], self.replacement),
            None => word.to_string(),
        }
    }

    fn apply_interior(&self, word: &str, followed_by: &[char], unless_after: char) -> String {
        let mut out = String::with_capacity(word.len());
        let mut rest = word;

        while let Some(prev) = rest.chars().next() {
            let after_prev = &rest[prev.len_utf8()..];

            // A line break never counts as the preceding character.
            let window = if prev == '\n' {
                None
            } else {
                self.match_at(after_prev).and_then(|p| {
                    let tail = &after_prev[p.len()..];
                    tail.chars()
                        .next()
                        .filter(|next| followed_by.contains(next))
                        .map(|next| (p, next))
                })
            };

            match window {
                Some((p, next)) => {
                    out.push(prev);
                    if prev == unless_after {
                        out.push_str(p);
                    } else {
                        out.push_str(self.replacement);
                    }
                    out.push(next);
                    rest = &after_prev[p.len() + next.len_utf8()..];
                }
                None => {
                    out.push(prev);
                    rest = after_prev;
                }
            }
        }

        out
    }
}

/// Apply every rule in order.
pub fn apply_rules(word: &str, rules: &[RewriteRule]) -> String {
    rules
        .iter()
        .fold(word.to_string(), |acc, rule| rule.apply(&acc))
}

/// One observable step of a rule application.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TraceStep {
    pub rule: &'static str,
    pub before: String,
    pub after: String,
}

/// Apply every rule in order, recording the steps that changed the word.
pub fn trace_rules(word: &str, rules: &[RewriteRule]) -> (String, Vec<TraceStep>) {
    let mut steps = Vec::new();
    let mut current = word.to_string();

    for rule in rules {
        let next = rule.apply(&current);
        if next != current {
            steps.push(TraceStep {
                rule: rule.name,
                before: current.clone(),
                after: next.clone(),
            });
        }
        current = next;
    }

    (current, steps)
}
