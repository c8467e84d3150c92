use regex::Regex;

/// A banned-phrase pattern with the source text it was compiled from.
#[derive(Debug, Clone)]
struct BannedPattern {
    source: String,
    regex: Regex,
}

/// A banned phrase found in a piece of text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhraseMatch {
    pub pattern: String,
    pub matched: String,
}

/// Compiled banned patterns plus the allowed hedge phrases that mask them.
///
/// Allowed phrases are matched case-insensitively and blanked out before
/// the banned patterns run, so "cannot be ruled out" survives a ban on
/// "ruled out".
#[derive(Debug, Clone, Default)]
pub struct PhrasePolicy {
    banned: Vec<BannedPattern>,
    allowed: Vec<Regex>,
}

impl PhrasePolicy {
    /// Compile the policy. On failure returns the offending pattern and the
    /// regex error.
    pub fn compile<B, A>(banned: B, allowed: A) -> Result<Self, (String, regex::Error)>
    where
        B: IntoIterator,
        B::Item: AsRef<str>,
        A: IntoIterator,
        A::Item: AsRef<str>,
    {
        let banned = banned
            .into_iter()
            .map(|p| {
                let source = p.as_ref().to_string();
                Regex::new(&source)
                    .map(|regex| BannedPattern {
                        source: source.clone(),
                        regex,
                    })
                    .map_err(|e| (source, e))
            })
            .collect::<Result<Vec<_>, _>>()?;

        let allowed = allowed
            .into_iter()
            .filter(|p| !p.as_ref().trim().is_empty())
            .map(|p| {
                let phrase = p.as_ref().trim();
                Regex::new(&format!("(?i){}", regex::escape(phrase)))
                    .map_err(|e| (phrase.to_string(), e))
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self { banned, allowed })
    }

    /// Every banned pattern that matches `text`, first match per pattern.
    pub fn find_banned(&self, text: &str) -> Vec<PhraseMatch> {
        let masked = self.mask_allowed(text);
        self.banned
            .iter()
            .filter_map(|p| {
                p.regex.find(&masked).map(|m| PhraseMatch {
                    pattern: p.source.clone(),
                    matched: m.as_str().trim().to_string(),
                })
            })
            .collect()
    }

    fn mask_allowed(&self, text: &str) -> String {
        self.allowed
            .iter()
            .fold(text.to_string(), |acc, re| re.replace_all(&acc, " ").into_owned())
    }
}
