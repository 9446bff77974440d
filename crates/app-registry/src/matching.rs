use regex::Regex;
use tracing::debug;

use crate::class::ExtractorClass;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    /// The pattern matches at the start of the URL.
    Match,
    /// The class overrides `suitable`, only the real class can answer.
    NeedsRealClass,
    /// The pattern uses syntax the regex engine can not compile.
    Unsupported(String),
}

#[derive(Debug, Clone)]
pub struct Claim<'a> {
    pub class: &'a ExtractorClass,
    pub verdict: Verdict,
}

#[derive(Debug)]
enum Pattern {
    Compiled(Regex),
    Unsupported(String),
    Missing,
}

#[derive(Debug)]
struct Candidate<'a> {
    class: &'a ExtractorClass,
    pattern: Pattern,
}

/// Cheap URL matching the way a stand-in answers it: anchored at the start
/// of the URL, without loading the real extractor.
///
/// Candidates are consulted in the order given, which should be emission
/// order so that classes generated last are also matched last.
#[derive(Debug)]
pub struct Matcher<'a> {
    candidates: Vec<Candidate<'a>>,
}
impl<'a> Matcher<'a> {
    /// Build a matcher over the concrete classes among `classes`.
    pub fn new<I>(classes: I) -> Self
    where
        I: IntoIterator<Item = &'a ExtractorClass>,
    {
        let candidates = classes
            .into_iter()
            .filter(|c| c.concrete)
            .map(|class| Candidate {
                class,
                pattern: compile(class),
            })
            .collect::<Vec<_>>();

        let unsupported = candidates
            .iter()
            .filter(|x| matches!(x.pattern, Pattern::Unsupported(_)))
            .count();
        debug!(candidates = candidates.len(), unsupported, "Built matcher");

        Self { candidates }
    }

    /// Every class that claims `url` or can not be ruled out, in order.
    #[must_use]
    pub fn claims(&self, url: &str) -> Vec<Claim<'a>> {
        self.candidates
            .iter()
            .filter_map(|c| {
                let verdict = if c.class.overrides_suitable() {
                    Verdict::NeedsRealClass
                } else {
                    match &c.pattern {
                        Pattern::Compiled(re) if re.is_match(url) => Verdict::Match,
                        Pattern::Compiled(_) | Pattern::Missing => return None,
                        Pattern::Unsupported(e) => Verdict::Unsupported(e.clone()),
                    }
                };

                Some(Claim {
                    class: c.class,
                    verdict,
                })
            })
            .collect()
    }

    /// The first class whose pattern definitely matches `url`.
    #[must_use]
    pub fn first_match(&self, url: &str) -> Option<&'a ExtractorClass> {
        self.claims(url)
            .into_iter()
            .find(|x| x.verdict == Verdict::Match)
            .map(|x| x.class)
    }
}

fn compile(class: &ExtractorClass) -> Pattern {
    let Some(valid_url) = class.effective_valid_url() else {
        return Pattern::Missing;
    };

    match Regex::new(&format!("^(?:{valid_url})")) {
        Ok(re) => Pattern::Compiled(re),
        Err(e) => {
            debug!(class = %class.name, error = %e, "Pattern not supported");
            Pattern::Unsupported(e.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::class::RootBase;

    fn ie(name: &str, valid_url: &str) -> ExtractorClass {
        ExtractorClass::new(name, "yt_dlp.extractor.test").with_valid_url(valid_url)
    }

    #[test]
    fn matches_are_anchored_and_ordered() {
        let classes = [
            ie("YoutubeIE", r"https?://(?:www\.)?youtube\.com/watch\?v=(?P<id>[\w-]+)"),
            ie("VimeoIE", r"https?://vimeo\.com/(?P<id>\d+)"),
            ie("GenericIE", r".*").last(),
        ];
        let matcher = Matcher::new(&classes);

        let names = matcher
            .claims("https://vimeo.com/1234")
            .into_iter()
            .map(|x| x.class.name.as_str())
            .collect::<Vec<_>>();
        assert_eq!(names, ["VimeoIE", "GenericIE"]);

        assert_eq!(
            matcher
                .first_match("see https://vimeo.com/1234")
                .map(|x| x.name.as_str()),
            Some("GenericIE")
        );
    }

    #[test]
    fn overrides_and_unsupported_patterns_are_reported() {
        let classes = [
            ie("BackrefIE", r"(?P<q>['\x22])(?P<id>.+)(?P=q)"),
            ie("OverrideIE", r"^never$").with_suitable("def suitable(cls, url):\n    return True"),
            ie("HelperIE", r".*").helper(),
        ];
        let matcher = Matcher::new(&classes);

        let claims = matcher.claims("'abc'");

        assert_eq!(claims.len(), 2);
        assert!(matches!(claims[0].verdict, Verdict::Unsupported(_)));
        assert_eq!(claims[1].verdict, Verdict::NeedsRealClass);
        assert!(matcher.first_match("'abc'").is_none());
    }

    #[test]
    fn search_keys_match_prefixed_queries() {
        let classes = [ExtractorClass::new("YoutubeSearchIE", "yt_dlp.extractor.youtube")
            .with_bases([RootBase::Search])
            .with_search_key("ytsearch")];
        let matcher = Matcher::new(&classes);

        assert!(matcher.first_match("ytsearch5:cute cats").is_some());
        assert!(matcher.first_match("ytsearchx:cute cats").is_none());
    }
}
