use app_registry::{ExtractorClass, Matcher, Verdict};

/// One line per claim of every URL, plugins consulted before built-ins.
pub fn claims_report(
    plugins: &[ExtractorClass],
    ordered: &[&ExtractorClass],
    urls: &[String],
) -> Vec<String> {
    let matcher = Matcher::new(plugins.iter().chain(ordered.iter().copied()));
    let mut lines = vec![];

    for url in urls {
        let claims = matcher.claims(url);
        if claims.is_empty() {
            app_logger::warn!(url, "No extractor claims URL");
            lines.push(format!("{url}\t-"));
            continue;
        }

        for claim in claims {
            let name = &claim.class.name;
            let plugin = plugins.iter().any(|x| x.name == *name);

            if plugin && claim.verdict == Verdict::Match {
                app_logger::info!("URL {url:?} successfully captured by {name}");
            }

            let verdict = match &claim.verdict {
                Verdict::Match => "match".to_string(),
                Verdict::NeedsRealClass => "needs real class".to_string(),
                Verdict::Unsupported(e) => format!("unsupported pattern: {e}"),
            };
            lines.push(format!("{url}\t{name}\t{verdict}"));
        }
    }

    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ie(name: &str, valid_url: &str) -> ExtractorClass {
        ExtractorClass::new(name, "yt_dlp.extractor.test").with_valid_url(valid_url)
    }

    #[test]
    fn plugins_claim_before_builtins() {
        let plugins = [ie("SamplePluginIE", "^sampleplugin:").not_working()];
        let builtin = [ie("GenericIE", ".*").last()];
        let ordered = builtin.iter().collect::<Vec<_>>();

        let lines = claims_report(&plugins, &ordered, &["sampleplugin:abc".to_string()]);

        assert_eq!(
            lines,
            [
                "sampleplugin:abc\tSamplePluginIE\tmatch",
                "sampleplugin:abc\tGenericIE\tmatch",
            ]
        );
    }

    #[test]
    fn unclaimed_urls_are_reported() {
        let builtin = [ie("VimeoIE", r"https?://vimeo\.com/(?P<id>\d+)")
            .with_suitable("@classmethod\ndef suitable(cls, url):\n    return False")];
        let ordered = builtin.iter().collect::<Vec<_>>();

        let lines = claims_report(
            &[],
            &[],
            &["https://example.com/".to_string()],
        );
        assert_eq!(lines, ["https://example.com/\t-"]);

        let lines = claims_report(&[], &ordered, &["https://vimeo.com/1".to_string()]);
        assert_eq!(lines, ["https://vimeo.com/1\tVimeoIE\tneeds real class"]);
    }
}
