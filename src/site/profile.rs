//! The rewritten profile page.

use std::sync::Arc;

use axum::body::Body;
use axum::http::header;
use axum::response::Response;

use crate::config::{LinkEntry, ProfileConfig, SocialLink};
use crate::error::AppError;
use crate::rewrite::{Mutator, RewriteError, TransformPipeline};
use crate::site::Site;

/// Build the bindings that personalize the template.
pub fn profile_pipeline(profile: &ProfileConfig) -> Result<TransformPipeline, RewriteError> {
    let mut pipeline = TransformPipeline::new();

    for link in &profile.links {
        pipeline = pipeline.on("#links", Mutator::prepend(link_anchor(link)))?;
    }

    pipeline = pipeline
        .on("div#profile", Mutator::set_attribute("style", "display:visible"))?
        .on("div#social", Mutator::set_attribute("style", "display:visible"))?;

    for social in &profile.socials {
        pipeline = pipeline.on("#social", Mutator::prepend(social_anchor(social)))?;
    }

    pipeline
        .on("h1#name", Mutator::set_inner_text(&profile.name))?
        .on("title", Mutator::set_inner_text(&profile.title))?
        .on(
            "body",
            Mutator::set_attribute("style", format!("background:{}", profile.background)),
        )
}

/// Fetch the template and stream it back rewritten.
pub async fn render(site: Arc<Site>) -> Result<Response, AppError> {
    let template = site.upstream().fetch_template().await?;
    let body = site.pipeline().apply(template);

    let response = Response::builder()
        .header(header::CONTENT_TYPE, "text/html")
        .header(header::SET_COOKIE, "SameSite=None")
        .body(Body::from_stream(body))?;
    Ok(response)
}

fn link_anchor(link: &LinkEntry) -> String {
    format!(
        r#"<a href="{}">{}</a>"#,
        escape_html(&link.url),
        escape_html(&link.name)
    )
}

// The icon is configuration-supplied markup and goes in verbatim.
fn social_anchor(social: &SocialLink) -> String {
    format!(r#"<a href="{}">{}</a>"#, escape_html(&social.url), social.icon)
}

fn escape_html(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            c => escaped.push(c),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEMPLATE: &str = r#"<html><head><title>Links</title></head><body>
<div id="profile" style="display: none"><h1 id="name"></h1></div>
<div id="links"></div>
<div id="social" style="display: none"></div>
</body></html>"#;

    fn rendered(profile: &ProfileConfig) -> String {
        let pipeline = profile_pipeline(profile).unwrap();
        String::from_utf8(pipeline.transform_bytes(TEMPLATE.as_bytes()).unwrap()).unwrap()
    }

    #[test]
    fn test_default_profile_binding_count() {
        // 3 links, 2 visibility toggles, 2 socials, name, title, background
        assert_eq!(profile_pipeline(&ProfileConfig::default()).unwrap().len(), 10);
    }

    #[test]
    fn test_default_profile_rewrites_template() {
        let output = rendered(&ProfileConfig::default());

        assert!(output.contains(r#"<h1 id="name">Himesh Buch (buchhimesh@gmail.com)</h1>"#));
        assert!(output.contains("<title>Himesh Buch</title>"));
        assert!(output.contains(r#"style="background:#b5651d""#));
        assert!(output.contains(r#"<div id="profile" style="display:visible">"#));
        assert!(output.contains(r#"<div id="social" style="display:visible">"#));
        assert!(output.contains(r#"<a href="https://www.rutgers.edu/">Rutgers University</a>"#));
        assert!(output.contains(r#"<a href="https://github.com/himesh257"><svg"#));
        // Markup inserted by a mutator is not matched again by later selectors
        assert!(output.contains("<title>GitHub icon</title>"));
        assert!(output.contains("<title>LinkedIn icon</title>"));
    }

    #[test]
    fn test_later_links_are_prepended_first() {
        let output = rendered(&ProfileConfig::default());

        let rutgers = output.find("Rutgers University").unwrap();
        let michigan = output.find("University of Michigan").unwrap();
        let georgia = output.find("Georgia Tech.").unwrap();
        assert!(georgia < michigan && michigan < rutgers);
    }

    #[test]
    fn test_link_text_is_escaped() {
        let profile = ProfileConfig {
            links: vec![LinkEntry::new("<script>", "https://x.test/?a=1&b=\"2\"")],
            socials: Vec::new(),
            ..ProfileConfig::default()
        };
        let output = rendered(&profile);

        assert!(output.contains(
            r#"<a href="https://x.test/?a=1&amp;b=&quot;2&quot;">&lt;script&gt;</a>"#
        ));
    }

    #[test]
    fn test_escape_html() {
        assert_eq!(escape_html(r#"<a href='x'>&"#), "&lt;a href=&#39;x&#39;&gt;&amp;");
        assert_eq!(escape_html("plain"), "plain");
    }
}
