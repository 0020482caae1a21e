//! HTML rendering.

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

use crate::nodes::{Node, SpanNode};
use crate::render::template::{SimpleTemplateRenderer, TemplateRenderer};
use crate::render::{NodeRenderer, NodeRendererFactory, RenderContext};
use crate::span::tokens::{SpanToken, SpanTokenData};

static STRONG_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\*\*((?s).+?)\*\*").unwrap());
static EMPHASIS_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\*((?s).+?)\*").unwrap());
static VARIABLE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\|([a-zA-Z0-9_-]+)\|").unwrap());

const LINK_TEMPLATE: &str = r#"<a href="{{ url }}">{{ title }}</a>"#;

fn escape(text: &str) -> String {
    html_escape::encode_text(text).into_owned()
}

fn escape_attr(text: &str) -> String {
    html_escape::encode_double_quoted_attribute(text).into_owned()
}

/// The HTML renderer factory.
pub fn html_renderer_factory() -> NodeRendererFactory {
    NodeRendererFactory::new(vec![Box::new(HtmlNodeRenderer::new())])
}

pub struct HtmlNodeRenderer {
    templates: SimpleTemplateRenderer,
}

impl HtmlNodeRenderer {
    pub fn new() -> Self {
        Self {
            templates: SimpleTemplateRenderer,
        }
    }

    /// Inline pipeline: escape, emphasis, non-breaking spaces, variables,
    /// then placeholder substitution.
    fn render_span(&self, span: &SpanNode, context: &RenderContext<'_>) -> String {
        let mut text = escape(&span.value);

        text = STRONG_RE
            .replace_all(&text, "<strong>$1</strong>")
            .into_owned();
        text = EMPHASIS_RE.replace_all(&text, "<em>$1</em>").into_owned();
        text = text.replace('~', "&nbsp;");

        text = VARIABLE_RE
            .replace_all(&text, |caps: &Captures| {
                let name = &caps[1];
                match context.environment.variable(name) {
                    Some(node) => context.render(node),
                    None => {
                        context
                            .environment
                            .add_error(format!("Unknown variable \"{}\"", name));
                        String::new()
                    }
                }
            })
            .into_owned();

        for token in &span.tokens {
            let rendered = self.render_token(token, context);
            text = text.replace(&token.id, &rendered);
        }

        text
    }

    fn render_token(&self, token: &SpanToken, context: &RenderContext<'_>) -> String {
        match &token.data {
            SpanTokenData::Literal { text } => format!("<code>{}</code>", escape(text)),
            SpanTokenData::Link { link, url } => {
                let href = if url.is_empty() {
                    context.environment.link(link).map(str::to_string)
                } else {
                    Some(url.clone())
                };

                match href {
                    Some(href) => self.link(&href, link),
                    None => {
                        context.references.add_invalid_link(link.clone());
                        context
                            .environment
                            .add_error(format!("Unresolved link \"{}\"", link));
                        escape(link)
                    }
                }
            }
            SpanTokenData::Reference {
                domain,
                section,
                url,
                text,
                anchor,
            } => {
                let resolved = context.references.resolve(
                    context.environment,
                    domain.as_deref(),
                    section,
                    url,
                );

                match resolved {
                    Some(resolved) => {
                        let mut href = resolved.url;
                        if let Some(anchor) = anchor {
                            href.push('#');
                            href.push_str(anchor);
                        }
                        let title = text.clone().unwrap_or(resolved.title);
                        self.link(&href, &title)
                    }
                    None => escape(text.as_deref().unwrap_or(url)),
                }
            }
        }
    }

    fn link(&self, url: &str, title: &str) -> String {
        self.templates.render(
            LINK_TEMPLATE,
            &[("url", escape_attr(url)), ("title", escape(title))],
        )
    }
}

impl Default for HtmlNodeRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl NodeRenderer for HtmlNodeRenderer {
    fn supports(&self, _node: &Node) -> bool {
        true
    }

    fn render(&self, node: &Node, context: &RenderContext<'_>) -> String {
        match node {
            Node::Document { nodes } => {
                let mut out = String::new();
                let mut depth = 0usize;

                for child in nodes {
                    match child {
                        Node::SectionBegin(_) => depth += 1,
                        Node::SectionEnd(_) => depth = depth.saturating_sub(1),
                        _ => {}
                    }
                    out.push_str(&context.render(child));
                }

                // Sections left open at end of input close here.
                for _ in 0..depth {
                    out.push_str("</section>\n");
                }

                out
            }
            Node::SectionBegin(info) => {
                format!("<section id=\"{}\">\n", escape_attr(&info.id))
            }
            Node::SectionEnd(_) => "</section>\n".to_string(),
            Node::Title(title) => {
                let level = title.level.clamp(1, 6);
                format!(
                    "<h{} id=\"{}\">{}</h{}>\n",
                    level,
                    escape_attr(&title.id),
                    self.render_span(&title.span, context),
                    level
                )
            }
            Node::Paragraph { span } => {
                format!("<p>{}</p>\n", self.render_span(span, context))
            }
            Node::Span { span } => self.render_span(span, context),
            Node::Separator { .. } => "<hr />\n".to_string(),
            Node::List(list) => {
                let tag = if list.ordered() { "ol" } else { "ul" };
                let items: String = list
                    .items
                    .iter()
                    .map(|item| format!("<li>{}</li>\n", context.render_all(&item.nodes)))
                    .collect();
                format!("<{}>\n{}</{}>\n", tag, items, tag)
            }
            Node::DefinitionList(list) => {
                let mut out = String::from("<dl>\n");
                for term in &list.terms {
                    out.push_str(&format!(
                        "<dt>{}",
                        self.render_span(&term.term, context)
                    ));
                    for classifier in &term.classifiers {
                        out.push_str(&format!(
                            " <span class=\"classifier\">{}</span>",
                            self.render_span(classifier, context)
                        ));
                    }
                    out.push_str("</dt>\n");
                    out.push_str(&format!(
                        "<dd>{}</dd>\n",
                        context.render_all(&term.definition)
                    ));
                }
                out.push_str("</dl>\n");
                out
            }
            Node::Table(table) => {
                let row = |cells: &[SpanNode], tag: &str| -> String {
                    let cells: String = cells
                        .iter()
                        .map(|cell| {
                            format!("<{}>{}</{}>", tag, self.render_span(cell, context), tag)
                        })
                        .collect();
                    format!("<tr>{}</tr>\n", cells)
                };

                let mut out = String::from("<table>\n");
                if table.header_rows > 0 {
                    out.push_str("<thead>\n");
                    for header in table.header() {
                        out.push_str(&row(&header.cells, "th"));
                    }
                    out.push_str("</thead>\n");
                }
                out.push_str("<tbody>\n");
                for data in table.data_rows() {
                    out.push_str(&row(&data.cells, "td"));
                }
                out.push_str("</tbody>\n</table>\n");
                out
            }
            Node::Code {
                value,
                language,
                starting_line,
            } => {
                let class = language
                    .as_ref()
                    .map(|l| format!(" class=\"language-{}\"", escape_attr(l)))
                    .unwrap_or_default();
                let numbers = starting_line
                    .map(|start| format!(" data-number-lines=\"{}\"", start))
                    .unwrap_or_default();
                format!(
                    "<pre{}><code{}>{}</code></pre>\n",
                    numbers,
                    class,
                    escape(value)
                )
            }
            Node::Quote { nodes } => {
                format!("<blockquote>\n{}</blockquote>\n", context.render_all(nodes))
            }
            Node::Image { url, options } => {
                let mut attrs = format!(" src=\"{}\"", escape_attr(url));
                for key in ["alt", "width", "height", "class"] {
                    if let Some(value) = options.get(key) {
                        attrs.push_str(&format!(" {}=\"{}\"", key, escape_attr(value)));
                    }
                }
                format!("<img{} />\n", attrs)
            }
            Node::Figure { image, document } => {
                let caption = if document.is_empty() {
                    String::new()
                } else {
                    format!("<figcaption>\n{}</figcaption>\n", context.render_all(document))
                };
                format!(
                    "<figure>\n{}{}</figure>\n",
                    context.render(image),
                    caption
                )
            }
            Node::Meta { key, value } => format!(
                "<meta name=\"{}\" content=\"{}\" />\n",
                escape_attr(key),
                escape_attr(value)
            ),
            Node::Toc { files, .. } => {
                let items: String = files
                    .iter()
                    .map(|file| {
                        let (title, url) = match context.references.target(file) {
                            Some((title, url)) => (title.clone(), url.clone()),
                            None => (file.clone(), format!("{}.html", file)),
                        };
                        format!(
                            "<li><a href=\"{}\">{}</a></li>\n",
                            escape_attr(&url),
                            escape(&title)
                        )
                    })
                    .collect();
                format!("<ul class=\"toc\">\n{}</ul>\n", items)
            }
            Node::Anchor { name } => format!("<a id=\"{}\"></a>\n", escape_attr(name)),
            Node::Admonition { name, nodes } => {
                let mut label = name.clone();
                if let Some(first) = label.get_mut(0..1) {
                    first.make_ascii_uppercase();
                }
                format!(
                    "<div class=\"admonition {}\">\n<p class=\"admonition-title\">{}</p>\n{}</div>\n",
                    escape_attr(name),
                    escape(&label),
                    context.render_all(nodes)
                )
            }
            Node::Raw { value } => value.clone(),
            Node::Callable(callable) => callable.call(),
            Node::Wrapper {
                nodes,
                before,
                after,
            } => format!("{}{}{}", before, context.render_all(nodes), after),
            Node::Dummy { .. } => String::new(),
        }
    }
}
