//! LaTeX rendering.

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

use crate::nodes::{Node, SpanNode};
use crate::render::{NodeRenderer, NodeRendererFactory, RenderContext};
use crate::span::tokens::{SpanToken, SpanTokenData};

static STRONG_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\*\*((?s).+?)\*\*").unwrap());
static EMPHASIS_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\*((?s).+?)\*").unwrap());
static VARIABLE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\|([a-zA-Z0-9_-]+)\|").unwrap());

const SECTIONING: [&str; 5] = [
    "\\section",
    "\\subsection",
    "\\subsubsection",
    "\\paragraph",
    "\\subparagraph",
];

/// Escape LaTeX specials. A tilde stays a tilde: in span text it means a
/// non-breaking space, which is what `~` does in LaTeX.
fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());

    for ch in text.chars() {
        match ch {
            '\\' => out.push_str("\\textbackslash{}"),
            '{' => out.push_str("\\{"),
            '}' => out.push_str("\\}"),
            '$' | '&' | '#' | '_' | '%' => {
                out.push('\\');
                out.push(ch);
            }
            '^' => out.push_str("\\textasciicircum{}"),
            _ => out.push(ch),
        }
    }

    out
}

/// The LaTeX renderer factory.
pub fn latex_renderer_factory() -> NodeRendererFactory {
    NodeRendererFactory::new(vec![Box::new(LatexNodeRenderer)])
}

pub struct LatexNodeRenderer;

impl LatexNodeRenderer {
    fn render_span(&self, span: &SpanNode, context: &RenderContext<'_>) -> String {
        let mut text = escape(&span.value);

        text = STRONG_RE
            .replace_all(&text, "\\textbf{$1}")
            .into_owned();
        text = EMPHASIS_RE.replace_all(&text, "\\emph{$1}").into_owned();

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
            SpanTokenData::Literal { text } => format!("\\texttt{{{}}}", escape(text)),
            SpanTokenData::Link { link, url } => {
                let href = if url.is_empty() {
                    context.environment.link(link).map(str::to_string)
                } else {
                    Some(url.clone())
                };

                match href {
                    Some(href) => format!("\\href{{{}}}{{{}}}", href, escape(link)),
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
                        format!("\\href{{{}}}{{{}}}", href, escape(&title))
                    }
                    None => escape(text.as_deref().unwrap_or(url)),
                }
            }
        }
    }
}

impl NodeRenderer for LatexNodeRenderer {
    fn supports(&self, _node: &Node) -> bool {
        true
    }

    fn render(&self, node: &Node, context: &RenderContext<'_>) -> String {
        match node {
            Node::Document { nodes } => context.render_all(nodes),
            Node::SectionBegin(_) | Node::SectionEnd(_) => String::new(),
            Node::Title(title) => {
                let command = SECTIONING[title.level.clamp(1, SECTIONING.len()) - 1];
                format!(
                    "{}{{{}}}\n\\label{{{}}}\n",
                    command,
                    self.render_span(&title.span, context),
                    title.id
                )
            }
            Node::Paragraph { span } => {
                format!("{}\n\n", self.render_span(span, context))
            }
            Node::Span { span } => self.render_span(span, context),
            Node::Separator { .. } => "\\noindent\\rule{\\textwidth}{0.4pt}\n\n".to_string(),
            Node::List(list) => {
                let env = if list.ordered() { "enumerate" } else { "itemize" };
                let items: String = list
                    .items
                    .iter()
                    .map(|item| format!("\\item {}\n", context.render_all(&item.nodes)))
                    .collect();
                format!("\\begin{{{}}}\n{}\\end{{{}}}\n", env, items, env)
            }
            Node::DefinitionList(list) => {
                let items: String = list
                    .terms
                    .iter()
                    .map(|term| {
                        format!(
                            "\\item[{}] {}\n",
                            self.render_span(&term.term, context),
                            context.render_all(&term.definition)
                        )
                    })
                    .collect();
                format!("\\begin{{description}}\n{}\\end{{description}}\n", items)
            }
            Node::Table(table) => {
                let columns = "l".repeat(table.column_count().max(1));
                let row = |cells: &[SpanNode]| -> String {
                    let cells: Vec<String> = cells
                        .iter()
                        .map(|cell| self.render_span(cell, context))
                        .collect();
                    format!("{} \\\\\n", cells.join(" & "))
                };

                let mut out = format!("\\begin{{tabular}}{{{}}}\n", columns);
                if table.header_rows > 0 {
                    for header in table.header() {
                        out.push_str(&row(&header.cells));
                    }
                    out.push_str("\\hline\n");
                }
                for data in table.data_rows() {
                    out.push_str(&row(&data.cells));
                }
                out.push_str("\\end{tabular}\n");
                out
            }
            Node::Code { value, .. } => {
                format!("\\begin{{verbatim}}\n{}\n\\end{{verbatim}}\n", value)
            }
            Node::Quote { nodes } => format!(
                "\\begin{{quotation}}\n{}\\end{{quotation}}\n",
                context.render_all(nodes)
            ),
            Node::Image { url, .. } => format!("\\includegraphics{{{}}}\n", url),
            Node::Figure { image, document } => format!(
                "\\begin{{figure}}\n{}{}\\end{{figure}}\n",
                context.render(image),
                if document.is_empty() {
                    String::new()
                } else {
                    format!("\\caption{{{}}}\n", context.render_all(document).trim())
                }
            ),
            Node::Meta { .. } => String::new(),
            Node::Toc { .. } => "\\tableofcontents\n".to_string(),
            Node::Anchor { name } => format!("\\hypertarget{{{}}}{{}}\n", name),
            Node::Admonition { name, nodes } => {
                let mut label = name.clone();
                if let Some(first) = label.get_mut(0..1) {
                    first.make_ascii_uppercase();
                }
                format!(
                    "\\begin{{quote}}\n\\textbf{{{}:}}\n{}\\end{{quote}}\n",
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
