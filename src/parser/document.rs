//! Block-level document parser.
//!
//! Works on a line buffer with two lines of lookahead. Each construct is
//! recognized at its first line and consumed greedily; nested content
//! (quotes, list items, directive bodies, definitions) is re-parsed by a
//! child parser sharing the same environment, references, directives and
//! node factory.
//!
//! Classification order per line: pending directive content, expected
//! literal block, link/anchor definitions, directives, comments, titles
//! (overline then underline form), separators, tables, lists, definition
//! terms, indented quotes, and finally paragraphs.

use std::collections::HashMap;
use std::rc::Rc;

use crate::directives::{DirectiveContext, DirectiveRegistry};
use crate::environment::Environment;
use crate::nodes::{
    DefinitionListNode, DefinitionTerm, ListItem, ListNode, Node, NodeFactory, SectionInfo,
    SpanNode,
};
use crate::parser::line_checker::{
    indent_of, is_comment, is_directive, is_indented, is_title_underline, parse_list_marker,
    special_letter,
};
use crate::parser::line_data::{
    parse_directive_line, parse_directive_option, parse_link, DirectiveLine, LinkLine,
};
use crate::parser::sections::SectionTracker;
use crate::parser::table::{parse_separator_line, TableBuilder};
use crate::references::ReferenceRegistry;
use crate::span::parser::parse_span;

struct PendingDirective {
    line: DirectiveLine,
    options: HashMap<String, String>,
    line_number: usize,
}

struct ListAccumulator {
    prefix: String,
    ordered: bool,
    offset: usize,
    content: Vec<String>,
}

pub struct DocumentParser<'a> {
    environment: &'a mut Environment,
    references: &'a ReferenceRegistry,
    directives: Rc<DirectiveRegistry>,
    factory: Rc<NodeFactory>,
    nodes: Vec<Node>,
    tracker: SectionTracker,
    pending_directive: Option<PendingDirective>,
    /// Set when a paragraph ended in `::`, announcing a literal block.
    expect_code: bool,
}

impl<'a> DocumentParser<'a> {
    pub fn new(
        environment: &'a mut Environment,
        references: &'a ReferenceRegistry,
        directives: Rc<DirectiveRegistry>,
        factory: Rc<NodeFactory>,
    ) -> Self {
        Self {
            environment,
            references,
            directives,
            factory,
            nodes: Vec::new(),
            tracker: SectionTracker::new(),
            pending_directive: None,
            expect_code: false,
        }
    }

    /// Parse a whole document into a document node.
    pub fn parse(&mut self, text: &str) -> Node {
        let text = text.replace("\r\n", "\n");
        let lines: Vec<String> = text.lines().map(str::to_string).collect();
        self.parse_lines(&lines)
    }

    fn parse_lines(&mut self, lines: &[String]) -> Node {
        let mut index = 0;
        while index < lines.len() {
            index = self.dispatch(lines, index);
        }

        if let Some(pending) = self.pending_directive.take() {
            self.run_directive(pending, None);
        }

        self.factory.document(std::mem::take(&mut self.nodes))
    }

    /// Sections still open when the input ended, outermost first.
    pub fn open_sections(&self) -> &[SectionInfo] {
        self.tracker.open_sections()
    }

    /// Handle the construct starting at `index`, returning the index of the
    /// first unconsumed line.
    fn dispatch(&mut self, lines: &[String], index: usize) -> usize {
        let line = &lines[index];

        if line.trim().is_empty() {
            return index + 1;
        }

        // An unknown directive name drops only the directive line itself;
        // whatever follows re-classifies as ordinary content.
        if self
            .pending_directive
            .as_ref()
            .map_or(false, |pending| self.directives.get(&pending.line.name).is_none())
        {
            if let Some(pending) = self.pending_directive.take() {
                self.report_unknown_directive(&pending);
            }
        }

        if self.pending_directive.is_some() {
            if let Some((key, value)) = parse_directive_option(line) {
                if let Some(pending) = self.pending_directive.as_mut() {
                    pending.options.insert(key, value.unwrap_or_default());
                }
                return index + 1;
            }

            if is_indented(line, 1) {
                let (block, next) = collect_block(lines, index);
                if let Some(pending) = self.pending_directive.take() {
                    self.run_directive(pending, Some(block));
                }
                return next;
            }

            if let Some(pending) = self.pending_directive.take() {
                self.run_directive(pending, None);
            }
        }

        if self.expect_code {
            self.expect_code = false;
            if is_indented(line, 1) {
                let (block, next) = collect_block(lines, index);
                self.push_code(&block, None);
                return next;
            }
        }

        match parse_link(line) {
            Some(LinkLine::Link { name, url }) => {
                self.environment.set_link(&name, &url);
                return index + 1;
            }
            Some(LinkLine::Anchor { name }) => {
                let slug = Environment::slugify(&name);
                self.environment.set_link(&name, &format!("#{}", slug));
                self.nodes.push(self.factory.anchor(slug));
                return index + 1;
            }
            None => {}
        }

        if let Some(directive) = parse_directive_line(line) {
            self.pending_directive = Some(PendingDirective {
                line: directive,
                options: HashMap::new(),
                line_number: index + 1,
            });
            return index + 1;
        }

        if is_comment(line) {
            return skip_indented(lines, index + 1);
        }

        // Overline form: special line, title text, matching special line.
        if let Some(letter) = special_letter(line) {
            if let (Some(text), Some(under)) = (lines.get(index + 1), lines.get(index + 2)) {
                if !text.trim().is_empty()
                    && special_letter(text).is_none()
                    && !is_indented(text, 1)
                    && special_letter(under) == Some(letter)
                {
                    let text = text.trim().to_string();
                    self.push_title(&text, letter);
                    return index + 3;
                }
            }
        }

        if let Some(next) = lines.get(index + 1) {
            if is_title_underline(line, next) {
                if let Some(letter) = special_letter(next) {
                    let text = line.trim().to_string();
                    self.push_title(&text, letter);
                    return index + 2;
                }
            }
        }

        if let Some(letter) = special_letter(line) {
            let level = self.environment.level_for(letter);
            self.nodes.push(self.factory.separator(level));
            return index + 1;
        }

        if parse_separator_line(line).is_some() {
            return self.collect_table(lines, index);
        }

        if parse_list_marker(line).is_some() {
            return self.collect_list(lines, index);
        }

        if self.is_term_line(lines, index) {
            return self.collect_definition_list(lines, index);
        }

        if is_indented(line, 1) {
            let (block, next) = collect_block(lines, index);
            let nodes = self.sub_parse(&block);
            self.nodes.push(self.factory.quote(nodes));
            return next;
        }

        self.collect_paragraph(lines, index)
    }

    fn push_title(&mut self, text: &str, letter: char) {
        let level =
            self.environment.level_for(letter) + self.environment.initial_header_level() - 1;
        let (value, tokens) = parse_span(self.environment, self.references, text);
        let node = self
            .factory
            .title(text, SpanNode::new(value, tokens), level);

        if let Node::Title(title) = &node {
            // Titles are implicit anchors.
            self.environment
                .set_link(&title.text, &format!("#{}", title.id));

            let info = SectionInfo {
                id: title.id.clone(),
                level: title.level,
                text: title.text.clone(),
            };
            for closed in self.tracker.transition(&info) {
                self.nodes.push(self.factory.section_end(closed));
            }
            self.nodes.push(self.factory.section_begin(info));
        }

        self.nodes.push(node);
    }

    fn push_code(&mut self, block: &[String], language: Option<String>) {
        let mut lines = block.to_vec();
        while lines.last().map_or(false, |l| l.trim().is_empty()) {
            lines.pop();
        }

        self.nodes
            .push(self.factory.code(lines.join("\n"), language, None));
    }

    fn report_unknown_directive(&self, pending: &PendingDirective) {
        let file = self.environment.current_file_name();
        let location = if file.is_empty() {
            String::new()
        } else {
            format!(" in \"{}\"", file)
        };
        self.environment.add_error(format!(
            "Unknown directive \"{}\"{} at line {}",
            pending.line.name, location, pending.line_number
        ));
    }

    fn run_directive(&mut self, pending: PendingDirective, block: Option<Vec<String>>) {
        let handler = match self.directives.get(&pending.line.name) {
            Some(handler) => handler.clone(),
            None => {
                self.report_unknown_directive(&pending);
                return;
            }
        };

        let node = match block {
            None => None,
            Some(lines) => {
                if handler.wants_code() {
                    let mut lines = lines;
                    while lines.last().map_or(false, |l| l.trim().is_empty()) {
                        lines.pop();
                    }
                    Some(self.factory.code(lines.join("\n"), None, None))
                } else {
                    let nodes = self.sub_parse(&lines);
                    Some(self.factory.document(nodes))
                }
            }
        };

        let produced = {
            let mut context = DirectiveContext {
                environment: &mut *self.environment,
                references: self.references,
                factory: &self.factory,
            };
            handler.process(&mut context, node, &pending.line.data, &pending.options)
        };

        if let Some(produced) = produced {
            match pending.line.variable {
                Some(variable) => self.environment.set_variable(variable, produced),
                None => self.nodes.push(produced),
            }
        }
    }

    fn collect_table(&mut self, lines: &[String], start: usize) -> usize {
        let mut builder = TableBuilder::new();
        let mut end = start;

        while end < lines.len() {
            let line = &lines[end];
            if line.trim().is_empty() {
                break;
            }

            match parse_separator_line(line) {
                Some(config) => builder.push_separator(config),
                None => builder.push_data(line),
            }
            end += 1;
        }

        let table = builder.build(self.environment, self.references);
        self.nodes.push(self.factory.table(table));
        end
    }

    fn collect_list(&mut self, lines: &[String], start: usize) -> usize {
        let mut end = start;

        while end < lines.len() {
            let line = &lines[end];
            if line.trim().is_empty() {
                match next_content(lines, end) {
                    Some(next)
                        if parse_list_marker(&lines[next]).is_some()
                            || is_indented(&lines[next], 1) =>
                    {
                        end += 1;
                    }
                    _ => break,
                }
            } else if parse_list_marker(line).is_some() || is_indented(line, 1) {
                end += 1;
            } else {
                break;
            }
        }

        let items = self.parse_list_items(&lines[start..end]);
        self.nodes.push(self.factory.list(ListNode { items }));
        end
    }

    fn parse_list_items(&mut self, lines: &[String]) -> Vec<ListItem> {
        let mut items = Vec::new();
        let mut current: Option<ListAccumulator> = None;

        for line in lines {
            if line.trim().is_empty() {
                if let Some(current) = current.as_mut() {
                    current.content.push(String::new());
                }
                continue;
            }

            match parse_list_marker(line) {
                Some(marker) if !is_indented(line, 1) => {
                    if let Some(done) = current.take() {
                        items.push(self.finish_list_item(done));
                    }

                    current = Some(ListAccumulator {
                        prefix: marker.prefix,
                        ordered: marker.ordered,
                        offset: marker.offset,
                        content: vec![marker.text],
                    });
                }
                _ => {
                    if let Some(current) = current.as_mut() {
                        let strip = current.offset.min(indent_of(line));
                        current.content.push(line.chars().skip(strip).collect());
                    }
                }
            }
        }

        if let Some(done) = current.take() {
            items.push(self.finish_list_item(done));
        }

        items
    }

    fn finish_list_item(&mut self, item: ListAccumulator) -> ListItem {
        let mut nodes = self.sub_parse(&item.content);

        // A single paragraph collapses to bare inline content.
        if nodes.len() == 1 {
            if let Some(Node::Paragraph { span }) = nodes.pop() {
                nodes.push(self.factory.span(span));
            }
        }

        ListItem {
            prefix: item.prefix,
            ordered: item.ordered,
            nodes,
        }
    }

    fn is_term_line(&self, lines: &[String], index: usize) -> bool {
        let line = &lines[index];

        !line.trim().is_empty()
            && !is_indented(line, 1)
            && special_letter(line).is_none()
            && parse_list_marker(line).is_none()
            && !is_comment(line)
            && !is_directive(line)
            && matches!(
                lines.get(index + 1),
                Some(next) if !next.trim().is_empty() && is_indented(next, 1)
            )
    }

    fn collect_definition_list(&mut self, lines: &[String], start: usize) -> usize {
        let mut terms = Vec::new();
        let mut index = start;

        while index < lines.len() {
            if lines[index].trim().is_empty() {
                match next_content(lines, index) {
                    Some(next) if self.is_term_line(lines, next) => {
                        index += 1;
                        continue;
                    }
                    _ => break,
                }
            }

            if !self.is_term_line(lines, index) {
                break;
            }

            let term_line = lines[index].trim_end().to_string();
            let (block, next) = collect_block(lines, index + 1);
            index = next;

            let mut parts = term_line.split(" : ");
            let term_text = parts.next().unwrap_or("").trim().to_string();
            let classifiers = parts
                .map(|classifier| {
                    let (value, tokens) =
                        parse_span(self.environment, self.references, classifier.trim());
                    SpanNode::new(value, tokens)
                })
                .collect();

            let (value, tokens) = parse_span(self.environment, self.references, &term_text);
            let definition = self.sub_parse(&block);

            terms.push(DefinitionTerm {
                term: SpanNode::new(value, tokens),
                classifiers,
                definition,
            });
        }

        self.nodes
            .push(self.factory.definition_list(DefinitionListNode { terms }));
        index
    }

    fn collect_paragraph(&mut self, lines: &[String], start: usize) -> usize {
        let mut end = start;
        let mut parts: Vec<&str> = Vec::new();

        while end < lines.len() {
            let line = &lines[end];
            if line.trim().is_empty() || special_letter(line).is_some() {
                break;
            }

            // The last line before a title underline belongs to the title.
            if end > start {
                if let Some(next) = lines.get(end + 1) {
                    if is_title_underline(line, next) {
                        break;
                    }
                }
            }

            parts.push(line.trim_end());
            end += 1;
        }

        let mut text = parts.join("\n");

        if text.ends_with("::") {
            self.expect_code = true;
            if text.trim() == "::" {
                text.clear();
            } else if text.ends_with(" ::") {
                text.truncate(text.len() - 3);
            } else {
                text.truncate(text.len() - 1);
            }
        }

        let text = text.trim_end();
        if !text.is_empty() {
            let (value, tokens) = parse_span(self.environment, self.references, text);
            self.nodes
                .push(self.factory.paragraph(SpanNode::new(value, tokens)));
        }

        end.max(start + 1)
    }

    fn sub_parse(&mut self, lines: &[String]) -> Vec<Node> {
        let mut parser = DocumentParser::new(
            &mut *self.environment,
            self.references,
            self.directives.clone(),
            self.factory.clone(),
        );

        match parser.parse_lines(lines) {
            Node::Document { nodes } => nodes,
            other => vec![other],
        }
    }
}

/// First non-blank line after `from`.
fn next_content(lines: &[String], from: usize) -> Option<usize> {
    (from + 1..lines.len()).find(|i| !lines[*i].trim().is_empty())
}

/// Collect the indented block starting at `start`, including interior blank
/// lines, and dedent it. Trailing blank lines are dropped.
fn collect_block(lines: &[String], start: usize) -> (Vec<String>, usize) {
    let mut block = Vec::new();
    let mut end = start;

    while end < lines.len() {
        let line = &lines[end];
        if line.trim().is_empty() {
            match next_content(lines, end) {
                Some(next) if is_indented(&lines[next], 1) => {
                    block.push(String::new());
                    end += 1;
                }
                _ => break,
            }
        } else if is_indented(line, 1) {
            block.push(line.trim_end().to_string());
            end += 1;
        } else {
            break;
        }
    }

    while block.last().map_or(false, |l| l.is_empty()) {
        block.pop();
    }

    (dedent(&block), end)
}

fn skip_indented(lines: &[String], start: usize) -> usize {
    let (_, end) = collect_block(lines, start);
    end
}

fn dedent(lines: &[String]) -> Vec<String> {
    let indent = lines
        .iter()
        .filter(|line| !line.trim().is_empty())
        .map(|line| indent_of(line))
        .min()
        .unwrap_or(0);

    lines
        .iter()
        .map(|line| line.chars().skip(indent.min(indent_of(line))).collect())
        .collect()
}
