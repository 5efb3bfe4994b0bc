// Mermaid flowchart reader for the CFG and semantic-role tabs.
//
// The terminal cannot run a Mermaid renderer, so the flowchart is parsed into
// nodes and edges and drawn as an indented tree. Anything that does not parse
// as a flowchart is shown verbatim.

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
    pub id: String,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Edge {
    pub from: String,
    pub to: String,
    pub label: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Flowchart {
    /// `TD`, `LR`, ... from the header line, if there was one.
    pub direction: Option<String>,
    pub nodes: Vec<Node>,
    pub edges: Vec<Edge>,
}

impl Flowchart {
    fn index_of(&self, id: &str) -> Option<usize> {
        self.nodes.iter().position(|n| n.id == id)
    }

    fn upsert(&mut self, id: &str, label: Option<String>) {
        match self.index_of(id) {
            Some(i) => {
                if let Some(label) = label {
                    self.nodes[i].label = label;
                }
            }
            None => self.nodes.push(Node {
                id: id.to_string(),
                label: label.unwrap_or_else(|| id.to_string()),
            }),
        }
    }
}

const DIRECTIVES: &[&str] = &[
    "style",
    "classDef",
    "class",
    "linkStyle",
    "click",
    "subgraph",
    "end",
    "direction",
];

const LINK_CHARS: &[char] = &['-', '=', '.', '<', '>'];

/// Parse Mermaid flowchart code. Returns `None` when the code has neither a
/// `graph`/`flowchart` header nor a single edge, or defines no nodes.
pub fn parse_flowchart(code: &str) -> Option<Flowchart> {
    let mut chart = Flowchart::default();
    let mut saw_header = false;

    for raw in code.lines() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with("```") || line.starts_with("%%") {
            continue;
        }
        for stmt in split_statements(line) {
            let stmt = stmt.trim();
            if stmt.is_empty() {
                continue;
            }
            if !saw_header && chart.nodes.is_empty() {
                if let Some(direction) = header_direction(stmt) {
                    chart.direction = Some(direction);
                    saw_header = true;
                    continue;
                }
            }
            if is_directive(stmt) {
                continue;
            }
            if let Some((refs, links)) = parse_statement(stmt) {
                for (id, label) in &refs {
                    chart.upsert(id, label.clone());
                }
                for (i, label) in links.into_iter().enumerate() {
                    chart.edges.push(Edge {
                        from: refs[i].0.clone(),
                        to: refs[i + 1].0.clone(),
                        label,
                    });
                }
            }
        }
    }

    if chart.nodes.is_empty() || (!saw_header && chart.edges.is_empty()) {
        return None;
    }
    Some(chart)
}

fn header_direction(stmt: &str) -> Option<String> {
    let mut words = stmt.split_whitespace();
    match words.next()? {
        "graph" | "flowchart" => Some(words.next().unwrap_or("TD").to_string()),
        _ => None,
    }
}

fn is_directive(stmt: &str) -> bool {
    let first = stmt.split_whitespace().next().unwrap_or("");
    DIRECTIVES.contains(&first)
}

/// Split on `;` outside brackets and quotes.
fn split_statements(line: &str) -> Vec<&str> {
    let mut out = Vec::new();
    let mut depth = 0usize;
    let mut in_quote = false;
    let mut start = 0;
    for (i, c) in line.char_indices() {
        match c {
            '"' => in_quote = !in_quote,
            '[' | '(' | '{' if !in_quote => depth += 1,
            ']' | ')' | '}' if !in_quote => depth = depth.saturating_sub(1),
            ';' if !in_quote && depth == 0 => {
                out.push(&line[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    out.push(&line[start..]);
    out
}

type NodeRef = (String, Option<String>);

/// `A --> B -- x --> C` into node refs and the link labels between them.
/// Returns `None` unless the whole statement parses.
fn parse_statement(stmt: &str) -> Option<(Vec<NodeRef>, Vec<Option<String>>)> {
    let (first, rest) = parse_node(stmt)?;
    let mut refs = vec![first];
    let mut links = Vec::new();
    let mut rest = rest.trim_start();
    while !rest.is_empty() {
        let (label, after_link) = parse_link(rest)?;
        let (node, after_node) = parse_node(after_link.trim_start())?;
        links.push(label);
        refs.push(node);
        rest = after_node.trim_start();
    }
    Some((refs, links))
}

fn parse_node(s: &str) -> Option<(NodeRef, &str)> {
    let id_len = s
        .char_indices()
        .find(|(_, c)| !(c.is_alphanumeric() || *c == '_'))
        .map(|(i, _)| i)
        .unwrap_or(s.len());
    if id_len == 0 {
        return None;
    }
    let id = s[..id_len].to_string();
    let after = &s[id_len..];
    if after.starts_with(['[', '(', '{', '>']) {
        let (label, rest) = parse_shape(after)?;
        Some(((id, Some(label)), rest))
    } else {
        Some(((id, None), after))
    }
}

/// Read a bracketed node shape and return its cleaned label.
fn parse_shape(s: &str) -> Option<(String, &str)> {
    if let Some(inner) = s.strip_prefix('>') {
        let end = inner.find(']')?;
        return Some((clean_label(&inner[..end]), &inner[end + 1..]));
    }
    let mut depth = 0usize;
    let mut in_quote = false;
    for (i, c) in s.char_indices() {
        match c {
            '"' => in_quote = !in_quote,
            '[' | '(' | '{' if !in_quote => depth += 1,
            ']' | ')' | '}' if !in_quote => {
                depth = depth.saturating_sub(1);
                if depth == 0 {
                    let end = i + c.len_utf8();
                    return Some((clean_label(strip_shape(&s[..end])), &s[end..]));
                }
            }
            _ => {}
        }
    }
    None
}

fn strip_shape(raw: &str) -> &str {
    const SHAPES: &[(&str, &str)] = &[
        ("((", "))"),
        ("([", "])"),
        ("[[", "]]"),
        ("[(", ")]"),
        ("{{", "}}"),
        ("[/", "/]"),
        ("[\\", "\\]"),
        ("[/", "\\]"),
        ("[\\", "/]"),
        ("[", "]"),
        ("(", ")"),
        ("{", "}"),
    ];
    for (open, close) in SHAPES {
        if raw.len() >= open.len() + close.len() && raw.starts_with(open) && raw.ends_with(close) {
            return &raw[open.len()..raw.len() - close.len()];
        }
    }
    raw
}

fn clean_label(raw: &str) -> String {
    let label = raw.trim();
    let label = label
        .strip_prefix('"')
        .and_then(|l| l.strip_suffix('"'))
        .unwrap_or(label);
    label
        .replace("<br/>", " ")
        .replace("<br />", " ")
        .replace("<br>", " ")
        .trim()
        .to_string()
}

fn link_run_len(s: &str) -> usize {
    s.char_indices()
        .find(|(_, c)| !LINK_CHARS.contains(c))
        .map(|(i, _)| i)
        .unwrap_or(s.len())
}

/// Swallow an `x`/`o` arrow head directly after a link run.
fn skip_head(run: &str, rest: &str) -> usize {
    let open_ended = run.ends_with('-') || run.ends_with('=');
    let mut chars = rest.chars();
    match (chars.next(), chars.next()) {
        (Some('x' | 'o'), Some(c)) if open_ended && c.is_whitespace() => 1,
        _ => 0,
    }
}

/// Parse one link operator plus its optional label.
fn parse_link(s: &str) -> Option<(Option<String>, &str)> {
    let run_len = link_run_len(s);
    if run_len < 2 {
        return None;
    }
    let run = &s[..run_len];
    let mut rest = &s[run_len..];
    let head_len = skip_head(run, rest);
    rest = &rest[head_len..];

    let mut label = None;

    // `A -- text --> B`; `A --o B` is a complete link already.
    if head_len == 0 && matches!(run, "--" | "==" | "-.") {
        let close = ["--", "==", ".-"]
            .iter()
            .filter_map(|pat| rest.find(pat))
            .min()?;
        let text = rest[..close].trim();
        if !text.is_empty() {
            label = Some(clean_label(text));
        }
        let after = &rest[close..];
        let closer_len = link_run_len(after);
        let closer = &after[..closer_len];
        rest = &after[closer_len..];
        rest = &rest[skip_head(closer, rest)..];
    }

    // `A -->|text| B`
    let trimmed = rest.trim_start();
    if let Some(inner) = trimmed.strip_prefix('|') {
        let end = inner.find('|')?;
        let text = inner[..end].trim();
        if !text.is_empty() {
            label = Some(clean_label(text));
        }
        rest = &inner[end + 1..];
    }

    Some((label, rest))
}

// ---------------------------------------------------------------------------
// Outline
// ---------------------------------------------------------------------------

/// One row of the indented tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutlineLine {
    pub depth: usize,
    pub label: String,
    /// Label of the edge leading to this node.
    pub edge_label: Option<String>,
    /// Node was already drawn higher up; its children are not repeated.
    pub repeated: bool,
}

impl OutlineLine {
    pub fn display(&self) -> String {
        let indent = "   ".repeat(self.depth.saturating_sub(1));
        let branch = if self.depth > 0 { "└─ " } else { "" };
        let edge = self
            .edge_label
            .as_deref()
            .map(|l| format!("[{l}] "))
            .unwrap_or_default();
        let suffix = if self.repeated { " ↺" } else { "" };
        format!("{indent}{branch}{edge}{}{suffix}", self.label)
    }
}

/// Depth-first tree from every root (node without incoming edges). Nodes only
/// reachable through cycles are drawn afterwards as extra roots.
pub fn outline(chart: &Flowchart) -> Vec<OutlineLine> {
    let n = chart.nodes.len();
    let mut children: Vec<Vec<(usize, Option<String>)>> = vec![Vec::new(); n];
    let mut has_parent = vec![false; n];
    for edge in &chart.edges {
        let (Some(from), Some(to)) = (chart.index_of(&edge.from), chart.index_of(&edge.to)) else {
            continue;
        };
        children[from].push((to, edge.label.clone()));
        if from != to {
            has_parent[to] = true;
        }
    }

    let mut walker = Walker {
        chart,
        children: &children,
        visited: vec![false; n],
        lines: Vec::new(),
    };
    for root in (0..n).filter(|&i| !has_parent[i]) {
        walker.walk(root, 0, None);
    }
    for i in 0..n {
        if !walker.visited[i] {
            walker.walk(i, 0, None);
        }
    }
    walker.lines
}

struct Walker<'a> {
    chart: &'a Flowchart,
    children: &'a [Vec<(usize, Option<String>)>],
    visited: Vec<bool>,
    lines: Vec<OutlineLine>,
}

impl Walker<'_> {
    fn walk(&mut self, node: usize, depth: usize, edge_label: Option<String>) {
        let label = self.chart.nodes[node].label.clone();
        if self.visited[node] {
            self.lines.push(OutlineLine {
                depth,
                label,
                edge_label,
                repeated: true,
            });
            return;
        }
        self.visited[node] = true;
        self.lines.push(OutlineLine {
            depth,
            label,
            edge_label,
            repeated: false,
        });
        let children = self.children;
        for (child, label) in &children[node] {
            self.walk(*child, depth + 1, label.clone());
        }
    }
}

/// What the diagram panes show for a piece of Mermaid code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DiagramView {
    Outline(Vec<OutlineLine>),
    Raw(Vec<String>),
}

pub fn view(code: &str) -> DiagramView {
    match parse_flowchart(code) {
        Some(chart) => DiagramView::Outline(outline(&chart)),
        None => DiagramView::Raw(code.lines().map(str::to_string).collect()),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
