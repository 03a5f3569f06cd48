//! Segment trie with backtracking search.
//!
//! # Responsibilities
//! - Insert a pattern one segment per level
//! - Search a path depth-first, backtracking over every matching child
//!
//! # Design Decisions
//! - Children keep insertion order; the first successful branch wins
//! - A child matches a segment if its text is equal or it is a wildcard
//!   (`:name` or `*name`), both on insert and on search
//! - A `*name` node matches whatever depth remains
//! - Only nodes carrying a full pattern terminate a search

/// One segment of a registered pattern.
#[derive(Debug, Default, Clone)]
pub struct Node {
    /// Complete pattern, set only on nodes that end a registered route.
    pattern: String,
    /// This node's segment, e.g. `:lang`, `*filepath` or `docs`.
    part: String,
    children: Vec<Node>,
    is_wild: bool,
}

impl Node {
    /// Create an empty root node.
    pub fn new() -> Self {
        Self::default()
    }

    fn segment(part: &str) -> Self {
        Self {
            pattern: String::new(),
            part: part.to_string(),
            children: Vec::new(),
            is_wild: part.starts_with(':') || part.starts_with('*'),
        }
    }

    /// Full pattern of the route ending here, empty for intermediate nodes.
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    pub fn part(&self) -> &str {
        &self.part
    }

    pub fn is_wild(&self) -> bool {
        self.is_wild
    }

    pub fn children(&self) -> &[Node] {
        &self.children
    }

    fn matches(&self, part: &str) -> bool {
        self.part == part || self.is_wild
    }

    /// Insert `parts[height..]` below this node, marking the last node with `pattern`.
    pub fn insert(&mut self, pattern: &str, parts: &[&str], height: usize) {
        if parts.len() == height {
            self.pattern = pattern.to_string();
            return;
        }

        let part = parts[height];
        let index = match self.children.iter().position(|child| child.matches(part)) {
            Some(index) => index,
            None => {
                self.children.push(Node::segment(part));
                self.children.len() - 1
            }
        };
        self.children[index].insert(pattern, parts, height + 1);
    }

    /// Find the terminal node matching `parts[height..]`.
    pub fn search(&self, parts: &[&str], height: usize) -> Option<&Node> {
        if parts.len() == height || self.part.starts_with('*') {
            if self.pattern.is_empty() {
                return None;
            }
            return Some(self);
        }

        let part = parts[height];
        self.children
            .iter()
            .filter(|child| child.matches(part))
            .find_map(|child| child.search(parts, height + 1))
    }

    /// Number of nodes in this subtree, including this one.
    pub fn len(&self) -> usize {
        1 + self.children.iter().map(Node::len).sum::<usize>()
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty() && self.pattern.is_empty()
    }
}
