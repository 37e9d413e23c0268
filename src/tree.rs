/// Whether a [`Node`] becomes a directory or a file on disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    Directory,
    File,
}

/// A single entry of a parsed tree, staged in memory before it is written to disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Directory(Directory),
    File(File),
}
impl Node {
    pub fn name(&self) -> &str {
        match self {
            Self::Directory(dir) => &dir.name,
            Self::File(file) => &file.name,
        }
    }

    pub fn kind(&self) -> NodeKind {
        match self {
            Self::Directory(_) => NodeKind::Directory,
            Self::File(_) => NodeKind::File,
        }
    }
}
impl From<Directory> for Node {
    fn from(value: Directory) -> Self {
        Self::Directory(value)
    }
}
impl From<File> for Node {
    fn from(value: File) -> Self {
        Self::File(value)
    }
}

/// A directory and its children, kept in the order they appeared in the source text.
///
/// The root of every parse is a `Directory`, so the type system rules out a file root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Directory {
    pub name: String,
    pub children: Vec<Node>,
}
impl Directory {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            children: Vec::new(),
        }
    }

    pub fn push(&mut self, node: impl Into<Node>) {
        self.children.push(node.into());
    }

    /// Builder-style [`Directory::push`], handy for spelling out expected trees.
    pub fn with(mut self, node: impl Into<Node>) -> Self {
        self.push(node);
        self
    }

    /// Number of nodes below this directory, at any depth.
    pub fn len(&self) -> usize {
        self.children
            .iter()
            .map(|child| match child {
                Node::Directory(dir) => 1 + dir.len(),
                Node::File(_) => 1,
            })
            .sum()
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    /// Pre-order walk over every descendant, paired with its depth (direct children are depth 1).
    pub fn depth_first(&self) -> DepthFirst<'_> {
        DepthFirst {
            stack: self.children.iter().rev().map(|node| (1, node)).collect(),
        }
    }
}

/// A file, optionally seeded with literal content. `None` means an empty file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct File {
    pub name: String,
    pub content: Option<String>,
}
impl File {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            content: None,
        }
    }

    pub fn with_content(name: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            content: Some(content.into()),
        }
    }
}

/// Iterator returned by [`Directory::depth_first`].
pub struct DepthFirst<'a> {
    stack: Vec<(usize, &'a Node)>,
}
impl<'a> Iterator for DepthFirst<'a> {
    type Item = (usize, &'a Node);

    fn next(&mut self) -> Option<Self::Item> {
        let (depth, node) = self.stack.pop()?;

        if let Node::Directory(dir) = node {
            self.stack
                .extend(dir.children.iter().rev().map(|child| (depth + 1, child)));
        }

        Some((depth, node))
    }
}
