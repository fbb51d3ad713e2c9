use super::error::TopologyError;

/// One particle of a residue fragment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FragmentNode {
    pub name: String,
    pub markers: Vec<u32>, // Bond indices written as `[n]` after the name
    pub parent: Option<usize>,
    pub children: Vec<usize>,
}

/// Arena tree of the particles of a single residue fragment.
///
/// Nodes are stored in textual order, so a node's index is its offset from the
/// fragment's first particle in the coordinate table. The successor of a
/// particle in a `-` chain is its child, as is the first particle of every
/// branch opened directly after it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FragmentTree {
    nodes: Vec<FragmentNode>,
}

struct Parser<'a> {
    text: &'a str,
    bytes: &'a [u8],
    pos: usize,
    nodes: Vec<FragmentNode>,
}

impl<'a> Parser<'a> {
    fn new(text: &'a str) -> Self {
        Self {
            text,
            bytes: text.as_bytes(),
            pos: 0,
            nodes: Vec::new(),
        }
    }

    fn error(&self) -> TopologyError {
        TopologyError::MalformedFragment {
            fragment: self.text.to_string(),
            position: self.pos + 1,
        }
    }

    fn peek(&self) -> Option<u8> {
        self.bytes.get(self.pos).copied()
    }

    fn expect(&mut self, byte: u8) -> Result<(), TopologyError> {
        if self.peek() == Some(byte) {
            self.pos += 1;
            Ok(())
        } else {
            Err(self.error())
        }
    }

    fn particle(&mut self, parent: Option<usize>) -> Result<usize, TopologyError> {
        let start = self.pos;
        while self.peek().is_some_and(|b| b.is_ascii_alphanumeric()) {
            self.pos += 1;
        }
        if start == self.pos || !self.bytes[start].is_ascii_alphabetic() {
            self.pos = start;
            return Err(self.error());
        }
        let name = self.text[start..self.pos].to_string();

        let mut markers = Vec::new();
        while self.peek() == Some(b'[') {
            self.pos += 1;
            let digits_start = self.pos;
            while self.peek().is_some_and(|b| b.is_ascii_digit()) {
                self.pos += 1;
            }
            let index = self.text[digits_start..self.pos]
                .parse()
                .map_err(|_| self.error())?;
            self.expect(b']')?;
            markers.push(index);
        }

        let index = self.nodes.len();
        self.nodes.push(FragmentNode {
            name,
            markers,
            parent,
            children: Vec::new(),
        });
        if let Some(parent) = parent {
            self.nodes[parent].children.push(index);
        }
        Ok(index)
    }

    fn chain(&mut self, mut parent: Option<usize>) -> Result<(), TopologyError> {
        loop {
            let node = self.particle(parent)?;
            while self.peek() == Some(b'(') {
                self.pos += 1;
                self.chain(Some(node))?;
                self.expect(b')')?;
            }
            if self.peek() == Some(b'-') {
                self.pos += 1;
                parent = Some(node);
            } else {
                return Ok(());
            }
        }
    }
}

impl FragmentTree {
    /// Parses a residue fragment such as `Lys(Ks1-Ks2)-Ct` or `Cys(Css[1])`.
    pub fn parse(fragment: &str) -> Result<Self, TopologyError> {
        let mut parser = Parser::new(fragment.trim());
        parser.chain(None)?;
        if parser.pos != parser.bytes.len() {
            return Err(parser.error());
        }
        Ok(Self {
            nodes: parser.nodes,
        })
    }

    /// Parses an unbranched fragment back to front.
    ///
    /// Used for a chain's first residue when it is a single particle preceded by
    /// its N-terminal particle (`Nt-Ala`), so that the residue particle becomes the
    /// root.
    pub fn parse_reversed_linear(fragment: &str) -> Result<Self, TopologyError> {
        let mut nodes: Vec<FragmentNode> = Vec::new();
        for token in fragment.trim().rsplit('-') {
            let mut parser = Parser::new(token);
            let parent = nodes.len().checked_sub(1);
            parser.particle(None)?;
            if parser.pos != parser.bytes.len() {
                return Err(parser.error());
            }
            let Some(mut node) = parser.nodes.pop() else {
                return Err(parser.error());
            };
            node.parent = parent;
            let index = nodes.len();
            if let Some(parent) = parent {
                nodes[parent].children.push(index);
            }
            nodes.push(node);
        }
        Ok(Self { nodes })
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn nodes(&self) -> &[FragmentNode] {
        &self.nodes
    }

    pub fn node(&self, index: usize) -> Option<&FragmentNode> {
        self.nodes.get(index)
    }

    pub fn root(&self) -> Option<&FragmentNode> {
        self.nodes.first()
    }

    /// Relative offsets from node `index` to its neighbours: the parent first
    /// (negative), then the children in ascending order.
    pub fn connection_offsets(&self, index: usize) -> Vec<i64> {
        let Some(node) = self.nodes.get(index) else {
            return Vec::new();
        };
        let here = index as i64;
        node.parent
            .iter()
            .chain(node.children.iter())
            .map(|&other| other as i64 - here)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(tree: &FragmentTree) -> Vec<&str> {
        tree.nodes().iter().map(|n| n.name.as_str()).collect()
    }

    fn parents(tree: &FragmentTree) -> Vec<Option<usize>> {
        tree.nodes().iter().map(|n| n.parent).collect()
    }

    #[test]
    fn branch_and_terminal_tail_hang_off_the_backbone() {
        let tree = FragmentTree::parse("Lys(Ks1-Ks2)-Ct").unwrap();
        assert_eq!(names(&tree), vec!["Lys", "Ks1", "Ks2", "Ct"]);
        assert_eq!(parents(&tree), vec![None, Some(0), Some(1), Some(0)]);
        assert_eq!(tree.connection_offsets(0), vec![1, 3]);
        assert_eq!(tree.connection_offsets(2), vec![-1]);
        assert_eq!(tree.connection_offsets(3), vec![-3]);
    }

    #[test]
    fn sibling_branches_share_their_parent() {
        let tree = FragmentTree::parse("A(B)(C)-D").unwrap();
        assert_eq!(parents(&tree), vec![None, Some(0), Some(0), Some(0)]);
        assert_eq!(tree.connection_offsets(0), vec![1, 2, 3]);
        assert_eq!(tree.connection_offsets(2), vec![-2]);
    }

    #[test]
    fn nested_branches_chain_inside_the_branch() {
        let tree = FragmentTree::parse("Phe(Fs1(Fs2)-Fs3)").unwrap();
        assert_eq!(parents(&tree), vec![None, Some(0), Some(1), Some(1)]);
        assert_eq!(tree.connection_offsets(1), vec![-1, 1, 2]);
    }

    #[test]
    fn bond_markers_are_separated_from_names() {
        let tree = FragmentTree::parse("Cys[2](Css[1][13])").unwrap();
        assert_eq!(names(&tree), vec!["Cys", "Css"]);
        assert_eq!(tree.node(0).unwrap().markers, vec![2]);
        assert_eq!(tree.node(1).unwrap().markers, vec![1, 13]);
    }

    #[test]
    fn reversed_linear_fragment_roots_at_the_residue() {
        let tree = FragmentTree::parse_reversed_linear("Nt-Ala[1]").unwrap();
        assert_eq!(names(&tree), vec!["Ala", "Nt"]);
        assert_eq!(tree.root().unwrap().markers, vec![1]);
        assert_eq!(tree.connection_offsets(0), vec![1]);
        assert_eq!(tree.connection_offsets(1), vec![-1]);
    }

    #[test]
    fn malformed_fragments_report_a_position() {
        match FragmentTree::parse("Ala(Ks1") {
            Err(TopologyError::MalformedFragment { position, .. }) => assert_eq!(position, 8),
            other => panic!("unexpected result: {:?}", other),
        }
        assert!(FragmentTree::parse("Ala--Gly").is_err());
        assert!(FragmentTree::parse("Ala)").is_err());
        assert!(FragmentTree::parse("").is_err());
        assert!(FragmentTree::parse("Css[x]").is_err());
    }
}
