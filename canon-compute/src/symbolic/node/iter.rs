use super::Node;

/// An iterator that iteratively traverses the tree of nodes in left-to-right post-order (i.e.
/// depth-first).
///
/// This iterator is created by [`Node::post_order_iter`].
pub struct NodeIter<'a> {
    stack: Vec<&'a Node>,
    last_visited: Option<&'a Node>,
}

impl<'a> NodeIter<'a> {
    /// Creates a new iterator that traverses the tree of nodes in left-to-right post-order (i.e.
    /// depth-first).
    pub fn new(node: &'a Node) -> Self {
        Self {
            stack: vec![node],
            last_visited: None,
        }
    }

    /// Pops the current node in the stack and marks it as the last visited node.
    fn visit(&mut self) -> Option<&'a Node> {
        self.last_visited = Some(self.stack.pop()?);
        self.last_visited
    }

    /// Returns true if the given node matches the last visited node.
    fn is_last_visited(&self, node: &'a Node) -> bool {
        match self.last_visited {
            Some(last_visited) => std::ptr::eq(last_visited, node),
            None => false,
        }
    }

    /// Visits the node on top of the stack if all of its children have been visited, or pushes
    /// the children otherwise.
    fn descend(&mut self, children: impl DoubleEndedIterator<Item = &'a Node>) -> Option<Option<&'a Node>> {
        let mut children = children.rev().peekable();
        let finished = match children.peek() {
            Some(last) => self.is_last_visited(*last),
            None => true,
        };
        if finished {
            Some(self.visit())
        } else {
            self.stack.extend(children);
            None
        }
    }
}

impl<'a> Iterator for NodeIter<'a> {
    type Item = &'a Node;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let node = *self.stack.last()?;
            let visited = match node {
                Node::Number(_) | Node::Literal(_) | Node::Constant(_) => return self.visit(),
                Node::Sum(sum) => self.descend(sum.terms().iter().map(|term| &term.value)),
                Node::Product(product) => self.descend(product.factors().iter().map(|factor| &factor.value)),
                Node::Call(call) => self.descend(call.args.iter()),
            };
            if let Some(visited) = visited {
                return visited;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use super::*;

    #[test]
    fn post_order() {
        let node = Node::sum([
            Node::product([Node::literal("a"), Node::literal("b")]),
            Node::pow(Node::literal("c"), Node::int(2)),
        ]);
        let rendered = node.post_order_iter().map(|node| node.to_string()).collect::<Vec<_>>();
        assert_eq!(rendered, vec!["a", "b", "a*b", "c", "2", "c^2", "a*b+c^2"]);
    }

    #[test]
    fn empty_product_is_a_leaf() {
        let node = Node::product([]);
        assert_eq!(node.post_order_iter().count(), 1);
    }
}
