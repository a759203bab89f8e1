//--------------------------------------------------------------------
// rtree.rs
//--------------------------------------------------------------------
// An R-tree over bounding rectangles with quadratic node splitting.
// The nodes live in an arena and refer to each other by index
//--------------------------------------------------------------------

use crate::geometry::*;

// Bounds for the curve spans of a single polygon and for the triangles
// of a single batch
pub type SpanTree<T> = RTree<T, 8, 3>;
pub type BatchTree<T> = RTree<T, 16, 6>;

#[derive(Clone, Debug)]
struct Entry<T> { rect: Rect, item: T }

#[derive(Clone, Debug)]
enum NodeKind<T> {
    Leaf(Vec<Entry<T>>),
    Branch(Vec<usize>)
}

#[derive(Clone, Debug)]
struct Node<T> { rect: Rect, kind: NodeKind<T> }

#[derive(Clone, Debug)]
pub struct RTree<T, const MAX: usize, const MIN: usize> {
    nodes: Vec<Node<T>>,
    free: Vec<usize>,
    root: Option<usize>,
    len: usize
}

impl<T, const MAX: usize, const MIN: usize> Default for RTree<T, MAX, MIN> {
    fn default() -> Self { RTree { nodes: Vec::new(), free: Vec::new(), root: None, len: 0 } }
}

// Split a list of overfull entries in two, each getting at least `min` of them
fn quadratic_split<E>(mut entries: Vec<E>, min: usize, rect_of: impl Fn(&E) -> Rect) -> (Vec<E>, Vec<E>) {
    // Seeds: the pair that wastes the most area when put together
    let (mut s1, mut s2, mut worst) = (0, 1, -CoordM::INFINITY);
    for i in 0..entries.len() {
        for j in i + 1..entries.len() {
            let (ri, rj) = (rect_of(&entries[i]), rect_of(&entries[j]));
            let waste = ri.union(rj).area() - ri.area() - rj.area();
            if waste > worst { s1 = i; s2 = j; worst = waste; }
        }
    }

    // s2 > s1, so removing s2 first keeps s1 in place
    let e2 = entries.swap_remove(s2);
    let e1 = entries.swap_remove(s1);
    let (mut r1, mut r2) = (rect_of(&e1), rect_of(&e2));
    let (mut g1, mut g2) = (vec![e1], vec![e2]);

    while !entries.is_empty() {
        // One group needs everything that is left
        if g1.len() + entries.len() <= min {
            g1.append(&mut entries);
            break;
        }
        if g2.len() + entries.len() <= min {
            g2.append(&mut entries);
            break;
        }

        // Pick the entry with the strongest preference for a group
        let (mut next, mut best) = (0, -1.0);
        for (i, e) in entries.iter().enumerate() {
            let rc = rect_of(e);
            let diff = (r1.enlargement(rc) - r2.enlargement(rc)).abs();
            if diff > best { next = i; best = diff; }
        }

        let e = entries.swap_remove(next);
        let rc = rect_of(&e);
        let (d1, d2) = (r1.enlargement(rc), r2.enlargement(rc));
        let to_first = if d1 != d2 { d1 < d2 }
            else if r1.area() != r2.area() { r1.area() < r2.area() }
            else { g1.len() <= g2.len() };

        if to_first { r1 = r1.union(rc); g1.push(e); }
        else { r2 = r2.union(rc); g2.push(e); }
    }

    (g1, g2)
}

impl<T, const MAX: usize, const MIN: usize> RTree<T, MAX, MIN> {
    pub fn new() -> Self { Default::default() }

    pub fn len(&self) -> usize { self.len }
    pub fn is_empty(&self) -> bool { self.len == 0 }

    pub fn clear(&mut self) {
        self.nodes.clear();
        self.free.clear();
        self.root = None;
        self.len = 0;
    }

    // The rectangle enclosing everything in the tree
    pub fn bounds(&self) -> Option<Rect> { self.root.map(|r| self.node(r).rect) }

    fn node(&self, n: usize) -> &Node<T> { &self.nodes[n] }
    fn node_mut(&mut self, n: usize) -> &mut Node<T> { &mut self.nodes[n] }

    fn alloc(&mut self, node: Node<T>) -> usize {
        match self.free.pop() {
            Some(n) => { self.nodes[n] = node; n }
            None => { self.nodes.push(node); self.nodes.len() - 1 }
        }
    }

    // The slot is left holding an empty leaf until it is reused
    fn release(&mut self, n: usize) -> Node<T> {
        debug_assert!(!self.free.contains(&n), "R-tree node {} freed twice", n);
        self.free.push(n);
        let empty = Node { rect: self.nodes[n].rect, kind: NodeKind::Leaf(Vec::new()) };
        std::mem::replace(&mut self.nodes[n], empty)
    }

    fn recompute_rect(&mut self, n: usize) {
        let rect = match &self.node(n).kind {
            NodeKind::Leaf(entries) => entries.iter().map(|e| e.rect).fold(None, |acc: Option<Rect>, r| Some(acc.map_or(r, |a| a.union(r)))),
            NodeKind::Branch(children) => children.iter().map(|&c| self.node(c).rect).fold(None, |acc: Option<Rect>, r| Some(acc.map_or(r, |a| a.union(r))))
        };
        if let Some(rect) = rect { self.node_mut(n).rect = rect; }
    }

    pub fn insert(&mut self, rect: Rect, item: T) {
        self.len += 1;
        let root = match self.root {
            Some(root) => root,
            None => {
                let root = self.alloc(Node { rect, kind: NodeKind::Leaf(Vec::new()) });
                self.root = Some(root);
                root
            }
        };

        // The root split, so the tree grows one level
        if let Some(sibling) = self.insert_into(root, rect, item) {
            let rect = self.node(root).rect.union(self.node(sibling).rect);
            let root = self.alloc(Node { rect, kind: NodeKind::Branch(vec![root, sibling]) });
            self.root = Some(root);
        }
    }

    // Returns the new sibling of n if n had to be split
    fn insert_into(&mut self, n: usize, rect: Rect, item: T) -> Option<usize> {
        let grown = if self.node(n).is_empty_leaf() { rect } else { self.node(n).rect.union(rect) };
        self.node_mut(n).rect = grown;

        let child = match &self.node(n).kind {
            NodeKind::Leaf(_) => None,
            NodeKind::Branch(children) => {
                // Least enlargement, then smallest area
                let key = |c: usize| {
                    let r = self.node(c).rect;
                    (r.enlargement(rect), r.area())
                };
                children.iter().cloned().min_by(|&a, &b| key(a).partial_cmp(&key(b)).unwrap_or(std::cmp::Ordering::Equal))
            }
        };

        match child {
            None => {
                let full = match &mut self.node_mut(n).kind {
                    NodeKind::Leaf(entries) => { entries.push(Entry { rect, item }); entries.len() > MAX }
                    NodeKind::Branch(_) => unreachable!()
                };
                if full { Some(self.split(n)) } else { None }
            }
            Some(child) => {
                let sibling = self.insert_into(child, rect, item)?;
                let full = match &mut self.node_mut(n).kind {
                    NodeKind::Branch(children) => { children.push(sibling); children.len() > MAX }
                    NodeKind::Leaf(_) => unreachable!()
                };
                if full { Some(self.split(n)) } else { None }
            }
        }
    }

    // Move half of the overfull node n into a new sibling, which is returned
    fn split(&mut self, n: usize) -> usize {
        let kind = std::mem::replace(&mut self.node_mut(n).kind, NodeKind::Branch(Vec::new()));
        let (kind1, kind2) = match kind {
            NodeKind::Leaf(entries) => {
                let (g1, g2) = quadratic_split(entries, MIN, |e| e.rect);
                (NodeKind::Leaf(g1), NodeKind::Leaf(g2))
            }
            NodeKind::Branch(children) => {
                let rects: Vec<_> = children.iter().map(|&c| (c, self.node(c).rect)).collect();
                let (g1, g2) = quadratic_split(rects, MIN, |&(_, r)| r);
                (NodeKind::Branch(g1.into_iter().map(|(c, _)| c).collect()),
                    NodeKind::Branch(g2.into_iter().map(|(c, _)| c).collect()))
            }
        };

        self.node_mut(n).kind = kind1;
        self.recompute_rect(n);
        let rect = self.node(n).rect;
        let sibling = self.alloc(Node { rect, kind: kind2 });
        self.recompute_rect(sibling);
        sibling
    }

    // Visit every entry whose rectangle intersects rect
    pub fn query_with<F: FnMut(Rect, &T)>(&self, rect: Rect, mut visit: F) {
        let mut stack: Vec<usize> = self.root.into_iter().collect();
        while let Some(n) = stack.pop() {
            let node = self.node(n);
            if !node.rect.intersects(rect) { continue; }
            match &node.kind {
                NodeKind::Leaf(entries) => for e in entries.iter().filter(|e| e.rect.intersects(rect)) {
                    visit(e.rect, &e.item);
                }
                NodeKind::Branch(children) => stack.extend(children.iter().cloned())
            }
        }
    }

    pub fn query(&self, rect: Rect) -> Vec<T> where T: Clone {
        let mut found = Vec::new();
        self.query_with(rect, |_, item| found.push(item.clone()));
        found
    }

    // Every entry stored, with its rectangle
    pub fn entries(&self) -> Vec<(Rect, &T)> {
        let mut all = Vec::with_capacity(self.len);
        let mut stack: Vec<usize> = self.root.into_iter().collect();
        while let Some(n) = stack.pop() {
            match &self.node(n).kind {
                NodeKind::Leaf(entries) => all.extend(entries.iter().map(|e| (e.rect, &e.item))),
                NodeKind::Branch(children) => stack.extend(children.iter().cloned())
            }
        }
        all
    }

    // Remove the entry holding item, looked for under rect. Nodes left
    // with too few entries are dissolved and their entries inserted again
    pub fn remove(&mut self, rect: Rect, item: &T) -> bool where T: PartialEq {
        let root = match self.root { Some(root) => root, None => return false };
        let path = match self.find_leaf(root, rect, item) { Some(path) => path, None => return false };

        let leaf = path[path.len() - 1];
        if let NodeKind::Leaf(entries) = &mut self.node_mut(leaf).kind {
            if let Some(i) = entries.iter().position(|e| e.item == *item) { entries.remove(i); }
        }
        self.len -= 1;

        // Condense the tree from the leaf upwards
        let mut orphans = Vec::new();
        for k in (1..path.len()).rev() {
            let (n, parent) = (path[k], path[k - 1]);
            if self.node(n).kind.len() < MIN {
                if let NodeKind::Branch(children) = &mut self.node_mut(parent).kind {
                    children.retain(|&c| c != n);
                }
                self.collect_entries(n, &mut orphans);
            }
            else { self.recompute_rect(n); }
        }
        self.recompute_rect(root);

        // A branch root with a single child gives its place to that child
        loop {
            let root = match self.root { Some(root) => root, None => break };
            let next = match &self.node(root).kind {
                NodeKind::Branch(children) if children.len() == 1 => Some(children[0]),
                NodeKind::Branch(children) if children.is_empty() => None,
                NodeKind::Leaf(entries) if entries.is_empty() => None,
                _ => break
            };
            self.release(root);
            self.root = next;
        }

        debug!("R-tree removal reinserts {} entries", orphans.len());
        for e in orphans {
            self.len -= 1;
            self.insert(e.rect, e.item);
        }

        true
    }

    // The chain of nodes from n down to the leaf holding item
    fn find_leaf(&self, n: usize, rect: Rect, item: &T) -> Option<Vec<usize>> where T: PartialEq {
        let node = self.node(n);
        if !node.rect.intersects(rect) { return None; }
        match &node.kind {
            NodeKind::Leaf(entries) => {
                if entries.iter().any(|e| e.item == *item) { Some(vec![n]) } else { None }
            }
            NodeKind::Branch(children) => children.iter().find_map(|&c| {
                self.find_leaf(c, rect, item).map(|mut path| { path.insert(0, n); path })
            })
        }
    }

    // Free the subtree under n, gathering its entries
    fn collect_entries(&mut self, n: usize, out: &mut Vec<Entry<T>>) {
        match self.release(n).kind {
            NodeKind::Leaf(entries) => out.extend(entries),
            NodeKind::Branch(children) => for c in children { self.collect_entries(c, out); }
        }
    }

    // Panics if a node breaks the occupancy bounds, if its rectangle does not
    // enclose its children, or if leaves sit at different depths
    pub fn check_structure(&self) {
        let root = match self.root {
            Some(root) => root,
            None => { assert_eq!(self.len, 0, "Empty R-tree reports {} entries", self.len); return; }
        };

        let mut leaf_depth = None;
        let mut count = 0;
        let mut stack = vec![(root, 0)];
        while let Some((n, depth)) = stack.pop() {
            let node = self.node(n);
            let size = node.kind.len();
            assert!(size <= MAX, "R-tree node {} holds {} entries, more than {}", n, size, MAX);
            if n != root { assert!(size >= MIN, "R-tree node {} holds {} entries, fewer than {}", n, size, MIN); }

            match &node.kind {
                NodeKind::Leaf(entries) => {
                    for e in entries {
                        assert!(node.rect.contains_rect(e.rect), "R-tree leaf {} does not enclose {}", n, e.rect);
                    }
                    count += entries.len();
                    match leaf_depth {
                        None => leaf_depth = Some(depth),
                        Some(d) => assert_eq!(d, depth, "R-tree leaves at depths {} and {}", d, depth)
                    }
                }
                NodeKind::Branch(children) => for &c in children {
                    assert!(node.rect.contains_rect(self.node(c).rect), "R-tree node {} does not enclose node {}", n, c);
                    stack.push((c, depth + 1));
                }
            }
        }

        assert_eq!(count, self.len, "R-tree holds {} entries but reports {}", count, self.len);
    }
}

impl<T> NodeKind<T> {
    fn len(&self) -> usize {
        match self {
            NodeKind::Leaf(entries) => entries.len(),
            NodeKind::Branch(children) => children.len()
        }
    }
}

impl<T> Node<T> {
    fn is_empty_leaf(&self) -> bool {
        match &self.kind {
            NodeKind::Leaf(entries) => entries.is_empty(),
            _ => false
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn cell(i: usize) -> Rect {
        let (x, y) = ((i % 10) as Coord, (i / 10) as Coord);
        Rect::new(x * 10.0, y * 10.0, 8.0, 8.0)
    }

    #[test]
    fn test_insert_and_query() {
        let mut tree = SpanTree::new();
        for i in 0..100 { tree.insert(cell(i), i); }
        tree.check_structure();
        assert_eq!(tree.len(), 100);

        let mut found = tree.query(Rect::new(15.0, 15.0, 10.0, 10.0));
        found.sort();
        assert_eq!(found, vec![11, 12, 21, 22]);

        assert!(tree.query(Rect::new(-20.0, -20.0, 5.0, 5.0)).is_empty());
        assert_eq!(tree.bounds(), Some(Rect::new(0.0, 0.0, 98.0, 98.0)));
    }

    #[test]
    fn test_touching_rects_are_found() {
        let mut tree = BatchTree::new();
        tree.insert(Rect::new(0.0, 0.0, 10.0, 10.0), 'a');
        assert_eq!(tree.query(Rect::new(10.0, 10.0, 5.0, 5.0)), vec!['a']);
    }

    #[test]
    fn test_remove_condenses() {
        let mut tree = SpanTree::new();
        for i in 0..60 { tree.insert(cell(i), i); }

        for i in (0..60).filter(|i| i % 3 != 0) {
            assert!(tree.remove(cell(i), &i), "Entry {} could not be removed", i);
            tree.check_structure();
        }
        assert_eq!(tree.len(), 20);
        assert!(!tree.remove(cell(1), &1));

        let mut left: Vec<_> = tree.entries().into_iter().map(|(_, &i)| i).collect();
        left.sort();
        assert_eq!(left, (0..60).filter(|i| i % 3 == 0).collect::<Vec<_>>());

        for i in (0..60).filter(|i| i % 3 == 0) { tree.remove(cell(i), &i); }
        assert!(tree.is_empty());
        assert_eq!(tree.bounds(), None);
        tree.check_structure();
    }

    #[test]
    fn test_split_keeps_minimum() {
        let mut tree = RTree::<usize, 4, 2>::new();
        for i in 0..5 { tree.insert(Rect::new(i as Coord * 100.0, 0.0, 1.0, 1.0), i); }
        tree.check_structure();
        assert_eq!(tree.len(), 5);
    }
}
