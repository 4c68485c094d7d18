use crate::tree::SpanningTree;

/// Check if `population` lies within `target * epsilon` of `target`.
#[inline]
pub(crate) fn within_tolerance(population: f64, target: f64, epsilon: f64) -> bool {
    (population - target).abs() <= target * epsilon
}

/// A spanning tree rooted at a chosen node, with cut-friendly preorder slices.
#[derive(Clone, Debug)]
pub struct RootedTree {
    root: usize,
    parent: Vec<usize>,     // parent[root] = root
    order: Vec<usize>,      // preorder over all nodes
    index: Vec<usize>,      // position of each node in `order`
    size: Vec<usize>,       // subtree sizes
    population: Vec<f64>,   // subtree populations
}

impl RootedTree {
    /// Root `tree` at `root` and aggregate subtree sizes and populations.
    ///
    /// Uses an explicit stack: a node is entered once to record its preorder position and
    /// push its children, and resolved once all of its children have been resolved.
    fn new(tree: &SpanningTree, population: &[f64], root: usize) -> Self {
        let n = tree.node_count();
        assert!(root < n, "root {} out of range", root);

        let mut parent = vec![usize::MAX; n];
        let mut order = Vec::with_capacity(n);
        let mut index = vec![usize::MAX; n];
        let mut size = vec![0; n];
        let mut subtree = vec![0.0; n];

        parent[root] = root;
        let mut stack = vec![(root, false)];
        while let Some((u, resolved)) = stack.pop() {
            if !resolved {
                index[u] = order.len();
                order.push(u);
                stack.push((u, true));
                for v in tree.neighbors(u) {
                    if v != parent[u] {
                        parent[v] = u;
                        stack.push((v, false));
                    }
                }
            } else {
                size[u] = 1;
                subtree[u] = population[u];
                for v in tree.neighbors(u).filter(|&v| v != parent[u]) {
                    size[u] += size[v];
                    subtree[u] += subtree[v];
                }
            }
        }
        debug_assert!(order.len() == n, "tree does not span all {} nodes", n);

        Self { root, parent, order, index, size, population: subtree }
    }

    /// Get the root node.
    #[inline] pub fn root(&self) -> usize { self.root }

    /// Get the parent of a node, or None for the root.
    #[inline]
    pub fn parent(&self, node: usize) -> Option<usize> {
        (node != self.root).then_some(self.parent[node])
    }

    /// Preorder over all nodes; `order()[0]` is the root.
    #[inline] pub fn order(&self) -> &[usize] { &self.order }

    /// Nodes in the subtree hanging below (and including) `node`.
    #[inline]
    pub fn subtree(&self, node: usize) -> &[usize] {
        let start = self.index[node];
        &self.order[start .. start + self.size[node]]
    }

    /// Check if `node` lies in the subtree of `ancestor`.
    #[inline]
    pub fn in_subtree(&self, node: usize, ancestor: usize) -> bool {
        let start = self.index[ancestor];
        (start .. start + self.size[ancestor]).contains(&self.index[node])
    }

    /// Population of the subtree below (and including) `node`.
    #[inline] pub fn subtree_population(&self, node: usize) -> f64 { self.population[node] }
}

/// A spanning tree annotated with node populations and a balance window.
#[derive(Clone, Debug)]
pub struct PopulatedTree<'a> {
    tree: &'a SpanningTree,
    population: &'a [f64],
    total: f64,
    target: f64,
    epsilon: f64,
    rooted: Option<RootedTree>,
}

impl<'a> PopulatedTree<'a> {
    /// Wrap `tree` with per-node populations, a population target, and a relative tolerance.
    pub fn new(tree: &'a SpanningTree, population: &'a [f64], target: f64, epsilon: f64) -> Self {
        assert!(population.len() == tree.node_count(), "population.len() must equal tree.node_count()");
        Self { tree, population, total: population.iter().sum(), target, epsilon, rooted: None }
    }

    /// Get the underlying spanning tree.
    #[inline] pub fn tree(&self) -> &'a SpanningTree { self.tree }

    /// Get the population of a single node.
    #[inline] pub fn population(&self, node: usize) -> f64 { self.population[node] }

    /// Sum of all node populations.
    #[inline] pub fn total_population(&self) -> f64 { self.total }

    #[inline] pub fn target(&self) -> f64 { self.target }

    #[inline] pub fn epsilon(&self) -> f64 { self.epsilon }

    /// Check if a side with population `population` is within `epsilon * target` of target.
    #[inline]
    pub fn is_balanced(&self, population: f64) -> bool {
        within_tolerance(population, self.target, self.epsilon)
    }

    /// Root the tree at `root`, reusing the previous rooting if the root is unchanged.
    pub fn root_at(&mut self, root: usize) -> &RootedTree {
        let rooted = match self.rooted.take() {
            Some(rooted) if rooted.root == root => rooted,
            _ => RootedTree::new(self.tree, self.population, root),
        };
        self.rooted.insert(rooted)
    }

    /// Population of the subtree below `node` when the tree is rooted at `root`.
    pub fn subtree_population(&mut self, node: usize, root: usize) -> f64 {
        self.root_at(root).subtree_population(node)
    }
}
