//! Static algorithm catalog: identities, categories, operations, metadata.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::UnknownName;

/// Algorithm family. Drives step-generator dispatch and which operations
/// a front end offers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Tree,
    Graph,
    Dp,
    Sorting,
}

impl Category {
    /// All categories in display order.
    pub const ALL: [Category; 4] = [
        Category::Tree,
        Category::Graph,
        Category::Dp,
        Category::Sorting,
    ];

    /// Wire name of this category.
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Tree => "tree",
            Category::Graph => "graph",
            Category::Dp => "dp",
            Category::Sorting => "sorting",
        }
    }

    /// Operations a front end offers for algorithms in this category.
    pub fn operations(&self) -> &'static [Operation] {
        use Operation::*;
        match self {
            Category::Tree => &[Insert, Delete, Search, Traverse],
            Category::Graph => &[AddNode, AddEdge, RemoveNode, RemoveEdge, FindPath, Traverse],
            Category::Dp => &[Calculate, Optimize],
            Category::Sorting => &[Sort, Partition],
        }
    }

    /// Whether `operation` is offered for this category.
    pub fn supports(&self, operation: Operation) -> bool {
        self.operations().contains(&operation)
    }

    /// Algorithms belonging to this category, in catalog order.
    pub fn kinds(&self) -> impl Iterator<Item = AlgorithmKind> + '_ {
        AlgorithmKind::ALL
            .into_iter()
            .filter(move |kind| kind.category() == *self)
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A fixed algorithm or data-structure identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlgorithmKind {
    Bst,
    Avl,
    Heap,
    Dfs,
    Bfs,
    Dijkstra,
    Kruskal,
    Prim,
    Fibonacci,
    Knapsack,
    Lcs,
    QuickSort,
    MergeSort,
    HeapSort,
}

impl AlgorithmKind {
    /// Every identity, in catalog order.
    pub const ALL: [AlgorithmKind; 14] = [
        AlgorithmKind::Bst,
        AlgorithmKind::Avl,
        AlgorithmKind::Heap,
        AlgorithmKind::Dfs,
        AlgorithmKind::Bfs,
        AlgorithmKind::Dijkstra,
        AlgorithmKind::Kruskal,
        AlgorithmKind::Prim,
        AlgorithmKind::Fibonacci,
        AlgorithmKind::Knapsack,
        AlgorithmKind::Lcs,
        AlgorithmKind::QuickSort,
        AlgorithmKind::MergeSort,
        AlgorithmKind::HeapSort,
    ];

    /// Wire name of this identity.
    pub fn as_str(&self) -> &'static str {
        match self {
            AlgorithmKind::Bst => "bst",
            AlgorithmKind::Avl => "avl",
            AlgorithmKind::Heap => "heap",
            AlgorithmKind::Dfs => "dfs",
            AlgorithmKind::Bfs => "bfs",
            AlgorithmKind::Dijkstra => "dijkstra",
            AlgorithmKind::Kruskal => "kruskal",
            AlgorithmKind::Prim => "prim",
            AlgorithmKind::Fibonacci => "fibonacci",
            AlgorithmKind::Knapsack => "knapsack",
            AlgorithmKind::Lcs => "lcs",
            AlgorithmKind::QuickSort => "quicksort",
            AlgorithmKind::MergeSort => "mergesort",
            AlgorithmKind::HeapSort => "heapsort",
        }
    }

    /// Metadata for this identity.
    pub fn info(&self) -> &'static AlgorithmInfo {
        // CATALOG is laid out in the same order as ALL.
        &CATALOG[*self as usize]
    }

    pub fn category(&self) -> Category {
        self.info().category
    }

    pub fn name(&self) -> &'static str {
        self.info().name
    }
}

impl fmt::Display for AlgorithmKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AlgorithmKind {
    type Err = UnknownName;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        AlgorithmKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| UnknownName::algorithm(s))
    }
}

/// An operation a user can trigger on the selected algorithm.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Operation {
    Insert,
    Delete,
    Search,
    Traverse,
    AddNode,
    AddEdge,
    RemoveNode,
    RemoveEdge,
    FindPath,
    Calculate,
    Optimize,
    Sort,
    Partition,
}

impl Operation {
    pub const ALL: [Operation; 13] = [
        Operation::Insert,
        Operation::Delete,
        Operation::Search,
        Operation::Traverse,
        Operation::AddNode,
        Operation::AddEdge,
        Operation::RemoveNode,
        Operation::RemoveEdge,
        Operation::FindPath,
        Operation::Calculate,
        Operation::Optimize,
        Operation::Sort,
        Operation::Partition,
    ];

    /// Wire name of this operation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Operation::Insert => "insert",
            Operation::Delete => "delete",
            Operation::Search => "search",
            Operation::Traverse => "traverse",
            Operation::AddNode => "addNode",
            Operation::AddEdge => "addEdge",
            Operation::RemoveNode => "removeNode",
            Operation::RemoveEdge => "removeEdge",
            Operation::FindPath => "findPath",
            Operation::Calculate => "calculate",
            Operation::Optimize => "optimize",
            Operation::Sort => "sort",
            Operation::Partition => "partition",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Operation {
    type Err = UnknownName;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Operation::ALL
            .into_iter()
            .find(|op| op.as_str() == s)
            .ok_or_else(|| UnknownName::operation(s))
    }
}

/// Language a code view is written in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImplementationLanguage {
    #[default]
    Cpp,
    Js,
}

/// Asymptotic cost, as free-form display strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Complexity {
    pub time: &'static str,
    pub space: &'static str,
}

/// Read-only metadata describing one algorithm identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AlgorithmInfo {
    #[serde(rename = "type")]
    pub kind: AlgorithmKind,
    pub name: &'static str,
    pub category: Category,
    pub description: &'static str,
    pub complexity: Complexity,
}

const fn entry(
    kind: AlgorithmKind,
    name: &'static str,
    category: Category,
    description: &'static str,
    time: &'static str,
    space: &'static str,
) -> AlgorithmInfo {
    AlgorithmInfo {
        kind,
        name,
        category,
        description,
        complexity: Complexity { time, space },
    }
}

static CATALOG: [AlgorithmInfo; 14] = [
    entry(
        AlgorithmKind::Bst,
        "Binary Search Tree",
        Category::Tree,
        "A binary search tree is a node-based binary tree where every node's left subtree holds only smaller values and its right subtree only larger values.",
        "O(log n)",
        "O(h)",
    ),
    entry(
        AlgorithmKind::Avl,
        "AVL Tree",
        Category::Tree,
        "An AVL tree is a self-balancing binary search tree in which the heights of the two child subtrees of any node differ by at most one.",
        "O(log n)",
        "O(h)",
    ),
    entry(
        AlgorithmKind::Heap,
        "Heap",
        Category::Tree,
        "A heap is a tree-based structure satisfying the heap property: every parent is ordered with respect to its children.",
        "O(log n)",
        "O(1)",
    ),
    entry(
        AlgorithmKind::Dfs,
        "Depth-First Search",
        Category::Graph,
        "Depth-first search traverses a graph by exploring as far as possible along each branch before backtracking.",
        "O(V + E)",
        "O(V)",
    ),
    entry(
        AlgorithmKind::Bfs,
        "Breadth-First Search",
        Category::Graph,
        "Breadth-first search traverses a graph by visiting every neighbor at the current depth before moving to the next depth level.",
        "O(V + E)",
        "O(V)",
    ),
    entry(
        AlgorithmKind::Dijkstra,
        "Dijkstra's Algorithm",
        Category::Graph,
        "Dijkstra's algorithm finds the shortest paths from a source vertex to every other vertex in a graph with non-negative edge weights.",
        "O(E log V)",
        "O(V)",
    ),
    entry(
        AlgorithmKind::Kruskal,
        "Kruskal's Algorithm",
        Category::Graph,
        "Kruskal's algorithm builds a minimum spanning tree of a connected weighted graph by adding edges in order of increasing cost.",
        "O(E log E)",
        "O(V)",
    ),
    entry(
        AlgorithmKind::Prim,
        "Prim's Algorithm",
        Category::Graph,
        "Prim's algorithm builds a minimum spanning tree of a weighted undirected graph by growing a single tree one edge at a time.",
        "O(E log V)",
        "O(V)",
    ),
    entry(
        AlgorithmKind::Fibonacci,
        "Fibonacci",
        Category::Dp,
        "The Fibonacci sequence starts from 0 and 1, and every later number is the sum of the two preceding ones.",
        "O(n)",
        "O(n)",
    ),
    entry(
        AlgorithmKind::Knapsack,
        "Knapsack Problem",
        Category::Dp,
        "The knapsack problem maximizes the total value of items packed into a knapsack without exceeding its weight capacity.",
        "O(nW)",
        "O(nW)",
    ),
    entry(
        AlgorithmKind::Lcs,
        "Longest Common Subsequence",
        Category::Dp,
        "The longest common subsequence problem finds the longest subsequence shared by all sequences in a set.",
        "O(m*n)",
        "O(m*n)",
    ),
    entry(
        AlgorithmKind::QuickSort,
        "QuickSort",
        Category::Sorting,
        "QuickSort is a divide-and-conquer sort that partitions the array around a pivot element and sorts each side.",
        "O(n log n)",
        "O(log n)",
    ),
    entry(
        AlgorithmKind::MergeSort,
        "MergeSort",
        Category::Sorting,
        "MergeSort divides the array into two halves, sorts each half, and then merges the sorted halves.",
        "O(n log n)",
        "O(n)",
    ),
    entry(
        AlgorithmKind::HeapSort,
        "HeapSort",
        Category::Sorting,
        "HeapSort builds a binary max-heap from the array and repeatedly moves the largest element to the end.",
        "O(n log n)",
        "O(1)",
    ),
];

/// The full catalog, in display order.
pub fn catalog() -> &'static [AlgorithmInfo] {
    &CATALOG
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalog_order_matches_kinds() {
        for kind in AlgorithmKind::ALL {
            assert_eq!(kind.info().kind, kind);
        }
        assert_eq!(catalog().len(), AlgorithmKind::ALL.len());
    }

    #[test]
    fn every_category_has_kinds_and_operations() {
        for category in Category::ALL {
            assert!(category.kinds().count() >= 3, "{category} has too few kinds");
            assert!(!category.operations().is_empty());
        }
    }

    #[test]
    fn kinds_map_to_expected_categories() {
        assert_eq!(AlgorithmKind::Bst.category(), Category::Tree);
        assert_eq!(AlgorithmKind::Prim.category(), Category::Graph);
        assert_eq!(AlgorithmKind::Lcs.category(), Category::Dp);
        assert_eq!(AlgorithmKind::HeapSort.category(), Category::Sorting);
    }

    #[test]
    fn supports_follows_operation_table() {
        assert!(Category::Tree.supports(Operation::Insert));
        assert!(Category::Graph.supports(Operation::Traverse));
        assert!(!Category::Dp.supports(Operation::Sort));
        assert!(!Category::Sorting.supports(Operation::Insert));
    }

    #[test]
    fn wire_names_parse_back() {
        assert_eq!("quicksort".parse::<AlgorithmKind>().unwrap(), AlgorithmKind::QuickSort);
        assert_eq!("addNode".parse::<Operation>().unwrap(), Operation::AddNode);
        assert!("bogosort".parse::<AlgorithmKind>().is_err());
        assert!("AddNode".parse::<Operation>().is_err());
    }

    #[test]
    fn serde_uses_wire_names() {
        let json = serde_json::to_string(&AlgorithmKind::MergeSort).unwrap();
        assert_eq!(json, "\"mergesort\"");
        let json = serde_json::to_string(&Operation::RemoveEdge).unwrap();
        assert_eq!(json, "\"removeEdge\"");
        for op in Operation::ALL {
            let json = serde_json::to_string(&op).unwrap();
            assert_eq!(json, format!("\"{}\"", op.as_str()));
        }
    }

    #[test]
    fn info_serializes_with_type_key() {
        let value = serde_json::to_value(AlgorithmKind::Dijkstra.info()).unwrap();
        assert_eq!(value["type"], "dijkstra");
        assert_eq!(value["category"], "graph");
        assert_eq!(value["complexity"]["time"], "O(E log V)");
    }
}
