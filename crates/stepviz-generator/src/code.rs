//! Source snippets shown in the code panel, and line lookup into them.

pub const BST: &str = r#"template <typename T>
class BinarySearchTree {
  struct Node {
    T data;
    Node* left = nullptr;
    Node* right = nullptr;
    explicit Node(T v) : data(v) {}
  };

  Node* root = nullptr;

  Node* insert(Node* node, T value) {
    if (node == nullptr) return new Node(value);
    if (value < node->data) {
      node->left = insert(node->left, value);
    } else if (value > node->data) {
      node->right = insert(node->right, value);
    }
    return node;
  }

  Node* remove(Node* node, T value) {
    if (node == nullptr) return nullptr;
    if (value < node->data) node->left = remove(node->left, value);
    else if (value > node->data) node->right = remove(node->right, value);
    else {
      if (node->left == nullptr) return node->right;
      if (node->right == nullptr) return node->left;
      Node* succ = node->right;
      while (succ->left != nullptr) succ = succ->left;
      node->data = succ->data;
      node->right = remove(node->right, succ->data);
    }
    return node;
  }

  void inorder(Node* node, std::vector<T>& out) const {
    if (node == nullptr) return;
    inorder(node->left, out);
    out.push_back(node->data);
    inorder(node->right, out);
  }

public:
  void insert(T value) { root = insert(root, value); }
  void remove(T value) { root = remove(root, value); }

  bool search(T value) const {
    Node* cur = root;
    while (cur != nullptr) {
      if (cur->data == value) return true;
      cur = value < cur->data ? cur->left : cur->right;
    }
    return false;
  }
};"#;

pub const DFS: &str = r#"void dfsVisit(const Graph& g, int v, std::vector<bool>& seen) {
  seen[v] = true;
  visit(v);

  for (int next : g.neighbors(v)) {
    if (!seen[next]) {
      dfsVisit(g, next, seen);
    }
  }
}

void depthFirstSearch(const Graph& g, int start) {
  std::vector<bool> seen(g.size(), false);
  dfsVisit(g, start, seen);
}"#;

pub const BFS: &str = r#"void breadthFirstSearch(const Graph& g, int start) {
  std::vector<bool> seen(g.size(), false);
  std::queue<int> frontier;

  seen[start] = true;
  frontier.push(start);

  while (!frontier.empty()) {
    int v = frontier.front();
    frontier.pop();
    visit(v);

    for (int next : g.neighbors(v)) {
      if (!seen[next]) {
        seen[next] = true;
        frontier.push(next);
      }
    }
  }
}"#;

pub const FIBONACCI: &str = r#"long long fibonacci(int n) {
  if (n <= 0) return 0;
  std::vector<long long> memo(n + 1, 0);
  memo[0] = 0;
  memo[1] = 1;

  for (int i = 2; i <= n; i++) {
    memo[i] = memo[i - 1] + memo[i - 2];
  }

  return memo[n];
}"#;

pub const QUICKSORT: &str = r#"int partition(std::vector<int>& a, int lo, int hi) {
  int pivot = a[hi];
  int i = lo - 1;

  for (int j = lo; j < hi; j++) {
    if (a[j] < pivot) {
      i++;
      std::swap(a[i], a[j]);
    }
  }
  std::swap(a[i + 1], a[hi]);
  return i + 1;
}

void quickSort(std::vector<int>& a, int lo, int hi) {
  if (lo < hi) {
    int p = partition(a, lo, hi);
    quickSort(a, lo, p - 1);
    quickSort(a, p + 1, hi);
  }
}"#;

pub const MERGESORT: &str = r#"void merge(std::vector<int>& a, int lo, int mid, int hi) {
  std::vector<int> left(a.begin() + lo, a.begin() + mid + 1);
  std::vector<int> right(a.begin() + mid + 1, a.begin() + hi + 1);

  size_t i = 0, j = 0;
  int k = lo;
  while (i < left.size() && j < right.size()) {
    if (left[i] <= right[j]) {
      a[k++] = left[i++];
    } else {
      a[k++] = right[j++];
    }
  }
  while (i < left.size()) a[k++] = left[i++];
  while (j < right.size()) a[k++] = right[j++];
}

void mergeSort(std::vector<int>& a, int lo, int hi) {
  if (lo < hi) {
    int mid = lo + (hi - lo) / 2;
    mergeSort(a, lo, mid);
    mergeSort(a, mid + 1, hi);
    merge(a, lo, mid, hi);
  }
}"#;

pub const HEAPSORT: &str = r#"void siftDown(std::vector<int>& a, int n, int i) {
  int largest = i;
  int l = 2 * i + 1;
  int r = 2 * i + 2;

  if (l < n && a[l] > a[largest]) largest = l;
  if (r < n && a[r] > a[largest]) largest = r;

  if (largest != i) {
    std::swap(a[i], a[largest]);
    siftDown(a, n, largest);
  }
}

void heapSort(std::vector<int>& a) {
  int n = a.size();
  for (int i = n / 2 - 1; i >= 0; i--) siftDown(a, n, i);

  for (int i = n - 1; i > 0; i--) {
    std::swap(a[0], a[i]);
    siftDown(a, i, 0);
  }
}"#;

pub const PLACEHOLDER: &str = "// Algorithm code would be shown here";

/// 1-based line of the first occurrence of `needle` in `code`, or line 1.
pub fn line_of(code: &str, needle: &str) -> u32 {
    code.lines()
        .position(|line| line.contains(needle))
        .map(|i| i as u32 + 1)
        .unwrap_or(1)
}

/// Lines of each needle, in order.
pub fn lines_of(code: &str, needles: &[&str]) -> Vec<u32> {
    needles.iter().map(|needle| line_of(code, needle)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn line_of_finds_first_match() {
        let code = "a\nbb\nbb\nc";
        assert_eq!(line_of(code, "bb"), 2);
        assert_eq!(line_of(code, "c"), 4);
    }

    #[test]
    fn missing_needle_falls_back_to_first_line() {
        assert_eq!(line_of(BST, "no such text"), 1);
    }

    #[test]
    fn needles_used_by_generators_exist() {
        for (code, needle) in [
            (BST, "node->left = insert"),
            (BST, "if (cur->data == value)"),
            (DFS, "dfsVisit(g, next, seen)"),
            (BFS, "frontier.push(next)"),
            (FIBONACCI, "memo[i] = memo[i - 1]"),
            (QUICKSORT, "std::swap(a[i], a[j])"),
            (MERGESORT, "merge(a, lo, mid, hi);"),
            (HEAPSORT, "siftDown(a, i, 0)"),
        ] {
            assert!(code.lines().any(|l| l.contains(needle)), "missing {needle:?}");
        }
    }
}
