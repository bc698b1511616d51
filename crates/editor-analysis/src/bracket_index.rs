//! Bracket index
//!
//! A self-balancing (AVL) binary search tree of bracket pairs keyed by the character offset
//! of the opening delimiter. Nodes live in an arena owned by the index and refer to each
//! other by index, so discarding the index (or rebuilding it) frees everything at once.
//!
//! The index is rebuilt from scratch for a text snapshot. Query results only depend on the
//! text and the [`LanguageConfig`], so two rebuilds of the same text answer identically.
//!
//! ```rust
//! use editor_analysis::BracketIndex;
//!
//! let mut index = BracketIndex::default();
//! index.rebuild("a(b[c]d)e");
//!
//! let paren = index.find_match(1).unwrap();
//! assert_eq!(paren.close_pos, Some(7));
//! assert_eq!(index.find_match(3).unwrap().level, 1);
//! ```

use crate::palette::{self, Color};
use crate::scanner::{CharClass, ContextScanner, ScanContext};
use editor_analysis_lang::LanguageConfig;

/// One opening delimiter and, if found, its closing counterpart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BracketPair {
    /// Character offset of the opening delimiter.
    pub open_pos: usize,
    /// Character offset of the closing delimiter, `None` when unmatched.
    pub close_pos: Option<usize>,
    /// Number of enclosing open delimiters at the time this one was opened.
    pub level: usize,
    /// The opening delimiter.
    pub open_char: char,
    /// The expected closing delimiter.
    pub close_char: char,
    /// `true` iff the pair was closed.
    pub valid: bool,
}

impl BracketPair {
    fn unmatched(open_pos: usize, level: usize, open_char: char, close_char: char) -> Self {
        Self {
            open_pos,
            close_pos: None,
            level,
            open_char,
            close_char,
            valid: false,
        }
    }

    fn matched(
        open_pos: usize,
        close_pos: usize,
        level: usize,
        open_char: char,
        close_char: char,
    ) -> Self {
        Self {
            open_pos,
            close_pos: Some(close_pos),
            level,
            open_char,
            close_char,
            valid: true,
        }
    }

    /// Returns `true` if either delimiter of the pair sits at `pos`.
    pub fn has_delimiter_at(&self, pos: usize) -> bool {
        self.open_pos == pos || self.close_pos == Some(pos)
    }

    /// The offset of the other delimiter, seen from `pos`.
    pub fn counterpart(&self, pos: usize) -> Option<usize> {
        if self.open_pos == pos {
            self.close_pos
        } else if self.close_pos == Some(pos) {
            Some(self.open_pos)
        } else {
            None
        }
    }

    /// Returns `true` if `pos` lies strictly after the opener and not after the closer.
    ///
    /// Cursor offsets are between characters, so for `(ab)` the offsets 1, 2 and 3 are inside.
    pub fn surrounds(&self, pos: usize) -> bool {
        match self.close_pos {
            Some(close) => self.open_pos < pos && pos <= close,
            None => false,
        }
    }
}

type NodeId = usize;

#[derive(Debug, Clone)]
struct Node {
    pair: BracketPair,
    left: Option<NodeId>,
    right: Option<NodeId>,
    height: u32,
}

/// AVL tree of [`BracketPair`]s ordered by `open_pos`.
#[derive(Debug, Clone)]
pub struct BracketIndex {
    config: LanguageConfig,
    nodes: Vec<Node>,
    root: Option<NodeId>,
    /// Matched pairs by close offset, ascending. Closers are found in text order, so this
    /// stays sorted without extra work.
    by_close: Vec<(usize, NodeId)>,
}

impl Default for BracketIndex {
    fn default() -> Self {
        Self::new(LanguageConfig::default())
    }
}

impl BracketIndex {
    /// Create an empty index for the given language.
    pub fn new(config: LanguageConfig) -> Self {
        Self {
            config,
            nodes: Vec::new(),
            root: None,
            by_close: Vec::new(),
        }
    }

    /// The language configuration used for scanning.
    pub fn config(&self) -> &LanguageConfig {
        &self.config
    }

    /// Discard all pairs.
    pub fn clear(&mut self) {
        self.nodes.clear();
        self.root = None;
        self.by_close.clear();
    }

    /// Number of pairs (matched and unmatched).
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Returns `true` if the index holds no pairs.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Number of matched pairs.
    pub fn matched_count(&self) -> usize {
        self.by_close.len()
    }

    /// Height of the tree (0 when empty).
    pub fn height(&self) -> u32 {
        self.height_of(self.root)
    }

    /// Rebuild the index for `text`, discarding the previous tree.
    pub fn rebuild(&mut self, text: &str) {
        self.clear();

        let pairs = scan_pairs(&self.config, text);
        self.nodes.reserve(pairs.len());
        for pair in pairs {
            self.insert(pair);
        }

        log::debug!(
            "bracket index rebuilt: {} pairs, {} matched, height {}",
            self.len(),
            self.matched_count(),
            self.height()
        );
    }

    fn insert(&mut self, pair: BracketPair) {
        let id = self.nodes.len();
        if let Some(close) = pair.close_pos {
            debug_assert!(self.by_close.last().is_none_or(|&(last, _)| last < close));
            self.by_close.push((close, id));
        }
        self.nodes.push(Node {
            pair,
            left: None,
            right: None,
            height: 1,
        });
        let root = self.insert_at(self.root, id);
        self.root = Some(root);
    }

    fn insert_at(&mut self, node: Option<NodeId>, new_id: NodeId) -> NodeId {
        let Some(id) = node else {
            return new_id;
        };

        if self.nodes[new_id].pair.open_pos < self.nodes[id].pair.open_pos {
            let child = self.insert_at(self.nodes[id].left, new_id);
            self.nodes[id].left = Some(child);
        } else {
            let child = self.insert_at(self.nodes[id].right, new_id);
            self.nodes[id].right = Some(child);
        }

        self.update_height(id);
        self.rebalance(id)
    }

    fn height_of(&self, node: Option<NodeId>) -> u32 {
        node.map_or(0, |id| self.nodes[id].height)
    }

    fn update_height(&mut self, id: NodeId) {
        let left = self.height_of(self.nodes[id].left);
        let right = self.height_of(self.nodes[id].right);
        self.nodes[id].height = 1 + left.max(right);
    }

    fn balance_factor(&self, id: NodeId) -> i64 {
        i64::from(self.height_of(self.nodes[id].left))
            - i64::from(self.height_of(self.nodes[id].right))
    }

    fn rebalance(&mut self, id: NodeId) -> NodeId {
        let balance = self.balance_factor(id);

        if balance > 1 {
            if let Some(left) = self.nodes[id].left
                && self.balance_factor(left) < 0
            {
                let new_left = self.rotate_left(left);
                self.nodes[id].left = Some(new_left);
            }
            return self.rotate_right(id);
        }

        if balance < -1 {
            if let Some(right) = self.nodes[id].right
                && self.balance_factor(right) > 0
            {
                let new_right = self.rotate_right(right);
                self.nodes[id].right = Some(new_right);
            }
            return self.rotate_left(id);
        }

        id
    }

    fn rotate_right(&mut self, id: NodeId) -> NodeId {
        let Some(pivot) = self.nodes[id].left else {
            debug_assert!(false, "rotate_right on a node without a left child");
            return id;
        };
        self.nodes[id].left = self.nodes[pivot].right;
        self.nodes[pivot].right = Some(id);
        self.update_height(id);
        self.update_height(pivot);
        pivot
    }

    fn rotate_left(&mut self, id: NodeId) -> NodeId {
        let Some(pivot) = self.nodes[id].right else {
            debug_assert!(false, "rotate_left on a node without a right child");
            return id;
        };
        self.nodes[id].right = self.nodes[pivot].left;
        self.nodes[pivot].left = Some(id);
        self.update_height(id);
        self.update_height(pivot);
        pivot
    }

    fn find_open(&self, pos: usize) -> Option<&BracketPair> {
        let mut node = self.root;
        while let Some(id) = node {
            let current = &self.nodes[id];
            if pos == current.pair.open_pos {
                return Some(&current.pair);
            }
            node = if pos < current.pair.open_pos {
                current.left
            } else {
                current.right
            };
        }
        None
    }

    fn find_close(&self, pos: usize) -> Option<&BracketPair> {
        self.by_close
            .binary_search_by_key(&pos, |&(close, _)| close)
            .ok()
            .map(|idx| &self.nodes[self.by_close[idx].1].pair)
    }

    /// Any pair (matched or not) with a delimiter at `pos`.
    pub fn pair_at(&self, pos: usize) -> Option<&BracketPair> {
        self.find_open(pos).or_else(|| self.find_close(pos))
    }

    /// The matched pair whose opening or closing delimiter is at `pos`.
    ///
    /// Unmatched brackets are never reported here; use [`BracketIndex::pair_at`] for those.
    pub fn find_match(&self, pos: usize) -> Option<&BracketPair> {
        self.pair_at(pos).filter(|pair| pair.valid)
    }

    /// Matched pair for a cursor: the delimiter right after the cursor wins, then the one
    /// right before it.
    pub fn match_near_cursor(&self, cursor: usize) -> Option<&BracketPair> {
        self.find_match(cursor).or_else(|| {
            cursor
                .checked_sub(1)
                .and_then(|before| self.find_match(before))
        })
    }

    /// Innermost matched pair surrounding `pos` (see [`BracketPair::surrounds`]).
    pub fn enclosing(&self, pos: usize) -> Option<&BracketPair> {
        self.iter()
            .filter(|pair| pair.surrounds(pos))
            .max_by_key(|pair| pair.open_pos)
    }

    /// Pairs with at least one delimiter in `[start, end)`, ordered by `open_pos`.
    pub fn pairs_in_range(&self, start: usize, end: usize) -> Vec<&BracketPair> {
        if start >= end {
            return Vec::new();
        }

        let mut result = Vec::new();
        self.collect_opens_in_range(self.root, start, end, &mut result);

        // Pairs opened before the range but closed inside it.
        let first = self.by_close.partition_point(|&(close, _)| close < start);
        for &(close, id) in &self.by_close[first..] {
            if close >= end {
                break;
            }
            let pair = &self.nodes[id].pair;
            if pair.open_pos < start {
                result.push(pair);
            }
        }

        result.sort_by_key(|pair| pair.open_pos);
        result
    }

    fn collect_opens_in_range<'a>(
        &'a self,
        node: Option<NodeId>,
        start: usize,
        end: usize,
        out: &mut Vec<&'a BracketPair>,
    ) {
        let Some(id) = node else {
            return;
        };
        let current = &self.nodes[id];
        let key = current.pair.open_pos;
        if key > start {
            self.collect_opens_in_range(current.left, start, end, out);
        }
        if (start..end).contains(&key) {
            out.push(&current.pair);
        }
        if key + 1 < end {
            self.collect_opens_in_range(current.right, start, end, out);
        }
    }

    /// Unmatched pairs, ordered by `open_pos`.
    pub fn unmatched(&self) -> impl Iterator<Item = &BracketPair> {
        self.iter().filter(|pair| !pair.valid)
    }

    /// In-order traversal (ascending `open_pos`).
    pub fn iter(&self) -> Iter<'_> {
        let mut iter = Iter {
            index: self,
            stack: Vec::with_capacity(self.height() as usize),
        };
        iter.push_left(self.root);
        iter
    }

    /// Display color for a nesting level.
    pub fn color_for_level(level: usize) -> Color {
        palette::color_for_level(level)
    }
}

/// In-order iterator over a [`BracketIndex`].
pub struct Iter<'a> {
    index: &'a BracketIndex,
    stack: Vec<NodeId>,
}

impl Iter<'_> {
    fn push_left(&mut self, mut node: Option<NodeId>) {
        while let Some(id) = node {
            self.stack.push(id);
            node = self.index.nodes[id].left;
        }
    }
}

impl<'a> Iterator for Iter<'a> {
    type Item = &'a BracketPair;

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.stack.pop()?;
        let index = self.index;
        let node = &index.nodes[id];
        self.push_left(node.right);
        Some(&node.pair)
    }
}

impl<'a> IntoIterator for &'a BracketIndex {
    type Item = &'a BracketPair;
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

struct OpenEntry {
    pos: usize,
    level: usize,
    open: char,
    close: char,
}

impl OpenEntry {
    fn into_unmatched(self) -> BracketPair {
        BracketPair::unmatched(self.pos, self.level, self.open, self.close)
    }
}

/// Scan `text` and produce every pair in completion order.
fn scan_pairs(config: &LanguageConfig, text: &str) -> Vec<BracketPair> {
    let mut scanner = ContextScanner::new(config);
    let mut stack: Vec<OpenEntry> = Vec::new();
    let mut pending_quote: Option<OpenEntry> = None;
    let mut level = 0usize;
    let mut pairs = Vec::new();

    for (pos, (byte, ch)) in text.char_indices().enumerate() {
        let class = scanner.feed(ch, &text[byte..]);
        match class {
            CharClass::Code => {
                if let Some(close) = config.close_for(ch) {
                    stack.push(OpenEntry {
                        pos,
                        level,
                        open: ch,
                        close,
                    });
                    level += 1;
                } else if config.is_close_bracket(ch) {
                    match stack.iter().rposition(|entry| entry.close == ch) {
                        Some(idx) => {
                            for orphan in stack.drain(idx + 1..) {
                                log::trace!(
                                    "bracket '{}' at {} left open",
                                    orphan.open,
                                    orphan.pos
                                );
                                pairs.push(orphan.into_unmatched());
                            }
                            if let Some(entry) = stack.pop() {
                                level = entry.level;
                                pairs.push(BracketPair::matched(
                                    entry.pos,
                                    pos,
                                    entry.level,
                                    entry.open,
                                    entry.close,
                                ));
                            }
                        }
                        None => log::trace!("ignoring stray '{ch}' at {pos}"),
                    }
                }
            }
            CharClass::StringOpen if config.index_quote_pairs => {
                pending_quote = Some(OpenEntry {
                    pos,
                    level,
                    open: ch,
                    close: ch,
                });
            }
            CharClass::StringClose => {
                if let Some(entry) = pending_quote.take() {
                    pairs.push(BracketPair::matched(
                        entry.pos,
                        pos,
                        entry.level,
                        entry.open,
                        entry.close,
                    ));
                }
            }
            _ => {}
        }

        // A string cut short by a newline (single-line strings) leaves its quote open.
        if !matches!(scanner.context(), ScanContext::Str { .. })
            && let Some(entry) = pending_quote.take()
        {
            pairs.push(entry.into_unmatched());
        }
    }

    pairs.extend(pending_quote.map(OpenEntry::into_unmatched));
    pairs.extend(stack.into_iter().map(OpenEntry::into_unmatched));
    pairs
}
