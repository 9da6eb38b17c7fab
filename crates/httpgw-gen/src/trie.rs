//! Compact prefix-matching structure over field-path sequences.
//!
//! The serialized form (`encoding`/`base`/`check`) is embedded verbatim in
//! generated code so the proxy runtime never rebuilds it. Construction is
//! canonical: sequences are sorted and deduplicated first and token codes
//! are assigned in first-use order over that sorted list, so the same input
//! model always serializes to the same bytes.

use proc_macro2::TokenStream;
use quote::{ToTokens, quote};
use serde::Serialize;
use std::collections::BTreeMap;

/// Token code `0` is reserved for the end-of-sequence edge; real tokens
/// start at `1`.
const TERMINAL: usize = 0;

///
/// DoubleArray
///

#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct DoubleArray {
    /// Token with code `i + 1` lives at index `i`.
    encoding: Vec<String>,
    base: Vec<i32>,
    check: Vec<i32>,
}

#[derive(Clone, Debug, Default)]
struct TrieNode {
    children: BTreeMap<usize, usize>,
    accept: bool,
}

impl DoubleArray {
    /// Build from field-path sequences. Empty sequences are dropped;
    /// duplicates collapse.
    #[must_use]
    pub fn new(mut seqs: Vec<Vec<String>>) -> Self {
        seqs.retain(|s| !s.is_empty());
        seqs.sort();
        seqs.dedup();

        let mut encoding: Vec<String> = Vec::new();
        let mut nodes = vec![TrieNode::default()];

        for seq in &seqs {
            let mut cur = 0;
            for tok in seq {
                let code = intern(&mut encoding, tok);
                let next = nodes[cur].children.get(&code).copied();
                cur = match next {
                    Some(child) => child,
                    None => {
                        let child = nodes.len();
                        nodes.push(TrieNode::default());
                        nodes[cur].children.insert(code, child);
                        child
                    }
                };
            }
            nodes[cur].accept = true;
        }

        // slot 1 is the root; slot 0 stays unused so check == 0 means free
        let mut base = vec![0_i32; 2];
        let mut check = vec![0_i32; 2];
        place(&nodes, 0, 1, &mut base, &mut check);

        Self {
            encoding,
            base,
            check,
        }
    }

    /// Whether `tokens` shares a prefix with any registered sequence: some
    /// registered sequence is a prefix of `tokens`, or `tokens` is a prefix
    /// of a registered sequence. The empty input matches nothing.
    #[must_use]
    pub fn has_common_prefix(&self, tokens: &[&str]) -> bool {
        if self.check.len() <= 1 || tokens.is_empty() {
            return false;
        }

        let mut state = 1_usize;
        for tok in tokens {
            if self.accepts(state) {
                return true;
            }
            let Some(code) = self.code(tok) else {
                return false;
            };
            let next = usize::try_from(self.base[state]).unwrap_or(0) + code;
            if next >= self.check.len() || self.check[next] != i32::try_from(state).unwrap_or(-1) {
                return false;
            }
            state = next;
        }

        true
    }

    #[must_use]
    pub fn encoding(&self) -> &[String] {
        &self.encoding
    }

    #[must_use]
    pub fn base(&self) -> &[i32] {
        &self.base
    }

    #[must_use]
    pub fn check(&self) -> &[i32] {
        &self.check
    }

    fn code(&self, tok: &str) -> Option<usize> {
        self.encoding.iter().position(|t| t == tok).map(|i| i + 1)
    }

    // a state accepts iff its terminal edge (code 0) is wired
    fn accepts(&self, state: usize) -> bool {
        let t = usize::try_from(self.base[state]).unwrap_or(0);
        t < self.check.len() && self.check[t] == i32::try_from(state).unwrap_or(-1)
    }
}

impl ToTokens for DoubleArray {
    fn to_tokens(&self, tokens: &mut TokenStream) {
        let encoding = &self.encoding;
        let base = &self.base;
        let check = &self.check;

        tokens.extend(quote! {
            ::httpgw_runtime::DoubleArray {
                encoding: &[#(#encoding),*],
                base: &[#(#base),*],
                check: &[#(#check),*],
            }
        });
    }
}

fn intern(encoding: &mut Vec<String>, tok: &str) -> usize {
    if let Some(i) = encoding.iter().position(|t| t == tok) {
        return i + 1;
    }
    encoding.push(tok.to_string());

    encoding.len()
}

// Assign double-array slots depth-first. The parent wires every child's
// check entry before recursing, so sibling subtrees never collide.
fn place(nodes: &[TrieNode], node: usize, slot: usize, base: &mut Vec<i32>, check: &mut Vec<i32>) {
    let mut codes: Vec<usize> = Vec::new();
    if nodes[node].accept {
        codes.push(TERMINAL);
    }
    codes.extend(nodes[node].children.keys().copied());
    if codes.is_empty() {
        return;
    }

    let b = find_base(&codes, check);
    let top = b + codes.last().copied().unwrap_or(0);
    if top >= check.len() {
        check.resize(top + 1, 0);
        base.resize(top + 1, 0);
    }

    base[slot] = i32::try_from(b).unwrap_or(i32::MAX);
    for &c in &codes {
        check[b + c] = i32::try_from(slot).unwrap_or(i32::MAX);
    }
    for (&c, &child) in &nodes[node].children {
        place(nodes, child, b + c, base, check);
    }
}

// Smallest b >= 1 whose slots b + c are all free. Slot 1 is the root and
// never free; slots past the current length are free by definition.
fn find_base(codes: &[usize], check: &[i32]) -> usize {
    let free = |t: usize| t > 1 && (t >= check.len() || check[t] == 0);

    let mut b = 1;
    loop {
        if codes.iter().all(|&c| free(b + c)) {
            return b;
        }
        b += 1;
    }
}
