//! Source synthesis for direct-manipulation mode
//!
//! Turns the current contents of a [`SequenceModel`] into a Python program
//! that builds the same structure when run by the external engine. Synthesis
//! is total and deterministic; the generated text is never parsed back.
//!
//! # Output Shape
//!
//! Stack:
//! ```text
//! stack = []
//! stack.append("10")
//! stack.append("20")
//! ```
//!
//! List:
//! ```text
//! class Node:
//!     def __init__(self, data):
//!         self.data = data
//!         self.next = None
//!
//! head = Node("10")
//! node1 = Node("20")
//! head.next = node1
//! ```

use crate::model::{SequenceModel, StructureKind, ValueToken};
use std::fmt::Write;

/// Placeholder shown when the list surface is empty
pub const EMPTY_LIST_PLACEHOLDER: &str = "// Code will appear here";

/// Placeholder shown when the stack surface is empty
pub const EMPTY_STACK_PLACEHOLDER: &str = "// Stack is empty";

const NODE_CLASS: &str = "class Node:\n    def __init__(self, data):\n        self.data = data\n        self.next = None\n\n";

/// Synthesize source text for the model using its own structure kind
pub fn synthesize(model: &SequenceModel) -> String {
    synthesize_as(model.to_ordered_sequence(), model.kind())
}

/// Synthesize source text for `tokens` as a structure of `kind`
pub fn synthesize_as(tokens: &[ValueToken], kind: StructureKind) -> String {
    match kind {
        StructureKind::Stack => synthesize_stack(tokens),
        StructureKind::List => synthesize_list(tokens),
    }
}

fn synthesize_stack(tokens: &[ValueToken]) -> String {
    if tokens.is_empty() {
        return EMPTY_STACK_PLACEHOLDER.to_string();
    }

    let mut code = String::from("stack = []\n");
    for token in tokens {
        // Writing into a String cannot fail
        let _ = writeln!(code, "stack.append({})", string_literal(token.as_str()));
    }
    code
}

fn synthesize_list(tokens: &[ValueToken]) -> String {
    let Some((head, rest)) = tokens.split_first() else {
        return EMPTY_LIST_PLACEHOLDER.to_string();
    };

    let mut code = String::from(NODE_CLASS);
    let _ = writeln!(code, "head = Node({})", string_literal(head.as_str()));

    for (offset, token) in rest.iter().enumerate() {
        let i = offset + 1;
        let _ = writeln!(code, "node{} = Node({})", i, string_literal(token.as_str()));
        if i == 1 {
            let _ = writeln!(code, "head.next = node{}", i);
        } else {
            let _ = writeln!(code, "node{}.next = node{}", i - 1, i);
        }
    }
    code
}

/// Double-quoted Python string literal for a token
fn string_literal(text: &str) -> String {
    let mut literal = String::with_capacity(text.len() + 2);
    literal.push('"');
    for c in text.chars() {
        match c {
            '"' => literal.push_str("\\\""),
            '\\' => literal.push_str("\\\\"),
            '\n' => literal.push_str("\\n"),
            '\r' => literal.push_str("\\r"),
            '\t' => literal.push_str("\\t"),
            c if c.is_control() => {
                let _ = write!(literal, "\\u{:04x}", c as u32);
            }
            _ => literal.push(c),
        }
    }
    literal.push('"');
    literal
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_placeholders() {
        assert_eq!(
            synthesize(&SequenceModel::new(StructureKind::List)),
            EMPTY_LIST_PLACEHOLDER
        );
        assert_eq!(
            synthesize(&SequenceModel::new(StructureKind::Stack)),
            EMPTY_STACK_PLACEHOLDER
        );
    }

    #[test]
    fn test_stack_program() {
        let model = SequenceModel::from_values(StructureKind::Stack, ["10", "20"]);
        assert_eq!(
            synthesize(&model),
            "stack = []\nstack.append(\"10\")\nstack.append(\"20\")\n"
        );
    }

    #[test]
    fn test_single_node_list() {
        let model = SequenceModel::from_values(StructureKind::List, ["5"]);
        let code = synthesize(&model);
        assert!(code.starts_with("class Node:\n"));
        assert!(code.ends_with("\nhead = Node(\"5\")\n"));
        assert!(!code.contains(".next = node"));
    }

    #[test]
    fn test_list_links_chain_from_head() {
        let model = SequenceModel::from_values(StructureKind::List, ["a", "b", "c"]);
        let code = synthesize(&model);
        let tail: Vec<&str> = code.lines().skip(5).collect();
        assert_eq!(
            tail,
            vec![
                "head = Node(\"a\")",
                "node1 = Node(\"b\")",
                "head.next = node1",
                "node2 = Node(\"c\")",
                "node1.next = node2",
            ]
        );
    }

    #[test]
    fn test_quotes_are_escaped() {
        let model = SequenceModel::from_values(StructureKind::Stack, [r#"say "hi"\"#]);
        assert_eq!(
            synthesize(&model),
            "stack = []\nstack.append(\"say \\\"hi\\\"\\\\\")\n"
        );
    }

    #[test]
    fn test_control_characters_stay_on_one_line() {
        let model = SequenceModel::from_values(StructureKind::Stack, ["a\rb\tc\u{7}"]);
        let code = synthesize(&model);
        assert_eq!(code, "stack = []\nstack.append(\"a\\rb\\tc\\u0007\")\n");
        assert_eq!(code.lines().count(), 2);
    }

    #[test]
    fn test_same_tokens_different_kind() {
        let model = SequenceModel::from_values(StructureKind::List, ["1"]);
        let as_stack = synthesize_as(model.to_ordered_sequence(), StructureKind::Stack);
        assert_eq!(as_stack, "stack = []\nstack.append(\"1\")\n");
    }
}
