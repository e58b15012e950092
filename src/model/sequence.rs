//! Ordered token container for one structure instance
//!
//! Lists and stacks share this representation. The stack variant only ever
//! grows and shrinks at the end; [`SequenceModel::insert_at`] refuses to run
//! on a stack, while [`SequenceModel::remove_at`] leaves LIFO enforcement to
//! the caller.

use super::errors::ModelError;
use super::{StructureKind, ValueToken};

/// Ordered, contiguous sequence of value tokens
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SequenceModel {
    kind: StructureKind,
    tokens: Vec<ValueToken>,
}

impl SequenceModel {
    pub fn new(kind: StructureKind) -> Self {
        SequenceModel {
            kind,
            tokens: Vec::new(),
        }
    }

    /// Build a model by appending each value in order
    pub fn from_values<I, T>(kind: StructureKind, values: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<ValueToken>,
    {
        let mut model = SequenceModel::new(kind);
        for value in values {
            model.append(value.into());
        }
        model
    }

    pub fn kind(&self) -> StructureKind {
        self.kind
    }

    /// Append (or push) a token at the end
    pub fn append(&mut self, value: ValueToken) {
        self.tokens.push(value);
    }

    /// Insert a token so that it ends up at `position`
    pub fn insert_at(&mut self, position: usize, value: ValueToken) -> Result<(), ModelError> {
        if self.kind == StructureKind::Stack {
            return Err(ModelError::InvalidOperation {
                kind: "stack",
                message: "values can only be pushed onto the top".to_string(),
            });
        }
        if position > self.tokens.len() {
            return Err(ModelError::OutOfRange {
                position,
                len: self.tokens.len(),
            });
        }
        self.tokens.insert(position, value);
        Ok(())
    }

    /// Remove and return the token at `position`
    pub fn remove_at(&mut self, position: usize) -> Result<ValueToken, ModelError> {
        if position >= self.tokens.len() {
            return Err(ModelError::OutOfRange {
                position,
                len: self.tokens.len(),
            });
        }
        Ok(self.tokens.remove(position))
    }

    /// Remove the top token (the last one)
    pub fn pop(&mut self) -> Result<ValueToken, ModelError> {
        self.tokens.pop().ok_or(ModelError::OutOfRange {
            position: 0,
            len: 0,
        })
    }

    /// Position of the top token, if any
    pub fn top_position(&self) -> Option<usize> {
        self.tokens.len().checked_sub(1)
    }

    pub fn top(&self) -> Option<&ValueToken> {
        self.tokens.last()
    }

    pub fn get(&self, position: usize) -> Option<&ValueToken> {
        self.tokens.get(position)
    }

    pub fn clear(&mut self) {
        self.tokens.clear();
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Read-only view of the tokens in order
    pub fn to_ordered_sequence(&self) -> &[ValueToken] {
        &self.tokens
    }

    /// Token texts in order
    pub fn values(&self) -> Vec<&str> {
        self.tokens.iter().map(ValueToken::as_str).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_append_keeps_call_order() {
        let model = SequenceModel::from_values(StructureKind::List, ["10", "20", "30"]);
        assert_eq!(model.values(), vec!["10", "20", "30"]);
        assert_eq!(model.len(), 3);
    }

    #[test]
    fn test_duplicates_are_distinct_by_position() {
        let mut model = SequenceModel::from_values(StructureKind::List, ["7", "7", "7"]);
        model.remove_at(1).unwrap();
        assert_eq!(model.values(), vec!["7", "7"]);
    }

    #[test]
    fn test_insert_at_bounds() {
        let mut model = SequenceModel::from_values(StructureKind::List, ["a", "c"]);
        model.insert_at(1, "b".into()).unwrap();
        model.insert_at(3, "d".into()).unwrap();
        assert_eq!(model.values(), vec!["a", "b", "c", "d"]);

        let err = model.insert_at(9, "z".into()).unwrap_err();
        assert_eq!(err, ModelError::OutOfRange { position: 9, len: 4 });
    }

    #[test]
    fn test_insert_at_rejected_on_stack() {
        let mut model = SequenceModel::from_values(StructureKind::Stack, ["1"]);
        let err = model.insert_at(0, "0".into()).unwrap_err();
        assert!(matches!(err, ModelError::InvalidOperation { .. }));
        assert_eq!(model.values(), vec!["1"]);
    }

    #[test]
    fn test_remove_at_out_of_range() {
        let mut model = SequenceModel::from_values(StructureKind::List, ["a"]);
        assert_eq!(
            model.remove_at(1),
            Err(ModelError::OutOfRange { position: 1, len: 1 })
        );
        assert_eq!(model.remove_at(0), Ok(ValueToken::from("a")));
        assert!(model.is_empty());
        assert!(model.remove_at(0).is_err());
    }

    #[test]
    fn test_pop_and_top() {
        let mut model = SequenceModel::from_values(StructureKind::Stack, ["10", "20", "30"]);
        assert_eq!(model.pop().unwrap().as_str(), "30");
        assert_eq!(model.top().map(ValueToken::as_str), Some("20"));
        assert_eq!(model.top_position(), Some(1));

        model.clear();
        assert_eq!(model.top_position(), None);
        assert!(model.pop().is_err());
    }
}
