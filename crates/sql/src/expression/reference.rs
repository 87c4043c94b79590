//! Named value accessors over a rebindable row
//!
//! System tables render each row by asking a tree of accessors for values.
//! The tree is built once per table; only the state it reads from changes
//! between rows.

use std::collections::BTreeMap;

use strata_value::Value;

/// A node of an accessor tree: a value, and possibly named children.
pub trait ReferenceImplementation {
    /// Current value, or `None` when the node doesn't apply to the bound row.
    fn value(&self) -> Option<Value>;

    /// Child accessor by name.
    fn child(&self, name: &str) -> Option<Box<dyn ReferenceImplementation + '_>>;

    /// Value at a dotted path below this node, e.g. `size.percent`.
    fn lookup(&self, path: &str) -> Option<Value> {
        match path.split_once('.') {
            Some((head, rest)) => self.child(head)?.lookup(rest),
            None => self.child(path)?.value(),
        }
    }
}

impl<R: ReferenceImplementation + ?Sized> ReferenceImplementation for &R {
    fn value(&self) -> Option<Value> {
        (**self).value()
    }

    fn child(&self, name: &str) -> Option<Box<dyn ReferenceImplementation + '_>> {
        (**self).child(name)
    }
}

/// A fixed value with no children.
#[derive(Debug, Clone, PartialEq)]
pub struct LiteralReference(pub Value);

impl ReferenceImplementation for LiteralReference {
    fn value(&self) -> Option<Value> {
        Some(self.0.clone())
    }

    fn child(&self, _name: &str) -> Option<Box<dyn ReferenceImplementation + '_>> {
        None
    }
}

enum Field<T> {
    Leaf(fn(&T) -> Value),
    Object(ObjectFields<T>),
}

/// The shape of an object: named leaf accessors and nested objects, all
/// reading from a `T`.
pub struct ObjectFields<T> {
    fields: BTreeMap<&'static str, Field<T>>,
}

impl<T> Default for ObjectFields<T> {
    fn default() -> Self {
        Self {
            fields: BTreeMap::new(),
        }
    }
}

impl<T> ObjectFields<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn leaf(mut self, name: &'static str, accessor: fn(&T) -> Value) -> Self {
        self.fields.insert(name, Field::Leaf(accessor));
        self
    }

    pub fn object(mut self, name: &'static str, fields: ObjectFields<T>) -> Self {
        self.fields.insert(name, Field::Object(fields));
        self
    }

    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.fields.keys().copied()
    }

    /// Whether a dotted path names a field, regardless of any bound state.
    pub fn has_path(&self, path: &str) -> bool {
        let (head, rest) = match path.split_once('.') {
            Some((head, rest)) => (head, Some(rest)),
            None => (path, None),
        };
        match (self.fields.get(head), rest) {
            (Some(_), None) => true,
            (Some(Field::Object(nested)), Some(rest)) => nested.has_path(rest),
            _ => false,
        }
    }

    /// Every field evaluated against `state`, as a nested map.
    pub fn value(&self, state: &T) -> Value {
        Value::Map(
            self.fields
                .iter()
                .map(|(name, field)| {
                    let value = match field {
                        Field::Leaf(accessor) => accessor(state),
                        Field::Object(nested) => nested.value(state),
                    };
                    (name.to_string(), value)
                })
                .collect(),
        )
    }

    pub fn child<'a>(
        &'a self,
        state: &'a T,
        name: &str,
    ) -> Option<Box<dyn ReferenceImplementation + 'a>> {
        match self.fields.get(name)? {
            Field::Leaf(accessor) => Some(Box::new(LiteralReference(accessor(state)))),
            Field::Object(fields) => Some(Box::new(BoundObject { fields, state })),
        }
    }
}

/// An object's fields bound to one state.
struct BoundObject<'a, T> {
    fields: &'a ObjectFields<T>,
    state: &'a T,
}

impl<T> ReferenceImplementation for BoundObject<'_, T> {
    fn value(&self) -> Option<Value> {
        Some(self.fields.value(self.state))
    }

    fn child(&self, name: &str) -> Option<Box<dyn ReferenceImplementation + '_>> {
        self.fields.child(self.state, name)
    }
}

/// An object expression that is rebound to each row in turn.
///
/// The projection picks the state out of a row. When it yields nothing the
/// whole object is absent: `value()` is `None` and there are no children.
/// Rebinding needs `&mut self`, so no reader can observe a half-bound row.
pub struct RowContextObjectExpression<R, T> {
    fields: ObjectFields<T>,
    project: fn(&R) -> Option<T>,
    current: Option<T>,
}

impl<R, T> RowContextObjectExpression<R, T> {
    pub fn new(fields: ObjectFields<T>, project: fn(&R) -> Option<T>) -> Self {
        Self {
            fields,
            project,
            current: None,
        }
    }

    /// Bind the next row, replacing whatever was bound before.
    pub fn set_next_row(&mut self, row: &R) {
        self.current = (self.project)(row);
    }

    pub fn fields(&self) -> &ObjectFields<T> {
        &self.fields
    }

    pub fn current(&self) -> Option<&T> {
        self.current.as_ref()
    }
}

impl<R, T> ReferenceImplementation for RowContextObjectExpression<R, T> {
    fn value(&self) -> Option<Value> {
        self.current.as_ref().map(|state| self.fields.value(state))
    }

    fn child(&self, name: &str) -> Option<Box<dyn ReferenceImplementation + '_>> {
        self.fields.child(self.current.as_ref()?, name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Point {
        x: i64,
        y: i64,
    }

    fn fields() -> ObjectFields<Point> {
        ObjectFields::<Point>::new()
            .leaf("x", |p| Value::I64(p.x))
            .object("pos", ObjectFields::<Point>::new().leaf("y", |p| Value::I64(p.y)))
    }

    #[test]
    fn test_rebind_observes_new_row_only() {
        let mut expr: RowContextObjectExpression<Option<Point>, Point> =
            RowContextObjectExpression::new(fields(), |row: &Option<Point>| {
                row.as_ref().map(|p| Point { x: p.x, y: p.y })
            });

        assert_eq!(expr.value(), None);
        expr.set_next_row(&Some(Point { x: 1, y: 2 }));
        assert_eq!(expr.lookup("x"), Some(Value::I64(1)));
        assert_eq!(expr.lookup("pos.y"), Some(Value::I64(2)));

        expr.set_next_row(&Some(Point { x: 3, y: 4 }));
        assert_eq!(expr.lookup("pos.y"), Some(Value::I64(4)));
        let mut pos = BTreeMap::new();
        pos.insert("y".to_string(), Value::I64(4));
        let mut expected = BTreeMap::new();
        expected.insert("pos".to_string(), Value::Map(pos));
        expected.insert("x".to_string(), Value::I64(3));
        assert_eq!(expr.value(), Some(Value::Map(expected)));

        expr.set_next_row(&None);
        assert_eq!(expr.value(), None);
        assert!(expr.child("x").is_none());
        assert_eq!(expr.lookup("pos.y"), None);
    }

    #[test]
    fn test_has_path_ignores_state() {
        let fields = fields();
        assert!(fields.has_path("x"));
        assert!(fields.has_path("pos"));
        assert!(fields.has_path("pos.y"));
        assert!(!fields.has_path("pos.z"));
        assert!(!fields.has_path("x.y"));
    }
}
