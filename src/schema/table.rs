use std::{
    collections::{HashMap, HashSet},
    fmt,
};

use tracing::debug;

use super::names::is_valid_column_name;
use super::{Column, HeadingPolicy};
use crate::error::{Result, TableError};

/// Ordered, immutable set of columns describing one table.
///
/// Column order is the field order of every row read or written through the
/// schema. Every derivation (`append`, `remove`, `select`, `rename`,
/// `change_headings`) returns a new schema and leaves `self` untouched.
/// Derived schemas keep the heading policy of `self`.
#[derive(Debug, Clone)]
pub struct ColumnSchema {
    columns: Vec<Column>,
    index: HashMap<String, usize>,
    policy: HeadingPolicy,
}

impl ColumnSchema {
    /// Build from columns in order. `policy` defaults to
    /// [`HeadingPolicy::HeadingExactCheck`].
    pub fn new(columns: Vec<Column>, policy: Option<HeadingPolicy>) -> Result<Self> {
        let schema = Self::build(columns, policy.unwrap_or_default()).map_err(|e| match e {
            TableError::DuplicateName(name) => {
                TableError::schema(format!("duplicate column name: {:?}", name))
            }
            other => other,
        })?;
        debug!(columns = schema.len(), policy = %schema.policy, "built column schema");
        Ok(schema)
    }

    fn build(columns: Vec<Column>, policy: HeadingPolicy) -> Result<Self> {
        let mut index = HashMap::with_capacity(columns.len());
        for (i, col) in columns.iter().enumerate() {
            if !is_valid_column_name(&col.name) {
                return Err(TableError::schema(format!("invalid column name: {:?}", col.name)));
            }
            if index.insert(col.name.clone(), i).is_some() {
                return Err(TableError::duplicate(col.name.clone()));
            }
        }
        Ok(Self {
            columns,
            index,
            policy,
        })
    }

    /// Copy of this schema with a different default heading policy.
    pub fn with_heading_policy(&self, policy: HeadingPolicy) -> Self {
        Self {
            policy,
            ..self.clone()
        }
    }

    pub fn heading_policy(&self) -> HeadingPolicy {
        self.policy
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Column names in field order.
    pub fn names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }

    /// Column headings in field order.
    pub fn headings(&self) -> Vec<String> {
        self.columns.iter().map(|c| c.heading.clone()).collect()
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.index.get(name).map(|&i| &self.columns[i])
    }

    /// Heading of the named column. Headings may be empty and need not be
    /// unique.
    pub fn heading(&self, name: &str) -> Result<&str> {
        self.column(name)
            .map(|c| c.heading.as_str())
            .ok_or_else(|| TableError::not_found(name))
    }

    /// Columns of `self` followed by the columns of `other`.
    pub fn append(&self, other: &ColumnSchema) -> Result<Self> {
        if let Some(dup) = other.columns.iter().find(|c| self.contains(&c.name)) {
            return Err(TableError::duplicate(dup.name.clone()));
        }
        let columns = self.columns.iter().chain(&other.columns).cloned().collect();
        self.derive(columns, "append")
    }

    /// Drop the listed columns, keeping the order of the rest.
    pub fn remove<I, S>(&self, names: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut columns = self.columns.clone();
        for name in names {
            let name = name.as_ref();
            let pos = columns
                .iter()
                .position(|c| c.name == name)
                .ok_or_else(|| TableError::not_found(name))?;
            columns.remove(pos);
        }
        self.derive(columns, "remove")
    }

    /// Exactly the listed columns, in the listed order.
    pub fn select<I, S>(&self, names: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut seen = HashSet::new();
        let mut columns = Vec::new();
        for name in names {
            let name = name.as_ref();
            let col = self.column(name).ok_or_else(|| TableError::not_found(name))?;
            if !seen.insert(name.to_string()) {
                return Err(TableError::duplicate(name));
            }
            columns.push(col.clone());
        }
        self.derive(columns, "select")
    }

    /// Rename columns given `(old, new)` pairs; positions are unchanged.
    ///
    /// Fails if an old name is unknown, a new name is invalid, or the
    /// resulting names collide. When an old name is listed twice the first
    /// pair wins.
    pub fn rename<I, A, B>(&self, pairs: I) -> Result<Self>
    where
        I: IntoIterator<Item = (A, B)>,
        A: AsRef<str>,
        B: AsRef<str>,
    {
        let mut renames: HashMap<String, String> = HashMap::new();
        for (old, new) in pairs {
            let (old, new) = (old.as_ref(), new.as_ref());
            if !self.contains(old) {
                return Err(TableError::not_found(old));
            }
            if !is_valid_column_name(new) {
                return Err(TableError::schema(format!("invalid new column name: {:?}", new)));
            }
            renames
                .entry(old.to_string())
                .or_insert_with(|| new.to_string());
        }

        let mut seen = HashSet::new();
        let mut columns = Vec::with_capacity(self.columns.len());
        for col in &self.columns {
            let col = match renames.get(&col.name) {
                Some(new) => col.with_name(new.clone()),
                None => col.clone(),
            };
            if !seen.insert(col.name.clone()) {
                return Err(TableError::duplicate(col.name));
            }
            columns.push(col);
        }
        self.derive(columns, "rename")
    }

    /// Replace headings given `(name, heading)` pairs. Names, order and
    /// conversions are unchanged. When a name is listed twice the first
    /// pair wins.
    pub fn change_headings<I, A, B>(&self, pairs: I) -> Result<Self>
    where
        I: IntoIterator<Item = (A, B)>,
        A: AsRef<str>,
        B: Into<String>,
    {
        let mut changes: HashMap<String, String> = HashMap::new();
        for (name, heading) in pairs {
            let name = name.as_ref();
            if !self.contains(name) {
                return Err(TableError::not_found(name));
            }
            changes
                .entry(name.to_string())
                .or_insert_with(|| heading.into());
        }

        let columns = self
            .columns
            .iter()
            .map(|c| match changes.get(&c.name) {
                Some(h) => c.with_heading(h.clone()),
                None => c.clone(),
            })
            .collect();
        self.derive(columns, "change_headings")
    }

    fn derive(&self, columns: Vec<Column>, op: &str) -> Result<Self> {
        let schema = Self::build(columns, self.policy)?;
        debug!(op, from = self.len(), to = schema.len(), "derived column schema");
        Ok(schema)
    }
}

impl fmt::Display for ColumnSchema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ColumnSchema.names={:?}", self.names())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::convert::{integer, nullable_text, text, to_text};

    fn col(name: &str, heading: &str) -> Column {
        Column::new(heading, text(), to_text(), name)
    }

    fn abc() -> ColumnSchema {
        ColumnSchema::new(vec![col("a", "A"), col("b", "B"), col("c", "C")], None).unwrap()
    }

    #[test]
    fn construction_validates_names() {
        assert!(matches!(
            ColumnSchema::new(vec![col("a", ""), col("a", "")], None),
            Err(TableError::Schema(msg)) if msg.contains("duplicate")
        ));
        assert!(matches!(
            ColumnSchema::new(vec![col("bad_", "")], None),
            Err(TableError::Schema(_))
        ));
        assert!(matches!(
            ColumnSchema::new(vec![col("_x", "")], None),
            Err(TableError::Schema(_))
        ));
        let s = abc();
        assert_eq!(s.heading_policy(), HeadingPolicy::HeadingExactCheck);
        assert_eq!(s.names(), vec!["a", "b", "c"]);
        assert_eq!(s.to_string(), "ColumnSchema.names=[\"a\", \"b\", \"c\"]");
    }

    #[test]
    fn copy_keeps_or_overrides_policy() {
        let s = ColumnSchema::new(vec![col("a", "A")], Some(HeadingPolicy::NoHeading)).unwrap();
        assert_eq!(s.clone().heading_policy(), HeadingPolicy::NoHeading);
        let t = s.with_heading_policy(HeadingPolicy::HeadingEasyCheck);
        assert_eq!(t.heading_policy(), HeadingPolicy::HeadingEasyCheck);
        assert_eq!(s.heading_policy(), HeadingPolicy::NoHeading);
    }

    #[test]
    fn heading_lookup() {
        let s = abc();
        assert_eq!(s.heading("b").unwrap(), "B");
        assert!(matches!(s.heading("z"), Err(TableError::NotFound(_))));
    }

    #[test]
    fn append_concatenates_and_rejects_overlap() {
        let s = abc();
        let t = ColumnSchema::new(vec![col("d", "D")], None).unwrap();
        assert_eq!(s.append(&t).unwrap().names(), vec!["a", "b", "c", "d"]);

        let overlap = ColumnSchema::new(vec![col("b", "X")], None).unwrap();
        assert!(matches!(s.append(&overlap), Err(TableError::DuplicateName(n)) if n == "b"));
        assert_eq!(s.names(), vec!["a", "b", "c"]);
        assert_eq!(s.heading("b").unwrap(), "B");
    }

    #[test]
    fn remove_keeps_order() {
        let s = abc();
        assert_eq!(s.remove(["b"]).unwrap().names(), vec!["a", "c"]);
        assert!(matches!(s.remove(["x"]), Err(TableError::NotFound(n)) if n == "x"));
        assert!(matches!(s.remove(["a", "a"]), Err(TableError::NotFound(_))));
    }

    #[test]
    fn select_reorders_and_reproduces() {
        let s = abc();
        assert_eq!(s.select(["c", "a"]).unwrap().names(), vec!["c", "a"]);
        assert!(matches!(s.select(["a", "a"]), Err(TableError::DuplicateName(_))));
        assert!(matches!(s.select(["q"]), Err(TableError::NotFound(_))));

        let same = s.select(s.names()).unwrap();
        assert_eq!(same.names(), s.names());
        assert_eq!(same.headings(), s.headings());
        assert_eq!(same.heading_policy(), s.heading_policy());
        for (x, y) in same.columns().iter().zip(s.columns()) {
            assert_eq!(x.input.label(), y.input.label());
            assert_eq!(x.output.label(), y.output.label());
        }
    }

    #[test]
    fn rename_checks_resulting_names() {
        let s = abc();
        let r = s.rename([("a", "x")]).unwrap();
        assert_eq!(r.names(), vec!["x", "b", "c"]);
        assert_eq!(r.heading("x").unwrap(), "A");

        assert!(matches!(s.rename([("a", "b")]), Err(TableError::DuplicateName(n)) if n == "b"));
        // a swap is fine because the full result is unique
        assert_eq!(s.rename([("a", "b"), ("b", "a")]).unwrap().names(), vec!["b", "a", "c"]);
        assert!(matches!(s.rename([("z", "y")]), Err(TableError::NotFound(_))));
        assert!(matches!(s.rename([("a", "9x")]), Err(TableError::Schema(_))));
    }

    #[test]
    fn change_headings_only_touches_headings() {
        let s = ColumnSchema::new(
            vec![
                Column::new("Int", integer(), to_text(), "i"),
                Column::new("Str", nullable_text(), to_text(), "s"),
            ],
            None,
        )
        .unwrap();
        let h = s.change_headings([("s", "Text")]).unwrap();
        assert_eq!(h.headings(), vec!["Int", "Text"]);
        assert_eq!(h.names(), vec!["i", "s"]);
        assert_eq!(h.column("i").unwrap().input.label(), "integer");
        assert!(matches!(s.change_headings([("nope", "x")]), Err(TableError::NotFound(_))));
        assert_eq!(s.headings(), vec!["Int", "Str"]);
    }
}
