use std::fmt;
use std::marker::PhantomData;

/// String identifier tagged with the kind of entity it names.
///
/// Equality and hashing go through the string only, so two `Id`s built from
/// the same text are interchangeable keys.
#[derive(PartialEq, Eq, PartialOrd, Ord, Clone, Hash)]
pub struct Id<T> {
    pub id: String,
    _marker: PhantomData<T>,
}

impl<T> Id<T> {
    pub fn new(id: impl Into<String>) -> Self {
        Id { id: id.into(), _marker: PhantomData }
    }

    pub fn as_str(&self) -> &str {
        &self.id
    }
}

impl<T> fmt::Display for Id<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.id)
    }
}

impl<T> From<Id<T>> for String {
    fn from(id_wrapper: Id<T>) -> Self {
        id_wrapper.id
    }
}

impl<T> From<&str> for Id<T> {
    fn from(id: &str) -> Self {
        Id::new(id)
    }
}

impl<T> fmt::Debug for Id<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let full_name = std::any::type_name::<T>();
        let clean_name = full_name.split("::").last().unwrap_or(full_name);
        let display_name = clean_name.replace("Tag", "Id");

        write!(f, "{}: {:?}", display_name, self.id)
    }
}

#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Clone, Hash, Copy)]
pub struct NodeTag;

pub type NodeId = Id<NodeTag>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_debug_names_the_tag() {
        let id = NodeId::new("AA");
        assert_eq!(format!("{:?}", id), "NodeId: \"AA\"");
        assert_eq!(id.to_string(), "AA");
    }

    #[test]
    fn test_ids_compare_by_text() {
        assert_eq!(NodeId::new("BB"), NodeId::from("BB"));
        assert!(NodeId::new("AA") < NodeId::new("BB"));
    }
}
