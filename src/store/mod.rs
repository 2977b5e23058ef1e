use parking_lot::Mutex;

use crate::data::value as r;
use crate::object;

mod schema;

pub use self::schema::api_schema;

/// An author of tutorials, with the ids of the tutorials they wrote.
#[derive(Clone, Debug, PartialEq)]
pub struct Author {
    pub name: String,
    pub tutorials: Vec<i32>,
}

/// A comment left on a tutorial.
#[derive(Clone, Debug, PartialEq)]
pub struct Comment {
    pub body: String,
}

/// A tutorial record, the unit the demo data set stores and queries.
#[derive(Clone, Debug, PartialEq)]
pub struct Tutorial {
    pub id: i32,
    pub title: String,
    pub author: Author,
    pub comments: Vec<Comment>,
}

impl From<&Author> for r::Value {
    fn from(author: &Author) -> Self {
        object! {
            Name: author.name.clone(),
            Tutorials: author.tutorials.clone(),
        }
    }
}

impl From<&Comment> for r::Value {
    fn from(comment: &Comment) -> Self {
        object! {
            Body: comment.body.clone(),
        }
    }
}

impl From<&Tutorial> for r::Value {
    fn from(tutorial: &Tutorial) -> Self {
        object! {
            ID: tutorial.id,
            Title: tutorial.title.clone(),
            Author: r::Value::from(&tutorial.author),
            Comments: tutorial
                .comments
                .iter()
                .map(r::Value::from)
                .collect::<Vec<_>>(),
        }
    }
}

/// Builds the demo data set. Every call constructs a fresh, independently
/// owned copy of the same records.
pub fn populate() -> Vec<Tutorial> {
    let lina = Author {
        name: "Lina Vargas".to_owned(),
        tutorials: vec![1, 3],
    };
    let maxim = Author {
        name: "Maxim Orlov".to_owned(),
        tutorials: vec![2],
    };

    vec![
        Tutorial {
            id: 1,
            title: "Introduction to GraphQL".to_owned(),
            author: lina.clone(),
            comments: vec![
                Comment {
                    body: "Nice and compact".to_owned(),
                },
                Comment {
                    body: "Helped me get started".to_owned(),
                },
            ],
        },
        Tutorial {
            id: 2,
            title: "Advanced Schema Design".to_owned(),
            author: maxim,
            comments: vec![Comment {
                body: "Looking forward to part two".to_owned(),
            }],
        },
        Tutorial {
            id: 3,
            title: "Resolvers in Depth".to_owned(),
            author: lina,
            comments: vec![],
        },
    ]
}

/// In-memory tutorial store. A query execution receives a handle to the
/// store as its context, and all resolver access goes through that
/// handle; nothing is shared through globals.
pub struct TutorialStore {
    tutorials: Mutex<Vec<Tutorial>>,
}

impl TutorialStore {
    /// Creates a store seeded with the demo data set.
    pub fn new() -> Self {
        TutorialStore {
            tutorials: Mutex::new(populate()),
        }
    }

    /// Creates a store with no records.
    pub fn empty() -> Self {
        TutorialStore {
            tutorials: Mutex::new(Vec::new()),
        }
    }

    /// Looks up the first tutorial with the given id.
    pub fn find(&self, id: i32) -> Option<Tutorial> {
        self.tutorials.lock().iter().find(|t| t.id == id).cloned()
    }

    /// Returns all tutorials in insertion order.
    pub fn list(&self) -> Vec<Tutorial> {
        self.tutorials.lock().clone()
    }

    /// Appends a new tutorial with the given title and returns it. Ids
    /// continue after the highest id in the store.
    pub fn create(&self, title: String) -> Tutorial {
        let mut tutorials = self.tutorials.lock();
        let id = tutorials.iter().map(|t| t.id).max().unwrap_or(0) + 1;
        let tutorial = Tutorial {
            id,
            title,
            author: Author {
                name: String::new(),
                tutorials: Vec::new(),
            },
            comments: Vec::new(),
        };
        tutorials.push(tutorial.clone());
        tutorial
    }
}

impl Default for TutorialStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn populate_returns_independent_copies() {
        let mut first = populate();
        let second = populate();
        assert_eq!(first, second);

        // Changing one copy leaves the other untouched.
        first[0].title = "Changed".to_owned();
        assert_ne!(first, second);
        assert_eq!(second, populate());
    }

    #[test]
    fn create_continues_after_the_highest_id() {
        let store = TutorialStore::new();
        assert_eq!(store.create("A new tutorial".to_owned()).id, 4);
        assert_eq!(store.create("Another one".to_owned()).id, 5);
        assert_eq!(store.list().len(), 5);

        let store = TutorialStore::empty();
        assert_eq!(store.create("The first".to_owned()).id, 1);
    }

    #[test]
    fn find_misses_unknown_ids() {
        let store = TutorialStore::new();
        assert_eq!(store.find(1).map(|t| t.id), Some(1));
        assert_eq!(store.find(999), None);
    }

    #[test]
    fn tutorial_values_keep_field_order() {
        let tutorial = &populate()[2];
        let value = r::Value::from(tutorial);
        let json = serde_json::to_string(&value).unwrap();
        assert_eq!(
            json,
            r#"{"ID":3,"Title":"Resolvers in Depth","Author":{"Name":"Lina Vargas","Tutorials":[1,3]},"Comments":[]}"#
        );
    }
}
