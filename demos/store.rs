//! A todo list kept in a `Store` and mirrored into session storage.
//!
//! Run with `RUST_LOG=satchel=trace cargo run --example store` to see
//! notification passes.

use satchel::format::{slugify, truncate};
use satchel::{Storage, StorageScope, Store};
use serde::{Deserialize, Serialize};
use tracing_subscriber::EnvFilter;

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
struct Todo {
    slug: String,
    title: String,
    done: bool,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
struct Todos {
    items: Vec<Todo>,
}

impl Todos {
    fn add(&mut self, title: &str) {
        self.items.push(Todo {
            slug: slugify(title),
            title: title.to_string(),
            done: false,
        });
    }

    fn toggle(&mut self, slug: &str) {
        if let Some(todo) = self.items.iter_mut().find(|t| t.slug == slug) {
            todo.done = !todo.done;
        }
    }

    fn open(&self) -> usize {
        self.items.iter().filter(|t| !t.done).count()
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let session = Storage::in_memory(StorageScope::Session);
    let store = Store::new(session.get_or_else("todos", Todos::default));

    println!("1. Subscribing a printer and a persister");
    let printer = store.subscribe(|todos: &Todos| {
        println!("   [{} open / {} total]", todos.open(), todos.items.len());
    });
    let _persist = store
        .subscribe({
            let session = session.clone();
            move |todos: &Todos| session.set("todos", todos)
        })
        .guard();

    println!("\n2. Adding todos");
    store.modify(|todos| todos.add("Learn Rust"));
    store.modify(|todos| todos.add("Write the storage layer"));
    store.modify(|todos| todos.add("Document every public function, even the small ones"));

    println!("\n3. Completing one");
    store.modify(|todos| todos.toggle("learn-rust"));

    println!("\n4. Current todos:");
    store.read(|todos| {
        for todo in &todos.items {
            let status = if todo.done { "✓" } else { " " };
            println!("   [{}] {}", status, truncate(&todo.title, 24));
        }
    });

    println!("\n5. Dropping the printer, then clearing finished todos");
    printer.unsubscribe();
    store.update(|todos| Todos {
        items: todos.items.iter().filter(|t| !t.done).cloned().collect(),
    });

    let saved: Todos = session.get("todos", Todos::default());
    println!("\n6. Session storage holds {} todos", saved.items.len());
}
